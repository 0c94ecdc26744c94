//! Messages for inter-thread communication.

use crate::draw::DrawEvent;
use crate::task::LoadOutcome;

/// Messages sent from background tasks to the thread owning the map.
pub enum MapMessage {
    /// A spawned raster load finished (successfully, with an error, or
    /// after being superseded).
    RasterLoaded(LoadOutcome),
    /// A draw or edit gesture finished in the host UI.
    Draw(DrawEvent),
}
