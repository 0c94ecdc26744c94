//! # AgriSentinel Map
//!
//! Headless core of the parcel map widget: a satellite raster colorized by
//! NDVI class over a base map, and draw tools that report the parcel
//! outline and its area. A host UI renders [`MapState`] and feeds user
//! gestures back in as [`DrawEvent`]s.
//!
//! ## Modules
//!
//! - **view**: [`MapView`], the composed widget and its lifecycle
//! - **loader** / **task**: cancellable raster loads and overlay ownership
//! - **draw**: polygon capture and area reporting
//! - **state**: layers, controls, listeners and the viewport
//! - **config**: [`MapConfig`], loadable from TOML
//! - **parcel**: the new-parcel form record

pub mod config;
pub mod coord;
pub mod draw;
pub mod error;
pub mod loader;
pub mod overlay;
pub mod parcel;
pub mod state;
pub mod task;
pub mod view;

pub use config::MapConfig;
pub use coord::GeoCoordinate;
pub use draw::{AreaCallback, DrawEvent, DrawOptions, DrawnShape, PolygonCapture};
pub use error::{MapError, Result};
pub use loader::{Commit, LoadStatus, RasterLoader};
pub use overlay::NdviOverlay;
pub use parcel::{ParcelForm, ParcelRecord};
pub use state::{Layer, LayerId, MapMessage, MapState, Viewport};
pub use task::{CancelToken, LoadOutcome, LoadTask};
pub use view::{MapProps, MapView};
