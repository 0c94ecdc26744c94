pub mod layers;
pub mod messages;
pub mod viewport;

pub use layers::{
    Control, ControlId, DrawnItems, Layer, LayerId, ListenerId, MapEventKind, MapState, Marker,
    TileLayer,
};
pub use messages::MapMessage;
pub use viewport::Viewport;
