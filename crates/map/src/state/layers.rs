//! Map state: layers, controls, event listeners and the viewport.
//!
//! This is the host-agnostic stand-in for a slippy-map instance. Components
//! add and remove what they own through ids; a renderer reads it back.

use std::collections::HashMap;

use geo_types::Polygon;

use crate::coord::GeoCoordinate;
use crate::draw::DrawOptions;
use crate::overlay::NdviOverlay;

use super::viewport::Viewport;

/// Identifier of a layer in a [`MapState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub u64);

/// Identifier of a control in a [`MapState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(pub u64);

/// Identifier of an event listener in a [`MapState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Slippy-map base tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

/// Point marker with a popup.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: GeoCoordinate,
    pub popup: String,
}

/// Group holding user-drawn shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawnItems {
    pub shapes: Vec<Polygon<f64>>,
}

pub enum Layer {
    Tiles(TileLayer),
    Marker(Marker),
    NdviOverlay(NdviOverlay),
    DrawnItems(DrawnItems),
}

impl Layer {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Tiles(_) => "tiles",
            Self::Marker(_) => "marker",
            Self::NdviOverlay(_) => "ndvi_overlay",
            Self::DrawnItems(_) => "drawn_items",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Draw(DrawOptions),
}

/// Map events a component can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapEventKind {
    /// A shape was finished with a draw tool.
    Created,
    /// One or more shapes were edited.
    Edited,
}

pub struct MapState {
    layers: HashMap<LayerId, Layer>,
    /// Display order (bottom to top).
    layer_order: Vec<LayerId>,
    controls: HashMap<ControlId, Control>,
    listeners: HashMap<ListenerId, MapEventKind>,
    viewport: Viewport,
    /// Counter for generating unique IDs.
    next_id: u64,
}

impl MapState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            layers: HashMap::new(),
            layer_order: Vec::new(),
            controls: HashMap::new(),
            listeners: HashMap::new(),
            viewport,
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add a layer on top and return its ID.
    pub fn add_layer(&mut self, layer: Layer) -> LayerId {
        let id = LayerId(self.next_id());
        tracing::debug!(id = id.0, kind = layer.kind(), "add layer");
        self.layer_order.push(id);
        self.layers.insert(id, layer);
        id
    }

    /// Remove a layer, returning it if it was present.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<Layer> {
        let layer = self.layers.remove(&id)?;
        tracing::debug!(id = id.0, kind = layer.kind(), "remove layer");
        self.layer_order.retain(|&i| i != id);
        Some(layer)
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(&id)
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.get_mut(&id)
    }

    pub fn has_layer(&self, id: LayerId) -> bool {
        self.layers.contains_key(&id)
    }

    /// Iterate layers in display order.
    pub fn layers_ordered(&self) -> impl Iterator<Item = (LayerId, &Layer)> {
        self.layer_order
            .iter()
            .filter_map(|id| self.layers.get(id).map(|l| (*id, l)))
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// All NDVI overlays currently on the map.
    pub fn overlays(&self) -> impl Iterator<Item = &NdviOverlay> {
        self.layers_ordered().filter_map(|(_, l)| match l {
            Layer::NdviOverlay(o) => Some(o),
            _ => None,
        })
    }

    pub fn add_control(&mut self, control: Control) -> ControlId {
        let id = ControlId(self.next_id());
        self.controls.insert(id, control);
        id
    }

    pub fn remove_control(&mut self, id: ControlId) -> Option<Control> {
        self.controls.remove(&id)
    }

    pub fn control_count(&self) -> usize {
        self.controls.len()
    }

    /// Register interest in `kind`.
    pub fn on(&mut self, kind: MapEventKind) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.insert(id, kind);
        id
    }

    /// Unregister a listener. Returns whether it existed.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Whether `id` is still registered.
    pub fn is_listening(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(&id)
    }

    pub fn listener_count(&self, kind: MapEventKind) -> usize {
        self.listeners.values().filter(|&&k| k == kind).count()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Center on `center` at `zoom`.
    pub fn set_view(&mut self, center: GeoCoordinate, zoom: f64) {
        self.viewport.center = center;
        self.viewport.zoom = zoom;
    }
}
