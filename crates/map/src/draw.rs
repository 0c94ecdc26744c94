//! Polygon capture: draw/edit tools that report the parcel outline and
//! its area.
//!
//! At most one shape is retained. A newly created shape replaces the
//! previous one; an edit replaces it in place. Every accepted shape is
//! reported to the host as a GeoJSON feature plus its area in hectares.

use agrisentinel_algorithms::vector::{area_hectares, is_simple, AreaMethod};
use geo_types::{Polygon, Rect};
use geojson::{Feature, Geometry, JsonObject};

use crate::state::{Control, ControlId, DrawnItems, Layer, LayerId, ListenerId, MapEventKind, MapState};

/// Receives `(feature, hectares)` for every captured shape.
pub type AreaCallback = Box<dyn FnMut(&Feature, f64) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolygonOptions {
    pub allow_intersection: bool,
    pub show_area: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectangleOptions {
    pub show_area: bool,
}

/// Tools offered by the draw control. `None`/`false` disables a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOptions {
    pub polygon: Option<PolygonOptions>,
    pub rectangle: Option<RectangleOptions>,
    pub polyline: bool,
    pub circle: bool,
    pub circle_marker: bool,
    pub marker: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            polygon: Some(PolygonOptions {
                allow_intersection: false,
                show_area: true,
            }),
            rectangle: Some(RectangleOptions { show_area: true }),
            polyline: false,
            circle: false,
            circle_marker: false,
            marker: false,
        }
    }
}

/// A finished shape in lon/lat degrees.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawnShape {
    Polygon(Polygon<f64>),
    Rectangle(Rect<f64>),
}

impl DrawnShape {
    /// As a polygon; rectangles become closed five-vertex rings.
    pub fn to_polygon(&self) -> Polygon<f64> {
        match self {
            Self::Polygon(p) => p.clone(),
            Self::Rectangle(r) => r.to_polygon(),
        }
    }
}

/// Draw-tool events from the host UI.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawEvent {
    Created(DrawnShape),
    /// Edited shapes in the order the host reports them.
    Edited(Vec<DrawnShape>),
}

/// GeoJSON `Feature` with `Polygon` geometry and empty properties.
pub fn shape_feature(polygon: &Polygon<f64>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geojson::Value::from(polygon))),
        id: None,
        properties: Some(JsonObject::new()),
        foreign_members: None,
    }
}

#[derive(Debug)]
struct CaptureHandles {
    layer: LayerId,
    control: ControlId,
    created: ListenerId,
    edited: ListenerId,
}

pub struct PolygonCapture {
    options: DrawOptions,
    area_method: AreaMethod,
    handles: Option<CaptureHandles>,
}

impl PolygonCapture {
    pub fn new(options: DrawOptions, area_method: AreaMethod) -> Self {
        Self {
            options,
            area_method,
            handles: None,
        }
    }

    pub fn options(&self) -> &DrawOptions {
        &self.options
    }

    pub fn is_mounted(&self) -> bool {
        self.handles.is_some()
    }

    /// Add the drawn-items layer, the draw control and the listeners.
    pub fn mount(&mut self, map: &mut MapState) {
        if self.handles.is_some() {
            return;
        }
        let layer = map.add_layer(Layer::DrawnItems(DrawnItems::default()));
        let control = map.add_control(Control::Draw(self.options.clone()));
        let created = map.on(MapEventKind::Created);
        let edited = map.on(MapEventKind::Edited);
        self.handles = Some(CaptureHandles {
            layer,
            control,
            created,
            edited,
        });
    }

    /// Remove everything `mount` added, including the retained shape.
    pub fn teardown(&mut self, map: &mut MapState) {
        if let Some(h) = self.handles.take() {
            map.off(h.created);
            map.off(h.edited);
            map.remove_control(h.control);
            map.remove_layer(h.layer);
        }
    }

    /// The retained shape.
    pub fn current<'a>(&self, map: &'a MapState) -> Option<&'a Polygon<f64>> {
        let h = self.handles.as_ref()?;
        match map.layer(h.layer)? {
            Layer::DrawnItems(items) => items.shapes.last(),
            _ => None,
        }
    }

    /// Process a draw event, calling `on_area` once per accepted shape.
    ///
    /// Returns the number of callback invocations.
    pub fn handle(
        &mut self,
        map: &mut MapState,
        event: DrawEvent,
        on_area: &mut dyn FnMut(&Feature, f64),
    ) -> usize {
        let Some(h) = self.handles.as_ref() else {
            tracing::debug!("draw event ignored, capture not mounted");
            return 0;
        };
        let (layer, created, edited) = (h.layer, h.created, h.edited);

        match event {
            DrawEvent::Created(shape) => {
                if !map.is_listening(created) {
                    return 0;
                }
                let Some(polygon) = self.accept_created(&shape) else {
                    return 0;
                };
                set_shapes(map, layer, |shapes| {
                    shapes.clear();
                    shapes.push(polygon.clone());
                });
                self.report(&polygon, on_area);
                1
            }
            DrawEvent::Edited(shapes) => {
                if !map.is_listening(edited) {
                    return 0;
                }
                let mut reported = 0;
                for shape in shapes {
                    let polygon = shape.to_polygon();
                    set_shapes(map, layer, |shapes| {
                        shapes.clear();
                        shapes.push(polygon.clone());
                    });
                    self.report(&polygon, on_area);
                    reported += 1;
                }
                reported
            }
        }
    }

    /// Apply the draw control's constraints to a newly created shape.
    fn accept_created(&self, shape: &DrawnShape) -> Option<Polygon<f64>> {
        let polygon = match shape {
            DrawnShape::Polygon(p) => {
                let Some(opts) = self.options.polygon else {
                    tracing::warn!("polygon tool disabled, shape rejected");
                    return None;
                };
                if !opts.allow_intersection && !is_simple(p) {
                    tracing::warn!("self-intersecting polygon rejected");
                    return None;
                }
                p.clone()
            }
            DrawnShape::Rectangle(r) => {
                if self.options.rectangle.is_none() {
                    tracing::warn!("rectangle tool disabled, shape rejected");
                    return None;
                }
                r.to_polygon()
            }
        };
        // closed ring of at least three distinct vertices
        if polygon.exterior().0.len() < 4 {
            tracing::warn!("degenerate polygon rejected");
            return None;
        }
        Some(polygon)
    }

    fn report(&self, polygon: &Polygon<f64>, on_area: &mut dyn FnMut(&Feature, f64)) {
        let hectares = area_hectares(polygon, self.area_method);
        tracing::debug!(hectares, method = ?self.area_method, "shape captured");
        on_area(&shape_feature(polygon), hectares);
    }
}

fn set_shapes(map: &mut MapState, layer: LayerId, f: impl FnOnce(&mut Vec<Polygon<f64>>)) {
    if let Some(Layer::DrawnItems(items)) = map.layer_mut(layer) {
        f(&mut items.shapes);
    }
}
