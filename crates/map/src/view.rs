//! Map composition: base tiles, a marker, the NDVI overlay and the
//! polygon capture tools in one view.
//!
//! `MapView` is owned by the host's UI loop and is the only writer of its
//! map state. Raster loads either run inline with [`MapView::load_raster`]
//! or on a tokio runtime with [`MapView::spawn_load`]; spawned loads report
//! back through a channel drained by [`MapView::process_messages`].

use std::sync::Arc;

use agrisentinel_cloud::{AssetSource, HttpAssetSource};
use crossbeam_channel::{Receiver, Sender};
use geo_types::Polygon;

use crate::config::MapConfig;
use crate::coord::GeoCoordinate;
use crate::draw::{AreaCallback, DrawEvent, DrawOptions, PolygonCapture};
use crate::error::Result;
use crate::loader::{Commit, LoadStatus, RasterLoader};
use crate::state::{Layer, LayerId, MapMessage, MapState, Marker, TileLayer, Viewport};
use crate::task::{LoadOutcome, LoadTask};

pub const STATUS_LOADING: &str = "Loading/computing NDVI…";
pub const STATUS_IDLE: &str = "Map (OSM + client-side NDVI)";

/// Inbound properties of the view.
pub struct MapProps {
    /// Map center and marker position.
    pub center: GeoCoordinate,
    /// Raster asset file name; `None` shows no overlay.
    pub tif_name: Option<String>,
    /// Called with each captured parcel outline and its area in hectares.
    pub on_area: AreaCallback,
}

/// Marker popup text for `center`.
pub fn popup_text(center: &GeoCoordinate) -> String {
    format!("Point ({})", center)
}

pub struct MapView {
    config: MapConfig,
    source: Arc<dyn AssetSource>,
    map: MapState,
    loader: RasterLoader,
    capture: PolygonCapture,
    center: GeoCoordinate,
    tif_name: Option<String>,
    on_area: AreaCallback,
    /// Load started but not yet picked up by `load_raster`/`spawn_load`.
    pending: Option<LoadTask>,
    base_layer: Option<LayerId>,
    marker: Option<LayerId>,
    mounted: bool,

    /// Message channels for background task communication.
    tx: Sender<MapMessage>,
    rx: Receiver<MapMessage>,
}

impl MapView {
    pub fn new(config: MapConfig, source: Arc<dyn AssetSource>, props: MapProps) -> Self {
        let viewport = Viewport::new(
            props.center,
            config.initial_zoom,
            config.viewport_width,
            config.viewport_height,
        );
        let (tx, rx) = crossbeam_channel::unbounded();

        Self {
            loader: RasterLoader::new(&config),
            capture: PolygonCapture::new(DrawOptions::default(), config.area_method),
            map: MapState::new(viewport),
            source,
            center: props.center,
            tif_name: props.tif_name,
            on_area: props.on_area,
            pending: None,
            base_layer: None,
            marker: None,
            mounted: false,
            tx,
            rx,
            config,
        }
    }

    /// View whose rasters come from `{base_url}/{asset_dir}/{name}`.
    pub fn with_http_source(config: MapConfig, props: MapProps) -> Result<Self> {
        let source = HttpAssetSource::new(&config.base_url, config.asset_source_options())?;
        Ok(Self::new(config, Arc::new(source), props))
    }

    /// Build the map and start loading the raster, if any.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.map.set_view(self.center, self.config.initial_zoom);

        self.base_layer = Some(self.map.add_layer(Layer::Tiles(TileLayer {
            url_template: self.config.tile_url.clone(),
            attribution: self.config.attribution.clone(),
        })));
        self.marker = Some(self.map.add_layer(Layer::Marker(Marker {
            position: self.center,
            popup: popup_text(&self.center),
        })));
        self.capture.mount(&mut self.map);

        if let Some(name) = self.tif_name.clone() {
            self.pending = Some(self.loader.begin(&mut self.map, &name));
        }
        tracing::info!(lat = self.center.lat(), lon = self.center.lon(), "map mounted");
    }

    /// Remove everything the view added and cancel any load in flight.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.pending = None;
        self.loader.teardown(&mut self.map);
        self.capture.teardown(&mut self.map);
        for id in [self.marker.take(), self.base_layer.take()].into_iter().flatten() {
            self.map.remove_layer(id);
        }
        tracing::info!("map unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Switch to another raster asset. Setting the current name again is a
    /// no-op; `None` removes the overlay.
    pub fn set_raster(&mut self, tif_name: Option<String>) {
        if self.tif_name == tif_name {
            return;
        }
        self.tif_name = tif_name;
        if !self.mounted {
            return;
        }
        self.pending = match &self.tif_name {
            Some(name) => Some(self.loader.begin(&mut self.map, name)),
            None => {
                self.loader.teardown(&mut self.map);
                None
            }
        };
    }

    /// Move the marker. The viewport keeps its position.
    pub fn set_center(&mut self, center: GeoCoordinate) {
        self.center = center;
        if let Some(Layer::Marker(marker)) = self.marker.and_then(|id| self.map.layer_mut(id)) {
            marker.position = center;
            marker.popup = popup_text(&center);
        }
    }

    pub fn set_on_area(&mut self, on_area: AreaCallback) {
        self.on_area = on_area;
    }

    /// Take the load waiting to run, for hosts that drive it themselves.
    /// Feed the outcome back with [`MapView::apply_load`].
    pub fn take_load_task(&mut self) -> Option<LoadTask> {
        self.pending.take()
    }

    pub fn apply_load(&mut self, outcome: LoadOutcome) -> Commit {
        self.loader.apply(&mut self.map, outcome)
    }

    /// Run the pending load to completion and commit it.
    pub async fn load_raster(&mut self) -> Option<Commit> {
        let task = self.pending.take()?;
        let outcome = task.run(self.source.as_ref()).await;
        Some(self.apply_load(outcome))
    }

    /// Run the pending load on `rt`; the outcome arrives as a
    /// [`MapMessage::RasterLoaded`].
    pub fn spawn_load(&mut self, rt: &tokio::runtime::Handle) -> Option<tokio::task::JoinHandle<()>> {
        let task = self.pending.take()?;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        Some(rt.spawn(async move {
            let outcome = task.run(source.as_ref()).await;
            let _ = tx.send(MapMessage::RasterLoaded(outcome));
        }))
    }

    /// Sender for posting messages from other threads.
    pub fn sender(&self) -> Sender<MapMessage> {
        self.tx.clone()
    }

    /// Process pending messages from background tasks. Returns how many
    /// were handled.
    pub fn process_messages(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                MapMessage::RasterLoaded(outcome) => {
                    self.apply_load(outcome);
                }
                MapMessage::Draw(event) => {
                    self.handle_draw_event(event);
                }
            }
            handled += 1;
        }
        handled
    }

    /// Forward a draw-tool event; returns how many times the area callback ran.
    pub fn handle_draw_event(&mut self, event: DrawEvent) -> usize {
        self.capture
            .handle(&mut self.map, event, &mut *self.on_area)
    }

    /// Resize the viewport to the host's container width.
    pub fn resize(&mut self, width_px: u32) {
        self.map.viewport_mut().width_px = width_px;
    }

    pub fn status(&self) -> &LoadStatus {
        self.loader.status()
    }

    /// Caption shown above the map.
    pub fn status_text(&self) -> &'static str {
        if self.loader.status().is_loading() {
            STATUS_LOADING
        } else {
            STATUS_IDLE
        }
    }

    pub fn map(&self) -> &MapState {
        &self.map
    }

    pub fn viewport(&self) -> &Viewport {
        self.map.viewport()
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn tif_name(&self) -> Option<&str> {
        self.tif_name.as_deref()
    }

    /// The retained parcel outline.
    pub fn current_polygon(&self) -> Option<&Polygon<f64>> {
        self.capture.current(&self.map)
    }
}

impl Drop for MapView {
    fn drop(&mut self) {
        self.unmount();
    }
}
