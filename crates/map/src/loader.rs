//! Raster loader: owns the NDVI overlay of one map.
//!
//! Loading is split in three steps so the network part can run anywhere:
//! [`RasterLoader::begin`] supersedes the current load and hands out a
//! [`LoadTask`], the task runs, and [`RasterLoader::apply`] commits its
//! outcome to the map. Only the most recent task can commit.

use agrisentinel_algorithms::imagery::BandSelection;

use crate::config::MapConfig;
use crate::state::{Layer, LayerId, MapState};
use crate::task::{CancelToken, LoadOutcome, LoadTask};

/// Loading indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading { asset: String },
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// What [`RasterLoader::apply`] did with an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// A new overlay is on the map.
    Installed(LayerId),
    /// The load failed; no overlay is on the map.
    Failed,
    /// The outcome belonged to a superseded or cancelled load.
    Discarded,
}

#[derive(Debug)]
struct ActiveLoad {
    generation: u64,
    token: CancelToken,
}

pub struct RasterLoader {
    preferred: BandSelection,
    resolution: usize,
    opacity: f64,
    fit_max_zoom: f64,
    active: Option<ActiveLoad>,
    overlay: Option<LayerId>,
    status: LoadStatus,
    next_generation: u64,
}

impl RasterLoader {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            preferred: config.bands,
            resolution: config.resolution,
            opacity: config.opacity,
            fit_max_zoom: config.fit_max_zoom,
            active: None,
            overlay: None,
            status: LoadStatus::Idle,
            next_generation: 1,
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Layer id of the installed overlay.
    pub fn overlay(&self) -> Option<LayerId> {
        self.overlay
    }

    /// Start loading `asset`, superseding any load in flight.
    ///
    /// The previous overlay is taken off the map right away.
    pub fn begin(&mut self, map: &mut MapState, asset: &str) -> LoadTask {
        self.cancel_active();
        self.remove_overlay(map);

        let generation = self.next_generation;
        self.next_generation += 1;
        let token = CancelToken::new();
        self.active = Some(ActiveLoad {
            generation,
            token: token.clone(),
        });
        self.status = LoadStatus::Loading {
            asset: asset.to_string(),
        };
        tracing::info!(asset, generation, "raster load started");

        LoadTask {
            generation,
            asset: asset.to_string(),
            token,
            preferred: self.preferred,
            resolution: self.resolution,
            opacity: self.opacity,
        }
    }

    /// Commit a finished task.
    ///
    /// Outcomes of cancelled or superseded tasks are dropped without touching
    /// the map or the loading indicator.
    pub fn apply(&mut self, map: &mut MapState, outcome: LoadOutcome) -> Commit {
        let current = self
            .active
            .as_ref()
            .is_some_and(|a| a.generation == outcome.generation() && !a.token.is_cancelled());
        if !current || outcome.is_cancelled() {
            tracing::debug!(generation = outcome.generation(), "discarding stale raster load");
            return Commit::Discarded;
        }
        self.active = None;
        self.status = LoadStatus::Idle;

        match outcome {
            LoadOutcome::Ready { overlay, .. } => {
                self.remove_overlay(map);
                let asset = overlay.asset().to_string();
                let fit = overlay.geographic_bounds();
                let id = map.add_layer(Layer::NdviOverlay(overlay));
                self.overlay = Some(id);

                if let Some(bounds) = fit {
                    map.viewport_mut().fit_bounds(&bounds, self.fit_max_zoom);
                }
                tracing::info!(%asset, layer = id.0, "NDVI overlay installed");
                Commit::Installed(id)
            }
            LoadOutcome::Failed { asset, error, .. } => {
                tracing::error!(%asset, "GeoTIFF load error: {error}");
                Commit::Failed
            }
            LoadOutcome::Cancelled { .. } => Commit::Discarded,
        }
    }

    /// Cancel any load in flight and remove the overlay.
    pub fn teardown(&mut self, map: &mut MapState) {
        self.cancel_active();
        self.remove_overlay(map);
        self.status = LoadStatus::Idle;
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.token.cancel();
            tracing::debug!(generation = active.generation, "raster load superseded");
        }
    }

    fn remove_overlay(&mut self, map: &mut MapState) {
        if let Some(id) = self.overlay.take() {
            map.remove_layer(id);
        }
    }
}
