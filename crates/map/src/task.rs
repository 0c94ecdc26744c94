//! Cancellable raster load tasks.
//!
//! A [`LoadTask`] carries everything needed to fetch, decode and build one
//! overlay, so it can run inline or on another runtime. It never touches the
//! map: the result comes back as a [`LoadOutcome`] for the loader to commit.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use agrisentinel_algorithms::imagery::BandSelection;
use agrisentinel_cloud::AssetSource;
use agrisentinel_core::io::read_bands_from_buffer;

use crate::error::MapError;
use crate::overlay::NdviOverlay;

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Where a task stopped when it noticed its token was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Fetch,
    Decode,
}

/// One fetch/decode/build sequence for a named asset.
#[derive(Debug, Clone)]
pub struct LoadTask {
    pub(crate) generation: u64,
    pub(crate) asset: String,
    pub(crate) token: CancelToken,
    pub(crate) preferred: BandSelection,
    pub(crate) resolution: usize,
    pub(crate) opacity: f64,
}

/// Result of running a [`LoadTask`].
#[derive(Debug)]
pub enum LoadOutcome {
    Ready {
        generation: u64,
        token: CancelToken,
        overlay: NdviOverlay,
    },
    Failed {
        generation: u64,
        token: CancelToken,
        asset: String,
        error: MapError,
    },
    Cancelled {
        generation: u64,
        asset: String,
        stage: LoadStage,
    },
}

impl LoadOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Ready { generation, .. }
            | Self::Failed { generation, .. }
            | Self::Cancelled { generation, .. } => *generation,
        }
    }

    /// Whether the task was cancelled, either while running or since.
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Ready { token, .. } | Self::Failed { token, .. } => token.is_cancelled(),
            Self::Cancelled { .. } => true,
        }
    }
}

impl LoadTask {
    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fetch, decode and build the overlay.
    ///
    /// Decoding runs on tokio's blocking pool, so this must be awaited inside
    /// a tokio runtime. The token is checked after the fetch and after the
    /// decode; the loader checks it once more when committing.
    pub async fn run(self, source: &dyn AssetSource) -> LoadOutcome {
        tracing::debug!(asset = %self.asset, location = %source.location(&self.asset), "loading raster");

        let bytes = match source.fetch(&self.asset).await {
            Ok(bytes) => bytes,
            Err(e) => return self.failed(e.into()),
        };
        if self.token.is_cancelled() {
            return self.cancelled(LoadStage::Fetch);
        }

        let decoded =
            tokio::task::spawn_blocking(move || read_bands_from_buffer::<f32>(&bytes)).await;
        let bands = match decoded {
            Ok(Ok(bands)) => bands,
            Ok(Err(e)) => return self.failed(e.into()),
            Err(e) => return self.failed(e.into()),
        };
        if self.token.is_cancelled() {
            return self.cancelled(LoadStage::Decode);
        }

        let selection = match BandSelection::for_bands(self.preferred, &bands) {
            Ok(selection) => selection,
            Err(e) => return self.failed(e.into()),
        };
        if selection.is_degenerate() {
            tracing::warn!(asset = %self.asset, band = selection.red, "red and NIR resolve to the same band");
        }
        tracing::debug!(
            asset = %self.asset,
            bands = bands.len(),
            red = selection.red,
            nir = selection.nir,
            "raster decoded"
        );

        let overlay = NdviOverlay::new(
            self.asset,
            bands,
            selection,
            self.resolution,
            self.opacity,
        );
        LoadOutcome::Ready {
            generation: self.generation,
            token: self.token,
            overlay,
        }
    }

    fn failed(self, error: MapError) -> LoadOutcome {
        LoadOutcome::Failed {
            generation: self.generation,
            token: self.token,
            asset: self.asset,
            error,
        }
    }

    fn cancelled(self, stage: LoadStage) -> LoadOutcome {
        tracing::debug!(asset = %self.asset, ?stage, "load cancelled");
        LoadOutcome::Cancelled {
            generation: self.generation,
            asset: self.asset,
            stage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    fn task(token: CancelToken) -> LoadTask {
        LoadTask {
            generation: 1,
            asset: "a.tif".into(),
            token,
            preferred: BandSelection { red: 0, nir: 2 },
            resolution: 4,
            opacity: 0.5,
        }
    }

    /// Serves the same bytes for every name.
    struct StaticSource(Vec<u8>);

    impl AssetSource for StaticSource {
        fn fetch<'a>(
            &'a self,
            _name: &'a str,
        ) -> futures::future::BoxFuture<'a, Result<Vec<u8>, agrisentinel_cloud::CloudError>> {
            Box::pin(async move { Ok(self.0.clone()) })
        }

        fn location(&self, name: &str) -> String {
            name.to_string()
        }
    }

    fn tiff_bytes() -> Vec<u8> {
        use agrisentinel_core::io::{write_bands_to_buffer, GeoTiffOptions};
        use agrisentinel_core::BandSet;
        let set = BandSet::from_interleaved(&[0.1f32, 0.0, 0.9], 1, 1, 3).unwrap();
        write_bands_to_buffer(&set, &GeoTiffOptions::default()).unwrap()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 1)]
    async fn test_decode_runs_on_the_blocking_pool() {
        let source = StaticSource(tiff_bytes());
        match task(CancelToken::new()).run(&source).await {
            LoadOutcome::Ready { overlay, .. } => assert_eq!(overlay.bands().len(), 3),
            other => panic!("expected an overlay, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_decode_completes_on_current_thread_runtime() {
        let source = StaticSource(tiff_bytes());
        let outcome = task(CancelToken::new()).run(&source).await;
        assert!(matches!(outcome, LoadOutcome::Ready { .. }));
    }

    #[tokio::test]
    async fn test_garbage_bytes_fail_in_decode() {
        let source = StaticSource(b"not a tiff".to_vec());
        let outcome = task(CancelToken::new()).run(&source).await;
        assert!(matches!(
            outcome,
            LoadOutcome::Failed {
                error: MapError::Raster(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cancelled_before_fetch_returns_stops_at_fetch() {
        let token = CancelToken::new();
        token.cancel();
        let source = StaticSource(tiff_bytes());
        let outcome = task(token).run(&source).await;
        assert!(matches!(
            outcome,
            LoadOutcome::Cancelled {
                stage: LoadStage::Fetch,
                ..
            }
        ));
    }

    #[test]
    fn test_outcome_cancelled_after_the_fact() {
        let token = CancelToken::new();
        let outcome = LoadOutcome::Failed {
            generation: 3,
            token: token.clone(),
            asset: "a.tif".into(),
            error: MapError::InvalidParcel("x".into()),
        };
        assert!(!outcome.is_cancelled());
        token.cancel();
        assert!(outcome.is_cancelled());
        assert_eq!(outcome.generation(), 3);
    }
}
