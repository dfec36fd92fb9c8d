use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::dataset::DatasetStore;
use crate::forecast::{train_registry, PredictionPipeline};

/// Process-wide context: the loaded dataset and the trained registry,
/// built once before the server accepts requests and immutable afterwards.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub pipeline: PredictionPipeline,
}

impl AppState {
    pub fn new(cfg: Config) -> Result<Self> {
        let store = DatasetStore::from_csv_path(&cfg.dataset.path)
            .with_context(|| format!("loading dataset from {}", cfg.dataset.path.display()))?;
        info!(
            districts = store.districts().len(),
            path = %cfg.dataset.path.display(),
            "dataset loaded"
        );

        let registry = train_registry(&store, cfg.training.min_observations);
        if registry.is_empty() {
            warn!("no district trained successfully; every prediction will fail");
        }

        let pipeline = PredictionPipeline::new(Arc::new(store), Arc::new(registry));
        Ok(Self { cfg, pipeline })
    }

    /// Build state from an already-loaded store, for tests.
    pub fn from_store(cfg: Config, store: DatasetStore) -> Self {
        let registry = train_registry(&store, cfg.training.min_observations);
        let pipeline = PredictionPipeline::new(Arc::new(store), Arc::new(registry));
        Self { cfg, pipeline }
    }
}
