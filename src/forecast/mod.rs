//! Per-district forecasting: training, the trained-model registry, and the
//! feature-chained prediction pipeline.

pub mod pipeline;
pub mod registry;
pub mod training;

pub use pipeline::PredictionPipeline;
pub use registry::{ModelRegistry, ModelTriple};
pub use training::train_registry;

/// Schema names for the regressor features shared by training and
/// prediction. These are internal identifiers, not CSV column headers.
pub const FEATURE_LOAD_DEMAND: &str = "load_demand";
pub const FEATURE_PRICE: &str = "price";
pub const FEATURE_INSTALLED_CAPACITY: &str = "installed_capacity";
