use std::sync::Arc;

use crate::application::ports::{DescriptionPort, ModelRegistryPort, Predictor};
use crate::application::services::CatalogService;

/// Shared state for the axum handlers: the use cases, behind their ports.
#[derive(Clone)]
pub struct HttpState {
    /// Full segmentation pipeline; runs on the blocking pool.
    pub predictor: Arc<dyn Predictor>,
    pub models: Arc<dyn ModelRegistryPort>,
    pub catalog: Arc<CatalogService>,
    pub description: Arc<dyn DescriptionPort>,
    pub default_model_key: String,
}
