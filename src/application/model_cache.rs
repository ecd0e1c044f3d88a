use std::collections::HashMap;
use std::sync::RwLock;
use tracing::{debug, info};

use crate::application::ports::{BackendLoaderPort, ModelHandle};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::ModelSpec;

/// Process-lifetime map from model key to loaded handle.
///
/// Handles are never evicted. Loading happens outside the lock, so two
/// requests racing on a cold key may both load; the last insert wins.
#[derive(Default)]
pub struct ModelCache {
    handles: RwLock<HashMap<String, ModelHandle>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, model_key: &str) -> DomainResult<Option<ModelHandle>> {
        let lock = self
            .handles
            .read()
            .map_err(|_| DomainError::OperationFailed("model cache lock poisoned".into()))?;
        Ok(lock.get(model_key).cloned())
    }

    pub fn get_or_load(&self, spec: &ModelSpec, loader: &dyn BackendLoaderPort) -> DomainResult<ModelHandle> {
        if let Some(handle) = self.get(&spec.model_key)? {
            debug!(model_key = %spec.model_key, "model cache hit");
            return Ok(handle);
        }

        info!(model_key = %spec.model_key, hf_id = %spec.hf_id, "loading model");
        let handle = loader.load(spec)?;
        info!(model_key = %spec.model_key, device = %handle.device(), "model ready");

        let mut lock = self
            .handles
            .write()
            .map_err(|_| DomainError::OperationFailed("model cache lock poisoned".into()))?;
        lock.insert(spec.model_key.clone(), handle.clone());
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.handles.read().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
