use std::sync::Arc;

use crate::adapters::onnx::mask2former_engine::OnnxMask2FormerEngine;
use crate::application::ports::{BackendLoaderPort, ModelHandle};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::ModelSpec;

/// Builds ONNX Runtime backends from registry entries.
pub struct OnnxBackendLoader;

impl OnnxBackendLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OnnxBackendLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendLoaderPort for OnnxBackendLoader {
    fn load(&self, spec: &ModelSpec) -> DomainResult<ModelHandle> {
        if !spec.onnx_path.is_file() {
            return Err(DomainError::OperationFailed(format!(
                "model file not found: {}",
                spec.onnx_path.display()
            )));
        }
        let engine = OnnxMask2FormerEngine::load(spec).map_err(|e| {
            DomainError::OperationFailed(format!("failed to load {}: {e:#}", spec.model_key))
        })?;
        Ok(Arc::new(engine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_file_fails_fast() {
        let spec = ModelSpec {
            model_key: "ade20k_official".into(),
            hf_id: "facebook/mask2former-swin-large-ade-semantic".into(),
            label_space: "ADE20K-150".into(),
            note: String::new(),
            onnx_path: "does/not/exist.onnx".into(),
            input_size: 384,
        };
        let err = OnnxBackendLoader::new().load(&spec).err().unwrap();
        assert!(err.to_string().contains("model file not found"));
    }
}
