use std::path::Path;

use crate::application::ports::ModelRegistryPort;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{ModelInfo, ModelSpec, ADE20K_MODEL_KEY};

/// Fixed table of servable models, in listing order.
pub struct StaticModelRegistry {
    models: Vec<ModelSpec>,
}

impl StaticModelRegistry {
    pub fn new(models: Vec<ModelSpec>) -> Self {
        Self { models }
    }

    /// The ADE20K Mask2Former checkpoint, expected under `model_dir`.
    pub fn with_defaults(model_dir: &Path) -> Self {
        Self::new(vec![ModelSpec {
            model_key: ADE20K_MODEL_KEY.to_string(),
            hf_id: "facebook/mask2former-swin-large-ade-semantic".to_string(),
            label_space: "ADE20K-150".to_string(),
            note: "Official Mask2Former checkpoint on ADE20K semantic segmentation.".to_string(),
            onnx_path: model_dir.join("mask2former-swin-large-ade-semantic.onnx"),
            input_size: 384,
        }])
    }
}

impl ModelRegistryPort for StaticModelRegistry {
    fn list_models(&self) -> Vec<ModelInfo> {
        self.models.iter().map(ModelInfo::from).collect()
    }

    fn resolve(&self, model_key: &str) -> DomainResult<ModelSpec> {
        self.models
            .iter()
            .find(|m| m.model_key == model_key)
            .cloned()
            .ok_or_else(|| DomainError::UnknownModel(model_key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_expose_ade20k() {
        let registry = StaticModelRegistry::with_defaults(Path::new("models"));
        let models = registry.list_models();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].model_key, "ade20k_official");
        assert_eq!(models[0].label_space, "ADE20K-150");

        let spec = registry.resolve("ade20k_official").unwrap();
        assert_eq!(spec.hf_id, "facebook/mask2former-swin-large-ade-semantic");
        assert!(spec.onnx_path.starts_with("models"));
    }

    #[test]
    fn unknown_key_is_rejected() {
        let registry = StaticModelRegistry::with_defaults(Path::new("models"));
        assert!(matches!(
            registry.resolve("cityscapes"),
            Err(DomainError::UnknownModel(k)) if k == "cityscapes"
        ));
    }
}
