use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ADE20K_MODEL_KEY: &str = "ade20k_official";

/// Registry entry for one servable model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSpec {
    pub model_key: String,   // logical name, e.g. "ade20k_official"
    pub hf_id: String,       // backing checkpoint id
    pub label_space: String, // e.g. "ADE20K-150"
    pub note: String,
    pub onnx_path: PathBuf,
    pub input_size: u32, // square side fed to the network
}

/// Public listing shape, without filesystem details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    pub model_key: String,
    pub hf_id: String,
    pub label_space: String,
    pub note: String,
}

impl From<&ModelSpec> for ModelInfo {
    fn from(spec: &ModelSpec) -> Self {
        Self {
            model_key: spec.model_key.clone(),
            hf_id: spec.hf_id.clone(),
            label_space: spec.label_space.clone(),
            note: spec.note.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionDevice {
    Cuda,
    Cpu,
}

impl std::fmt::Display for ExecutionDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionDevice::Cuda => f.write_str("cuda"),
            ExecutionDevice::Cpu => f.write_str("cpu"),
        }
    }
}
