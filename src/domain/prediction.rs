use serde::{Deserialize, Serialize};

use super::segmentation::{AreaEntry, ClassLabel, ConfidenceEntry};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassMask {
    pub class_id: u32,
    pub label: String,
    pub mask_url: String,
}

/// Everything one prediction call hands back to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub model_key: String,
    pub model_hf_id: String,
    pub inference_ms: f64,
    pub original_url: String,
    pub overlay_url: String,
    pub labels: Vec<ClassLabel>,
    pub top_classes: Vec<ConfidenceEntry>,
    pub area_stats: Vec<AreaEntry>,
    pub class_masks: Vec<ClassMask>,
    pub width: u32,
    pub height: u32,
}
