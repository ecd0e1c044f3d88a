use serde::{Deserialize, Serialize};

/// Input for the natural-language description. Rows are passed through
/// as-is so clients can send back the ranking entries they received.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeRequest {
    pub top_classes: Vec<serde_json::Value>,
    pub area_stats: Vec<serde_json::Value>,
    #[serde(default)]
    pub inference_ms: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Description {
    pub summary_ja: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub cautions: Vec<String>,
}
