use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    pub image_id: String,
    pub inference_ms: f64,
    pub top_label: String,
    pub num_labels: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckFailure {
    pub image_id: String,
    pub error: String,
}

/// Outcome of running the predictor over the image catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub avg_inference_ms: f64,
    pub results: Vec<CheckResult>,
    pub failures: Vec<CheckFailure>,
}

/// Plain-text report printed by the `inference-check` binary.
pub fn format_report(summary: &CheckSummary) -> String {
    let mut lines = vec![
        "=== Dataset Inference Check ===".to_string(),
        format!(
            "total={} success={} failed={}",
            summary.total, summary.success, summary.failed
        ),
        format!("avg_inference_ms={}", summary.avg_inference_ms),
        "--- per image ---".to_string(),
    ];

    for item in &summary.results {
        lines.push(format!(
            "{} | ms={} | top_label={} | labels={}",
            item.image_id, item.inference_ms, item.top_label, item.num_labels
        ));
    }

    if !summary.failures.is_empty() {
        lines.push("--- failures ---".to_string());
        for item in &summary.failures {
            lines.push(format!("{} | error={}", item.image_id, item.error));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_counts_and_rows() {
        let report = format_report(&CheckSummary {
            total: 2,
            success: 2,
            failed: 0,
            avg_inference_ms: 12.3,
            results: vec![
                CheckResult { image_id: "x.jpg".into(), inference_ms: 11.1, top_label: "wall".into(), num_labels: 4 },
                CheckResult { image_id: "y.jpg".into(), inference_ms: 13.5, top_label: "floor".into(), num_labels: 5 },
            ],
            failures: vec![],
        });

        assert!(report.contains("Dataset Inference Check"));
        assert!(report.contains("total=2 success=2 failed=0"));
        assert!(report.contains("x.jpg"));
        assert!(report.contains("top_label=wall"));
        assert!(!report.contains("--- failures ---"));
    }

    #[test]
    fn report_includes_failure_section() {
        let report = format_report(&CheckSummary {
            total: 1,
            success: 0,
            failed: 1,
            avg_inference_ms: 0.0,
            results: vec![],
            failures: vec![CheckFailure { image_id: "b.jpg".into(), error: "boom".into() }],
        });
        assert!(report.contains("--- failures ---"));
        assert!(report.contains("b.jpg | error=boom"));
    }
}
