use std::sync::Arc;
use tracing::{info, warn};

use crate::application::{ports::Predictor, services::CatalogService};
use crate::domain::check::{CheckFailure, CheckResult, CheckSummary};
use crate::domain::errors::DomainResult;

/// Runs the predictor over every catalog image and tallies the outcome.
/// A failing image is recorded and the run moves on.
pub struct InferenceCheckService {
    catalog: CatalogService,
    predictor: Arc<dyn Predictor>,
    model_key: String,
}

impl InferenceCheckService {
    pub fn new(catalog: CatalogService, predictor: Arc<dyn Predictor>, model_key: impl Into<String>) -> Self {
        Self {
            catalog,
            predictor,
            model_key: model_key.into(),
        }
    }

    pub fn run(&self, limit: Option<usize>) -> DomainResult<CheckSummary> {
        let mut entries = self.catalog.list_images()?;
        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        let mut results = Vec::new();
        let mut failures = Vec::new();

        for entry in &entries {
            let outcome = self
                .catalog
                .load_image(&entry.id)
                .and_then(|img| self.predictor.predict(&img, &self.model_key));

            match outcome {
                Ok(prediction) => {
                    let top_label = prediction
                        .top_classes
                        .first()
                        .map(|c| c.label.clone())
                        .unwrap_or_else(|| "-".to_string());
                    info!(image_id = %entry.id, ms = prediction.inference_ms, %top_label, "checked");
                    results.push(CheckResult {
                        image_id: entry.id.clone(),
                        inference_ms: prediction.inference_ms,
                        top_label,
                        num_labels: prediction.labels.len(),
                    });
                }
                Err(e) => {
                    warn!(image_id = %entry.id, error = %e, "check failed");
                    failures.push(CheckFailure {
                        image_id: entry.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        let avg_ms = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.inference_ms).sum::<f64>() / results.len() as f64
        };

        Ok(CheckSummary {
            total: entries.len(),
            success: results.len(),
            failed: failures.len(),
            avg_inference_ms: (avg_ms * 100.0).round() / 100.0,
            results,
            failures,
        })
    }
}
