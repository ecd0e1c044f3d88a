mod common;

use image::RgbImage;
use std::sync::Arc;

use common::{sample_image, write_png};
use mask2former_onnx_server::{
    adapters::catalog::fs_catalog::FsImageCatalog,
    application::{check_service::InferenceCheckService, ports::Predictor, services::CatalogService},
    domain::{
        check::format_report,
        errors::{DomainError, DomainResult},
        prediction::PredictionResult,
        segmentation::{ClassLabel, ConfidenceEntry},
    },
};

/// Fails on images whose width is 7.
struct PickyPredictor;

impl Predictor for PickyPredictor {
    fn predict(&self, image: &RgbImage, model_key: &str) -> DomainResult<PredictionResult> {
        if image.width() == 7 {
            return Err(DomainError::Inference("boom".into()));
        }
        Ok(PredictionResult {
            model_key: model_key.into(),
            model_hf_id: "test/picky".into(),
            inference_ms: f64::from(image.width()),
            original_url: String::new(),
            overlay_url: String::new(),
            labels: vec![ClassLabel { class_id: 3, label: "floor".into() }],
            top_classes: vec![ConfidenceEntry {
                class_id: 3,
                label: "floor".into(),
                confidence: 0.9,
            }],
            area_stats: vec![],
            class_masks: vec![],
            width: image.width(),
            height: image.height(),
        })
    }
}

fn runner(dir: &std::path::Path) -> InferenceCheckService {
    write_png(dir, "a.png", &sample_image(4, 4));
    write_png(dir, "b.png", &sample_image(7, 4));
    write_png(dir, "c.png", &sample_image(6, 4));
    let catalog = CatalogService::new(Arc::new(FsImageCatalog::new(dir)));
    InferenceCheckService::new(catalog, Arc::new(PickyPredictor), "ade20k_official")
}

#[test]
fn failures_are_recorded_and_the_run_continues() {
    let dir = tempfile::tempdir().unwrap();
    let summary = runner(dir.path()).run(None).unwrap();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.success, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.avg_inference_ms, 5.0);
    assert_eq!(summary.failures[0].image_id, "b.png");
    assert!(summary.failures[0].error.contains("boom"));
    assert_eq!(summary.results[0].top_label, "floor");

    let report = format_report(&summary);
    assert!(report.contains("total=3 success=2 failed=1"));
    assert!(report.contains("b.png | error="));
}

#[test]
fn limit_caps_the_images_checked() {
    let dir = tempfile::tempdir().unwrap();
    let summary = runner(dir.path()).run(Some(1)).unwrap();

    assert_eq!(summary.total, 1);
    assert_eq!(summary.success, 1);
    assert!(summary.failures.is_empty());
}
