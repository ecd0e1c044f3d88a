use image::{DynamicImage, RgbImage};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::{
    application::{
        model_cache::ModelCache,
        ports::{ArtifactStorePort, BackendLoaderPort, ImageCatalogPort, ModelRegistryPort, Predictor},
    },
    domain::{
        catalog::CatalogImage,
        errors::{DomainError, DomainResult},
        label_map::ensure_valid,
        model::ModelInfo,
        prediction::{ClassMask, PredictionResult},
        probability::semantic_probabilities,
        segmentation::ClassLabel,
        stats::class_stats,
        visualization::{class_masks, render_overlay},
    },
};

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Runs one image through the full segmentation pipeline:
/// resolve model -> preprocess -> infer (timed) -> label map + probabilities
/// -> overlay, masks and rankings -> persisted artifacts -> result record.
///
/// Any stage failing aborts the whole call; nothing is retried.
#[derive(Clone)]
pub struct PredictionService {
    registry: Arc<dyn ModelRegistryPort>,
    loader: Arc<dyn BackendLoaderPort>,
    artifacts: Arc<dyn ArtifactStorePort>,
    cache: Arc<ModelCache>,
}

impl PredictionService {
    pub fn new(
        registry: Arc<dyn ModelRegistryPort>,
        loader: Arc<dyn BackendLoaderPort>,
        artifacts: Arc<dyn ArtifactStorePort>,
        cache: Arc<ModelCache>,
    ) -> Self {
        Self {
            registry,
            loader,
            artifacts,
            cache,
        }
    }

    pub fn list_models(&self) -> Vec<ModelInfo> {
        self.registry.list_models()
    }

    pub fn run_prediction(&self, image: &RgbImage, model_key: &str) -> DomainResult<PredictionResult> {
        let spec = self.registry.resolve(model_key)?;
        let model = self.cache.get_or_load(&spec, self.loader.as_ref())?;
        debug!(model_key, device = %model.device(), "model resolved");

        let input = model.preprocess(image)?;
        debug!(model_key, shape = ?input.dim(), "preprocessed");

        let started = Instant::now();
        let raw = model.infer(input)?;
        let inference_ms = round2(started.elapsed().as_secs_f64() * 1000.0);
        debug!(
            model_key,
            queries = raw.num_queries(),
            classes = raw.num_classes(),
            inference_ms,
            "raw output computed"
        );

        let (width, height) = image.dimensions();
        let target = (height as usize, width as usize);

        let label_map = model.decode(&raw, target)?;
        ensure_valid(&label_map, target, raw.num_classes())?;
        let probs = semantic_probabilities(&raw, target)?;

        let labels = model.label_space();
        let overlay = render_overlay(image, &label_map)?;
        let rankings = class_stats(&label_map, &probs, labels)?;
        let masks = class_masks(&label_map);
        debug!(model_key, present = masks.len(), "post-processed");

        let original_url = self
            .artifacts
            .save_png(&DynamicImage::ImageRgb8(image.clone()), "orig")?;
        let overlay_url = self
            .artifacts
            .save_png(&DynamicImage::ImageRgb8(overlay), "overlay")?;

        let mut class_mask_urls = Vec::with_capacity(masks.len());
        let mut present = Vec::with_capacity(masks.len());
        for (class_id, mask) in masks {
            let mask_url = self
                .artifacts
                .save_png(&DynamicImage::ImageLuma8(mask), &format!("mask_{class_id}"))?;
            let label = labels.label(class_id);
            present.push(ClassLabel { class_id, label: label.clone() });
            class_mask_urls.push(ClassMask { class_id, label, mask_url });
        }
        debug!(model_key, artifacts = class_mask_urls.len() + 2, "artifacts written");

        info!(
            model_key,
            width,
            height,
            inference_ms,
            classes = present.len(),
            "prediction assembled"
        );

        Ok(PredictionResult {
            model_key: spec.model_key,
            model_hf_id: spec.hf_id,
            inference_ms,
            original_url,
            overlay_url,
            labels: present,
            top_classes: rankings.top_classes,
            area_stats: rankings.area_stats,
            class_masks: class_mask_urls,
            width,
            height,
        })
    }
}

impl Predictor for PredictionService {
    fn predict(&self, image: &RgbImage, model_key: &str) -> DomainResult<PredictionResult> {
        self.run_prediction(image, model_key)
    }
}

/// Lookup and loading of images from the local test catalog.
#[derive(Clone)]
pub struct CatalogService {
    catalog: Arc<dyn ImageCatalogPort>,
}

impl CatalogService {
    pub fn new(catalog: Arc<dyn ImageCatalogPort>) -> Self {
        Self { catalog }
    }

    pub fn list_images(&self) -> DomainResult<Vec<CatalogImage>> {
        self.catalog.list_images()
    }

    /// Opens a catalog entry as RGB; unknown ids are `NotFound`, undecodable files `InvalidInput`.
    pub fn load_image(&self, image_id: &str) -> DomainResult<RgbImage> {
        let path = self.catalog.resolve(image_id)?;
        if !path.is_file() {
            return Err(DomainError::NotFound(format!("Unknown image_id: {image_id}")));
        }
        let img = image::open(&path)
            .map_err(|e| DomainError::InvalidInput(format!("Invalid stored image {image_id}: {e}")))?;
        Ok(img.to_rgb8())
    }
}
