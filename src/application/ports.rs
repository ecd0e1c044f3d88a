use async_trait::async_trait;
use image::{DynamicImage, RgbImage};
use ndarray::Array4;
use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{
    catalog::CatalogImage,
    description::{DescribeRequest, Description},
    errors::DomainResult,
    label_space::LabelSpace,
    model::{ExecutionDevice, ModelInfo, ModelSpec},
    prediction::PredictionResult,
    segmentation::{LabelMap, RawModelOutput},
};

/// Loaded model: preprocessor, weights and compute device behind one handle.
pub type ModelHandle = Arc<dyn SegmentationBackend>;

pub trait ModelRegistryPort: Send + Sync {
    fn list_models(&self) -> Vec<ModelInfo>;
    fn resolve(&self, model_key: &str) -> DomainResult<ModelSpec>;
}

/// One model family. New families plug in as new implementations.
pub trait SegmentationBackend: Send + Sync {
    fn backing_id(&self) -> &str;
    fn device(&self) -> ExecutionDevice;
    fn label_space(&self) -> &LabelSpace;
    fn preprocess(&self, image: &RgbImage) -> DomainResult<Array4<f32>>;
    fn infer(&self, input: Array4<f32>) -> DomainResult<RawModelOutput>;
    /// The family's own semantic decode to a `(height, width)` label map.
    fn decode(&self, raw: &RawModelOutput, target: (usize, usize)) -> DomainResult<LabelMap>;
}

pub trait BackendLoaderPort: Send + Sync {
    fn load(&self, spec: &ModelSpec) -> DomainResult<ModelHandle>;
}

pub trait ArtifactStorePort: Send + Sync {
    /// Writes a PNG under a fresh name and returns its public URL.
    fn save_png(&self, image: &DynamicImage, prefix: &str) -> DomainResult<String>;
}

pub trait ImageCatalogPort: Send + Sync {
    fn list_images(&self) -> DomainResult<Vec<CatalogImage>>;
    fn resolve(&self, image_id: &str) -> DomainResult<PathBuf>;
}

pub trait Predictor: Send + Sync {
    fn predict(&self, image: &RgbImage, model_key: &str) -> DomainResult<PredictionResult>;
}

#[async_trait]
pub trait DescriptionPort: Send + Sync {
    async fn describe(&self, req: &DescribeRequest) -> DomainResult<Description>;
}
