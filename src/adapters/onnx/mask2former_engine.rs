use anyhow::{anyhow, Result};
use image::{imageops::FilterType, RgbImage};
use ndarray::{Array4, ArrayD, ArrayViewD, Axis, Ix2, Ix3, IxDyn};
use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};
use ort::session::Session;
use ort::value::{DynValue, Value};
use std::fs;
use std::sync::Mutex;
use tracing::{info, warn};

use crate::application::ports::SegmentationBackend;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::label_map::decode_semantic_map;
use crate::domain::label_space::LabelSpace;
use crate::domain::model::{ExecutionDevice, ModelSpec};
use crate::domain::segmentation::{LabelMap, RawModelOutput};

const CLASS_OUTPUT: &str = "class_queries_logits";
const MASK_OUTPUT: &str = "masks_queries_logits";

// ImageNet statistics used by the Mask2Former image processor.
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Mask2Former exported to ONNX. The session is serialised behind a mutex,
/// so one model serves one request at a time.
pub struct OnnxMask2FormerEngine {
    session: Mutex<Session>,
    hf_id: String,
    device: ExecutionDevice,
    labels: LabelSpace,
    input_size: u32,
}

impl OnnxMask2FormerEngine {
    pub fn load(spec: &ModelSpec) -> Result<Self> {
        let mut builder = Session::builder()?.with_intra_threads(4)?;

        // CUDA is optional: register it when present, otherwise stay on CPU.
        let cuda = CUDAExecutionProvider::default();
        let mut device = ExecutionDevice::Cpu;
        if cuda.is_available().unwrap_or(false) {
            if let Ok(builder_with_cuda) = builder.clone().with_execution_providers([cuda.build()]) {
                builder = builder_with_cuda;
                device = ExecutionDevice::Cuda;
            }
        }

        let model_bytes = fs::read(&spec.onnx_path)?;
        let session = builder.commit_from_memory(&model_bytes)?;

        let sidecar = spec.onnx_path.with_extension("json");
        let labels = if sidecar.is_file() {
            LabelSpace::from_config_file(&sidecar).map_err(|e| anyhow!("{e}"))?
        } else {
            warn!("No label config at {}, using built-in ADE20K labels", sidecar.display());
            LabelSpace::ade20k()
        };

        info!(
            "Loaded {} from {} on {} ({} labels)",
            spec.hf_id,
            spec.onnx_path.display(),
            device,
            labels.len()
        );

        Ok(Self {
            session: Mutex::new(session),
            hf_id: spec.hf_id.clone(),
            device,
            labels,
            input_size: spec.input_size,
        })
    }

    fn run(&self, input: Array4<f32>) -> Result<RawModelOutput> {
        let input_shape: Vec<i64> = input.shape().iter().map(|&d| d as i64).collect();
        let (data, _) = input.into_raw_vec_and_offset();
        let input_tensor = Value::from_array((input_shape, data))?;

        let mut session = self.session.lock().map_err(|_| anyhow!("session lock poisoned"))?;
        let outputs = session.run(ort::inputs![input_tensor])?;
        if outputs.len() < 2 {
            return Err(anyhow!("expected class and mask outputs, model produced {}", outputs.len()));
        }

        let class_value = outputs.get(CLASS_OUTPUT).unwrap_or(&outputs[0]);
        let mask_value = outputs.get(MASK_OUTPUT).unwrap_or(&outputs[1]);

        let class_logits = first_in_batch(class_value, 3)?.into_dimensionality::<Ix2>()?;
        let mask_logits = first_in_batch(mask_value, 4)?.into_dimensionality::<Ix3>()?;

        RawModelOutput::new(class_logits, mask_logits).map_err(|e| anyhow!("{e}"))
    }
}

/// Copies out batch item 0 of an output of rank `batched_rank`.
fn first_in_batch(value: &DynValue, batched_rank: usize) -> Result<ArrayD<f32>> {
    let (shape, data) = value.try_extract_tensor::<f32>()?;
    let dims: Vec<usize> = shape.iter().map(|&d| d as usize).collect();
    if dims.len() != batched_rank {
        return Err(anyhow!("unexpected output rank {} (shape {:?})", dims.len(), dims));
    }
    let view = ArrayViewD::from_shape(IxDyn(&dims), data)?;
    Ok(view.index_axis(Axis(0), 0).to_owned())
}

impl SegmentationBackend for OnnxMask2FormerEngine {
    fn backing_id(&self) -> &str {
        &self.hf_id
    }

    fn device(&self) -> ExecutionDevice {
        self.device
    }

    fn label_space(&self) -> &LabelSpace {
        &self.labels
    }

    fn preprocess(&self, image: &RgbImage) -> DomainResult<Array4<f32>> {
        let size = self.input_size;
        if image.width() == 0 || image.height() == 0 {
            return Err(DomainError::InvalidInput("empty image".into()));
        }
        let resized = image::imageops::resize(image, size, size, FilterType::Triangle);

        let side = size as usize;
        let mut input = Array4::<f32>::zeros((1, 3, side, side));
        for (x, y, pixel) in resized.enumerate_pixels() {
            for c in 0..3 {
                input[[0, c, y as usize, x as usize]] = (pixel[c] as f32 / 255.0 - MEAN[c]) / STD[c];
            }
        }
        Ok(input)
    }

    fn infer(&self, input: Array4<f32>) -> DomainResult<RawModelOutput> {
        self.run(input)
            .map_err(|e| DomainError::Inference(format!("{} forward pass: {e:#}", self.hf_id)))
    }

    fn decode(&self, raw: &RawModelOutput, target: (usize, usize)) -> DomainResult<LabelMap> {
        decode_semantic_map(raw, self.input_size as usize, target)
    }
}
