#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage};
use ndarray::{Array2, Array3, Array4};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use mask2former_onnx_server::{
    application::ports::{BackendLoaderPort, ModelHandle, SegmentationBackend},
    domain::{
        errors::DomainResult,
        label_space::LabelSpace,
        model::{ExecutionDevice, ModelSpec},
        segmentation::{LabelMap, RawModelOutput},
    },
};

pub const FAKE_KEY: &str = "fake_two_class";

pub fn fake_spec() -> ModelSpec {
    ModelSpec {
        model_key: FAKE_KEY.into(),
        hf_id: "test/fake-two-class".into(),
        label_space: "FAKE-2".into(),
        note: "left is sky, right is grass".into(),
        onnx_path: "unused.onnx".into(),
        input_size: 4,
    }
}

/// Two classes: left half "sky", right half "grass".
pub struct SplitBackend {
    labels: LabelSpace,
}

impl SplitBackend {
    pub fn new() -> Self {
        Self {
            labels: LabelSpace::from([(0, "sky"), (1, "grass")]),
        }
    }
}

impl SegmentationBackend for SplitBackend {
    fn backing_id(&self) -> &str {
        "test/fake-two-class"
    }

    fn device(&self) -> ExecutionDevice {
        ExecutionDevice::Cpu
    }

    fn label_space(&self) -> &LabelSpace {
        &self.labels
    }

    fn preprocess(&self, _image: &RgbImage) -> DomainResult<Array4<f32>> {
        Ok(Array4::zeros((1, 3, 4, 4)))
    }

    fn infer(&self, _input: Array4<f32>) -> DomainResult<RawModelOutput> {
        // query 0 says sky, query 1 says grass
        let class_logits = Array2::from_shape_vec((2, 3), vec![8.0, -8.0, -8.0, -8.0, 8.0, -8.0]).unwrap();
        let mask_logits = Array3::from_shape_fn((2, 4, 4), |(q, _, x)| {
            let left = x < 2;
            if (q == 0) == left {
                6.0
            } else {
                -6.0
            }
        });
        RawModelOutput::new(class_logits, mask_logits)
    }

    fn decode(&self, _raw: &RawModelOutput, target: (usize, usize)) -> DomainResult<LabelMap> {
        let (_, w) = target;
        Ok(LabelMap::new(Array2::from_shape_fn(target, |(_, x)| u32::from(x >= w / 2))))
    }
}

#[derive(Default)]
pub struct CountingLoader {
    pub loads: AtomicUsize,
}

impl CountingLoader {
    pub fn count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl BackendLoaderPort for CountingLoader {
    fn load(&self, _spec: &ModelSpec) -> DomainResult<ModelHandle> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(SplitBackend::new()))
    }
}

pub fn sample_image(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x * 20) as u8, (y * 20) as u8, 128]))
}

pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
    buf
}

pub fn write_png(dir: &Path, name: &str, img: &RgbImage) {
    img.save_with_format(dir.join(name), ImageFormat::Png).unwrap();
}
