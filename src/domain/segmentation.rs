use ndarray::{Array2, Array3, ArrayView2, ArrayView3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::errors::{DomainError, DomainResult};

/// Raw mask-classification output for one image.
///
/// `class_logits` is `[Q, K+1]` (last column is the no-object class),
/// `mask_logits` is `[Q, H', W']` on the model's internal grid.
#[derive(Debug, Clone)]
pub struct RawModelOutput {
    class_logits: Array2<f32>,
    mask_logits: Array3<f32>,
}

impl RawModelOutput {
    pub fn new(class_logits: Array2<f32>, mask_logits: Array3<f32>) -> DomainResult<Self> {
        let (q_cls, k1) = class_logits.dim();
        let (q_mask, _, _) = mask_logits.dim();
        if q_cls != q_mask {
            return Err(DomainError::Inference(format!(
                "query count mismatch: {q_cls} class rows vs {q_mask} masks"
            )));
        }
        if k1 < 2 {
            return Err(DomainError::Inference(
                "class logits need at least one class plus no-object".into(),
            ));
        }
        Ok(Self { class_logits, mask_logits })
    }

    pub fn class_logits(&self) -> ArrayView2<'_, f32> {
        self.class_logits.view()
    }

    pub fn mask_logits(&self) -> ArrayView3<'_, f32> {
        self.mask_logits.view()
    }

    pub fn num_queries(&self) -> usize {
        self.class_logits.nrows()
    }

    /// K, excluding the no-object column.
    pub fn num_classes(&self) -> usize {
        self.class_logits.ncols() - 1
    }
}

/// Per-pixel class distribution `[K, H, W]` at original resolution.
#[derive(Debug, Clone)]
pub struct ProbabilityVolume(Array3<f32>);

impl ProbabilityVolume {
    pub fn new(probs: Array3<f32>) -> Self {
        Self(probs)
    }

    pub fn view(&self) -> ArrayView3<'_, f32> {
        self.0.view()
    }

    pub fn num_classes(&self) -> usize {
        self.0.dim().0
    }

    /// (height, width)
    pub fn size(&self) -> (usize, usize) {
        let (_, h, w) = self.0.dim();
        (h, w)
    }
}

/// Dense `[H, W]` class-id map.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap(Array2<u32>);

impl LabelMap {
    pub fn new(ids: Array2<u32>) -> Self {
        Self(ids)
    }

    pub fn view(&self) -> ArrayView2<'_, u32> {
        self.0.view()
    }

    pub fn height(&self) -> usize {
        self.0.nrows()
    }

    pub fn width(&self) -> usize {
        self.0.ncols()
    }

    pub fn get(&self, y: usize, x: usize) -> u32 {
        self.0[[y, x]]
    }

    /// Sorted unique class ids.
    pub fn present_classes(&self) -> Vec<u32> {
        self.0.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassLabel {
    pub class_id: u32,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceEntry {
    pub class_id: u32,
    pub label: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaEntry {
    pub class_id: u32,
    pub label: String,
    pub area_ratio: f64,
}
