use ndarray::s;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::segmentation::{ProbabilityVolume, RawModelOutput};
use crate::domain::tensor_ops::{resize_bilinear, sigmoid, softmax_channels, softmax_rows};

/// Composes a calibrated `[K, H, W]` class-probability volume at `target`
/// (height, width) from per-query class scores and mask activations.
///
/// Query class distributions drop the no-object column; masks go through an
/// independent sigmoid. The contraction over queries is resampled with the
/// half-pixel bilinear rule and re-normalised per pixel.
///
/// The arg-max of this volume is not guaranteed to equal the backend's label
/// map: the two are computed along different resampling paths.
pub fn semantic_probabilities(
    raw: &RawModelOutput,
    target: (usize, usize),
) -> DomainResult<ProbabilityVolume> {
    let (target_h, target_w) = target;
    if target_h == 0 || target_w == 0 {
        return Err(DomainError::InvalidInput(format!(
            "target size must be non-empty, got {target_h}x{target_w}"
        )));
    }

    let k = raw.num_classes();
    let q = raw.num_queries();
    let (_, mh, mw) = raw.mask_logits().dim();

    let class_probs = softmax_rows(raw.class_logits());
    let class_probs = class_probs.slice(s![.., ..k]);

    let mask_probs = raw.mask_logits().mapv(sigmoid);
    let mask_probs = mask_probs
        .to_shape((q, mh * mw))
        .map_err(|e| DomainError::Inference(format!("mask reshape: {e}")))?;

    // [K, Q] x [Q, H'W'] -> [K, H'W']
    let affinity = class_probs.t().dot(&mask_probs);
    let affinity = affinity
        .to_shape((k, mh, mw))
        .map_err(|e| DomainError::Inference(format!("affinity reshape: {e}")))?;

    let mut probs = resize_bilinear(affinity.view(), target_h, target_w);
    softmax_channels(&mut probs);

    Ok(ProbabilityVolume::new(probs))
}
