use ndarray::s;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::segmentation::{LabelMap, RawModelOutput};
use crate::domain::tensor_ops::{argmax_channels, resize_bilinear, sigmoid, softmax_rows};

/// Semantic decode used by Mask2Former checkpoints.
///
/// Mask logits are first brought back to the network's square input grid
/// (`decode_size`), squashed, weighted by the query class distributions and
/// then resized to `target` before the per-pixel arg-max.
pub fn decode_semantic_map(
    raw: &RawModelOutput,
    decode_size: usize,
    target: (usize, usize),
) -> DomainResult<LabelMap> {
    let (target_h, target_w) = target;
    if decode_size == 0 || target_h == 0 || target_w == 0 {
        return Err(DomainError::InvalidInput("decode sizes must be non-empty".into()));
    }

    let k = raw.num_classes();
    let q = raw.num_queries();

    let mut masks = resize_bilinear(raw.mask_logits(), decode_size, decode_size);
    masks.mapv_inplace(sigmoid);
    let masks = masks
        .to_shape((q, decode_size * decode_size))
        .map_err(|e| DomainError::Inference(format!("mask reshape: {e}")))?;

    let class_probs = softmax_rows(raw.class_logits());
    let segmentation = class_probs.slice(s![.., ..k]).t().dot(&masks);
    let segmentation = segmentation
        .to_shape((k, decode_size, decode_size))
        .map_err(|e| DomainError::Inference(format!("segmentation reshape: {e}")))?;

    let resized = resize_bilinear(segmentation.view(), target_h, target_w);
    Ok(LabelMap::new(argmax_channels(resized.view())))
}

/// Checks a backend-produced map against the requested size and label range.
pub fn ensure_valid(map: &LabelMap, target: (usize, usize), num_classes: usize) -> DomainResult<()> {
    if (map.height(), map.width()) != target {
        return Err(DomainError::Inference(format!(
            "label map is {}x{}, expected {}x{}",
            map.height(),
            map.width(),
            target.0,
            target.1
        )));
    }
    if let Some(bad) = map.view().iter().find(|&&id| id as usize >= num_classes) {
        return Err(DomainError::Inference(format!(
            "label map holds class {bad} outside [0, {num_classes})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};

    #[test]
    fn dominant_query_labels_every_pixel() {
        // Query 0 says class 2 and is active everywhere; query 1 is switched off.
        let raw = RawModelOutput::new(
            array![[-4.0f32, -4.0, 9.0, -4.0], [9.0, -4.0, -4.0, -4.0]],
            Array3::from_shape_fn((2, 3, 3), |(q, _, _)| if q == 0 { 8.0 } else { -8.0 }),
        )
        .unwrap();

        let map = decode_semantic_map(&raw, 6, (5, 4)).unwrap();
        assert_eq!((map.height(), map.width()), (5, 4));
        assert!(map.view().iter().all(|&id| id == 2));
    }

    #[test]
    fn spatially_split_queries_split_the_map() {
        // Query 0 (class 0) owns the left column, query 1 (class 1) the right.
        let raw = RawModelOutput::new(
            array![[9.0f32, -9.0, -9.0], [-9.0, 9.0, -9.0]],
            array![[[10.0f32, -10.0], [10.0, -10.0]], [[-10.0, 10.0], [-10.0, 10.0]]],
        )
        .unwrap();

        let map = decode_semantic_map(&raw, 2, (2, 2)).unwrap();
        assert_eq!(map, LabelMap::new(array![[0, 1], [0, 1]]));
    }

    #[test]
    fn validation_catches_size_and_range() {
        let map = LabelMap::new(array![[0, 1], [1, 5]]);
        assert!(ensure_valid(&map, (2, 2), 6).is_ok());
        assert!(ensure_valid(&map, (2, 3), 6).is_err());
        assert!(ensure_valid(&map, (2, 2), 5).is_err());
    }
}
