use image::{GrayImage, Luma, Rgb, RgbImage};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::BTreeMap;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::segmentation::LabelMap;

pub const OVERLAY_ALPHA: f64 = 0.45;
const COLOR_SEED_OFFSET: u64 = 17;

/// Stable pseudo-random color for a class, channels drawn from [40, 230).
pub fn color_for_class(class_id: u32) -> [u8; 3] {
    let mut rng = StdRng::seed_from_u64(class_id as u64 + COLOR_SEED_OFFSET);
    [
        rng.gen_range(40u8..230),
        rng.gen_range(40u8..230),
        rng.gen_range(40u8..230),
    ]
}

/// Blends each pixel with its class color: `orig * (1 - a) + color * a`.
pub fn render_overlay(image: &RgbImage, map: &LabelMap) -> DomainResult<RgbImage> {
    if (image.height() as usize, image.width() as usize) != (map.height(), map.width()) {
        return Err(DomainError::InvalidInput(format!(
            "image {}x{} does not match label map {}x{}",
            image.width(),
            image.height(),
            map.width(),
            map.height()
        )));
    }

    let palette: BTreeMap<u32, [u8; 3]> = map
        .present_classes()
        .into_iter()
        .map(|id| (id, color_for_class(id)))
        .collect();

    let mut out = RgbImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let color = palette[&map.get(y as usize, x as usize)];
        let mut blended = [0u8; 3];
        for c in 0..3 {
            let v = pixel[c] as f64 * (1.0 - OVERLAY_ALPHA) + color[c] as f64 * OVERLAY_ALPHA;
            blended[c] = v as u8;
        }
        out.put_pixel(x, y, Rgb(blended));
    }
    Ok(out)
}

/// One 0/255 mask per present class, ascending by class id.
pub fn class_masks(map: &LabelMap) -> Vec<(u32, GrayImage)> {
    let (w, h) = (map.width() as u32, map.height() as u32);
    map.present_classes()
        .into_iter()
        .map(|class_id| {
            let mask = GrayImage::from_fn(w, h, |x, y| {
                if map.get(y as usize, x as usize) == class_id {
                    Luma([255])
                } else {
                    Luma([0])
                }
            });
            (class_id, mask)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn colors_are_reproducible_and_in_range() {
        for id in [0u32, 1, 17, 149, 10_000] {
            let a = color_for_class(id);
            assert_eq!(a, color_for_class(id));
            assert!(a.iter().all(|&c| (40..230).contains(&c)));
        }
        assert_ne!(color_for_class(0), color_for_class(1));
    }

    #[test]
    fn overlay_keeps_size_and_blends() {
        let image = RgbImage::from_pixel(4, 4, Rgb([128, 128, 128]));
        let map = LabelMap::new(array![
            [0, 0, 1, 1],
            [0, 2, 2, 1],
            [0, 2, 1, 1],
            [2, 2, 1, 0],
        ]);

        let overlay = render_overlay(&image, &map).unwrap();
        assert_eq!(overlay.dimensions(), image.dimensions());

        let color = color_for_class(2);
        let expected = (128.0 * (1.0 - OVERLAY_ALPHA) + color[0] as f64 * OVERLAY_ALPHA) as u8;
        assert_eq!(overlay.get_pixel(1, 1)[0], expected);
    }

    #[test]
    fn overlay_rejects_mismatched_map() {
        let image = RgbImage::new(3, 2);
        let map = LabelMap::new(array![[0, 1], [1, 0]]);
        assert!(render_overlay(&image, &map).is_err());
    }

    #[test]
    fn one_binary_mask_per_present_class() {
        let map = LabelMap::new(array![[0, 1, 1], [2, 2, 1], [0, 2, 0]]);
        let masks = class_masks(&map);

        let ids: Vec<u32> = masks.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        let (_, floor) = &masks[1];
        assert_eq!(floor.dimensions(), (3, 3));
        assert_eq!(floor.get_pixel(1, 0)[0], 255);
        assert_eq!(floor.get_pixel(0, 0)[0], 0);
        assert_eq!(floor.pixels().filter(|p| p[0] == 255).count(), 3);
    }
}
