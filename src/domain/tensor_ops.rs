//! Small tensor kernels shared by the probability and label-map paths.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};

pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Softmax along each row of a `[N, C]` matrix.
pub fn softmax_rows(logits: ArrayView2<'_, f32>) -> Array2<f32> {
    let mut out = logits.to_owned();
    for mut row in out.axis_iter_mut(Axis(0)) {
        let max = row.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    out
}

/// Softmax over the leading (class) axis of `[C, H, W]`, in place.
pub fn softmax_channels(volume: &mut Array3<f32>) {
    let (_, h, w) = volume.dim();
    for y in 0..h {
        for x in 0..w {
            let mut lane = volume.slice_mut(ndarray::s![.., y, x]);
            let max = lane.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
            lane.mapv_inplace(|v| (v - max).exp());
            let sum = lane.sum();
            lane.mapv_inplace(|v| v / sum);
        }
    }
}

/// Index of the largest value along the class axis; the first one wins on ties.
pub fn argmax_channels(volume: ArrayView3<'_, f32>) -> Array2<u32> {
    let (_, h, w) = volume.dim();
    let mut out = Array2::<u32>::zeros((h, w));
    let mut best = Array2::<f32>::from_elem((h, w), f32::NEG_INFINITY);
    for (c, plane) in volume.axis_iter(Axis(0)).enumerate() {
        Zip::from(&mut out).and(&mut best).and(&plane).for_each(|id, b, &v| {
            if v > *b {
                *b = v;
                *id = c as u32;
            }
        });
    }
    out
}

/// Source taps for one output axis: (low index, high index, high weight).
fn bilinear_taps(in_len: usize, out_len: usize) -> Vec<(usize, usize, f32)> {
    let scale = in_len as f32 / out_len as f32;
    (0..out_len)
        .map(|dst| {
            let src = ((dst as f32 + 0.5) * scale - 0.5).max(0.0);
            let lo = (src.floor() as usize).min(in_len - 1);
            let hi = if lo + 1 < in_len { lo + 1 } else { lo };
            (lo, hi, src - lo as f32)
        })
        .collect()
}

/// Bilinear resize of every channel of `[C, H, W]` to `[C, out_h, out_w]`,
/// sampling at pixel centres (corners not aligned).
pub fn resize_bilinear(volume: ArrayView3<'_, f32>, out_h: usize, out_w: usize) -> Array3<f32> {
    let (c, in_h, in_w) = volume.dim();
    let mut out = Array3::<f32>::zeros((c, out_h, out_w));
    if in_h == 0 || in_w == 0 {
        return out;
    }

    let ys = bilinear_taps(in_h, out_h);
    let xs = bilinear_taps(in_w, out_w);

    for (src, mut dst) in volume.axis_iter(Axis(0)).zip(out.axis_iter_mut(Axis(0))) {
        for (oy, &(y0, y1, ly)) in ys.iter().enumerate() {
            for (ox, &(x0, x1, lx)) in xs.iter().enumerate() {
                let top = src[[y0, x0]] * (1.0 - lx) + src[[y0, x1]] * lx;
                let bottom = src[[y1, x0]] * (1.0 - lx) + src[[y1, x1]] * lx;
                dst[[oy, ox]] = top * (1.0 - ly) + bottom * ly;
            }
        }
    }
    out
}
