//! Pixel kernels. Each one transforms a contiguous row range of the source
//! into `out`, a destination slice covering exactly that range, and touches
//! nothing else. Row bounds are validated by the engine, not here.

use std::ops::Range;

use crate::core::buffer::PixelBuffer;

/// Photographic negative over `rows`: every sample maps to `255 - s`.
/// Always maps against the 8-bit ceiling, not the buffer's `max_value`.
pub fn invert_rows(src: &PixelBuffer, rows: Range<usize>, out: &mut [u8]) {
    let w = src.width() as usize;
    debug_assert_eq!(out.len(), rows.len() * w);
    let base = rows.start * w;
    let src_rows = &src.samples()[base..rows.end * w];
    for (dst, &s) in out.iter_mut().zip(src_rows) {
        *dst = 255 - s;
    }
}

/// Intensity slice over `rows`: a sample saturates to white when it sits at
/// or beyond either threshold (`s <= t1 || s >= t2`), otherwise it passes
/// through. No ordering between `t1` and `t2` is assumed; with `t1 >= t2`
/// the retained band is empty and everything saturates.
pub fn slice_rows(src: &PixelBuffer, rows: Range<usize>, out: &mut [u8], t1: u8, t2: u8) {
    let w = src.width() as usize;
    debug_assert_eq!(out.len(), rows.len() * w);
    let base = rows.start * w;
    let src_rows = &src.samples()[base..rows.end * w];
    for (dst, &s) in out.iter_mut().zip(src_rows) {
        *dst = if s <= t1 || s >= t2 { 255 } else { s };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply_whole<F: Fn(&PixelBuffer, Range<usize>, &mut [u8])>(
        src: &PixelBuffer,
        kernel: F,
    ) -> Vec<u8> {
        let mut out = vec![0u8; src.len()];
        kernel(src, 0..src.height() as usize, &mut out);
        out
    }

    #[test]
    fn test_invert_is_involution() {
        let samples: Vec<u8> = (0..=255).collect();
        let src = PixelBuffer::new(16, 16, 255, samples.clone());
        let once = apply_whole(&src, invert_rows);
        let back = apply_whole(&PixelBuffer::new(16, 16, 255, once), invert_rows);
        assert_eq!(back, samples);
    }

    #[test]
    fn test_invert_partial_range_only() {
        let src = PixelBuffer::new(2, 3, 255, vec![10, 20, 30, 40, 50, 60]);
        let mut out = vec![0u8; 2];
        // middle row only
        invert_rows(&src, 1..2, &mut out);
        assert_eq!(out, vec![225, 215]);
    }

    #[test]
    fn test_slice_truth_table() {
        for (t1, t2) in [(60u8, 180u8), (180, 60), (100, 100), (0, 255)] {
            let samples: Vec<u8> = (0..=255).collect();
            let src = PixelBuffer::new(16, 16, 255, samples.clone());
            let out = apply_whole(&src, |s, r, o| slice_rows(s, r, o, t1, t2));
            for (i, &s) in samples.iter().enumerate() {
                let expected = if s <= t1 || s >= t2 { 255 } else { s };
                assert_eq!(out[i], expected, "s={} t1={} t2={}", s, t1, t2);
            }
        }
    }

    #[test]
    fn test_slice_band_pass() {
        let src = PixelBuffer::new(6, 1, 255, vec![0, 50, 100, 150, 200, 250]);
        let out = apply_whole(&src, |s, r, o| slice_rows(s, r, o, 60, 180));
        assert_eq!(out, vec![255, 255, 100, 150, 255, 255]);
    }

    #[test]
    fn test_slice_equal_thresholds_saturate_everything() {
        // t1 == t2 leaves no value strictly between the thresholds.
        let src = PixelBuffer::new(4, 1, 255, vec![0, 99, 100, 101]);
        let out = apply_whole(&src, |s, r, o| slice_rows(s, r, o, 100, 100));
        assert_eq!(out, vec![255; 4]);
    }
}
