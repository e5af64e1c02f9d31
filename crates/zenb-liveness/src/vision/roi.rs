//! ROI mean-colour extraction
//!
//! Reduces a raw interleaved pixel buffer plus a skin rectangle (forehead,
//! cheek, face box from an external detector) to the mean colour a session
//! consumes.

use crate::types::ColorSample;

/// Rectangle in pixel coordinates, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RoiRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Centre third of the frame, the usual face position in a selfie capture.
    pub fn center_third(frame_width: u32, frame_height: u32) -> Self {
        Self::new(
            frame_width / 3,
            frame_height / 3,
            frame_width / 3,
            frame_height / 3,
        )
    }
}

/// Mean [R, G, B] over the part of `roi` that lies inside the frame.
///
/// # Arguments
/// * `frame` - interleaved 8-bit pixels, row-major, no row padding
/// * `channels` - 3 (RGB888) or 4 (RGBA8888, alpha ignored)
///
/// # Returns
/// `None` for an unsupported channel count, a rectangle with no pixels inside
/// the frame, or a buffer shorter than `width * height * channels`.
pub fn roi_mean_color(
    frame: &[u8],
    width: u32,
    height: u32,
    channels: u8,
    roi: RoiRect,
) -> Option<[f32; 3]> {
    if channels != 3 && channels != 4 {
        return None;
    }
    let stride = width as usize * channels as usize;
    if frame.len() < stride * height as usize {
        return None;
    }

    let x0 = roi.x.min(width) as usize;
    let y0 = roi.y.min(height) as usize;
    let x1 = roi.x.saturating_add(roi.width).min(width) as usize;
    let y1 = roi.y.saturating_add(roi.height).min(height) as usize;
    if x0 >= x1 || y0 >= y1 {
        return None;
    }

    let mut sum = [0u64; 3];
    let step = channels as usize;
    for row in frame[y0 * stride..y1 * stride].chunks_exact(stride) {
        for px in row[x0 * step..x1 * step].chunks_exact(step) {
            sum[0] += px[0] as u64;
            sum[1] += px[1] as u64;
            sum[2] += px[2] as u64;
        }
    }

    let inv = 1.0 / ((x1 - x0) * (y1 - y0)) as f64;
    Some([
        (sum[0] as f64 * inv) as f32,
        (sum[1] as f64 * inv) as f32,
        (sum[2] as f64 * inv) as f32,
    ])
}

/// [`roi_mean_color`] packaged as a timestamped [`ColorSample`].
pub fn roi_color_sample(
    frame: &[u8],
    width: u32,
    height: u32,
    channels: u8,
    roi: RoiRect,
    timestamp_us: i64,
) -> Option<ColorSample> {
    roi_mean_color(frame, width, height, channels, roi)
        .map(|rgb| ColorSample::from_rgb(rgb, timestamp_us))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_frame(width: u32, height: u32, px: &[u8]) -> Vec<u8> {
        px.iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * px.len())
            .collect()
    }

    #[test]
    fn test_uniform_rgb() {
        let frame = uniform_frame(4, 4, &[128, 64, 32]);
        let rgb = roi_mean_color(&frame, 4, 4, 3, RoiRect::new(0, 0, 2, 2)).unwrap();
        assert_eq!(rgb, [128.0, 64.0, 32.0]);
    }

    #[test]
    fn test_rgba_ignores_alpha() {
        let frame = uniform_frame(8, 6, &[10, 20, 30, 255]);
        let rgb = roi_mean_color(&frame, 8, 6, 4, RoiRect::center_third(8, 6)).unwrap();
        assert_eq!(rgb, [10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_mean_over_region_only() {
        // 4x2 frame: left half red 200, right half red 100
        let mut frame = Vec::new();
        for _ in 0..2 {
            for x in 0..4 {
                let r = if x < 2 { 200 } else { 100 };
                frame.extend_from_slice(&[r, 0, 0]);
            }
        }
        let left = roi_mean_color(&frame, 4, 2, 3, RoiRect::new(0, 0, 2, 2)).unwrap();
        assert_eq!(left[0], 200.0);
        let all = roi_mean_color(&frame, 4, 2, 3, RoiRect::new(0, 0, 4, 2)).unwrap();
        assert_eq!(all[0], 150.0);
    }

    #[test]
    fn test_rect_clipped_to_frame() {
        // Non-square frame: rows must be bounded by height, not width
        let frame = uniform_frame(6, 2, &[50, 60, 70]);
        let rgb = roi_mean_color(&frame, 6, 2, 3, RoiRect::new(4, 1, 10, 10)).unwrap();
        assert_eq!(rgb, [50.0, 60.0, 70.0]);
    }

    #[test]
    fn test_degenerate_inputs() {
        let frame = uniform_frame(4, 4, &[1, 2, 3]);
        assert!(roi_mean_color(&frame, 4, 4, 3, RoiRect::new(5, 5, 2, 2)).is_none());
        assert!(roi_mean_color(&frame, 4, 4, 3, RoiRect::new(0, 0, 0, 2)).is_none());
        assert!(roi_mean_color(&frame, 4, 4, 2, RoiRect::new(0, 0, 2, 2)).is_none());
        assert!(roi_mean_color(&frame[..10], 4, 4, 3, RoiRect::new(0, 0, 2, 2)).is_none());
    }

    #[test]
    fn test_color_sample() {
        let frame = uniform_frame(4, 4, &[9, 8, 7]);
        let s = roi_color_sample(&frame, 4, 4, 3, RoiRect::new(1, 1, 2, 2), 1234).unwrap();
        assert_eq!(s, ColorSample::new(9.0, 8.0, 7.0, 1234));
    }
}
