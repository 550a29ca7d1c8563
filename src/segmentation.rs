// HSV color segmentation.
//
// Gold samples and silver references separate cleanly on hue/saturation
// where raw RGB thresholds drift with gym lighting, so each frame is
// converted to HSV and thresholded against the calibrated bands.

use crate::types::HsvBand;
use tracing::trace;

/// Convert one RGB pixel to HSV on the OpenCV scale:
/// H in [0,179], S in [0,255], V in [0,255].
///
/// The calibration bands were measured on that scale, so the conversion
/// keeps it rather than the 0-360 degree convention.
#[inline]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let r_n = r as f32 / 255.0;
    let g_n = g as f32 / 255.0;
    let b_n = b as f32 / 255.0;

    let max = r_n.max(g_n).max(b_n);
    let min = r_n.min(g_n).min(b_n);
    let delta = max - min;

    // Hue in degrees, then halved onto [0,179]
    let h_deg = if delta < 1e-6 {
        0.0
    } else if (max - r_n).abs() < 1e-6 {
        let h = 60.0 * (((g_n - b_n) / delta) % 6.0);
        if h < 0.0 {
            h + 360.0
        } else {
            h
        }
    } else if (max - g_n).abs() < 1e-6 {
        60.0 * (((b_n - r_n) / delta) + 2.0)
    } else {
        60.0 * (((r_n - g_n) / delta) + 4.0)
    };

    let s = if max < 1e-6 { 0.0 } else { delta / max };

    let h = (h_deg / 2.0).round().min(179.0) as u8;
    let s = (s * 255.0).round().min(255.0) as u8;
    let v = (max * 255.0).round().min(255.0) as u8;

    (h, s, v)
}

/// Binary membership mask for one color band: 255 = in range, 0 = out.
/// Reused across frames; `reset` clears and resizes, no state persists.
#[derive(Debug, Default)]
pub struct ColorMask {
    pub data: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

impl ColorMask {
    pub fn reset(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(width * height, 0);
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&p| p != 0).count()
    }
}

/// Threshold an RGB frame against an inclusive HSV band into `mask`.
/// `mask` is fully recomputed; previous contents are discarded.
pub fn threshold_in_range(
    frame: &[u8],
    width: usize,
    height: usize,
    band: &HsvBand,
    mask: &mut ColorMask,
) {
    mask.reset(width, height);

    for i in 0..width * height {
        let idx = i * 3;
        let (h, s, v) = rgb_to_hsv(frame[idx], frame[idx + 1], frame[idx + 2]);
        if band.contains(h, s, v) {
            mask.data[i] = 255;
        }
    }

    trace!(
        foreground = mask.foreground_count(),
        "thresholded frame against HSV band"
    );
}

/// 3x3 mean blur over the mask followed by re-binarization (any non-zero
/// average counts as foreground). Merges speckle noise into solid blobs
/// and grows each blob by a one pixel ring. `scratch` is a reusable
/// working buffer.
pub fn blur_mask(mask: &mut ColorMask, scratch: &mut Vec<u8>) {
    let (w, h) = (mask.width, mask.height);
    if w == 0 || h == 0 {
        return;
    }

    scratch.clear();
    scratch.resize(w * h, 0);

    for y in 0..h {
        for x in 0..w {
            let mut sum: u32 = 0;
            let mut count: u32 = 0;
            for dy in -1i32..=1 {
                for dx in -1i32..=1 {
                    let ny = y as i32 + dy;
                    let nx = x as i32 + dx;
                    if ny >= 0 && ny < h as i32 && nx >= 0 && nx < w as i32 {
                        sum += mask.data[ny as usize * w + nx as usize] as u32;
                        count += 1;
                    }
                }
            }
            if sum / count > 0 {
                scratch[y * w + x] = 255;
            }
        }
    }

    mask.data.copy_from_slice(scratch);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_to_hsv_red() {
        let (h, s, v) = rgb_to_hsv(255, 0, 0);
        assert_eq!(h, 0);
        assert_eq!(s, 255);
        assert_eq!(v, 255);
    }

    #[test]
    fn test_rgb_to_hsv_yellow() {
        let (h, s, v) = rgb_to_hsv(255, 255, 0);
        assert_eq!(h, 30); // 60 degrees halved
        assert_eq!(s, 255);
        assert_eq!(v, 255);
    }

    #[test]
    fn test_rgb_to_hsv_white() {
        let (_, s, v) = rgb_to_hsv(255, 255, 255);
        assert_eq!(s, 0);
        assert_eq!(v, 255);
    }

    #[test]
    fn test_gold_pixel_lands_in_gold_band() {
        use crate::types::DetectorConfig;
        let config = DetectorConfig::default();
        // Saturated warm yellow, typical of the gold cube under gym light
        let (h, s, v) = rgb_to_hsv(220, 180, 40);
        assert!(config.gold.hsv.contains(h, s, v));
        assert!(!config.silver.hsv.contains(h, s, v));
    }

    #[test]
    fn test_white_pixel_lands_in_silver_band() {
        use crate::types::DetectorConfig;
        let config = DetectorConfig::default();
        let (h, s, v) = rgb_to_hsv(240, 240, 238);
        assert!(config.silver.hsv.contains(h, s, v));
        assert!(!config.gold.hsv.contains(h, s, v));
    }

    #[test]
    fn test_threshold_selects_only_band_pixels() {
        let band = HsvBand {
            lower: [0, 0, 140],
            upper: [179, 15, 255],
        };
        // 2x2: white, black, white, mid-grey(100)
        let frame = [255, 255, 255, 0, 0, 0, 250, 250, 250, 100, 100, 100];
        let mut mask = ColorMask::default();
        threshold_in_range(&frame, 2, 2, &band, &mut mask);
        assert_eq!(mask.data, vec![255, 0, 255, 0]);
    }

    #[test]
    fn test_blur_dilates_single_pixel() {
        let mut mask = ColorMask::default();
        mask.reset(5, 5);
        mask.data[2 * 5 + 2] = 255;

        let mut scratch = Vec::new();
        blur_mask(&mut mask, &mut scratch);

        // The single pixel becomes a 3x3 block; nothing else turns on.
        for y in 0..5 {
            for x in 0..5 {
                let expect = (1..=3).contains(&x) && (1..=3).contains(&y);
                assert_eq!(mask.get(x, y) != 0, expect, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_blur_on_empty_mask_is_noop() {
        let mut mask = ColorMask::default();
        mask.reset(4, 4);
        let mut scratch = Vec::new();
        blur_mask(&mut mask, &mut scratch);
        assert_eq!(mask.foreground_count(), 0);
    }
}
