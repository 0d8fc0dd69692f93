//! Pixel statistics over a region crop: HSV spread and border/core tone.

use image::{GrayImage, RgbImage};
use palette::{FromColor, Hsv, Srgb};

/// Border band thickness is `min(w, h) / FRAME_BAND_DIVISOR`
const FRAME_BAND_DIVISOR: u32 = 10;

/// Bands this thin or thinner carry no frame signal
const MIN_FRAME_BAND: u32 = 5;

/// Border counts as a frame when darker than this fraction of the core
const FRAME_DARKNESS_RATIO: f32 = 0.8;

/// Mean and standard deviation of hue and saturation.
///
/// Hue is on the 8-bit HSV scale (0-180), saturation on 0-255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvStats {
    pub hue_mean: f32,
    pub hue_std: f32,
    pub saturation_mean: f32,
    pub saturation_std: f32,
}

pub fn hsv_stats(img: &RgbImage) -> HsvStats {
    let n = img.width() as usize * img.height() as usize;
    if n == 0 {
        return HsvStats {
            hue_mean: 0.0,
            hue_std: 0.0,
            saturation_mean: 0.0,
            saturation_std: 0.0,
        };
    }

    let mut hues = Vec::with_capacity(n);
    let mut saturations = Vec::with_capacity(n);
    for pixel in img.pixels() {
        let [r, g, b] = pixel.0;
        let rgb = Srgb::new(r, g, b).into_format::<f32>();
        let hsv: Hsv = Hsv::from_color(rgb);
        hues.push(hsv.hue.into_positive_degrees() as f64 / 2.0);
        saturations.push(hsv.saturation as f64 * 255.0);
    }

    let (hue_mean, hue_std) = mean_std(&hues);
    let (saturation_mean, saturation_std) = mean_std(&saturations);
    HsvStats {
        hue_mean: hue_mean as f32,
        hue_std: hue_std as f32,
        saturation_mean: saturation_mean as f32,
        saturation_std: saturation_std as f32,
    }
}

/// Population mean and standard deviation, two-pass
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Mean luminance of a sub-rectangle, 0.0 if it is empty
pub fn mean_luminance(gray: &GrayImage, x: u32, y: u32, width: u32, height: u32) -> f32 {
    if width == 0 || height == 0 {
        return 0.0;
    }
    let mut sum: u64 = 0;
    for py in y..y + height {
        for px in x..x + width {
            sum += gray.get_pixel(px, py)[0] as u64;
        }
    }
    sum as f32 / (width as u64 * height as u64) as f32
}

/// Tone of the outer border band against the inner core of a region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContrast {
    /// Mean of the four strip means (top, bottom, left, right)
    pub border_mean: f32,
    pub core_mean: f32,
}

impl FrameContrast {
    pub fn is_framed(&self) -> bool {
        self.border_mean < self.core_mean * FRAME_DARKNESS_RATIO
    }
}

/// Measure border vs core tone; `None` when the band is too thin or the core empty
pub fn frame_contrast(gray: &GrayImage) -> Option<FrameContrast> {
    let (w, h) = gray.dimensions();
    let band = w.min(h) / FRAME_BAND_DIVISOR;
    if band <= MIN_FRAME_BAND || 2 * band >= w || 2 * band >= h {
        return None;
    }

    let strips = [
        mean_luminance(gray, 0, 0, w, band),
        mean_luminance(gray, 0, h - band, w, band),
        mean_luminance(gray, 0, 0, band, h),
        mean_luminance(gray, w - band, 0, band, h),
    ];
    let border_mean = strips.iter().sum::<f32>() / strips.len() as f32;
    let core_mean = mean_luminance(gray, band, band, w - 2 * band, h - 2 * band);

    Some(FrameContrast {
        border_mean,
        core_mean,
    })
}
