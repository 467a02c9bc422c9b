//! Image preprocessing for OCR.

use image::{DynamicImage, GrayImage, Luma};

use crate::config::PreprocessConfig;

/// Preprocessor turning a raw page raster into a binarized image the
/// OCR engine copes well with.
///
/// The transform is a pure function of the input image and the fixed
/// parameters: grayscale, non-local-means denoise, global threshold,
/// then one small dilation pass. Malformed raster input is the
/// rasterizer's problem, not handled here.
pub struct ImagePreprocessor {
    /// Denoising strength (h).
    strength: f32,
    /// Patch radius for the denoiser.
    patch_radius: u32,
    /// Search window radius for the denoiser.
    search_radius: u32,
    /// Global binarization threshold.
    threshold: u8,
}

impl ImagePreprocessor {
    /// Create a preprocessor from configuration.
    pub fn new(config: &PreprocessConfig) -> Self {
        Self {
            strength: config.denoise_strength,
            patch_radius: config.patch_radius,
            search_radius: config.search_radius,
            threshold: config.binarize_threshold,
        }
    }

    /// Run the full preprocessing chain on a page image.
    ///
    /// Output dimensions match the input; every output pixel is 0 or
    /// 255.
    pub fn preprocess(&self, image: &DynamicImage) -> GrayImage {
        let gray = image.to_luma8();
        let denoised = self.denoise(&gray);
        let binary = self.binarize(&denoised);
        Self::dilate(&binary)
    }

    /// Non-local-means denoising to remove scan artifacts.
    ///
    /// Per-offset squared-difference integral images keep this at
    /// O(pixels x search-window) instead of the naive additional
    /// patch-area factor.
    fn denoise(&self, image: &GrayImage) -> GrayImage {
        if self.strength <= 0.0 {
            return image.clone();
        }

        let (width, height) = image.dimensions();
        let (w, h) = (width as i64, height as i64);
        let n = (width * height) as usize;

        let patch = self.patch_radius as i64;
        let search = self.search_radius as i64;
        let h2 = self.strength * self.strength;

        let mut weight_sum = vec![0.0f32; n];
        let mut value_sum = vec![0.0f32; n];

        let px = |x: i64, y: i64| -> f32 {
            // Replicate borders.
            let cx = x.clamp(0, w - 1) as u32;
            let cy = y.clamp(0, h - 1) as u32;
            image.get_pixel(cx, cy)[0] as f32
        };

        // Integral image of squared differences, one per offset.
        let mut integral = vec![0.0f64; ((w + 1) * (h + 1)) as usize];
        let stride = (w + 1) as usize;

        for dy in -search..=search {
            for dx in -search..=search {
                for y in 0..h {
                    for x in 0..w {
                        let d = px(x, y) - px(x + dx, y + dy);
                        let i = (y + 1) as usize * stride + (x + 1) as usize;
                        integral[i] = (d * d) as f64 + integral[i - 1]
                            + integral[i - stride]
                            - integral[i - stride - 1];
                    }
                }

                for y in 0..h {
                    for x in 0..w {
                        // Patch bounds clamped to the image.
                        let x0 = (x - patch).max(0) as usize;
                        let y0 = (y - patch).max(0) as usize;
                        let x1 = (x + patch + 1).min(w) as usize;
                        let y1 = (y + patch + 1).min(h) as usize;
                        let area = ((x1 - x0) * (y1 - y0)) as f64;

                        let sum = integral[y1 * stride + x1]
                            - integral[y0 * stride + x1]
                            - integral[y1 * stride + x0]
                            + integral[y0 * stride + x0];
                        let dist = (sum / area) as f32;

                        let weight = (-dist / h2).exp();
                        let i = (y * w + x) as usize;
                        weight_sum[i] += weight;
                        value_sum[i] += weight * px(x + dx, y + dy);
                    }
                }
            }
        }

        let mut result = GrayImage::new(width, height);
        for y in 0..height {
            for x in 0..width {
                let i = (y * width + x) as usize;
                // The zero offset contributes weight 1, so the sum is
                // never zero.
                let value = (value_sum[i] / weight_sum[i]).round().clamp(0.0, 255.0);
                result.put_pixel(x, y, Luma([value as u8]));
            }
        }
        result
    }

    /// Global binarization: below the threshold -> black, at/above ->
    /// white. Not adaptive, so runs are reproducible.
    fn binarize(&self, image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let mut result = GrayImage::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let value = if image.get_pixel(x, y)[0] < self.threshold {
                    0
                } else {
                    255
                };
                result.put_pixel(x, y, Luma([value]));
            }
        }
        result
    }

    /// One dilation pass with a 2x2 structuring element, reconnecting
    /// strokes broken by scanning or denoising.
    fn dilate(image: &GrayImage) -> GrayImage {
        let (width, height) = image.dimensions();
        let mut result = GrayImage::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let mut max = image.get_pixel(x, y)[0];
                for (nx, ny) in [(x + 1, y), (x, y + 1), (x + 1, y + 1)] {
                    if nx < width && ny < height {
                        max = max.max(image.get_pixel(nx, ny)[0]);
                    }
                }
                result.put_pixel(x, y, Luma([max]));
            }
        }
        result
    }
}
