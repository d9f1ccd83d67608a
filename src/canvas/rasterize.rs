//! Downsampling to the canonical 28x28 grayscale sample.
//!
//! Polarity contract: pixel value rises with ink density. A pure-white
//! background cell maps to 0, a pure-black ink cell to 255. The same
//! convention applies at every boundary - capture, storage, export, and
//! display - so [`to_image`] inverts back to luminance when rendering a
//! stored sample.

use image::{GrayImage, Luma, RgbImage, imageops};

use crate::error::{CollectError, CollectResult};
use crate::model::PIXEL_COUNT;

/// Canonical sample side length.
pub const TARGET_SIZE: u32 = 28;

/// Downsamples a capture-resolution raster to 784 grayscale values.
///
/// Bilinear resampling keeps the result deterministic and area-averaging, so
/// thin strokes survive the 10:1 downscale as partial-intensity cells instead
/// of dropping out. Each target cell becomes `255 - floor((R+G+B)/3)`.
///
/// The output is always exactly [`PIXEL_COUNT`] values, row-major.
pub fn rasterize(source: &RgbImage) -> Vec<u8> {
    let scaled = imageops::resize(source, TARGET_SIZE, TARGET_SIZE, imageops::FilterType::Triangle);

    let mut pixels = Vec::with_capacity(PIXEL_COUNT);
    for pixel in scaled.pixels() {
        let sum = pixel[0] as u16 + pixel[1] as u16 + pixel[2] as u16;
        pixels.push(255 - (sum / 3) as u8);
    }
    pixels
}

/// Renders stored sample pixels back to a 28x28 grayscale image.
///
/// Inverts the storage polarity so ink shows dark on a light background.
pub fn to_image(pixels: &[u8]) -> CollectResult<GrayImage> {
    if pixels.len() != PIXEL_COUNT {
        return Err(CollectError::Validation(format!(
            "expected {} pixels, got {}",
            PIXEL_COUNT,
            pixels.len()
        )));
    }

    Ok(GrayImage::from_fn(TARGET_SIZE, TARGET_SIZE, |x, y| {
        Luma([255 - pixels[(y * TARGET_SIZE + x) as usize]])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(color: Rgb<u8>) -> RgbImage {
        RgbImage::from_pixel(280, 280, color)
    }

    #[test]
    fn test_output_length_is_always_784() {
        for size in [1, 10, 28, 280, 300] {
            let img = RgbImage::from_pixel(size, size, Rgb([128, 128, 128]));
            assert_eq!(rasterize(&img).len(), PIXEL_COUNT);
        }
        // Non-square sources still normalize to 784.
        let img = RgbImage::from_pixel(100, 250, Rgb([0, 0, 0]));
        assert_eq!(rasterize(&img).len(), PIXEL_COUNT);
    }

    #[test]
    fn test_deterministic() {
        let mut img = solid(Rgb([255, 255, 255]));
        for x in 100..180 {
            for y in 120..160 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }

        assert_eq!(rasterize(&img), rasterize(&img));
    }

    #[test]
    fn test_white_background_maps_to_zero() {
        let pixels = rasterize(&solid(Rgb([255, 255, 255])));
        assert!(pixels.iter().all(|&p| p == 0));
    }

    #[test]
    fn test_black_ink_maps_to_255() {
        let pixels = rasterize(&solid(Rgb([0, 0, 0])));
        assert!(pixels.iter().all(|&p| p == 255));
    }

    #[test]
    fn test_gray_average() {
        // RGB (90, 120, 150) averages to 120, inverted to 135.
        let pixels = rasterize(&solid(Rgb([90, 120, 150])));
        assert!(pixels.iter().all(|&p| p == 135));
    }

    #[test]
    fn test_ink_region_survives_downscale() {
        let mut img = solid(Rgb([255, 255, 255]));
        // A 40px-wide vertical bar through the middle.
        for x in 120..160 {
            for y in 40..240 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }

        let pixels = rasterize(&img);
        // Center cell sits inside the bar, corner stays background.
        assert_eq!(pixels[(14 * TARGET_SIZE + 14) as usize], 255);
        assert_eq!(pixels[0], 0);
    }

    #[test]
    fn test_to_image_inverts_polarity() {
        let mut pixels = vec![0u8; PIXEL_COUNT];
        pixels[0] = 255; // full ink in the top-left cell

        let img = to_image(&pixels).unwrap();
        assert_eq!(img.get_pixel(0, 0)[0], 0, "ink should render black");
        assert_eq!(img.get_pixel(1, 0)[0], 255, "background should render white");
    }

    #[test]
    fn test_to_image_rejects_wrong_length() {
        assert!(to_image(&[0u8; 100]).is_err());
    }
}
