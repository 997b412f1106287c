use crate::error::DecodeError;
use image::{imageops, RgbImage};

/// Decoded RGB8 pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RawImage {
    pixels: RgbImage,
}

impl RawImage {
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[allow(dead_code)]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels.get_pixel(x, y).0
    }

    pub fn as_rgb(&self) -> &RgbImage {
        &self.pixels
    }
}

pub fn decode(bytes: &[u8]) -> Result<RawImage, DecodeError> {
    let image = image::load_from_memory(bytes)?;

    if image.width() == 0 || image.height() == 0 {
        return Err(DecodeError::Empty {
            width: image.width(),
            height: image.height(),
        });
    }

    Ok(RawImage::new(image.to_rgb8()))
}

/// Crops the longer side so the image becomes a centered square.
///
/// The origin uses floor division, so an odd difference leaves the extra
/// pixel on the right/bottom edge.
pub fn center_crop_square(image: &RawImage) -> RawImage {
    let (width, height) = (image.width(), image.height());
    let side = width.min(height);

    if width == height {
        return image.clone();
    }

    let x = (width - side) / 2;
    let y = (height - side) / 2;

    RawImage::new(imageops::crop_imm(image.as_rgb(), x, y, side, side).to_image())
}

/// Bilinear resize to exactly `target_size` x `target_size`.
pub fn resize(image: &RawImage, target_size: u32) -> RawImage {
    if image.width() == target_size && image.height() == target_size {
        return image.clone();
    }

    RawImage::new(imageops::resize(
        image.as_rgb(),
        target_size,
        target_size,
        imageops::FilterType::Triangle,
    ))
}

pub fn prepare(bytes: &[u8], target_size: u32) -> Result<RawImage, DecodeError> {
    let decoded = decode(bytes)?;
    let cropped = center_crop_square(&decoded);
    Ok(resize(&cropped, target_size))
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    pub fn gradient(width: u32, height: u32) -> RgbImage {
        ImageBuffer::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    pub fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        ImageBuffer::from_pixel(width, height, Rgb(color))
    }

    pub fn png_bytes(image: RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let bytes = png_bytes(gradient(30, 20));

        let image = decode(&bytes).unwrap();

        assert_eq!(image.width(), 30);
        assert_eq!(image.height(), 20);
        assert_eq!(image.pixel(5, 7), [5, 7, 12]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = decode(b"definitely not an image");

        assert!(result.is_err());
    }

    #[test]
    fn test_decode_truncated_fails() {
        let bytes = png_bytes(gradient(64, 64));

        let result = decode(&bytes[..bytes.len() / 2]);

        assert!(matches!(result, Err(DecodeError::Corrupt(_))));
    }

    #[test]
    fn test_crop_and_resize_is_identity_at_target_size() {
        let original = RawImage::new(gradient(224, 224));

        let cropped = center_crop_square(&original);
        let resized = resize(&cropped, 224);

        assert_eq!(resized, original);
    }

    #[test]
    fn test_crop_wider_by_one() {
        let image = RawImage::new(gradient(101, 100));

        let cropped = center_crop_square(&image);

        assert_eq!((cropped.width(), cropped.height()), (100, 100));
        assert_eq!(cropped.pixel(0, 0), image.pixel(0, 0));
        assert_eq!(cropped.pixel(99, 99), image.pixel(99, 99));
    }

    #[test]
    fn test_crop_taller_by_one() {
        let image = RawImage::new(gradient(100, 101));

        let cropped = center_crop_square(&image);

        assert_eq!((cropped.width(), cropped.height()), (100, 100));
        assert_eq!(cropped.pixel(0, 0), image.pixel(0, 0));
        assert_eq!(cropped.pixel(99, 99), image.pixel(99, 99));
    }

    #[test]
    fn test_crop_offset_uses_floor_division() {
        let wide = RawImage::new(gradient(103, 100));
        let tall = RawImage::new(gradient(100, 105));

        let wide_cropped = center_crop_square(&wide);
        let tall_cropped = center_crop_square(&tall);

        assert_eq!(wide_cropped.pixel(0, 0), wide.pixel(1, 0));
        assert_eq!(tall_cropped.pixel(0, 0), tall.pixel(0, 2));
        assert_eq!(tall_cropped.pixel(99, 99), tall.pixel(99, 101));
    }

    #[test]
    fn test_resize_to_target() {
        let image = RawImage::new(solid(300, 300, [10, 20, 30]));

        let resized = resize(&image, 224);

        assert_eq!((resized.width(), resized.height()), (224, 224));
        assert_eq!(resized.pixel(112, 112), [10, 20, 30]);
    }

    #[test]
    fn test_prepare_rectangle() {
        let bytes = png_bytes(solid(300, 200, [200, 100, 50]));

        let prepared = prepare(&bytes, 224).unwrap();

        assert_eq!((prepared.width(), prepared.height()), (224, 224));
        assert_eq!(prepared.pixel(0, 0), [200, 100, 50]);
    }
}
