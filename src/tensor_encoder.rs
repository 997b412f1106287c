use crate::image_codec::RawImage;

/// `1 x S x S x 3` u8 buffer, row-major with interleaved RGB channels.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedTensor {
    side: u32,
    data: Vec<u8>,
}

impl PreparedTensor {
    pub fn shape(&self) -> [usize; 4] {
        [1, self.side as usize, self.side as usize, 3]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

pub fn expected_len(target_size: u32) -> usize {
    target_size as usize * target_size as usize * 3
}

/// Flattens a resized image. Channel values are passed through as 0-255.
///
/// Panics if the image is not `target_size` square: callers must resize first.
pub fn encode(image: &RawImage, target_size: u32) -> PreparedTensor {
    let data: Vec<u8> = image
        .as_rgb()
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect();

    assert_eq!(
        data.len(),
        expected_len(target_size),
        "encoded {}x{} image does not fill a {}x{} tensor",
        image.width(),
        image.height(),
        target_size,
        target_size
    );

    PreparedTensor {
        side: target_size,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    #[test]
    fn test_encode_row_major_interleaved() {
        let image = RawImage::new(ImageBuffer::from_fn(2, 2, |x, y| {
            Rgb([(10 * x + y) as u8, 100, 200])
        }));

        let tensor = encode(&image, 2);

        assert_eq!(tensor.shape(), [1, 2, 2, 3]);
        assert_eq!(
            tensor.as_bytes(),
            &[0, 100, 200, 10, 100, 200, 1, 100, 200, 11, 100, 200]
        );
    }

    #[test]
    fn test_encode_keeps_raw_channel_values() {
        let image = RawImage::new(ImageBuffer::from_pixel(224, 224, Rgb([255, 128, 0])));

        let tensor = encode(&image, 224);

        assert_eq!(tensor.as_bytes().len(), 224 * 224 * 3);
        assert_eq!(&tensor.as_bytes()[..3], &[255, 128, 0]);
    }

    #[test]
    #[should_panic]
    fn test_encode_wrong_size_panics() {
        let image = RawImage::new(ImageBuffer::from_pixel(10, 10, Rgb([0, 0, 0])));

        encode(&image, 224);
    }
}
