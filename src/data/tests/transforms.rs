use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

use crate::data::DataError;
use crate::data::transforms::{
    color_image_to_tensor, gray_image_to_tensor, image_to_tensor, to_unit_range,
};

#[test]
fn test_to_unit_range() {
    assert_eq!(to_unit_range(&[0, 51, 255]), vec![0.0, 0.2, 1.0]);
}

#[test]
fn test_image_to_tensor_is_channel_first() {
    let image = RgbImage::from_fn(2, 2, |x, y| Rgb([(x * 10) as u8, (y * 10) as u8, 255]));
    let tensor = image_to_tensor(&DynamicImage::ImageRgb8(image), 3, 2).unwrap();
    assert_eq!(tensor.shape(), &[3, 2, 2]);
    // [c, y, x]
    assert!((tensor[[0, 0, 1]] - 10. / 255.).abs() < 1e-6);
    assert!((tensor[[1, 1, 0]] - 10. / 255.).abs() < 1e-6);
    assert_eq!(tensor[[2, 1, 1]], 1.0);
}

#[test]
fn test_color_and_gray_sizes() {
    let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 255])));
    let color = color_image_to_tensor(&image, 4).unwrap();
    assert_eq!(color.shape(), &[4, 28, 28]);
    assert!(color.data_as_slice().iter().all(|&v| (v - 1.0).abs() < 1.5 / 255.));

    let gray = gray_image_to_tensor(&image).unwrap();
    assert_eq!(gray.shape(), &[1, 14, 14]);

    assert!(matches!(
        color_image_to_tensor(&image, 5),
        Err(DataError::UnsupportedChannels(5))
    ));
}
