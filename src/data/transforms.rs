//! 数据变换函数
//!
//! 将解码后的图像转为`[C, H, W]`布局、取值在 [0, 1] 的张量（相当于 torchvision 的`ToTensor`）。

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use super::DataError;
use crate::tensor::Tensor;

/// 彩色图的边长
pub const COLOR_SIZE: u32 = 28;
/// 灰度图的边长
pub const GRAY_SIZE: u32 = 14;

/// 将 0-255 像素值归一化到 0-1
pub fn to_unit_range(pixels: &[u8]) -> Vec<f32> {
    pixels.iter().map(|&p| f32::from(p) / 255.0).collect()
}

/// 将交错排列（HWC）的像素转为 CHW 布局的张量
fn hwc_to_chw(
    pixels: &[u8],
    channels: usize,
    height: usize,
    width: usize,
) -> Result<Tensor, DataError> {
    let plane = height * width;
    let mut data = vec![0.0; pixels.len()];
    for (i, value) in to_unit_range(pixels).into_iter().enumerate() {
        data[(i % channels) * plane + i / channels] = value;
    }
    Ok(Tensor::from_vec(data, &[channels, height, width])?)
}

/// 缩放到`size`×`size`并转成`channels`通道的`[C, size, size]`张量
pub fn image_to_tensor(
    image: &DynamicImage,
    channels: usize,
    size: u32,
) -> Result<Tensor, DataError> {
    let resized = if image.dimensions() == (size, size) {
        image.clone()
    } else {
        image.resize_exact(size, size, FilterType::Triangle)
    };
    let side = size as usize;
    match channels {
        1 => hwc_to_chw(resized.to_luma8().as_raw(), 1, side, side),
        3 => hwc_to_chw(resized.to_rgb8().as_raw(), 3, side, side),
        4 => hwc_to_chw(resized.to_rgba8().as_raw(), 4, side, side),
        other => Err(DataError::UnsupportedChannels(other)),
    }
}

/// 彩色目标图：`[C, 28, 28]`
pub fn color_image_to_tensor(image: &DynamicImage, channels: usize) -> Result<Tensor, DataError> {
    image_to_tensor(image, channels, COLOR_SIZE)
}

/// 灰度输入图：`[1, 14, 14]`
pub fn gray_image_to_tensor(image: &DynamicImage) -> Result<Tensor, DataError> {
    image_to_tensor(image, 1, GRAY_SIZE)
}
