/*
 * @Author       : 老董
 * @Date         : 2023-08-30 19:16:48
 * @LastEditors  : 老董
 * @LastEditTime : 2026-02-12 10:40:15
 * @Description  : 本模块提供样本图保存相关的功能。
 *                 在本模块中，不严谨地说：
 *                 1. 所谓的image/图像是指[C, H, W]布局、取值[0, 255]的张量；
 *                 2. “灰度”（图）等同于英文中luma、luminance、grey、gray的概念。
 */

mod error;
mod writer;


pub use error::VisionError;
pub use writer::{PngGridWriter, SampleWriter, denormalize};

/// 由通道数决定的图像类型
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum ImageType {
    Luma, // 单通道的灰度图
    Rgb,  // 3通道
    Rgba, // 4通道
}

impl ImageType {
    pub fn from_channels(channels: usize) -> Result<Self, VisionError> {
        match channels {
            1 => Ok(Self::Luma),
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            other => Err(VisionError::UnsupportedChannels(other)),
        }
    }

    pub const fn channels(self) -> usize {
        match self {
            Self::Luma => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}
