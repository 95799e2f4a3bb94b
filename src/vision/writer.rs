/*
 * @Author       : 老董
 * @Date         : 2026-02-12
 * @Description  : 将一批生成图拼成网格并保存为PNG
 */

use std::path::Path;

use image::ColorType;

use super::{ImageType, VisionError};
use crate::tensor::Tensor;

/// 样本图的保存者
///
/// 训练循环在每个 epoch 结束时调用一次；测试中可替换为只记录调用的实现。
pub trait SampleWriter {
    /// * `images` - `[N, C, H, W]`，取值[0, 255]
    /// * `width` - 网格每行的图像个数
    fn write_samples(&mut self, images: &Tensor, path: &Path, width: usize)
    -> Result<(), VisionError>;
}

/// 把整批图像拼成一张`ceil(N / width)`行、`width`列的PNG网格图，空位填黑
#[derive(Debug, Default, Clone, Copy)]
pub struct PngGridWriter;

impl PngGridWriter {
    pub const fn new() -> Self {
        Self
    }

    /// 拼接网格，返回（HWC 排列的像素, 画布宽, 画布高, 图像类型）
    pub fn compose_grid(
        images: &Tensor,
        width: usize,
    ) -> Result<(Vec<u8>, usize, usize, ImageType), VisionError> {
        let &[n, c, h, w] = images.shape() else {
            return Err(VisionError::InvalidShape(images.shape().to_vec()));
        };
        if width == 0 {
            return Err(VisionError::ZeroGridWidth);
        }
        let image_type = ImageType::from_channels(c)?;

        let rows = n.div_ceil(width);
        let (canvas_w, canvas_h) = (width * w, rows * h);
        let mut canvas = vec![0u8; canvas_w * canvas_h * c];
        let data = images.data_as_slice();

        for idx in 0..n {
            let (top, left) = ((idx / width) * h, (idx % width) * w);
            for ch in 0..c {
                let plane = &data[(idx * c + ch) * h * w..(idx * c + ch + 1) * h * w];
                for y in 0..h {
                    for x in 0..w {
                        let pixel = plane[y * w + x].round().clamp(0.0, 255.0) as u8;
                        canvas[((top + y) * canvas_w + left + x) * c + ch] = pixel;
                    }
                }
            }
        }
        Ok((canvas, canvas_w, canvas_h, image_type))
    }
}

impl SampleWriter for PngGridWriter {
    fn write_samples(
        &mut self,
        images: &Tensor,
        path: &Path,
        width: usize,
    ) -> Result<(), VisionError> {
        let (canvas, canvas_w, canvas_h, image_type) = Self::compose_grid(images, width)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| VisionError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let color_type = match image_type {
            ImageType::Luma => ColorType::L8,
            ImageType::Rgb => ColorType::Rgb8,
            ImageType::Rgba => ColorType::Rgba8,
        };
        image::save_buffer(
            path,
            &canvas,
            canvas_w as u32,
            canvas_h as u32,
            color_type,
        )?;
        tracing::info!("样本图已保存至{}", path.display());
        Ok(())
    }
}

/// 将生成器输出截断到[0, 1]并放缩到[0, 255]
pub fn denormalize(tensor: &Tensor) -> Tensor {
    tensor.clamp(0.0, 1.0) * 255.0
}
