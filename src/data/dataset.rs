/*
 * @Author       : 老董
 * @Date         : 2026-02-10
 * @Description  : PairedDataset - 成对的（彩色, 灰度）图像数据集
 */

use std::fs;
use std::path::{Path, PathBuf};

use super::DataError;
use super::transforms::{color_image_to_tensor, gray_image_to_tensor};
use crate::tensor::Tensor;

/// 成对的图像数据集
///
/// - `color`: `[S, C, 28, 28]`，取值 [0, 1]
/// - `gray`: `[S, 1, 14, 14]`，取值 [0, 1]
///
/// 第 i 个彩色样本与第 i 个灰度样本一一对应。
#[derive(Debug, Clone)]
pub struct PairedDataset {
    color: Tensor,
    gray: Tensor,
    len: usize,
}

impl PairedDataset {
    /// 由已解码的张量创建数据集，两者须为 4 维且样本数一致
    pub fn new(color: Tensor, gray: Tensor) -> Result<Self, DataError> {
        for t in [&color, &gray] {
            if t.dimension() != 4 {
                return Err(DataError::ShapeMismatch {
                    expected: vec![0, 0, 0, 0],
                    got: t.shape().to_vec(),
                });
            }
        }
        let len = color.shape()[0];
        if gray.shape()[0] != len {
            return Err(DataError::ShapeMismatch {
                expected: vec![len],
                got: vec![gray.shape()[0]],
            });
        }
        Ok(Self { color, gray, len })
    }

    /// 从两个目录中读取按文件名配对的图像，只解码排序后下标位于[lower, upper)的文件
    ///
    /// `upper`超过文件个数时按文件个数截断；截断后区间为空则报错。
    pub fn from_folders(
        color_dir: impl AsRef<Path>,
        gray_dir: impl AsRef<Path>,
        channels: usize,
        lower: usize,
        upper: usize,
    ) -> Result<Self, DataError> {
        let color_dir = color_dir.as_ref();
        let gray_dir = gray_dir.as_ref();
        if !gray_dir.is_dir() {
            return Err(DataError::FileNotFound(gray_dir.to_path_buf()));
        }

        let files = sorted_files(color_dir)?;
        let upper = upper.min(files.len());
        if lower >= upper {
            return Err(DataError::EmptyRange { lower, upper });
        }

        let mut colors = Vec::with_capacity(upper - lower);
        let mut grays = Vec::with_capacity(upper - lower);
        for color_path in &files[lower..upper] {
            let gray_path = color_path
                .file_name()
                .map(|name| gray_dir.join(name))
                .filter(|p| p.is_file())
                .ok_or_else(|| DataError::Unpaired(color_path.clone()))?;

            colors.push(color_image_to_tensor(&image::open(color_path)?, channels)?);
            grays.push(gray_image_to_tensor(&image::open(&gray_path)?)?);
        }
        tracing::debug!(
            "从{}读取了{}对图像（区间[{}, {})）",
            color_dir.display(),
            colors.len(),
            lower,
            upper
        );

        Self::new(Tensor::stack(&colors)?, Tensor::stack(&grays)?)
    }

    /// 获取样本数量
    pub fn len(&self) -> usize {
        self.len
    }

    /// 检查数据集是否为空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 取[lower, upper)区间内的样本，组成新数据集
    pub fn slice(&self, lower: usize, upper: usize) -> Result<Self, DataError> {
        if lower > upper || upper > self.len {
            return Err(DataError::IndexOutOfBounds {
                index: upper.max(lower),
                len: self.len,
            });
        }
        Ok(Self {
            color: self.color.narrow_samples(lower, upper)?,
            gray: self.gray.narrow_samples(lower, upper)?,
            len: upper - lower,
        })
    }

    /// 按下标取出一个批次：(color, gray)
    pub fn batch(&self, indices: &[usize]) -> Result<(Tensor, Tensor), DataError> {
        Ok((
            self.color.select_samples(indices)?,
            self.gray.select_samples(indices)?,
        ))
    }

    pub fn color(&self) -> &Tensor {
        &self.color
    }

    pub fn gray(&self) -> &Tensor {
        &self.gray
    }

    /// 彩色样本的通道数
    pub fn channels(&self) -> usize {
        self.color.shape()[1]
    }
}

/// 目录下所有文件的路径，按文件名排序
fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>, DataError> {
    if !dir.is_dir() {
        return Err(DataError::FileNotFound(dir.to_path_buf()));
    }
    let mut files = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()?;
    files.retain(|p| p.is_file());
    files.sort();
    Ok(files)
}
