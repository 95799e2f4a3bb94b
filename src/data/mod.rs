//! 数据加载模块
//!
//! 提供成对（彩色, 灰度）图像数据集的读取、变换和批处理功能。
//!
//! # 主要组件
//!
//! - [`PairedDataset`]: 按文件名配对的彩色图/灰度图数据集
//! - [`DataLoader`]: `PyTorch` 风格的数据批量加载器
//! - [`transforms`]: 图像到张量的变换（缩放、通道转换、归一化到 [0, 1]）
//! - [`DataError`]: 数据加载错误类型
//!
//! # 使用示例
//!
//! ```ignore
//! use colorize_gan::data::{DataLoader, PairedDataset};
//!
//! let dataset = PairedDataset::from_folders("/data/Cats_color_32", "/data/Cats_B&W_32", 3, 0, 18000)?;
//! let loader = DataLoader::new(dataset, 100).shuffle(true);
//!
//! for batch in loader.iter() {
//!     let (color, gray) = batch?;
//!     // ...
//! }
//! ```

mod dataloader;
mod dataset;
pub mod error;
pub mod transforms;

#[cfg(test)]
mod tests;

// Re-exports
pub use dataloader::{DataLoader, DataLoaderIterator};
pub use dataset::PairedDataset;
pub use error::DataError;
