/*
 * @Author       : 老董
 * @Date         : 2025-01-21
 * @Description  : DataLoader - PyTorch 风格的成对图像批量加载器
 *
 * 提供统一的数据迭代 API，支持：
 * - 自动分批 (batch_size)
 * - 随机打乱 (shuffle)
 * - 丢弃不完整批次 (drop_last)
 */

use std::cell::Cell;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{DataError, PairedDataset};
use crate::tensor::Tensor;

/// DataLoader - 按批次产出`(color, gray)`
///
/// # 示例
/// ```ignore
/// let loader = DataLoader::new(dataset, 100).shuffle(true);
///
/// for batch in loader.iter() {
///     let (color, gray) = batch?;
///     trainer.train_batch(&color, &gray)?;
/// }
/// ```
pub struct DataLoader {
    dataset: PairedDataset,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    seed: Option<u64>,
    /// 已创建的迭代器个数，与种子一起决定每一轮的打乱顺序
    rounds: Cell<u64>,
}

impl DataLoader {
    /// 创建新的 DataLoader
    ///
    /// # Panics
    /// `batch_size`为 0 时
    pub fn new(dataset: PairedDataset, batch_size: usize) -> Self {
        assert!(batch_size > 0, "DataLoader: batch_size 必须大于 0");
        Self {
            dataset,
            batch_size,
            shuffle: false,
            drop_last: false,
            seed: None,
            rounds: Cell::new(0),
        }
    }

    /// 设置是否打乱数据
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    /// 设置是否丢弃最后一个不完整的批次
    pub fn drop_last(mut self, drop_last: bool) -> Self {
        self.drop_last = drop_last;
        self
    }

    /// 设置随机种子（用于 shuffle）。同一个种子下，第 k 次`iter()`的顺序是确定的
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 获取批次数量
    pub fn num_batches(&self) -> usize {
        let n = self.dataset.len();
        if self.drop_last {
            n / self.batch_size
        } else {
            n.div_ceil(self.batch_size)
        }
    }

    pub const fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// 获取数据集大小
    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    /// 检查是否为空
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub const fn dataset(&self) -> &PairedDataset {
        &self.dataset
    }

    /// 创建迭代器
    pub fn iter(&self) -> DataLoaderIterator<'_> {
        let mut indices: Vec<usize> = (0..self.dataset.len()).collect();

        let round = self.rounds.get();
        self.rounds.set(round + 1);

        if self.shuffle {
            match self.seed {
                Some(seed) => indices.shuffle(&mut StdRng::seed_from_u64(seed.wrapping_add(round))),
                None => indices.shuffle(&mut rand::thread_rng()),
            }
        }

        DataLoaderIterator {
            loader: self,
            indices,
            current_batch: 0,
        }
    }
}

/// DataLoader 迭代器
pub struct DataLoaderIterator<'a> {
    loader: &'a DataLoader,
    indices: Vec<usize>,
    current_batch: usize,
}

impl Iterator for DataLoaderIterator<'_> {
    type Item = Result<(Tensor, Tensor), DataError>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.indices.len();
        let batch_size = self.loader.batch_size;
        let start = self.current_batch * batch_size;
        if start >= n {
            return None;
        }

        let end = (start + batch_size).min(n);
        if self.loader.drop_last && end - start < batch_size {
            return None;
        }
        self.current_batch += 1;

        Some(self.loader.dataset.batch(&self.indices[start..end]))
    }
}
