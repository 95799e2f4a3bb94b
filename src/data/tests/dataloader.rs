use super::indexed_dataset;
use crate::data::DataLoader;

/// 批次中各样本的下标（每个样本的像素值即其下标）
fn sample_ids(gray: &crate::tensor::Tensor) -> Vec<usize> {
    (0..gray.shape()[0]).map(|i| gray[[i, 0, 0, 0]] as usize).collect()
}

#[test]
fn test_dataloader_basic() {
    let loader = DataLoader::new(indexed_dataset(5, 3), 2);
    assert_eq!(loader.len(), 5);
    assert_eq!(loader.num_batches(), 3);

    let batches = loader.iter().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(batches.len(), 3);
    assert_eq!(batches[0].0.shape(), &[2, 3, 28, 28]);
    assert_eq!(batches[0].1.shape(), &[2, 1, 14, 14]);
    assert_eq!(batches[2].0.shape()[0], 1);
    assert_eq!(sample_ids(&batches[1].1), vec![2, 3]);
}

#[test]
fn test_dataloader_drop_last() {
    let loader = DataLoader::new(indexed_dataset(5, 1), 2).drop_last(true);
    assert_eq!(loader.num_batches(), 2);
    assert_eq!(loader.iter().count(), 2);
}

#[test]
fn test_dataloader_shuffle_keeps_pairs_together() {
    let loader = DataLoader::new(indexed_dataset(8, 3), 3).shuffle(true).seed(42);
    let again = DataLoader::new(indexed_dataset(8, 3), 3).shuffle(true).seed(42);

    let mut seen = Vec::new();
    for (batch, other) in loader.iter().zip(again.iter()) {
        let (color, gray) = batch.unwrap();
        let (_, other_gray) = other.unwrap();
        assert_eq!(gray, other_gray);
        for (i, id) in sample_ids(&gray).into_iter().enumerate() {
            assert_eq!(color[[i, 2, 27, 27]] as usize, id);
            seen.push(id);
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..8).collect::<Vec<_>>());
}

#[test]
#[should_panic(expected = "batch_size 必须大于 0")]
fn test_dataloader_zero_batch_size() {
    DataLoader::new(indexed_dataset(1, 1), 0);
}
