use crate::errors::TensorError;
use crate::tensor::Tensor;

fn batch() -> Tensor {
    let data = (0..12).map(|v| v as f32).collect::<Vec<_>>();
    Tensor::new(&data, &[3, 1, 2, 2])
}

#[test]
fn test_index_by_position() {
    let mut tensor = batch();
    assert_eq!(tensor[[1, 0, 1, 0]], 6.);
    tensor[[2, 0, 0, 0]] = -1.;
    assert_eq!(tensor.data_as_slice()[8], -1.);
}

#[test]
fn test_select_samples_keeps_order() {
    let selected = batch().select_samples(&[2, 0]).unwrap();
    assert_eq!(selected.shape(), &[2, 1, 2, 2]);
    assert_eq!(selected.data_as_slice(), &[8., 9., 10., 11., 0., 1., 2., 3.]);

    assert_eq!(
        batch().select_samples(&[3]),
        Err(TensorError::IndexOutOfBounds { index: 3, len: 3 })
    );
}

#[test]
fn test_narrow_samples() {
    let narrowed = batch().narrow_samples(1, 3).unwrap();
    assert_eq!(narrowed.shape(), &[2, 1, 2, 2]);
    assert_eq!(narrowed[[0, 0, 0, 0]], 4.);
    assert_eq!(batch().narrow_samples(0, 0).unwrap().shape(), &[0, 1, 2, 2]);
    assert!(batch().narrow_samples(2, 4).is_err());
}

#[test]
fn test_stack() {
    let a = Tensor::new(&[1., 2.], &[1, 2]);
    let b = Tensor::new(&[3., 4.], &[1, 2]);
    let stacked = Tensor::stack(&[a.clone(), b]).unwrap();
    assert_eq!(stacked.shape(), &[2, 1, 2]);
    assert_eq!(stacked.data_as_slice(), &[1., 2., 3., 4.]);

    assert!(Tensor::stack(&[a, Tensor::zeros(&[2])]).is_err());
    assert!(Tensor::stack(&[]).is_err());
}
