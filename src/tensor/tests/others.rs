use approx::assert_abs_diff_eq;

use crate::errors::TensorError;
use crate::tensor::Tensor;

#[test]
fn test_sum_and_mean() {
    let tensor = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    assert_eq!(tensor.sum(), Tensor::new(&[10.], &[1]));
    assert_eq!(tensor.mean(), Tensor::new(&[2.5], &[1]));
}

#[test]
fn test_sigmoid_is_stable_for_large_inputs() {
    let tensor = Tensor::new(&[-1000., 0., 1000.], &[3]);
    let out = tensor.sigmoid();
    let out = out.data_as_slice();
    assert_abs_diff_eq!(out[0], 0., epsilon = 1e-6);
    assert_abs_diff_eq!(out[1], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(out[2], 1., epsilon = 1e-6);
}

#[test]
fn test_reshape() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let reshaped = tensor.reshape(&[3, 2]).unwrap();
    assert_eq!(reshaped.shape(), &[3, 2]);
    assert_eq!(reshaped.data_as_slice(), tensor.data_as_slice());

    assert_eq!(
        tensor.reshape(&[4, 2]),
        Err(TensorError::IncompatibleReshape {
            from: vec![2, 3],
            to: vec![4, 2],
        })
    );
}

#[test]
fn test_matmul() {
    let a = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let b = Tensor::new(&[1., 0., 0., 1., 1., 1.], &[3, 2]);
    assert_eq!(a.matmul(&b).unwrap(), Tensor::new(&[4., 5., 10., 11.], &[2, 2]));
    assert!(a.matmul(&a).is_err());
}

#[test]
fn test_sum_to_shape() {
    let grad = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert_eq!(
        grad.sum_to_shape(&[1, 3]).unwrap(),
        Tensor::new(&[5., 7., 9.], &[1, 3])
    );
    assert_eq!(
        grad.sum_to_shape(&[3]).unwrap(),
        Tensor::new(&[5., 7., 9.], &[3])
    );
    assert_eq!(
        grad.sum_to_shape(&[2, 1]).unwrap(),
        Tensor::new(&[6., 15.], &[2, 1])
    );
    assert!(grad.sum_to_shape(&[2, 2]).is_err());
}
