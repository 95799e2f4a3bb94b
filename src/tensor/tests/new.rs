use crate::errors::TensorError;
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn test_new_and_properties() {
    let tensor = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    assert_eq!(tensor.shape(), &[2, 3]);
    assert_eq!(tensor.dimension(), 2);
    assert_eq!(tensor.size(), 6);
    assert!(!tensor.is_scalar());
    assert_eq!(tensor.number(), None);
    assert_eq!(tensor.data_as_slice(), &[1., 2., 3., 4., 5., 6.]);

    let scalar = Tensor::new(&[7.], &[1, 1]);
    assert!(scalar.is_scalar());
    assert_eq!(scalar.number(), Some(7.));
}

#[test]
fn test_try_new_with_mismatched_shape() {
    let result = Tensor::try_new(&[1., 2., 3.], &[2, 2]);
    assert_eq!(
        result,
        Err(TensorError::DataShapeMismatch {
            data_len: 3,
            shape: vec![2, 2],
            expected: 4,
        })
    );
}

#[test]
#[should_panic(expected = "数据长度3与形状[2, 2]")]
fn test_new_panics_with_mismatched_shape() {
    Tensor::new(&[1., 2., 3.], &[2, 2]);
}

#[test]
fn test_random_tensors_are_reproducible_with_same_seed() {
    let mut rng_1 = StdRng::seed_from_u64(42);
    let mut rng_2 = StdRng::seed_from_u64(42);
    let a = Tensor::normal_with_rng(0., 1., &[3, 5], &mut rng_1);
    let b = Tensor::normal_with_rng(0., 1., &[3, 5], &mut rng_2);
    assert_eq!(a, b);

    let u = Tensor::uniform_with_rng(-0.5, 0.5, &[1000], &mut rng_1);
    assert!(u.data_as_slice().iter().all(|x| (-0.5..0.5).contains(x)));
}

#[test]
fn test_from_array_keeps_standard_layout() {
    let matrix = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let transposed = matrix.transpose().unwrap();
    assert_eq!(transposed.shape(), &[3, 2]);
    assert_eq!(transposed.data_as_slice(), &[1., 4., 2., 5., 3., 6.]);
}
