use crate::tensor::Tensor;

#[test]
fn test_add_with_or_without_ownership() {
    let tensor1 = Tensor::new(&[1., 2., 3.], &[3]);
    let tensor2 = Tensor::new(&[4., 5., 6.], &[3]);
    let expected = Tensor::new(&[5., 7., 9.], &[3]);

    assert_eq!(tensor1.clone() + tensor2.clone(), expected);
    assert_eq!(tensor1.clone() + &tensor2, expected);
    assert_eq!(&tensor1 + tensor2.clone(), expected);
    assert_eq!(&tensor1 + &tensor2, expected);

    assert_eq!(5. + &tensor1, Tensor::new(&[6., 7., 8.], &[3]));
    assert_eq!(&tensor1 + 5., Tensor::new(&[6., 7., 8.], &[3]));
}

#[test]
fn test_broadcast_row_vector_over_matrix() {
    let matrix = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let row = Tensor::new(&[10., 20., 30.], &[1, 3]);
    assert_eq!(
        &matrix + &row,
        Tensor::new(&[11., 22., 33., 14., 25., 36.], &[2, 3])
    );
    assert_eq!(
        &row - &matrix,
        Tensor::new(&[9., 18., 27., 6., 15., 24.], &[2, 3])
    );
}

#[test]
fn test_sub_mul_div_and_scalar_forms() {
    let a = Tensor::new(&[2., 4., 6.], &[3]);
    let b = Tensor::new(&[1., 2., 3.], &[3]);
    assert_eq!(&a - &b, Tensor::new(&[1., 2., 3.], &[3]));
    assert_eq!(&a * &b, Tensor::new(&[2., 8., 18.], &[3]));
    assert_eq!(&a / &b, Tensor::new(&[2., 2., 2.], &[3]));
    assert_eq!(1. - &b, Tensor::new(&[0., -1., -2.], &[3]));
    assert_eq!(&a / 2., Tensor::new(&[1., 2., 3.], &[3]));
    assert_eq!(-&b, Tensor::new(&[-1., -2., -3.], &[3]));
}

#[test]
#[should_panic(expected = "形状不兼容，故无法相加")]
fn test_add_with_incompatible_shapes() {
    let a = Tensor::new(&[1., 2., 3.], &[3]);
    let b = Tensor::new(&[1., 2.], &[2]);
    let _ = a + b;
}

#[test]
fn test_add_assign_and_mul_assign() {
    let mut acc = Tensor::zeros(&[2, 2]);
    acc += &Tensor::ones(&[2, 2]);
    acc += &Tensor::ones(&[2, 2]);
    acc *= 0.5;
    assert_eq!(acc, Tensor::ones(&[2, 2]));
}
