use approx::assert_abs_diff_eq;

use crate::gan::loss::{discriminator_loss, fake_labels, generator_loss, real_labels};
use crate::nn::Graph;
use crate::tensor::Tensor;

#[test]
fn test_label_sums() {
    assert_eq!(real_labels(5).sum().number(), Some(5.0));
    assert_eq!(fake_labels(5).sum().number(), Some(0.0));
    assert_eq!(real_labels(3).shape(), &[3]);
}

#[test]
fn test_generator_loss_is_reconstruction_plus_adversarial() {
    let graph = Graph::new();
    let generated = graph.input(&Tensor::new(&[0.0, 1.0], &[1, 1, 1, 2])).unwrap();
    let color = graph.input(&Tensor::new(&[1.0, 1.0], &[1, 1, 1, 2])).unwrap();
    let d_out = graph.input(&Tensor::new(&[0.5], &[1])).unwrap();
    let real = graph.input(&real_labels(1)).unwrap();

    let loss = generator_loss(&generated, &color, &d_out, &real).unwrap();
    // mse = 0.5，bce = ln2
    assert_abs_diff_eq!(loss.item().unwrap(), 0.5 + std::f32::consts::LN_2, epsilon = 1e-6);
}

#[test]
fn test_discriminator_loss_sums_both_terms() {
    let graph = Graph::new();
    let d_on_fake = graph.input(&Tensor::new(&[0.2, 0.4], &[2])).unwrap();
    let d_on_real = graph.input(&Tensor::new(&[0.9, 0.6], &[2])).unwrap();
    let fake = graph.input(&fake_labels(2)).unwrap();
    let real = graph.input(&real_labels(2)).unwrap();

    let loss = discriminator_loss(&d_on_fake, &fake, &d_on_real, &real).unwrap();
    let expected = -((0.8f32.ln() + 0.6f32.ln()) / 2.0) - ((0.9f32.ln() + 0.6f32.ln()) / 2.0);
    assert_abs_diff_eq!(loss.item().unwrap(), expected, epsilon = 1e-6);
    assert!(loss.item().unwrap() >= 0.0);
}
