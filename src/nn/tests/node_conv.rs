use approx::assert_abs_diff_eq;

use super::{check_gradients, random_tensor};
use crate::nn::{Device, Graph, GraphError, Var};
use crate::tensor::Tensor;

fn conv2d(inputs: &[Var], stride: usize, padding: usize) -> Var {
    inputs[0]
        .derive(|g| {
            g.new_conv2d_node(
                inputs[0].node_id(),
                inputs[1].node_id(),
                (stride, stride),
                (padding, padding),
                None,
            )
        })
        .unwrap()
}

fn conv_transpose2d(inputs: &[Var], stride: usize, padding: usize) -> Var {
    inputs[0]
        .derive(|g| {
            g.new_conv_transpose2d_node(
                inputs[0].node_id(),
                inputs[1].node_id(),
                (stride, stride),
                (padding, padding),
                None,
            )
        })
        .unwrap()
}

#[test]
fn test_conv2d_forward_value() {
    let graph = Graph::new();
    let x = graph
        .input(&Tensor::new(&[1., 2., 3., 4., 5., 6., 7., 8., 9.], &[1, 1, 3, 3]))
        .unwrap();
    let k = graph
        .parameter_with_value(&Tensor::ones(&[1, 1, 2, 2]), "k")
        .unwrap();
    let y = conv2d(&[x, k], 1, 0);
    assert_eq!(
        y.value().unwrap(),
        Tensor::new(&[12., 16., 24., 28.], &[1, 1, 2, 2])
    );
}

#[test]
fn test_conv_transpose2d_forward_value() {
    let graph = Graph::new();
    let x = graph
        .input(&Tensor::new(&[1., 2., 3., 4.], &[1, 1, 2, 2]))
        .unwrap();
    let k = graph
        .parameter_with_value(&Tensor::ones(&[1, 1, 2, 2]), "k")
        .unwrap();
    let y = conv_transpose2d(&[x, k], 1, 0);
    assert_eq!(
        y.value().unwrap(),
        Tensor::new(&[1., 3., 2., 4., 10., 6., 3., 7., 4.], &[1, 1, 3, 3])
    );
}

#[test]
fn test_conv_output_sizes() {
    let graph = Graph::new();
    // 判别器首层：28 -> 14（k5 s2 p2）
    let x = graph.input(&Tensor::zeros(&[2, 3, 28, 28])).unwrap();
    let k = graph
        .parameter_with_value(&Tensor::zeros(&[8, 3, 5, 5]), "k1")
        .unwrap();
    assert_eq!(conv2d(&[x, k], 2, 2).shape().unwrap(), vec![2, 8, 14, 14]);

    // 生成器上采样：4 -> 7（k5）-> 14（k6）
    let x = graph.input(&Tensor::zeros(&[2, 32, 4, 4])).unwrap();
    let k = graph
        .parameter_with_value(&Tensor::zeros(&[32, 16, 5, 5]), "k2")
        .unwrap();
    assert_eq!(
        conv_transpose2d(&[x, k], 2, 2).shape().unwrap(),
        vec![2, 16, 7, 7]
    );
    let x = graph.input(&Tensor::zeros(&[2, 16, 7, 7])).unwrap();
    let k = graph
        .parameter_with_value(&Tensor::zeros(&[16, 8, 6, 6]), "k3")
        .unwrap();
    assert_eq!(
        conv_transpose2d(&[x, k], 2, 2).shape().unwrap(),
        vec![2, 8, 14, 14]
    );
}

#[test]
fn test_conv2d_channel_mismatch() {
    let graph = Graph::new();
    let x = graph.input(&Tensor::zeros(&[1, 2, 5, 5])).unwrap();
    let k = graph
        .parameter_with_value(&Tensor::zeros(&[4, 3, 3, 3]), "k")
        .unwrap();
    let result = x.derive(|g| g.new_conv2d_node(x.node_id(), k.node_id(), (1, 1), (0, 0), None));
    assert!(matches!(result, Err(GraphError::ShapeMismatch { .. })));
}

#[test]
fn test_conv2d_gradients() {
    let x = random_tensor(&[2, 2, 5, 5], 11);
    let k = random_tensor(&[3, 2, 3, 3], 12);
    let target = random_tensor(&[2, 3, 3, 3], 13);
    check_gradients(&[x, k], &target, |v| conv2d(v, 2, 1), 1e-2, 1e-2);
}

#[test]
fn test_conv_transpose2d_gradients() {
    let x = random_tensor(&[2, 2, 3, 3], 21);
    let k = random_tensor(&[2, 3, 4, 4], 22);
    let target = random_tensor(&[2, 3, 6, 6], 23);
    check_gradients(&[x, k], &target, |v| conv_transpose2d(v, 2, 1), 1e-2, 1e-2);
}

#[test]
fn test_channel_bias_add_gradients() {
    let x = random_tensor(&[2, 3, 2, 2], 31);
    let b = random_tensor(&[1, 3], 32);
    let target = random_tensor(&[2, 3, 2, 2], 33);
    check_gradients(
        &[x, b],
        &target,
        |v| {
            v[0].derive(|g| g.new_channel_bias_add_node(v[0].node_id(), v[1].node_id(), None))
                .unwrap()
        },
        1e-2,
        1e-2,
    );
}

#[test]
fn test_batch_norm_gradients() {
    let x = random_tensor(&[3, 2, 2, 2], 41);
    let gamma = random_tensor(&[1, 2], 42);
    let beta = random_tensor(&[1, 2], 43);
    let target = random_tensor(&[3, 2, 2, 2], 44);
    check_gradients(
        &[x, gamma, beta],
        &target,
        |v| {
            v[0].derive(|g| {
                g.new_batch_norm2d_node(
                    v[0].node_id(),
                    v[1].node_id(),
                    v[2].node_id(),
                    1e-5,
                    None,
                    None,
                )
            })
            .unwrap()
        },
        1e-3,
        1e-2,
    );
}

#[test]
fn test_batch_norm_normalizes_each_channel() {
    let graph = Graph::new();
    let x = graph.input(&random_tensor(&[4, 2, 3, 3], 51)).unwrap();
    let gamma = graph.parameter_with_value(&Tensor::ones(&[1, 2]), "gamma").unwrap();
    let beta = graph.parameter_with_value(&Tensor::zeros(&[1, 2]), "beta").unwrap();
    let y = x
        .derive(|g| {
            g.new_batch_norm2d_node(x.node_id(), gamma.node_id(), beta.node_id(), 1e-5, None, None)
        })
        .unwrap();
    let value = y.value().unwrap();
    let data = value.data_as_slice();
    for c in 0..2 {
        let channel = (0..4)
            .flat_map(|n| data[(n * 2 + c) * 9..(n * 2 + c + 1) * 9].to_vec())
            .collect::<Vec<_>>();
        let mean = channel.iter().sum::<f32>() / channel.len() as f32;
        let var = channel.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / channel.len() as f32;
        assert_abs_diff_eq!(mean, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(var, 1.0, epsilon = 1e-3);
    }
}

#[test]
fn test_parallel_and_serial_kernels_agree() {
    let x = random_tensor(&[4, 2, 5, 5], 61);
    let k = random_tensor(&[3, 2, 3, 3], 62);
    let run = |device: Device| {
        let graph = Graph::new();
        graph.set_device(device);
        let x = graph.input(&x).unwrap();
        let k = graph.parameter_with_value(&k, "k").unwrap();
        conv2d(&[x, k], 1, 1).value().unwrap()
    };
    let serial = run(Device::Cpu);
    let parallel = run(Device::Accelerator);
    for (a, b) in serial.data_as_slice().iter().zip(parallel.data_as_slice()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    }
}
