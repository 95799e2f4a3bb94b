use super::random_batch;
use crate::gan::{Discriminator, Generator};
use crate::nn::{Graph, GraphError, Module};

#[test]
fn test_generator_output_shape_and_range() {
    let graph = Graph::new_with_seed(1);
    let generator = Generator::new(&graph, 8, 3).unwrap();
    assert_eq!(generator.num_params(), 12);

    for n in [1, 3] {
        let (_, gray) = random_batch(n, 3, n as u64);
        let output = generator.forward(&graph.input(&gray).unwrap()).unwrap().value().unwrap();
        assert_eq!(output.shape(), &[n, 3, 28, 28]);
        assert!(output.data_as_slice().iter().all(|v| (-1.0..=1.0).contains(v)));
    }
}

#[test]
fn test_discriminator_output_shape_and_range() {
    let graph = Graph::new_with_seed(2);
    let discriminator = Discriminator::new(&graph, 8, 4).unwrap();
    assert_eq!(discriminator.num_params(), 12);

    for n in [1, 4] {
        let (color, _) = random_batch(n, 4, n as u64);
        let output = discriminator
            .forward(&graph.input(&color).unwrap())
            .unwrap()
            .value()
            .unwrap();
        assert_eq!(output.shape(), &[n]);
        assert!(output.data_as_slice().iter().all(|&p| p > 0.0 && p < 1.0));
    }
}

#[test]
fn test_networks_reject_wrong_input_size() {
    let graph = Graph::new();
    let generator = Generator::new(&graph, 8, 3).unwrap();
    let discriminator = Discriminator::new(&graph, 8, 3).unwrap();
    let nodes_before = graph.nodes_count();

    let (color, gray) = random_batch(2, 3, 0);
    let result = generator.forward(&graph.input(&color).unwrap());
    assert!(matches!(result, Err(GraphError::ShapeMismatch { .. })));

    let result = discriminator.forward(&graph.input(&gray).unwrap());
    assert!(matches!(result, Err(GraphError::ShapeMismatch { .. })));

    let (rgba, _) = random_batch(2, 4, 0);
    let result = discriminator.forward(&graph.input(&rgba).unwrap());
    assert!(matches!(result, Err(GraphError::ShapeMismatch { .. })));

    // 只多出三个输入节点
    assert_eq!(graph.nodes_count(), nodes_before + 3);
}

#[test]
fn test_forward_is_deterministic_without_updates() {
    let graph = Graph::new_with_seed(3);
    let generator = Generator::new(&graph, 8, 3).unwrap();
    let discriminator = Discriminator::new(&graph, 8, 3).unwrap();
    let (color, gray) = random_batch(2, 3, 4);
    let gray = graph.input(&gray).unwrap();
    let color = graph.input(&color).unwrap();

    let first = generator.forward(&gray).unwrap().value().unwrap();
    let second = generator.forward(&gray).unwrap().value().unwrap();
    assert_eq!(first, second);

    let first = discriminator.forward(&color).unwrap().value().unwrap();
    let second = discriminator.forward(&color).unwrap().value().unwrap();
    assert_eq!(first, second);

    graph.eval();
    let first = generator.forward(&gray).unwrap().value().unwrap();
    let second = generator.forward(&gray).unwrap().value().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parameter_sets_are_disjoint() {
    let graph = Graph::new();
    let generator = Generator::new(&graph, 8, 3).unwrap();
    let discriminator = Discriminator::new(&graph, 8, 3).unwrap();
    let g_ids = generator.parameters().iter().map(|p| p.node_id()).collect::<Vec<_>>();
    assert!(
        discriminator
            .parameters()
            .iter()
            .all(|p| !g_ids.contains(&p.node_id()))
    );
}
