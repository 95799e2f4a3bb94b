use crate::nn::{Graph, GraphError, Init, VarActivationOps, VarLossOps, VarMatrixOps};
use crate::tensor::Tensor;

#[test]
fn test_node_names_and_display() {
    let graph = Graph::new_with_seed(42);
    let w = graph.parameter(&[2, 3], Init::Zeros, "fc_W").unwrap();
    let x = graph.input(&Tensor::ones(&[1, 2])).unwrap();
    let y = x.matmul(&w).unwrap().relu().unwrap();

    assert_eq!(w.name().unwrap(), "fc_W");
    assert_eq!(y.name().unwrap(), format!("relu_{}", y.node_id()));
    assert_eq!(y.shape().unwrap(), vec![1, 3]);

    let g = graph.inner();
    let node = g.get_node(y.node_id()).unwrap();
    assert_eq!(
        format!("{node}"),
        format!("节点[id={}, name=relu_{}, type=ReLU]", y.node_id(), y.node_id())
    );
}

#[test]
fn test_duplicate_parameter_name() {
    let graph = Graph::new();
    graph.parameter(&[1, 1], Init::Zeros, "w").unwrap();
    let result = graph.parameter(&[1, 1], Init::Zeros, "w");
    assert!(matches!(result, Err(GraphError::DuplicateNodeName(_))));
}

#[test]
fn test_ops_across_graphs_are_rejected() {
    let graph_1 = Graph::new();
    let graph_2 = Graph::new();
    let a = graph_1.input(&Tensor::ones(&[1, 2])).unwrap();
    let b = graph_2.parameter(&[2, 1], Init::Ones, "b").unwrap();
    assert!(matches!(a.matmul(&b), Err(GraphError::InvalidOperation(_))));
}

#[test]
fn test_same_seed_gives_same_parameters() {
    let init = Init::Normal { mean: 0.0, std: 1.0 };
    let a = Graph::new_with_seed(7).parameter(&[4, 4], init.clone(), "w").unwrap();
    let b = Graph::new_with_seed(7).parameter(&[4, 4], init, "w").unwrap();
    assert_eq!(a.value().unwrap(), b.value().unwrap());
}

#[test]
fn test_gradients_accumulate_until_cleared() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 1], Init::Constant(2.0), "w").unwrap();
    let x = graph.input(&Tensor::new(&[3.0], &[1, 1])).unwrap();
    let target = graph.input(&Tensor::new(&[0.0], &[1, 1])).unwrap();

    // loss = (3w)² = 36，d loss/dw = 18w = 36
    let loss = x.matmul(&w).unwrap().mse_loss(&target).unwrap();
    assert_eq!(loss.backward().unwrap(), 36.0);
    assert_eq!(w.grad().unwrap().unwrap(), Tensor::new(&[36.0], &[1, 1]));

    let loss = x.matmul(&w).unwrap().mse_loss(&target).unwrap();
    loss.backward().unwrap();
    assert_eq!(w.grad().unwrap().unwrap(), Tensor::new(&[72.0], &[1, 1]));

    graph.zero_grad();
    assert_eq!(w.grad().unwrap(), None);
}

#[test]
fn test_shared_node_receives_gradient_from_all_children() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 1], Init::Constant(1.0), "w").unwrap();
    let x = graph.input(&Tensor::new(&[2.0], &[1, 1])).unwrap();
    let target = graph.input(&Tensor::new(&[0.0], &[1, 1])).unwrap();

    // h = x·w 同时经两条路径到达 loss：loss = mse(h + h·w, 0)
    let h = x.matmul(&w).unwrap();
    let out = h.try_add(&h.matmul(&w).unwrap()).unwrap();
    let loss = out.mse_loss(&target).unwrap();
    loss.backward().unwrap();

    // out = 2w + 2w²，d loss/dw = 2·out·(2 + 4w) = 2·4·6 = 48
    assert_eq!(w.grad().unwrap().unwrap(), Tensor::new(&[48.0], &[1, 1]));
}

#[test]
fn test_detach_stops_gradient() {
    let graph = Graph::new();
    let w1 = graph.parameter(&[1, 1], Init::Constant(1.0), "w1").unwrap();
    let w2 = graph.parameter(&[1, 1], Init::Constant(1.0), "w2").unwrap();
    let x = graph.input(&Tensor::new(&[1.0], &[1, 1])).unwrap();
    let target = graph.input(&Tensor::new(&[0.0], &[1, 1])).unwrap();

    let h = x.matmul(&w1).unwrap().detach().unwrap();
    assert!(h.is_detached().unwrap());
    let loss = h.matmul(&w2).unwrap().mse_loss(&target).unwrap();
    loss.backward().unwrap();

    assert_eq!(w1.grad().unwrap(), None);
    assert!(w2.grad().unwrap().is_some());
}

#[test]
fn test_backward_requires_scalar_loss() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 2], Init::Ones, "w").unwrap();
    assert!(matches!(
        w.relu().unwrap().backward(),
        Err(GraphError::InvalidOperation(_))
    ));
}

#[test]
fn test_no_grad_scope_restores_mode_and_detaches_nodes() {
    let graph = Graph::new();
    let w = graph.parameter(&[1, 1], Init::Ones, "w").unwrap();
    let x = graph.input(&Tensor::new(&[1.0], &[1, 1])).unwrap();

    let y = graph.no_grad_scope(|g| {
        assert!(!g.is_train_mode());
        x.matmul(&w).unwrap()
    });
    assert!(graph.is_train_mode());
    assert!(y.is_detached().unwrap());
    assert_eq!(y.item().unwrap(), 1.0);

    graph.eval();
    graph.no_grad_scope(|_| {});
    assert!(!graph.is_train_mode());
}

#[test]
fn test_release_intermediate_nodes_keeps_parameters() {
    let graph = Graph::new();
    let w = graph.parameter(&[2, 2], Init::Ones, "w").unwrap();
    let x = graph.input(&Tensor::ones(&[1, 2])).unwrap();
    let y = x.matmul(&w).unwrap().tanh().unwrap();
    assert_eq!(graph.nodes_count(), 4);

    graph.release_intermediate_nodes();
    assert_eq!(graph.nodes_count(), 1);
    assert!(w.value().is_ok());
    assert!(matches!(y.value(), Err(GraphError::NodeNotFound(_))));
}
