mod graph_basic;
mod node_conv;

use crate::nn::{Graph, Var, VarLossOps};
use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// 固定种子的标准正态随机张量
fn random_tensor(shape: &[usize], seed: u64) -> Tensor {
    let mut rng = StdRng::seed_from_u64(seed);
    Tensor::normal_with_rng(0.0, 1.0, shape, &mut rng)
}

/// 以 mse(op(inputs), target) 为损失，返回损失值与各输入的解析梯度
fn loss_and_grads<F>(inputs: &[Tensor], target: &Tensor, op: &F) -> (f32, Vec<Tensor>)
where
    F: Fn(&[Var]) -> Var,
{
    let graph = Graph::new_with_seed(0);
    let vars = inputs
        .iter()
        .enumerate()
        .map(|(i, t)| graph.parameter_with_value(t, &format!("p{i}")).unwrap())
        .collect::<Vec<_>>();
    let output = op(&vars);
    let target = graph.input(target).unwrap();
    let loss = output.mse_loss(&target).unwrap();
    let value = loss.backward().unwrap();
    let grads = vars
        .iter()
        .map(|v| {
            v.grad()
                .unwrap()
                .unwrap_or_else(|| Tensor::zeros(&v.shape().unwrap()))
        })
        .collect();
    (value, grads)
}

/// 用中心差分校验`op`对每个输入的解析梯度
fn check_gradients<F>(inputs: &[Tensor], target: &Tensor, op: F, eps: f32, tolerance: f32)
where
    F: Fn(&[Var]) -> Var,
{
    let (_, analytic) = loss_and_grads(inputs, target, &op);
    for (which, input) in inputs.iter().enumerate() {
        let base = input.to_vec();
        for i in 0..base.len() {
            let perturbed = |delta: f32| {
                let mut data = base.clone();
                data[i] += delta;
                let mut shifted = inputs.to_vec();
                shifted[which] = Tensor::new(&data, input.shape());
                loss_and_grads(&shifted, target, &op).0
            };
            let numeric = (perturbed(eps) - perturbed(-eps)) / (2.0 * eps);
            assert_abs_diff_eq!(
                analytic[which].data_as_slice()[i],
                numeric,
                epsilon = tolerance
            );
        }
    }
}
