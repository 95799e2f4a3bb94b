/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 生成器：14×14灰度图 → 28×28彩色图
 */

use crate::nn::{
    BatchNorm2d, ConvTranspose2d, Graph, GraphError, Linear, Module, Var, VarActivationOps,
    VarShapeOps,
};

/// 灰度输入的边长
pub const GRAY_SIDE: usize = 14;
/// 全连接层输出被重塑成的种子特征图边长
const SEED_SIDE: usize = 4;

/// 生成器
///
/// ```text
/// [N,1,14,14] → flatten → fc(196 → 16·dim) → reshape [N,dim,4,4]
///   → deconv_1(dim → dim/2, k5)  + BN + ReLU   4 → 7
///   → deconv_2(dim/2 → dim/4, k6) + BN + ReLU  7 → 14
///   → deconv_3(dim/4 → C, k6)     + tanh       14 → 28
/// ```
pub struct Generator {
    fc: Linear,
    deconv_1: ConvTranspose2d,
    deconv_1_bn: BatchNorm2d,
    deconv_2: ConvTranspose2d,
    deconv_2_bn: BatchNorm2d,
    deconv_3: ConvTranspose2d,
    dim: usize,
    channels: usize,
}

impl Generator {
    pub fn new(graph: &Graph, dim: usize, channels: usize) -> Result<Self, GraphError> {
        Ok(Self {
            fc: Linear::new(
                graph,
                GRAY_SIDE * GRAY_SIDE,
                SEED_SIDE * SEED_SIDE * dim,
                "g_fc",
            )?,
            deconv_1: ConvTranspose2d::new(
                graph,
                dim,
                dim / 2,
                (5, 5),
                (2, 2),
                (2, 2),
                "g_deconv_1",
            )?,
            deconv_1_bn: BatchNorm2d::new(graph, dim / 2, "g_deconv_1_bn")?,
            deconv_2: ConvTranspose2d::new(
                graph,
                dim / 2,
                dim / 4,
                (6, 6),
                (2, 2),
                (2, 2),
                "g_deconv_2",
            )?,
            deconv_2_bn: BatchNorm2d::new(graph, dim / 4, "g_deconv_2_bn")?,
            deconv_3: ConvTranspose2d::new(
                graph,
                dim / 4,
                channels,
                (6, 6),
                (2, 2),
                (2, 2),
                "g_deconv_3",
            )?,
            dim,
            channels,
        })
    }

    /// `gray`须为`[N, 1, 14, 14]`，否则在建立任何节点之前返回`ShapeMismatch`
    pub fn forward(&self, gray: &Var) -> Result<Var, GraphError> {
        let shape = gray.shape()?;
        let n = match shape.as_slice() {
            &[n, 1, GRAY_SIDE, GRAY_SIDE] => n,
            _ => {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![shape.first().copied().unwrap_or(0), 1, GRAY_SIDE, GRAY_SIDE],
                    got: shape.clone(),
                    message: "生成器的输入须为14×14的单通道灰度图".to_string(),
                });
            }
        };

        let x = self
            .fc
            .forward(&gray.flatten()?)?
            .reshape(&[n, self.dim, SEED_SIDE, SEED_SIDE])?;
        let x = self.deconv_1_bn.forward(&self.deconv_1.forward(&x)?)?.relu()?;
        let x = self.deconv_2_bn.forward(&self.deconv_2.forward(&x)?)?.relu()?;
        self.deconv_3.forward(&x)?.tanh()
    }

    pub const fn dim(&self) -> usize {
        self.dim
    }

    pub const fn channels(&self) -> usize {
        self.channels
    }

    /// 两个批归一化层，供检查滑动统计量
    pub fn batch_norms(&self) -> [&BatchNorm2d; 2] {
        [&self.deconv_1_bn, &self.deconv_2_bn]
    }
}

impl Module for Generator {
    fn parameters(&self) -> Vec<Var> {
        [
            self.fc.parameters(),
            self.deconv_1.parameters(),
            self.deconv_1_bn.parameters(),
            self.deconv_2.parameters(),
            self.deconv_2_bn.parameters(),
            self.deconv_3.parameters(),
        ]
        .concat()
    }
}
