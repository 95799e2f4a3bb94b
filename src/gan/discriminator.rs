/*
 * @Author       : 老董
 * @Date         : 2026-02-14
 * @Description  : 判别器：28×28彩色图 → 为真的概率
 */

use crate::nn::{
    BatchNorm2d, Conv2d, Graph, GraphError, Linear, Module, Var, VarActivationOps, VarShapeOps,
};

/// 彩色图的边长
pub const COLOR_SIDE: usize = 28;
const LEAKY_SLOPE: f32 = 0.2;

/// 判别器
///
/// ```text
/// [N,C,28,28]
///   → conv_1(C → dim/4, k5)         + LeakyReLU(0.2)  28 → 14
///   → conv_2(dim/4 → dim/2, k5) + BN + LeakyReLU(0.2) 14 → 7
///   → conv_3(dim/2 → dim, k5)   + BN + LeakyReLU(0.2) 7 → 4
///   → flatten [N, 16·dim] → fc(16·dim → 1) → sigmoid → [N]
/// ```
pub struct Discriminator {
    conv_1: Conv2d,
    conv_2: Conv2d,
    conv_2_bn: BatchNorm2d,
    conv_3: Conv2d,
    conv_3_bn: BatchNorm2d,
    fc: Linear,
    channels: usize,
}

impl Discriminator {
    pub fn new(graph: &Graph, dim: usize, channels: usize) -> Result<Self, GraphError> {
        Ok(Self {
            conv_1: Conv2d::new(
                graph,
                channels,
                dim / 4,
                (5, 5),
                (2, 2),
                (2, 2),
                "d_conv_1",
            )?,
            conv_2: Conv2d::new(
                graph,
                dim / 4,
                dim / 2,
                (5, 5),
                (2, 2),
                (2, 2),
                "d_conv_2",
            )?,
            conv_2_bn: BatchNorm2d::new(graph, dim / 2, "d_conv_2_bn")?,
            conv_3: Conv2d::new(
                graph,
                dim / 2,
                dim,
                (5, 5),
                (2, 2),
                (2, 2),
                "d_conv_3",
            )?,
            conv_3_bn: BatchNorm2d::new(graph, dim, "d_conv_3_bn")?,
            // 输入尺寸变化时须同步修改
            fc: Linear::new(graph, dim * 4 * 4, 1, "d_fc")?,
            channels,
        })
    }

    /// `image`须为`[N, C, 28, 28]`，输出`[N]`
    pub fn forward(&self, image: &Var) -> Result<Var, GraphError> {
        let shape = image.shape()?;
        let n = match shape.as_slice() {
            &[n, c, COLOR_SIDE, COLOR_SIDE] if c == self.channels => n,
            _ => {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![
                        shape.first().copied().unwrap_or(0),
                        self.channels,
                        COLOR_SIDE,
                        COLOR_SIDE,
                    ],
                    got: shape.clone(),
                    message: "判别器的输入尺寸与全连接层的输入宽度绑定".to_string(),
                });
            }
        };

        let x = self.conv_1.forward(image)?.leaky_relu(LEAKY_SLOPE)?;
        let x = self
            .conv_2_bn
            .forward(&self.conv_2.forward(&x)?)?
            .leaky_relu(LEAKY_SLOPE)?;
        let x = self
            .conv_3_bn
            .forward(&self.conv_3.forward(&x)?)?
            .leaky_relu(LEAKY_SLOPE)?;
        self.fc.forward(&x.flatten()?)?.sigmoid()?.reshape(&[n])
    }

    pub const fn channels(&self) -> usize {
        self.channels
    }
}

impl Module for Discriminator {
    fn parameters(&self) -> Vec<Var> {
        [
            self.conv_1.parameters(),
            self.conv_2.parameters(),
            self.conv_2_bn.parameters(),
            self.conv_3.parameters(),
            self.conv_3_bn.parameters(),
            self.fc.parameters(),
        ]
        .concat()
    }
}
