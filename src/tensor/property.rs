/*
 * @Author       : 老董
 * @Date         : 2023-10-21 03:22:26
 * @Description  : 本类仅包含一些属性方法，不包含任何运算方法，所以不会需要用到mut
 */

use super::Tensor;
use ndarray::{ArrayD, ArrayViewD};

impl Tensor {
    pub fn view(&self) -> ArrayViewD<'_, f32> {
        self.data.view()
    }

    pub fn as_array(&self) -> &ArrayD<f32> {
        &self.data
    }

    pub fn into_array(self) -> ArrayD<f32> {
        self.data
    }

    /// 按行优先顺序访问全部元素
    pub fn data_as_slice(&self) -> &[f32] {
        self.data
            .as_slice()
            .expect("张量数据始终保持标准内存布局")
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 若为向量，`shape`可以是[n]、[1,n]、[n,1]；
    /// 若为矩阵，`shape`可以是[n,m]；
    /// 若为更高维度的数组，`shape`可以是[c,n,m,...]。
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// 张量的维（dim）数、阶（rank）数
    pub fn dimension(&self) -> usize {
        self.data.ndim()
    }

    /// 张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致。如：形状为 [1, 4]，[1, 4]和[4]是不一致的，会返回false
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量
    pub fn is_scalar(&self) -> bool {
        self.size() == 1
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f32> {
        if self.is_scalar() {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// 判断两个张量能否按NumPy规则广播
    pub fn can_broadcast_with(&self, other: &Self) -> bool {
        broadcast_shape(self.shape(), other.shape()).is_some()
    }
}

/// 计算两个形状按NumPy规则广播后的形状，不兼容时返回None
pub(crate) fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let mut out = vec![0; ndim];
    for i in 0..ndim {
        let da = if i < ndim - a.len() { 1 } else { a[i - (ndim - a.len())] };
        let db = if i < ndim - b.len() { 1 } else { b[i - (ndim - b.len())] };
        out[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(out)
}
