use std::fmt::{self, Display};

/// 张量的二元运算符
#[derive(Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    AddAssign,
    MatMul,
    SumToShape,
    Stack,
}
impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation_name = match self {
            Operator::Add => "相加",
            Operator::Sub => "相减",
            Operator::Mul => "相乘",
            Operator::Div => "相除",
            Operator::AddAssign => "自相加",
            Operator::MatMul => "矩阵相乘",
            Operator::SumToShape => "按形状求和",
            Operator::Stack => "堆叠",
        };
        write!(f, "{}", operation_name)
    }
}
