//! 规则操作符定义
//!
//! 比较操作符、值转换方式以及二者组合而成的比较器。

use crate::craft::ScalarValue;
use crate::error::ParamErrorKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 比较操作符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Neq,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Self::Lt,
        Self::Lte,
        Self::Gt,
        Self::Gte,
        Self::Eq,
        Self::Neq,
    ];

    /// 对两个同类型的值应用操作符
    pub fn apply<T: PartialOrd + ?Sized>(self, a: &T, b: &T) -> bool {
        match self {
            Self::Lt => a < b,
            Self::Lte => a <= b,
            Self::Gt => a > b,
            Self::Gte => a >= b,
            Self::Eq => a == b,
            Self::Neq => a != b,
        }
    }

    /// 用于说明文字的符号
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Lte => "≤",
            Self::Gt => ">",
            Self::Gte => "≥",
            Self::Eq => "=",
            Self::Neq => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Eq => "eq",
            Self::Neq => "neq",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Operator {
    type Err = ParamErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            _ => Err(ParamErrorKind::UnknownOperator(s.to_string())),
        }
    }
}

/// 比较前对两侧值统一应用的转换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueTransform {
    Float,
    Int,
    Text,
}

/// 转换后的值
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub enum Transformed {
    Float(f64),
    Int(i64),
    Text(String),
}

impl ValueTransform {
    /// 转换单个值；数值转换失败时返回 None
    pub fn transform(self, value: &ScalarValue) -> Option<Transformed> {
        match self {
            Self::Float => value.as_f64().map(Transformed::Float),
            Self::Int => value.as_i64().map(Transformed::Int),
            Self::Text => Some(Transformed::Text(value.as_text())),
        }
    }
}

impl fmt::Display for ValueTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Int => write!(f, "int"),
            Self::Text => write!(f, "string"),
        }
    }
}

/// 比较器：操作符 + 值转换
///
/// 不可变值，编译时构造一次；实际值与参考值都在调用时传入。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparator {
    pub operator: Operator,
    pub transform: ValueTransform,
}

impl Comparator {
    pub fn new(operator: Operator, transform: ValueTransform) -> Self {
        Self {
            operator,
            transform,
        }
    }

    pub fn float(operator: Operator) -> Self {
        Self::new(operator, ValueTransform::Float)
    }

    pub fn int(operator: Operator) -> Self {
        Self::new(operator, ValueTransform::Int)
    }

    pub fn text(operator: Operator) -> Self {
        Self::new(operator, ValueTransform::Text)
    }

    /// 比较实际值与参考值
    ///
    /// 任一侧无法按转换方式解析时视为不满足。
    pub fn compare(&self, actual: &ScalarValue, reference: &ScalarValue) -> bool {
        match (
            self.transform.transform(actual),
            self.transform.transform(reference),
        ) {
            (Some(a), Some(b)) => self.operator.apply(&a, &b),
            _ => false,
        }
    }
}

/// 零件集合匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetMatcher {
    None,
    Any,
    All,
}

impl fmt::Display for SetMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Any => write!(f, "any"),
            Self::All => write!(f, "all"),
        }
    }
}

impl FromStr for SetMatcher {
    type Err = ParamErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "any" => Ok(Self::Any),
            "all" => Ok(Self::All),
            _ => Err(ParamErrorKind::UnknownMatcher(s.to_string())),
        }
    }
}
