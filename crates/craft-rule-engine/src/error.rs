//! 规则引擎错误类型

use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("invalid params for strategy {strategy}: {}", join_param_errors(.errors))]
    InvalidParams {
        strategy: String,
        errors: Vec<ParamError>,
    },

    #[error("rule set rejected: {}", join_rule_failures(.0))]
    RuleSetRejected(Vec<RuleCompileFailure>),

    #[error("rule set too large: {count} rules, at most {max} allowed")]
    RuleSetTooLarge { count: usize, max: usize },

    #[error("malformed craft: {0}")]
    MalformedCraft(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RuleError {
    /// 是否属于规则编译阶段的错误
    pub fn is_compilation_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownStrategy(_)
                | Self::InvalidParams { .. }
                | Self::RuleSetRejected(_)
                | Self::RuleSetTooLarge { .. }
        )
    }
}

/// 单个参数的校验错误
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamError {
    pub param: String,
    pub kind: ParamErrorKind,
}

impl ParamError {
    pub fn new(param: impl Into<String>, kind: ParamErrorKind) -> Self {
        Self {
            param: param.into(),
            kind,
        }
    }
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.param, self.kind)
    }
}

/// 参数错误类别
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ParamErrorKind {
    Missing,
    Empty,
    NotANumber(String),
    NotAnInteger(String),
    UnknownOperator(String),
    UnknownMatcher(String),
    UnknownLocation(String),
    WrongType { expected: String, actual: String },
    EmptyPartSet,
    /// 组合规则中子规则的编译错误
    Nested(String),
}

impl fmt::Display for ParamErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "required parameter is missing"),
            Self::Empty => write!(f, "value is empty after sanitization"),
            Self::NotANumber(v) => write!(f, "'{}' is not a number", v),
            Self::NotAnInteger(v) => write!(f, "'{}' is not an integer", v),
            Self::UnknownOperator(v) => {
                write!(f, "unknown operator '{}' (expected lt, lte, gt, gte, eq, neq)", v)
            }
            Self::UnknownMatcher(v) => {
                write!(f, "unknown matcher '{}' (expected none, any, all)", v)
            }
            Self::UnknownLocation(v) => write!(f, "unknown location '{}' (expected sph, vab)", v),
            Self::WrongType { expected, actual } => {
                write!(f, "expected {}, got {}", expected, actual)
            }
            Self::EmptyPartSet => write!(f, "part set must name at least one part"),
            Self::Nested(msg) => write!(f, "{}", msg),
        }
    }
}

/// 规则集中某条规则的编译失败记录
#[derive(Debug)]
pub struct RuleCompileFailure {
    pub rule_id: String,
    pub error: RuleError,
}

impl fmt::Display for RuleCompileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.rule_id, self.error)
    }
}

fn join_param_errors(errors: &[ParamError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn join_rule_failures(failures: &[RuleCompileFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, RuleError>;
