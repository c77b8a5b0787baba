//! 飞行器规则引擎
//!
//! 对飞行器设计快照求值参赛规则，支持：
//! - 六种比较操作符与 float/int/string 三种值转换
//! - 零件、模块、资源与整机聚合值上的叶子条件
//! - not/and/or/xor 组合条件
//! - 规则编译期的逐参数校验
//! - 按输入顺序汇总失败规则的评估结论

pub mod compiler;
pub mod conditions;
pub mod craft;
pub mod error;
pub mod executor;
pub mod models;
pub mod operators;
pub mod params;

pub use compiler::{CompiledRule, RuleCompiler, RuleSet, Strategy};
pub use conditions::Condition;
pub use craft::{Craft, Module, Part, PropertyBag, Resource, ScalarValue, ShipLocation};
pub use error::{ParamError, ParamErrorKind, Result, RuleError};
pub use executor::RuleExecutor;
pub use models::{Rule, RuleFailure, Verdict};
pub use operators::{Comparator, Operator, SetMatcher, ValueTransform};
