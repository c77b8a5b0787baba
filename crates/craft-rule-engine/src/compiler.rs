//! 规则编译器
//!
//! 将持久化的规则（策略名 + 参数映射）编译为条件树。
//! 每种策略的参数形态固定，编译前逐个参数校验；
//! 未知策略、缺失参数、无法解析的操作符或数值都会在编译阶段报错。

use crate::conditions::{AggregateBound, AxisBound, Condition, PropertyCheck};
use crate::craft::Craft;
use crate::error::{Result, RuleCompileFailure, RuleError};
use crate::models::Rule;
use crate::operators::{Comparator, ValueTransform};
use crate::params::ParamReader;
use craft_shared::observability::metrics::record_rule_compiled;
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, instrument, warn};

pub use craft_shared::config::DEFAULT_MAX_RULES;

/// 规则策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    PartCount,
    PartExists,
    PartNotExists,
    PartSetCount,
    PartSetContains,
    FloatModuleProperty,
    IntModuleProperty,
    StringModuleProperty,
    ResourceProperty,
    ShipCost,
    ShipMass,
    ShipPoints,
    ShipSize,
    ShipLocation,
    Not,
    And,
    Or,
    Xor,
}

impl Strategy {
    pub const ALL: [Strategy; 18] = [
        Self::PartCount,
        Self::PartExists,
        Self::PartNotExists,
        Self::PartSetCount,
        Self::PartSetContains,
        Self::FloatModuleProperty,
        Self::IntModuleProperty,
        Self::StringModuleProperty,
        Self::ResourceProperty,
        Self::ShipCost,
        Self::ShipMass,
        Self::ShipPoints,
        Self::ShipSize,
        Self::ShipLocation,
        Self::Not,
        Self::And,
        Self::Or,
        Self::Xor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PartCount => "part_count",
            Self::PartExists => "part_exists",
            Self::PartNotExists => "part_not_exists",
            Self::PartSetCount => "part_set_count",
            Self::PartSetContains => "part_set_contains",
            Self::FloatModuleProperty => "float_module_property",
            Self::IntModuleProperty => "int_module_property",
            Self::StringModuleProperty => "string_module_property",
            Self::ResourceProperty => "resource_property",
            Self::ShipCost => "ship_cost",
            Self::ShipMass => "ship_mass",
            Self::ShipPoints => "ship_points",
            Self::ShipSize => "ship_size",
            Self::ShipLocation => "ship_location",
            Self::Not => "not",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
        }
    }

    /// 按名称查找策略，兼容旧的持久化名称
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "part_set_exists" => Some(Self::PartSetContains),
            "ship_type" => Some(Self::ShipLocation),
            other => Self::ALL.into_iter().find(|s| s.as_str() == other),
        }
    }

    /// 策略接受的参数键（`a|b` 表示可替换的键名）
    pub fn param_keys(self) -> &'static [&'static str] {
        match self {
            Self::PartCount => &["op", "value"],
            Self::PartExists | Self::PartNotExists => &["part"],
            Self::PartSetCount => &["parts", "op", "value"],
            Self::PartSetContains => &["parts", "matcher"],
            Self::FloatModuleProperty | Self::IntModuleProperty | Self::StringModuleProperty => {
                &["part", "mod|name", "key", "op", "value"]
            }
            Self::ResourceProperty => &["part", "res|name", "key", "op", "value"],
            Self::ShipCost | Self::ShipMass | Self::ShipPoints => &["op", "value"],
            Self::ShipSize => &["opx", "x", "opy", "y", "opz", "z"],
            Self::ShipLocation => &["location|type"],
            Self::Not => &["rule"],
            Self::And | Self::Or | Self::Xor => &["a", "b"],
        }
    }

}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 编译后的规则
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRule {
    pub rule_id: String,
    pub strategy: Strategy,
    pub condition: Condition,
    /// 编译版本号
    pub compile_version: u64,
}

impl CompiledRule {
    pub fn id(&self) -> &str {
        &self.rule_id
    }

    pub fn apply(&self, craft: &Craft) -> bool {
        self.condition.apply(craft)
    }

    pub fn explain(&self) -> String {
        self.condition.explain()
    }

    /// 失败说明：组合规则只列出导致失败的子条件
    pub fn failure_message(&self, craft: &Craft) -> String {
        let leaves = self.condition.failing_leaves(craft);
        if leaves.is_empty() {
            self.explain()
        } else {
            leaves.join("; ")
        }
    }
}

/// 整体编译通过的规则集
///
/// 只能由 `RuleCompiler::compile_rule_set` 构造，保证其中每条规则都编译成功。
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// 规则编译器
pub struct RuleCompiler {
    compile_version: u64,
    max_rules: usize,
}

impl RuleCompiler {
    pub fn new() -> Self {
        Self {
            compile_version: 0,
            max_rules: DEFAULT_MAX_RULES,
        }
    }

    /// 设置规则集规模上限
    pub fn with_max_rules(mut self, max_rules: usize) -> Self {
        self.max_rules = max_rules;
        self
    }

    pub fn max_rules(&self) -> usize {
        self.max_rules
    }

    /// 编译单条规则
    #[instrument(skip(self, rule), fields(rule_id = %rule.id, strategy = %rule.strategy))]
    pub fn compile(&mut self, rule: &Rule) -> Result<CompiledRule> {
        let result = Strategy::parse(&rule.strategy)
            .ok_or_else(|| RuleError::UnknownStrategy(rule.strategy.clone()))
            .and_then(|strategy| {
                self.build(strategy, &rule.params)
                    .map(|condition| (strategy, condition))
            });

        match result {
            Ok((strategy, condition)) => {
                self.compile_version += 1;
                record_rule_compiled(strategy.as_str(), true);
                debug!(kind = condition.kind(), "Rule compiled");
                Ok(CompiledRule {
                    rule_id: rule.id.clone(),
                    strategy,
                    condition,
                    compile_version: self.compile_version,
                })
            }
            Err(e) => {
                record_rule_compiled(metric_label(&rule.strategy), false);
                warn!(error = %e, "Rule rejected at compile time");
                Err(e)
            }
        }
    }

    /// 编译策略名 + 参数映射
    pub fn compile_condition(&self, strategy: &str, params: &Map<String, Value>) -> Result<Condition> {
        let strategy = Strategy::parse(strategy)
            .ok_or_else(|| RuleError::UnknownStrategy(strategy.to_string()))?;
        self.build(strategy, params)
    }

    /// 编译整个规则集；任一规则失败则整体拒绝并返回全部失败项
    #[instrument(skip(self, rules), fields(count = rules.len()))]
    pub fn compile_rule_set(&mut self, rules: &[Rule]) -> Result<RuleSet> {
        if rules.len() > self.max_rules {
            warn!(max = self.max_rules, "Rule set exceeds size limit");
            return Err(RuleError::RuleSetTooLarge {
                count: rules.len(),
                max: self.max_rules,
            });
        }

        let mut compiled = Vec::with_capacity(rules.len());
        let mut failures = Vec::new();
        for rule in rules {
            match self.compile(rule) {
                Ok(c) => compiled.push(c),
                Err(error) => failures.push(RuleCompileFailure {
                    rule_id: rule.id.clone(),
                    error,
                }),
            }
        }

        if !failures.is_empty() {
            warn!(failures = failures.len(), "Rule set rejected");
            return Err(RuleError::RuleSetRejected(failures));
        }
        Ok(RuleSet { rules: compiled })
    }

    /// 从 JSON 数组编译规则集
    pub fn compile_from_json(&mut self, json: &str) -> Result<RuleSet> {
        let rules: Vec<Rule> = serde_json::from_str(json)?;
        self.compile_rule_set(&rules)
    }

    fn build(&self, strategy: Strategy, params: &Map<String, Value>) -> Result<Condition> {
        let mut r = ParamReader::new(strategy.as_str(), params);

        let built = match strategy {
            Strategy::PartCount => match (r.operator("op"), r.integer("value")) {
                (Some(operator), Some(value)) => Some(Condition::PartCount { operator, value }),
                _ => None,
            },
            Strategy::PartExists => r.text("part").map(|part| Condition::PartExists { part }),
            Strategy::PartNotExists => r.text("part").map(|part| Condition::PartNotExists { part }),
            Strategy::PartSetCount => {
                match (r.part_set("parts"), r.operator("op"), r.integer("value")) {
                    (Some(parts), Some(operator), Some(value)) => Some(Condition::PartSetCount {
                        parts,
                        operator,
                        value,
                    }),
                    _ => None,
                }
            }
            Strategy::PartSetContains => match (r.part_set("parts"), r.matcher("matcher")) {
                (Some(parts), Some(matcher)) => {
                    Some(Condition::PartSetContains { parts, matcher })
                }
                _ => None,
            },
            Strategy::FloatModuleProperty => {
                property(&mut r, "mod", ValueTransform::Float).map(Condition::ModuleProperty)
            }
            Strategy::IntModuleProperty => {
                property(&mut r, "mod", ValueTransform::Int).map(Condition::ModuleProperty)
            }
            Strategy::StringModuleProperty => {
                property(&mut r, "mod", ValueTransform::Text).map(Condition::ModuleProperty)
            }
            Strategy::ResourceProperty => {
                property(&mut r, "res", ValueTransform::Float).map(Condition::ResourceProperty)
            }
            Strategy::ShipCost => aggregate(&mut r).map(Condition::ShipCost),
            Strategy::ShipMass => aggregate(&mut r).map(Condition::ShipMass),
            Strategy::ShipPoints => aggregate(&mut r).map(Condition::ShipPoints),
            Strategy::ShipSize => {
                let x = axis(&mut r, "opx", "x");
                let y = axis(&mut r, "opy", "y");
                let z = axis(&mut r, "opz", "z");
                match (x, y, z) {
                    (Some(x), Some(y), Some(z)) => Some(Condition::ShipSize([x, y, z])),
                    _ => None,
                }
            }
            Strategy::ShipLocation => {
                let key = if params.contains_key("location") {
                    "location"
                } else if params.contains_key("type") {
                    "type"
                } else {
                    "location"
                };
                r.location(key).map(Condition::ShipLocation)
            }
            Strategy::Not => self.child(&mut r, "rule").map(Condition::not),
            Strategy::And => self.pair(&mut r).map(|(a, b)| Condition::and(a, b)),
            Strategy::Or => self.pair(&mut r).map(|(a, b)| Condition::or(a, b)),
            Strategy::Xor => self.pair(&mut r).map(|(a, b)| Condition::xor(a, b)),
        };

        r.finish(built)
    }

    /// 递归编译组合规则的子规则
    fn child(&self, r: &mut ParamReader<'_>, key: &str) -> Option<Condition> {
        let (strategy, params) = r.nested(key)?;
        match self.compile_condition(strategy, params) {
            Ok(condition) => Some(condition),
            Err(e) => {
                r.nested_error(key, e);
                None
            }
        }
    }

    fn pair(&self, r: &mut ParamReader<'_>) -> Option<(Condition, Condition)> {
        let a = self.child(r, "a");
        let b = self.child(r, "b");
        a.zip(b)
    }
}

impl Default for RuleCompiler {
    fn default() -> Self {
        Self::new()
    }
}

/// 指标标签只使用已知策略名，未知输入统一归为 "unknown"
fn metric_label(strategy: &str) -> &'static str {
    Strategy::parse(strategy).map_or("unknown", Strategy::as_str)
}

fn property(r: &mut ParamReader<'_>, target_key: &str, transform: ValueTransform) -> Option<PropertyCheck> {
    let part = r.text("part");
    let target = r.text_any(&[target_key, "name"]);
    let key = r.text("key");
    let operator = r.operator("op");
    let value = r.reference("value", transform);
    match (part, target, key, operator, value) {
        (Some(part), Some(target), Some(key), Some(operator), Some(value)) => Some(PropertyCheck {
            part,
            target,
            key,
            comparator: Comparator::new(operator, transform),
            value,
        }),
        _ => None,
    }
}

fn aggregate(r: &mut ParamReader<'_>) -> Option<AggregateBound> {
    match (r.operator("op"), r.number("value")) {
        (Some(operator), Some(value)) => Some(AggregateBound { operator, value }),
        _ => None,
    }
}

fn axis(r: &mut ParamReader<'_>, op_key: &str, limit_key: &str) -> Option<AxisBound> {
    match (r.operator(op_key), r.number(limit_key)) {
        (Some(operator), Some(limit)) => Some(AxisBound { operator, limit }),
        _ => None,
    }
}
