//! 条件树
//!
//! 每个条件都是飞行器快照上的纯谓词，并附带失败时的说明文字。
//! 叶子条件直接检查飞行器；组合条件按布尔逻辑组合子条件。
//!
//! 叶子条件针对的零件/模块/资源不存在时视为通过：
//! 关于设计中未使用零件的规则不会阻止该设计参赛。

use crate::craft::{Craft, PropertyBag, ScalarValue, ShipLocation};
use crate::operators::{Comparator, Operator, SetMatcher};

/// 单轴尺寸检查
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBound {
    pub operator: Operator,
    pub limit: f64,
}

/// 聚合值（费用/质量/分数）检查
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateBound {
    pub operator: Operator,
    pub value: f64,
}

/// 模块/资源属性检查
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyCheck {
    /// 零件基础名
    pub part: String,
    /// 模块或资源名称片段
    pub target: String,
    pub key: String,
    pub comparator: Comparator,
    pub value: ScalarValue,
}

impl PropertyCheck {
    /// 任一匹配的属性集合满足比较即通过
    fn any_satisfies<'a>(&self, mut bags: impl Iterator<Item = &'a PropertyBag>) -> bool {
        bags.any(|bag| {
            bag.get(&self.key)
                .is_some_and(|actual| self.comparator.compare(&actual, &self.value))
        })
    }

    fn describe(&self, kind: &str) -> String {
        format!(
            "part ({}) with {} ({}) must have property ({}) with value {} {}",
            self.part, kind, self.target, self.key, self.comparator.operator, self.value
        )
    }
}

/// 编译后的条件
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    ShipLocation(ShipLocation),
    ShipSize([AxisBound; 3]),
    PartCount { operator: Operator, value: i64 },
    PartExists { part: String },
    PartNotExists { part: String },
    PartSetContains { parts: Vec<String>, matcher: SetMatcher },
    PartSetCount { parts: Vec<String>, operator: Operator, value: i64 },
    ModuleProperty(PropertyCheck),
    ResourceProperty(PropertyCheck),
    ShipCost(AggregateBound),
    ShipMass(AggregateBound),
    ShipPoints(AggregateBound),
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Xor(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn not(child: Condition) -> Self {
        Self::Not(Box::new(child))
    }

    pub fn and(a: Condition, b: Condition) -> Self {
        Self::And(Box::new(a), Box::new(b))
    }

    pub fn or(a: Condition, b: Condition) -> Self {
        Self::Or(Box::new(a), Box::new(b))
    }

    pub fn xor(a: Condition, b: Condition) -> Self {
        Self::Xor(Box::new(a), Box::new(b))
    }

    /// 条件对飞行器是否成立
    pub fn apply(&self, craft: &Craft) -> bool {
        match self {
            Self::ShipLocation(location) => craft.ship_location == *location,
            Self::ShipSize(bounds) => craft
                .ship_size
                .iter()
                .zip(bounds)
                .all(|(size, bound)| bound.operator.apply(size, &bound.limit)),
            Self::PartCount { operator, value } => {
                operator.apply(&(craft.parts.len() as i64), value)
            }
            Self::PartExists { part } => craft.parts_matching(part).next().is_some(),
            Self::PartNotExists { part } => craft.parts_matching(part).next().is_none(),
            Self::PartSetContains { parts, matcher } => match matcher {
                SetMatcher::None => !parts.iter().any(|p| craft.contains_base(p)),
                SetMatcher::Any => parts.iter().any(|p| craft.contains_base(p)),
                SetMatcher::All => parts.iter().all(|p| craft.contains_base(p)),
            },
            Self::PartSetCount {
                parts,
                operator,
                value,
            } => {
                let total: i64 = parts.iter().map(|p| i64::from(craft.count_of(p))).sum();
                operator.apply(&total, value)
            }
            Self::ModuleProperty(check) => {
                let mut parts = craft.parts_matching(&check.part).peekable();
                if parts.peek().is_none() {
                    return true;
                }
                let mut modules = parts
                    .flat_map(|p| &p.modules)
                    .filter(|m| m.name_contains(&check.target))
                    .peekable();
                if modules.peek().is_none() {
                    return true;
                }
                check.any_satisfies(modules)
            }
            Self::ResourceProperty(check) => {
                let mut parts = craft.parts_matching(&check.part).peekable();
                if parts.peek().is_none() {
                    return true;
                }
                let mut resources = parts
                    .flat_map(|p| &p.resources)
                    .filter(|r| r.name_contains(&check.target))
                    .peekable();
                if resources.peek().is_none() {
                    return true;
                }
                check.any_satisfies(resources)
            }
            Self::ShipCost(bound) => bound.operator.apply(&craft.cost, &bound.value),
            Self::ShipMass(bound) => bound.operator.apply(&craft.mass, &bound.value),
            Self::ShipPoints(bound) => bound.operator.apply(&craft.points, &bound.value),
            Self::Not(child) => !child.apply(craft),
            Self::And(a, b) => a.apply(craft) && b.apply(craft),
            Self::Or(a, b) => a.apply(craft) || b.apply(craft),
            Self::Xor(a, b) => a.apply(craft) != b.apply(craft),
        }
    }

    /// 条件不成立时展示给用户的说明
    pub fn explain(&self) -> String {
        match self {
            Self::ShipLocation(location) => {
                format!("Craft must be saved in the {}", location)
            }
            Self::ShipSize(bounds) => {
                let axes = ["x", "y", "z"]
                    .iter()
                    .zip(bounds)
                    .map(|(axis, b)| format!("{} {} {}", axis, b.operator.symbol(), b.limit))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Craft size out of bounds ({})", axes)
            }
            Self::PartCount { operator, value } => {
                format!("{} ({} {})", count_complaint(*operator), operator.symbol(), value)
            }
            Self::PartExists { part } => format!("part must exist! ({})", part),
            Self::PartNotExists { part } => format!("part must not exist! ({})", part),
            Self::PartSetContains { parts, matcher } => {
                let list = parts.join(", ");
                match matcher {
                    SetMatcher::None => format!("parts must not exist! ({})", list),
                    SetMatcher::Any => format!("parts must contain at least one of ({})", list),
                    SetMatcher::All => format!("parts must exist! ({})", list),
                }
            }
            Self::PartSetCount {
                parts,
                operator,
                value,
            } => format!(
                "{} ({} {}) from set ({})",
                count_complaint(*operator),
                operator.symbol(),
                value,
                parts.join(", ")
            ),
            Self::ModuleProperty(check) => check.describe("module"),
            Self::ResourceProperty(check) => check.describe("resource"),
            Self::ShipCost(bound) => format!("craft must cost {} {}", bound.operator, bound.value),
            Self::ShipMass(bound) => {
                format!("craft must have mass {} {}", bound.operator, bound.value)
            }
            Self::ShipPoints(bound) => {
                format!("craft must have points {} {}", bound.operator, bound.value)
            }
            Self::Not(child) => format!("not ({})", child.explain()),
            Self::And(a, b) => format!("({}) and ({})", a.explain(), b.explain()),
            Self::Or(a, b) => format!("({}) or ({})", a.explain(), b.explain()),
            Self::Xor(a, b) => format!("exactly one of ({}), ({})", a.explain(), b.explain()),
        }
    }

    /// 条件种类名称，用于日志
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ShipLocation(_) => "ship_location",
            Self::ShipSize(_) => "ship_size",
            Self::PartCount { .. } => "part_count",
            Self::PartExists { .. } => "part_exists",
            Self::PartNotExists { .. } => "part_not_exists",
            Self::PartSetContains { .. } => "part_set_contains",
            Self::PartSetCount { .. } => "part_set_count",
            Self::ModuleProperty(_) => "module_property",
            Self::ResourceProperty(_) => "resource_property",
            Self::ShipCost(_) => "ship_cost",
            Self::ShipMass(_) => "ship_mass",
            Self::ShipPoints(_) => "ship_points",
            Self::Not(_) => "not",
            Self::And(..) => "and",
            Self::Or(..) => "or",
            Self::Xor(..) => "xor",
        }
    }

    /// 组合条件中失败的叶子条件说明
    ///
    /// 叶子条件失败时返回自身说明；组合条件只向下展开会导致整体失败的子条件。
    pub fn failing_leaves(&self, craft: &Craft) -> Vec<String> {
        if self.apply(craft) {
            return Vec::new();
        }
        match self {
            Self::And(a, b) | Self::Or(a, b) => {
                let mut leaves = a.failing_leaves(craft);
                leaves.extend(b.failing_leaves(craft));
                leaves
            }
            _ => vec![self.explain()],
        }
    }
}

fn count_complaint(operator: Operator) -> &'static str {
    match operator {
        Operator::Lt | Operator::Lte => "too many parts!",
        Operator::Gt | Operator::Gte => "not enough parts!",
        Operator::Eq | Operator::Neq => "wrong number of parts!",
    }
}
