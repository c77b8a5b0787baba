//! 飞行器数据模型
//!
//! 由外部设计文件解析器产出的只读快照，所有条件都基于它求值。

use crate::error::{Result, RuleError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 模块/资源上的属性值（数值或字符串）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl ScalarValue {
    /// 按浮点数解读，字符串会先去除首尾空白再解析
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    /// 按整数解读，小数部分向零截断
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            Self::Number(_) => None,
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|n| n.is_finite()).map(|n| n.trunc() as i64))
            }
            Self::Bool(_) => None,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// 飞行器保存位置（两个总装厂房）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipLocation {
    /// 航天飞机机库
    #[serde(rename = "SPH", alias = "sph")]
    Sph,
    /// 火箭总装大楼
    #[serde(rename = "VAB", alias = "vab")]
    Vab,
}

impl ShipLocation {
    /// 解析规则参数中的位置标签（不区分大小写）
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "sph" => Some(Self::Sph),
            "vab" => Some(Self::Vab),
            _ => None,
        }
    }
}

impl fmt::Display for ShipLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sph => write!(f, "SPH"),
            Self::Vab => write!(f, "VAB"),
        }
    }
}

/// 模块或资源：带名称的属性集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyBag {
    pub name: String,
    #[serde(flatten)]
    pub properties: BTreeMap<String, ScalarValue>,
}

impl PropertyBag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ScalarValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// 获取属性值，`name` 键返回名称本身
    pub fn get(&self, key: &str) -> Option<ScalarValue> {
        if key == "name" {
            return Some(ScalarValue::Text(self.name.clone()));
        }
        self.properties.get(key).cloned()
    }

    /// 名称片段匹配
    pub fn name_contains(&self, fragment: &str) -> bool {
        self.name.contains(fragment)
    }
}

pub type Module = PropertyBag;
pub type Resource = PropertyBag;

/// 零件实例
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// 形如 `{base}_{instance-id}` 的实例名
    pub name: String,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Part {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn base_name(&self) -> Option<&str> {
        base_name(&self.name)
    }

    pub fn matches_base(&self, base: &str) -> bool {
        matches_base(&self.name, base)
    }
}

/// 取实例名中实例后缀之前的部分；不符合 `{base}_{suffix}` 约定时返回 None
pub fn base_name(name: &str) -> Option<&str> {
    match name.rsplit_once('_') {
        Some((base, suffix)) if !base.is_empty() && !suffix.is_empty() => Some(base),
        _ => None,
    }
}

/// 判断实例名是否以 `{base}_` 开头且带有非空后缀
pub fn matches_base(candidate: &str, base: &str) -> bool {
    !base.is_empty()
        && candidate
            .strip_prefix(base)
            .and_then(|rest| rest.strip_prefix('_'))
            .is_some_and(|suffix| !suffix.is_empty())
}

/// 根据零件列表统计各基础名的实例数
pub fn derive_part_map(parts: &[Part]) -> BTreeMap<String, u32> {
    let mut map = BTreeMap::new();
    for base in parts.iter().filter_map(Part::base_name) {
        *map.entry(base.to_string()).or_insert(0) += 1;
    }
    map
}

/// 飞行器快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Craft {
    pub ship_location: ShipLocation,
    pub ship_size: [f64; 3],
    pub parts: Vec<Part>,
    pub cost: f64,
    pub mass: f64,
    pub points: f64,
    /// 基础名 -> 实例数；解析器未提供时按零件列表推导
    #[serde(default)]
    pub part_map: BTreeMap<String, u32>,
}

impl Craft {
    pub fn new(ship_location: ShipLocation, ship_size: [f64; 3]) -> Self {
        Self {
            ship_location,
            ship_size,
            parts: Vec::new(),
            cost: 0.0,
            mass: 0.0,
            points: 0.0,
            part_map: BTreeMap::new(),
        }
    }

    /// 设置零件列表并重新推导 part_map
    pub fn with_parts(mut self, parts: Vec<Part>) -> Self {
        self.part_map = derive_part_map(&parts);
        self.parts = parts;
        self
    }

    /// 覆盖 part_map（模拟解析器直接给出的统计）
    pub fn with_part_map(mut self, part_map: BTreeMap<String, u32>) -> Self {
        self.part_map = part_map;
        self
    }

    pub fn with_aggregates(mut self, cost: f64, mass: f64, points: f64) -> Self {
        self.cost = cost;
        self.mass = mass;
        self.points = points;
        self
    }

    /// 从解析器输出的 JSON 快照构建
    pub fn from_json(json: &str) -> Result<Self> {
        let mut craft: Self =
            serde_json::from_str(json).map_err(|e| RuleError::MalformedCraft(e.to_string()))?;

        if craft.part_map.is_empty() && !craft.parts.is_empty() {
            craft.part_map = derive_part_map(&craft.parts);
        }

        craft.validate()?;
        Ok(craft)
    }

    /// 校验聚合值是否可用于求值
    pub fn validate(&self) -> Result<()> {
        let aggregates = [("cost", self.cost), ("mass", self.mass), ("points", self.points)];
        for (field, value) in aggregates {
            if !value.is_finite() {
                return Err(RuleError::MalformedCraft(format!(
                    "{} is not a finite number",
                    field
                )));
            }
        }

        if let Some(axis) = self.ship_size.iter().position(|v| !v.is_finite()) {
            return Err(RuleError::MalformedCraft(format!(
                "ship_size[{}] is not a finite number",
                axis
            )));
        }

        Ok(())
    }

    /// 基础名匹配的零件
    pub fn parts_matching<'a>(&'a self, base: &'a str) -> impl Iterator<Item = &'a Part> + 'a {
        self.parts.iter().filter(move |p| p.matches_base(base))
    }

    /// part_map 中某基础名的实例数
    pub fn count_of(&self, base: &str) -> u32 {
        self.part_map.get(base).copied().unwrap_or(0)
    }

    pub fn contains_base(&self, base: &str) -> bool {
        self.part_map.contains_key(base)
    }
}
