//! 规则引擎领域模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// 持久化的规则记录
///
/// 策略名保持为字符串，未知策略在编译阶段报错而不是在反序列化阶段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub strategy: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Rule {
    /// 创建规则，params 非对象时按空参数处理
    pub fn new(strategy: impl Into<String>, params: Value) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), strategy, params)
    }

    pub fn with_id(id: impl Into<String>, strategy: impl Into<String>, params: Value) -> Self {
        let params = match params {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            id: id.into(),
            strategy: strategy.into(),
            params,
        }
    }
}

/// 数据库主键可能是数字，统一转为字符串
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "rule id must be a string or number, got {}",
            other
        ))),
    }
}

/// 未通过的规则
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleFailure {
    pub rule_id: String,
    pub strategy: String,
    pub message: String,
}

/// 评估结论
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub passed: bool,
    /// 按输入规则顺序排列的失败项
    pub failures: Vec<RuleFailure>,
    pub evaluated: usize,
    pub evaluation_trace: Vec<String>,
    pub evaluation_time_ms: i64,
    pub evaluated_at: DateTime<Utc>,
}

impl Verdict {
    pub fn new() -> Self {
        Self {
            passed: true,
            failures: Vec::new(),
            evaluated: 0,
            evaluation_trace: Vec::new(),
            evaluation_time_ms: 0,
            evaluated_at: Utc::now(),
        }
    }

    /// 失败规则的说明文字
    pub fn messages(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.message.as_str()).collect()
    }

    pub fn failed_rule_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.rule_id.as_str()).collect()
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::new()
    }
}
