//! 规则参数提取
//!
//! 从持久化的参数映射中按策略读取并校验参数。所有错误按参数逐条收集，
//! 最后一次性返回，规则作者可以看到每个出错的参数。

use crate::craft::{ScalarValue, ShipLocation};
use crate::error::{ParamError, ParamErrorKind, Result, RuleError};
use crate::operators::{Operator, SetMatcher, Transformed, ValueTransform};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// 自由文本参数允许的字符之外的部分
static DISALLOWED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z.\-]+").unwrap());

/// 清洗自由文本参数，只保留 `[0-9A-Za-z.-]`
///
/// 基础名和名称片段会参与名称匹配，必须在编译前清洗。
pub fn sanitize(input: &str) -> String {
    DISALLOWED_CHARS.replace_all(input, "").into_owned()
}

/// 拆分逗号分隔的零件列表：去除所有空白、逐项清洗、丢弃空项
pub fn split_part_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|item| item.split_whitespace().collect::<String>())
        .map(|item| sanitize(&item))
        .filter(|item| !item.is_empty())
        .collect()
}

/// 参数读取器
pub struct ParamReader<'a> {
    strategy: &'a str,
    params: &'a Map<String, Value>,
    errors: Vec<ParamError>,
}

impl<'a> ParamReader<'a> {
    pub fn new(strategy: &'a str, params: &'a Map<String, Value>) -> Self {
        Self {
            strategy,
            params,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, param: &str, kind: ParamErrorKind) {
        self.errors.push(ParamError::new(param, kind));
    }

    /// 读取必填参数的原始值，null 视为缺失
    fn raw(&mut self, key: &str) -> Option<&'a Value> {
        match self.params.get(key) {
            None | Some(Value::Null) => {
                self.fail(key, ParamErrorKind::Missing);
                None
            }
            Some(v) => Some(v),
        }
    }

    /// 以字符串形式读取（数字会转为字符串）
    fn raw_text(&mut self, key: &str) -> Option<String> {
        match self.raw(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            other => {
                self.fail(
                    key,
                    ParamErrorKind::WrongType {
                        expected: "string".to_string(),
                        actual: value_type_name(other).to_string(),
                    },
                );
                None
            }
        }
    }

    /// 读取经过清洗的自由文本参数
    pub fn text(&mut self, key: &str) -> Option<String> {
        let cleaned = sanitize(&self.raw_text(key)?);
        if cleaned.is_empty() {
            self.fail(key, ParamErrorKind::Empty);
            return None;
        }
        Some(cleaned)
    }

    /// 按顺序尝试多个键名，错误归到第一个键名下
    pub fn text_any(&mut self, keys: &[&str]) -> Option<String> {
        let key = keys
            .iter()
            .copied()
            .find(|k| self.params.get(*k).is_some_and(|v| !v.is_null()))
            .unwrap_or(keys[0]);
        self.text(key)
    }

    pub fn operator(&mut self, key: &str) -> Option<Operator> {
        let tag = self.raw_text(key)?;
        match tag.parse() {
            Ok(op) => Some(op),
            Err(kind) => {
                self.fail(key, kind);
                None
            }
        }
    }

    pub fn matcher(&mut self, key: &str) -> Option<SetMatcher> {
        let tag = self.raw_text(key)?;
        match tag.parse() {
            Ok(matcher) => Some(matcher),
            Err(kind) => {
                self.fail(key, kind);
                None
            }
        }
    }

    pub fn location(&mut self, key: &str) -> Option<ShipLocation> {
        let tag = self.raw_text(key)?;
        let location = ShipLocation::parse_tag(&tag);
        if location.is_none() {
            self.fail(key, ParamErrorKind::UnknownLocation(tag));
        }
        location
    }

    /// 读取整数参数，接受整数值的浮点数（如 `3.0`）
    pub fn integer(&mut self, key: &str) -> Option<i64> {
        let raw = self.raw(key)?;
        let parsed = match raw {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && f.is_finite()).map(|f| f as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        if parsed.is_none() {
            self.fail(key, ParamErrorKind::NotAnInteger(display_raw(raw)));
        }
        parsed
    }

    /// 读取有限浮点数参数
    pub fn number(&mut self, key: &str) -> Option<f64> {
        let raw = self.raw(key)?;
        let parsed = match raw {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|f| f.is_finite());
        if parsed.is_none() {
            self.fail(key, ParamErrorKind::NotANumber(display_raw(raw)));
        }
        parsed
    }

    /// 读取比较参考值，并按比较时使用的转换方式预先校验
    pub fn reference(&mut self, key: &str, transform: ValueTransform) -> Option<ScalarValue> {
        let raw = self.raw(key)?;
        let value = match raw {
            Value::Number(n) => n.as_f64().map(ScalarValue::Number),
            Value::String(s) => Some(ScalarValue::Text(s.trim().to_string())),
            Value::Bool(b) => Some(ScalarValue::Bool(*b)),
            _ => None,
        };
        let Some(value) = value else {
            self.fail(
                key,
                ParamErrorKind::WrongType {
                    expected: "number or string".to_string(),
                    actual: value_type_name(raw).to_string(),
                },
            );
            return None;
        };

        let usable = match transform.transform(&value) {
            Some(Transformed::Float(f)) => f.is_finite(),
            Some(_) => true,
            None => false,
        };
        if !usable {
            let kind = match transform {
                ValueTransform::Int => ParamErrorKind::NotAnInteger(value.as_text()),
                _ => ParamErrorKind::NotANumber(value.as_text()),
            };
            self.fail(key, kind);
            return None;
        }
        Some(value)
    }

    /// 读取逗号分隔的零件集合（也接受字符串数组）
    pub fn part_set(&mut self, key: &str) -> Option<Vec<String>> {
        let parts = match self.raw(key)? {
            Value::String(s) => split_part_list(s),
            Value::Array(items) => {
                if let Some(bad) = items.iter().find(|item| !item.is_string()) {
                    self.fail(
                        key,
                        ParamErrorKind::WrongType {
                            expected: "array of strings".to_string(),
                            actual: value_type_name(bad).to_string(),
                        },
                    );
                    return None;
                }
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .flat_map(split_part_list)
                    .collect()
            }
            other => {
                self.fail(
                    key,
                    ParamErrorKind::WrongType {
                        expected: "comma-separated string".to_string(),
                        actual: value_type_name(other).to_string(),
                    },
                );
                return None;
            }
        };

        if parts.is_empty() {
            self.fail(key, ParamErrorKind::EmptyPartSet);
            return None;
        }
        Some(parts)
    }

    /// 读取组合规则的子规则定义 `{strategy, params}`
    pub fn nested(&mut self, key: &str) -> Option<(&'a str, &'a Map<String, Value>)> {
        let raw = self.raw(key)?;
        let definition = raw.as_object().and_then(|obj| {
            let strategy = obj.get("strategy")?.as_str()?;
            let params = match obj.get("params") {
                Some(Value::Object(params)) => params,
                _ => return None,
            };
            Some((strategy, params))
        });
        if definition.is_none() {
            self.fail(
                key,
                ParamErrorKind::WrongType {
                    expected: "rule definition {strategy, params}".to_string(),
                    actual: value_type_name(raw).to_string(),
                },
            );
        }
        definition
    }

    /// 记录子规则编译失败
    pub fn nested_error(&mut self, key: &str, error: RuleError) {
        self.fail(key, ParamErrorKind::Nested(error.to_string()));
    }

    /// 结束读取：有任一参数出错则返回全部错误
    pub fn finish<T>(self, built: Option<T>) -> Result<T> {
        match built {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(RuleError::InvalidParams {
                strategy: self.strategy.to_string(),
                errors: self.errors,
            }),
        }
    }
}

fn display_raw(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
