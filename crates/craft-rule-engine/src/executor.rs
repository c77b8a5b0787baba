//! 规则执行器
//!
//! 对一个飞行器快照逐条求值已编译的规则，汇总为评估结论。
//! 条件都是飞行器的纯函数，求值顺序不影响结论；失败项按输入规则顺序排列。

use crate::compiler::{CompiledRule, RuleSet};
use crate::craft::Craft;
use crate::error::Result;
use crate::models::{RuleFailure, Verdict};
use craft_shared::observability::metrics::record_evaluation;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// 规则执行器
pub struct RuleExecutor {
    /// 是否记录详细评估追踪
    trace_enabled: bool,
}

impl RuleExecutor {
    pub fn new() -> Self {
        Self {
            trace_enabled: false,
        }
    }

    /// 启用评估追踪
    pub fn with_trace(mut self) -> Self {
        self.trace_enabled = true;
        self
    }

    pub fn set_trace(mut self, enabled: bool) -> Self {
        self.trace_enabled = enabled;
        self
    }

    /// 评估飞行器
    ///
    /// 飞行器聚合值不可用时返回 `MalformedCraft`，不产生结论。
    #[instrument(skip_all, fields(rules = rules.len(), parts = craft.parts.len()))]
    pub fn execute(&self, craft: &Craft, rules: &[CompiledRule]) -> Result<Verdict> {
        craft.validate()?;

        let start = Instant::now();
        let mut verdict = Verdict::new();

        for rule in rules {
            let passed = rule.apply(craft);
            debug!(rule_id = %rule.rule_id, strategy = %rule.strategy, passed, "Rule evaluated");

            if self.trace_enabled {
                verdict.evaluation_trace.push(format!(
                    "{} [{}] => {}",
                    rule.rule_id,
                    rule.strategy,
                    if passed { "PASS" } else { "FAIL" }
                ));
            }

            if !passed {
                verdict.failures.push(RuleFailure {
                    rule_id: rule.rule_id.clone(),
                    strategy: rule.strategy.to_string(),
                    message: rule.failure_message(craft),
                });
            }
        }

        let elapsed = start.elapsed();
        verdict.evaluated = rules.len();
        verdict.passed = verdict.failures.is_empty();
        verdict.evaluation_time_ms = elapsed.as_millis() as i64;

        record_evaluation(verdict.passed, verdict.failures.len(), elapsed.as_secs_f64());
        info!(
            passed = verdict.passed,
            failures = verdict.failures.len(),
            "Craft evaluated"
        );

        Ok(verdict)
    }

    /// 评估整体编译通过的规则集
    pub fn execute_set(&self, craft: &Craft, rule_set: &RuleSet) -> Result<Verdict> {
        self.execute(craft, rule_set.rules())
    }
}

impl Default for RuleExecutor {
    fn default() -> Self {
        Self::new()
    }
}
