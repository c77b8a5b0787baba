//! 测试辅助模块

pub mod assertions;

use rule_engine::{Craft, Result, Rule, RuleCompiler, RuleExecutor, Verdict};

/// 编译规则集并评估飞行器（启用追踪）
pub fn evaluate(craft: &Craft, rules: &[Rule]) -> Result<Verdict> {
    let rule_set = RuleCompiler::new().compile_rule_set(rules)?;
    RuleExecutor::new().with_trace().execute_set(craft, &rule_set)
}

/// 从 JSON 文本走完整流程，与命令行工具的输入格式一致
pub fn evaluate_json(craft_json: &str, rules_json: &str) -> Result<Verdict> {
    let craft = Craft::from_json(craft_json)?;
    let rule_set = RuleCompiler::new().compile_from_json(rules_json)?;
    RuleExecutor::new().execute_set(&craft, &rule_set)
}
