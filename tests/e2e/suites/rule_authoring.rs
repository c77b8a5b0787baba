//! 规则编写测试套件
//!
//! 测试规则创建时的校验：未知策略、参数错误逐条报告、规则集整体拒绝。

use rule_engine::{ParamErrorKind, Rule, RuleCompiler, RuleError, Strategy};
use serde_json::json;

#[cfg(test)]
mod authoring_tests {
    use super::*;

    fn rejected(rules: &[Rule]) -> Vec<(String, RuleError)> {
        match RuleCompiler::new().compile_rule_set(rules) {
            Err(RuleError::RuleSetRejected(failures)) => failures
                .into_iter()
                .map(|f| (f.rule_id, f.error))
                .collect(),
            other => panic!("规则集应该被拒绝，实际为 {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn test_unknown_strategy_never_passes_silently() {
        let failures = rejected(&[Rule::with_id("r1", "always_ok", json!({}))]);
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0].1, RuleError::UnknownStrategy(_)));
    }

    #[test]
    fn test_every_bad_param_reported() {
        let failures = rejected(&[Rule::with_id(
            "sizes",
            "ship_size",
            json!({"opx": "lte", "x": "wide", "opy": "about", "y": 5, "opz": "lte"}),
        )]);
        match &failures[0].1 {
            RuleError::InvalidParams { strategy, errors } => {
                assert_eq!(strategy, "ship_size");
                let params: Vec<_> = errors.iter().map(|e| e.param.as_str()).collect();
                assert_eq!(params, vec!["x", "opy", "z"]);
                assert_eq!(errors[0].kind, ParamErrorKind::NotANumber("wide".to_string()));
                assert_eq!(errors[2].kind, ParamErrorKind::Missing);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_rejected_set_lists_only_failing_rules() {
        let failures = rejected(&[
            Rule::with_id("ok-1", "part_exists", json!({"part": "fuelTank"})),
            Rule::with_id("bad-1", "part_set_contains", json!({"parts": "wingA", "matcher": "most"})),
            Rule::with_id("ok-2", "ship_mass", json!({"op": "lt", "value": 10})),
            Rule::with_id("bad-2", "resource_property", json!({"part": "tank", "res": "!!!", "key": "amount", "op": "gte", "value": 1})),
        ]);
        let ids: Vec<_> = failures.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["bad-1", "bad-2"]);
        assert!(failures[1].1.to_string().contains("res: value is empty after sanitization"));
    }

    #[test]
    fn test_empty_part_list_is_configuration_error() {
        let failures = rejected(&[Rule::with_id(
            "empty",
            "part_set_count",
            json!({"parts": ", ,", "op": "gte", "value": 0}),
        )]);
        assert!(failures[0].1.to_string().contains("parts: part set must name at least one part"));
    }

    #[test]
    fn test_injection_attempts_sanitized() {
        let rule = RuleCompiler::new()
            .compile(&Rule::with_id("r", "part_exists", json!({"part": "fuelTank.*|(engine)"})))
            .unwrap();
        assert_eq!(rule.explain(), "part must exist! (fuelTank.engine)");
    }

    #[test]
    fn test_every_strategy_has_param_keys() {
        for strategy in Strategy::ALL {
            assert!(!strategy.param_keys().is_empty(), "{} 缺少参数定义", strategy);
        }
    }

    #[test]
    fn test_rule_set_size_bound() {
        let rules: Vec<_> = (0..5)
            .map(|i| Rule::with_id(format!("r{}", i), "part_exists", json!({"part": "strut"})))
            .collect();
        let err = RuleCompiler::new()
            .with_max_rules(4)
            .compile_rule_set(&rules)
            .unwrap_err();
        assert_eq!(err.to_string(), "rule set too large: 5 rules, at most 4 allowed");
    }
}
