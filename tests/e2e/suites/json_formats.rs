//! JSON 格式测试套件
//!
//! 测试命令行工具使用的输入输出格式：飞行器快照、规则数组、评估结论。

use crate::data::*;
use crate::helpers::evaluate_json;
use rule_engine::RuleError;
use serde_json::{Value, json};

#[cfg(test)]
mod json_tests {
    use super::*;

    #[test]
    fn test_lander_challenge_passes() {
        let verdict = evaluate_json(
            &TestCrafts::lander_json().to_string(),
            &TestRules::lander_challenge_json().to_string(),
        )
        .unwrap();
        assert!(verdict.passed, "unexpected failures: {:?}", verdict.failures);
        assert_eq!(verdict.evaluated, 7);
    }

    #[test]
    fn test_lander_over_budget() {
        let mut craft = TestCrafts::lander_json();
        craft["cost"] = json!(7250.5);
        craft["ship_location"] = json!("SPH");

        let verdict = evaluate_json(
            &craft.to_string(),
            &TestRules::lander_challenge_json().to_string(),
        )
        .unwrap();
        assert_eq!(verdict.failed_rule_ids(), vec!["1", "2"]);
        assert_eq!(verdict.messages()[0], "Craft must be saved in the VAB");
    }

    #[test]
    fn test_verdict_json_shape() {
        let mut craft = TestCrafts::lander_json();
        craft["parts"][5]["modules"][0]["maxThrust"] = json!("60");

        let verdict = evaluate_json(
            &craft.to_string(),
            &TestRules::lander_challenge_json().to_string(),
        )
        .unwrap();
        let value: Value = serde_json::to_value(&verdict).unwrap();

        assert_eq!(value["passed"], json!(false));
        assert_eq!(value["evaluated"], json!(7));
        assert_eq!(
            value["failures"],
            json!([{
                "rule_id": "5",
                "strategy": "float_module_property",
                "message": "part (microEngine) with module (Engines) must have property (maxThrust) with value lte 50"
            }])
        );
        assert!(value["evaluated_at"].is_string());
    }

    #[test]
    fn test_part_map_from_parser_takes_precedence() {
        let mut craft = TestCrafts::lander_json();
        craft["part_map"] = json!({"landingLeg": 4, "landerCabin": 1});

        let rules = json!([
            {"id": "legs", "strategy": "part_set_count", "params": {"parts": "landingLeg", "op": "eq", "value": 4}}
        ]);
        let verdict = evaluate_json(&craft.to_string(), &rules.to_string()).unwrap();
        assert!(verdict.passed);
    }

    #[test]
    fn test_malformed_craft_rejected() {
        let mut craft = TestCrafts::lander_json();
        craft.as_object_mut().unwrap().remove("mass");

        let err = evaluate_json(
            &craft.to_string(),
            &TestRules::lander_challenge_json().to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::MalformedCraft(_)));
    }

    #[test]
    fn test_rules_must_be_array() {
        let err = evaluate_json(
            &TestCrafts::lander_json().to_string(),
            r#"{"id": 1, "strategy": "part_count"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::JsonError(_)));
    }
}
