//! 预定义测试场景
//!
//! 每个场景包含一架飞行器、一组规则和期望的失败规则 ID。

use super::fixtures::{TestCrafts, TestRules};
use rule_engine::{Craft, Rule};

pub struct Scenario {
    pub name: &'static str,
    pub craft: Craft,
    pub rules: Vec<Rule>,
    pub expected_failures: Vec<&'static str>,
}

impl Scenario {
    pub fn all() -> Vec<Scenario> {
        vec![
            Self::rocket_basics(),
            Self::wing_budget(),
            Self::absent_part_rules(),
        ]
    }

    /// 油箱与发动机：存在/不存在/数量
    pub fn rocket_basics() -> Scenario {
        Scenario {
            name: "rocket_basics",
            craft: TestCrafts::minimal_rocket(),
            rules: vec![
                TestRules::part_exists("tank-required", "fuelTank"),
                TestRules::part_not_exists("engine-banned", "engine"),
                TestRules::part_count("three-parts", "eq", 3),
            ],
            expected_failures: vec!["engine-banned", "three-parts"],
        }
    }

    /// 机翼数量统计与预算
    pub fn wing_budget() -> Scenario {
        Scenario {
            name: "wing_budget",
            craft: TestCrafts::winged_plane(),
            rules: vec![
                TestRules::part_set_count("enough-wings", "wingA,wingB", "gte", 4),
                TestRules::part_set_count("wing-cap", "wingA, wingB", "lt", 5),
                TestRules::part_set_contains("has-cockpit", "mk1Cockpit,mk2Cockpit", "any"),
                TestRules::ship_cost("budget", "lte", 15_000.0),
            ],
            expected_failures: vec!["wing-cap"],
        }
    }

    /// 规则针对的零件不在设计中：条件恒通过
    pub fn absent_part_rules() -> Scenario {
        Scenario {
            name: "absent_part_rules",
            craft: TestCrafts::minimal_rocket(),
            rules: vec![
                TestRules::module_property(
                    "nuke-thrust",
                    "float",
                    "nuclearEngine",
                    "Engines",
                    "maxThrust",
                    "lt",
                    serde_json::json!(0),
                ),
                TestRules::module_property(
                    "tank-module",
                    "string",
                    "fuelTank",
                    "Decoupler",
                    "isOmniDecoupler",
                    "eq",
                    serde_json::json!("True"),
                ),
            ],
            expected_failures: vec![],
        }
    }
}
