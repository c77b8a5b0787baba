//! 测试数据 Fixtures
//!
//! 预定义的飞行器快照与规则，模拟设计文件解析器和规则存储的输出。

use rule_engine::{Craft, Part, PropertyBag, Rule, ShipLocation};
use serde_json::{Value, json};

/// 测试飞行器
pub struct TestCrafts;

impl TestCrafts {
    /// 只有油箱和发动机的最小火箭
    pub fn minimal_rocket() -> Craft {
        Craft::new(ShipLocation::Vab, [1.25, 3.5, 1.25])
            .with_parts(vec![Part::new("fuelTank_1"), Part::new("engine_1")])
            .with_aggregates(1200.0, 2.1, 4.0)
    }

    /// 机翼数量由解析器直接给出统计
    pub fn winged_plane() -> Craft {
        let mut craft = Craft::new(ShipLocation::Sph, [12.0, 3.0, 9.0])
            .with_parts(vec![
                Part::new("mk1Cockpit_1"),
                Part::new("wingA_1"),
                Part::new("wingA_2"),
                Part::new("wingB_1"),
                Part::new("wingB_2"),
                Part::new("wingB_3"),
                Part::new("jetEngine_1").with_module(
                    PropertyBag::new("ModuleEnginesFX")
                        .with("maxThrust", "90")
                        .with("engineID", "Cruise"),
                ),
            ])
            .with_aggregates(14_500.0, 6.4, 55.0);
        craft.part_map.insert("wingA".to_string(), 2);
        craft.part_map.insert("wingB".to_string(), 3);
        craft
    }

    /// 解析器输出的 JSON 形式
    pub fn lander_json() -> Value {
        json!({
            "ship_location": "VAB",
            "ship_size": [2.5, 4.0, 2.5],
            "parts": [
                {"name": "landerCabin_1", "modules": [{"name": "ModuleCommand", "minimumCrew": 1}]},
                {
                    "name": "fuelTankSmall_1",
                    "resources": [
                        {"name": "LiquidFuel", "amount": 45.0, "maxAmount": 45.0},
                        {"name": "Oxidizer", "amount": 55.0, "maxAmount": 55.0}
                    ]
                },
                {
                    "name": "landingLeg_1",
                    "modules": [{"name": "ModuleWheelDeployment", "shieldedCanDeploy": "True"}]
                },
                {"name": "landingLeg_2"},
                {"name": "landingLeg_3"},
                {
                    "name": "microEngine_1",
                    "modules": [{"name": "ModuleEngines", "maxThrust": "20", "heatProduction": 100}]
                }
            ],
            "cost": 3890.0,
            "mass": 2.9,
            "points": 18.0
        })
    }
}

/// 测试规则
pub struct TestRules;

impl TestRules {
    pub fn part_exists(id: &str, part: &str) -> Rule {
        Rule::with_id(id, "part_exists", json!({ "part": part }))
    }

    pub fn part_not_exists(id: &str, part: &str) -> Rule {
        Rule::with_id(id, "part_not_exists", json!({ "part": part }))
    }

    pub fn part_count(id: &str, op: &str, value: i64) -> Rule {
        Rule::with_id(id, "part_count", json!({ "op": op, "value": value }))
    }

    pub fn part_set_count(id: &str, parts: &str, op: &str, value: i64) -> Rule {
        Rule::with_id(
            id,
            "part_set_count",
            json!({ "parts": parts, "op": op, "value": value }),
        )
    }

    pub fn part_set_contains(id: &str, parts: &str, matcher: &str) -> Rule {
        Rule::with_id(
            id,
            "part_set_contains",
            json!({ "parts": parts, "matcher": matcher }),
        )
    }

    pub fn module_property(
        id: &str,
        flavor: &str,
        part: &str,
        module: &str,
        key: &str,
        op: &str,
        value: Value,
    ) -> Rule {
        Rule::with_id(
            id,
            format!("{}_module_property", flavor),
            json!({ "part": part, "mod": module, "key": key, "op": op, "value": value }),
        )
    }

    pub fn ship_cost(id: &str, op: &str, value: f64) -> Rule {
        Rule::with_id(id, "ship_cost", json!({ "op": op, "value": value }))
    }

    /// 一个小型比赛的完整规则集（JSON 数组形式）
    pub fn lander_challenge_json() -> Value {
        json!([
            {"id": 1, "strategy": "ship_location", "params": {"location": "vab"}},
            {"id": 2, "strategy": "ship_cost", "params": {"op": "lte", "value": 5000}},
            {"id": 3, "strategy": "part_count", "params": {"op": "lte", "value": 10}},
            {"id": 4, "strategy": "part_set_count", "params": {"parts": "landingLeg", "op": "gte", "value": 3}},
            {"id": 5, "strategy": "float_module_property", "params": {
                "part": "microEngine", "mod": "Engines", "key": "maxThrust", "op": "lte", "value": 50
            }},
            {"id": 6, "strategy": "resource_property", "params": {
                "part": "fuelTankSmall", "res": "Oxidizer", "key": "amount", "op": "gte", "value": 50
            }},
            {"id": 7, "strategy": "ship_size", "params": {
                "opx": "lte", "x": 3, "opy": "lte", "y": 5, "opz": "lte", "z": 3
            }}
        ])
    }
}
