//! 指标描述模块
//!
//! 引擎通过 metrics 门面记录指标；未安装 recorder 时所有记录均为空操作。

/// 规则编译成功计数
pub const RULES_COMPILED_TOTAL: &str = "craft_rules_compiled_total";
/// 规则编译失败计数
pub const RULE_COMPILE_FAILURES_TOTAL: &str = "craft_rule_compile_failures_total";
/// 飞行器评估次数（按 verdict 标签区分）
pub const EVALUATIONS_TOTAL: &str = "craft_evaluations_total";
/// 未通过的规则计数
pub const RULE_FAILURES_TOTAL: &str = "craft_rule_failures_total";
/// 单次评估耗时
pub const EVALUATION_DURATION_SECONDS: &str = "craft_evaluation_duration_seconds";

/// 注册引擎指标的描述信息
pub fn register_engine_metrics() {
    metrics::describe_counter!(RULES_COMPILED_TOTAL, "Total number of compiled rules");
    metrics::describe_counter!(
        RULE_COMPILE_FAILURES_TOTAL,
        "Total number of rules rejected at compile time"
    );
    metrics::describe_counter!(EVALUATIONS_TOTAL, "Total number of craft evaluations");
    metrics::describe_counter!(
        RULE_FAILURES_TOTAL,
        "Total number of rules that a craft failed"
    );
    metrics::describe_histogram!(
        EVALUATION_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Craft evaluation duration in seconds"
    );
}

// ============================================================================
// 指标记录函数
// ============================================================================

/// 记录规则编译结果
///
/// `strategy` 只接受静态标签，调用方需将未知策略归为 "unknown"。
#[inline]
pub fn record_rule_compiled(strategy: &'static str, success: bool) {
    if success {
        metrics::counter!(RULES_COMPILED_TOTAL, "strategy" => strategy).increment(1);
    } else {
        metrics::counter!(RULE_COMPILE_FAILURES_TOTAL, "strategy" => strategy).increment(1);
    }
}

/// 记录一次飞行器评估
#[inline]
pub fn record_evaluation(passed: bool, failed_rules: usize, duration_secs: f64) {
    let verdict = if passed { "pass" } else { "fail" };
    metrics::counter!(EVALUATIONS_TOTAL, "verdict" => verdict).increment(1);
    metrics::counter!(RULE_FAILURES_TOTAL).increment(failed_rules as u64);
    metrics::histogram!(EVALUATION_DURATION_SECONDS, "verdict" => verdict).record(duration_secs);
}
