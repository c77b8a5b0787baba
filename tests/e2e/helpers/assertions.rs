//! 自定义断言宏
//!
//! 提供针对评估结论的专用断言。

/// 断言评估通过
#[macro_export]
macro_rules! assert_passed {
    ($verdict:expr) => {
        let verdict = &$verdict;
        assert!(
            verdict.passed,
            "飞行器应该通过校验，实际失败规则: {:?}",
            verdict.failures
        );
    };
}

/// 断言失败规则 ID 及其顺序
#[macro_export]
macro_rules! assert_failed_rules {
    ($verdict:expr, [$($id:expr),* $(,)?]) => {
        let verdict = &$verdict;
        let expected: Vec<&str> = vec![$($id),*];
        assert!(!verdict.passed, "飞行器不应该通过校验");
        assert_eq!(
            verdict.failed_rule_ids(),
            expected,
            "失败规则应为 {:?}，实际为 {:?}",
            expected,
            verdict.failed_rule_ids()
        );
    };
}

/// 断言某条失败规则的说明包含指定文字
#[macro_export]
macro_rules! assert_message_contains {
    ($verdict:expr, $rule_id:expr, $text:expr) => {
        let verdict = &$verdict;
        let failure = verdict
            .failures
            .iter()
            .find(|f| f.rule_id == $rule_id)
            .unwrap_or_else(|| panic!("规则 {} 应该失败", $rule_id));
        assert!(
            failure.message.contains($text),
            "规则 {} 的说明应包含 {:?}，实际为 {:?}",
            $rule_id,
            $text,
            failure.message
        );
    };
}
