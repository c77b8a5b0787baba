//! 飞行器规则校验端到端测试
//!
//! 测试覆盖完整的校验流程，包括：
//! - 解析器输出的飞行器 JSON 加载
//! - 持久化规则 JSON 的编译与整体拒绝
//! - 评估结论的顺序、说明文字与序列化格式
//! - 比赛规则集的典型场景

pub mod helpers;
