//! CLI 命令定义与执行
//!
//! 使用 clap derive 宏定义命令行接口。文件读取只发生在这里，引擎库本身不做 I/O。

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use craft_shared::config::EngineConfig;
use rule_engine::{Craft, RuleCompiler, RuleError, RuleExecutor, RuleSet, Strategy, Verdict};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

/// 飞行器参赛规则校验工具
#[derive(Parser, Debug)]
#[command(name = "craft-validate")]
#[command(version, about = "Validate craft designs against competition rules")]
#[command(propagate_version = true)]
pub struct Cli {
    /// 日志级别 (trace, debug, info, warn, error)，RUST_LOG 优先
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 编译规则集并评估飞行器
    ///
    /// 通过时退出码为 0，有规则未通过时为 1。
    Evaluate {
        /// 飞行器快照 JSON
        #[arg(short, long)]
        craft: PathBuf,

        /// 规则集 JSON 数组
        #[arg(short, long)]
        rules: PathBuf,

        /// 输出格式
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// 输出逐条规则的评估追踪
        #[arg(long)]
        trace: bool,
    },

    /// 只编译规则集，报告每条规则的参数错误
    Check {
        /// 规则集 JSON 数组
        #[arg(short, long)]
        rules: PathBuf,
    },

    /// 列出所有策略及其参数
    Strategies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// 命令执行器
pub struct CommandRunner {
    engine: EngineConfig,
}

impl CommandRunner {
    pub fn new(engine: EngineConfig) -> Self {
        Self { engine }
    }

    pub fn run(&self, command: Commands) -> Result<ExitCode> {
        match command {
            Commands::Evaluate {
                craft,
                rules,
                format,
                trace,
            } => self.run_evaluate(&craft, &rules, format, trace),
            Commands::Check { rules } => self.run_check(&rules),
            Commands::Strategies => {
                self.run_strategies();
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    fn compiler(&self) -> RuleCompiler {
        RuleCompiler::new().with_max_rules(self.engine.max_rules)
    }

    fn load_rules(&self, path: &Path) -> Result<RuleSet> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rules from {}", path.display()))?;
        let rule_set = self
            .compiler()
            .compile_from_json(&json)
            .with_context(|| format!("failed to compile rules from {}", path.display()))?;
        info!(rules = rule_set.len(), path = %path.display(), "Rule set loaded");
        Ok(rule_set)
    }

    pub fn run_evaluate(
        &self,
        craft_path: &Path,
        rules_path: &Path,
        format: OutputFormat,
        trace: bool,
    ) -> Result<ExitCode> {
        let rule_set = self.load_rules(rules_path)?;

        let json = std::fs::read_to_string(craft_path)
            .with_context(|| format!("failed to read craft from {}", craft_path.display()))?;
        let craft = Craft::from_json(&json)
            .with_context(|| format!("failed to load craft from {}", craft_path.display()))?;

        let verdict = RuleExecutor::new()
            .set_trace(trace || self.engine.trace_enabled)
            .execute_set(&craft, &rule_set)?;

        match format {
            OutputFormat::Text => print_verdict(&verdict),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&verdict)?),
        }

        Ok(if verdict.passed {
            ExitCode::SUCCESS
        } else {
            ExitCode::from(1)
        })
    }

    pub fn run_check(&self, rules_path: &Path) -> Result<ExitCode> {
        let json = std::fs::read_to_string(rules_path)
            .with_context(|| format!("failed to read rules from {}", rules_path.display()))?;

        match self.compiler().compile_from_json(&json) {
            Ok(rule_set) => {
                println!("OK: {} rules compiled", rule_set.len());
                Ok(ExitCode::SUCCESS)
            }
            Err(RuleError::RuleSetRejected(failures)) => {
                println!("REJECTED: {} rules failed to compile", failures.len());
                for failure in &failures {
                    match &failure.error {
                        RuleError::InvalidParams { strategy, errors } => {
                            println!("  [{}] {}", failure.rule_id, strategy);
                            for e in errors {
                                println!("      {}", e);
                            }
                        }
                        other => println!("  [{}] {}", failure.rule_id, other),
                    }
                }
                Ok(ExitCode::from(1))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn run_strategies(&self) {
        for strategy in Strategy::ALL {
            println!("{:<24} {}", strategy.as_str(), strategy.param_keys().join(", "));
        }
    }
}

fn print_verdict(verdict: &Verdict) {
    if verdict.passed {
        println!("PASS ({} rules evaluated)", verdict.evaluated);
    } else {
        println!(
            "FAIL ({} of {} rules failed)",
            verdict.failures.len(),
            verdict.evaluated
        );
        for failure in &verdict.failures {
            println!("  [{}] {}", failure.rule_id, failure.message);
        }
    }

    for line in &verdict.evaluation_trace {
        println!("  trace: {}", line);
    }
}
