//! # 进度条工具
//!
//! 封装 `indicatif` 提供统一的进度条样式，并提供批处理进度的两种渲染方式：
//! 终端进度条与日志行。
//!
//! ## 依赖关系
//! - 被 `batch/reporter.rs`、`commands/` 使用
//! - 使用 `indicatif`、`console` crate

use crate::batch::{ProgressSink, ProgressState};
use crate::models::Outcome;
use crate::utils::output;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// 创建标准进度条
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template(BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// 根据终端环境选择进度渲染方式
///
/// - `quiet`: 只写日志（`-v` 时可见）
/// - stderr 是终端: 进度条
/// - 其他（管道、重定向）: 每个结果一行
pub fn sink_for(quiet: bool, label: &str) -> Box<dyn ProgressSink> {
    if quiet {
        Box::new(LogSink)
    } else if console::Term::stderr().is_term() {
        Box::new(BarSink::new(label))
    } else {
        Box::new(LineSink)
    }
}

/// 终端进度条
pub struct BarSink {
    label: String,
    pb: Option<ProgressBar>,
}

impl BarSink {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            pb: None,
        }
    }
}

impl ProgressSink for BarSink {
    fn on_start(&mut self, total: usize) {
        self.pb = Some(create_progress_bar(total as u64, &self.label));
    }

    fn on_outcome(&mut self, state: &ProgressState, outcome: &Outcome) {
        let Some(pb) = &self.pb else { return };
        pb.set_position(state.completed as u64);
        pb.set_message(format!(
            "{} -> {}",
            outcome.input().display(),
            outcome.output().display()
        ));
        if let Outcome::Failure { input, cause, .. } = outcome {
            pb.suspend(|| output::print_error(&format!("{}: {}", input.display(), cause)));
        }
    }

    fn on_finish(&mut self, _state: &ProgressState) {
        if let Some(pb) = self.pb.take() {
            pb.finish_and_clear();
        }
    }
}

/// 每个结果打印一行
pub struct LineSink;

impl ProgressSink for LineSink {
    fn on_outcome(&mut self, state: &ProgressState, outcome: &Outcome) {
        output::print_progress(
            state.completed,
            state.total,
            &outcome.input().display().to_string(),
            &outcome.output().display().to_string(),
        );
        if let Outcome::Failure { input, cause, .. } = outcome {
            output::print_error(&format!("{}: {}", input.display(), cause));
        }
    }
}

/// 每个结果一行日志
pub struct LogSink;

impl ProgressSink for LogSink {
    fn on_outcome(&mut self, state: &ProgressState, outcome: &Outcome) {
        let status = match outcome {
            Outcome::Success { .. } => "ok",
            Outcome::Failure { .. } => "failed",
            Outcome::Cancelled { .. } => "cancelled",
        };
        info!(
            "{}/{} {} {} -> {}",
            state.completed,
            state.total,
            status,
            outcome.input().display(),
            outcome.output().display()
        );
    }
}
