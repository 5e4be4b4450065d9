//! # 批处理报告
//!
//! 批次结束后的只读汇总，决定进程退出码。
//!
//! ## 依赖关系
//! - 由 `batch/aggregator.rs` 创建
//! - 被 `commands/` 用于打印摘要与退出

use crate::error::JobError;

use std::path::PathBuf;
use std::time::Duration;

/// 一条失败记录
#[derive(Debug)]
pub struct FailureRecord {
    pub input: PathBuf,
    pub output: PathBuf,
    pub cause: JobError,
}

/// 批处理结果统计
#[derive(Debug, Default)]
pub struct BatchReport {
    /// 产生结果的作业数（等于候选集合大小）
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// 因取消而未调度的作业数
    pub cancelled: usize,
    /// 成功作业写出的总字节数
    pub bytes_written: u64,
    /// 全部失败详情
    pub failures: Vec<FailureRecord>,
    pub elapsed: Duration,
}

impl BatchReport {
    /// 根据统计结果决定退出状态
    pub fn exit_status(&self) -> ExitStatus {
        if self.cancelled > 0 {
            ExitStatus::Cancelled
        } else if self.failed > 0 {
            ExitStatus::PartialFailure
        } else {
            ExitStatus::Success
        }
    }
}

/// 进程退出状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// 全部成功
    Success,
    /// 至少一个作业失败（其余作业均已执行）
    PartialFailure,
    /// 预检错误，未调度任何作业
    Fatal,
    /// 批次被取消
    Cancelled,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::PartialFailure => 1,
            ExitStatus::Fatal => 2,
            ExitStatus::Cancelled => 130,
        }
    }
}
