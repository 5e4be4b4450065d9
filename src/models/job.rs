//! # 作业与结果
//!
//! - [`Job`]: 一个 (输入, 输出) 转换单元，调度前由 `JobFactory` 创建
//! - [`Outcome`]: 单个作业的终态结果，每个作业恰好产生一个
//!
//! ## 依赖关系
//! - 被 `batch/`、`transform/` 使用
//! - 使用 `error.rs` 中的 `JobError`

use crate::error::JobError;

use std::path::{Path, PathBuf};

/// 一个待执行的转换作业
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// 在候选集合中的位置（提交顺序）
    pub index: usize,
    pub input: PathBuf,
    pub output: PathBuf,
}

/// 转换成功时的附加信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformInfo {
    pub bytes_written: u64,
    pub detail: Option<String>,
}

impl TransformInfo {
    pub fn new(bytes_written: u64) -> Self {
        Self {
            bytes_written,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// 单个作业的结果
#[derive(Debug)]
pub enum Outcome {
    /// 转换成功
    Success {
        input: PathBuf,
        output: PathBuf,
        info: TransformInfo,
    },
    /// 转换失败
    Failure {
        input: PathBuf,
        output: PathBuf,
        cause: JobError,
    },
    /// 取消信号发出后未被调度
    Cancelled { input: PathBuf, output: PathBuf },
}

impl Outcome {
    pub fn success(job: Job, info: TransformInfo) -> Self {
        Outcome::Success {
            input: job.input,
            output: job.output,
            info,
        }
    }

    pub fn failure(job: Job, cause: JobError) -> Self {
        Outcome::Failure {
            input: job.input,
            output: job.output,
            cause,
        }
    }

    pub fn cancelled(job: Job) -> Self {
        Outcome::Cancelled {
            input: job.input,
            output: job.output,
        }
    }

    pub fn input(&self) -> &Path {
        match self {
            Outcome::Success { input, .. }
            | Outcome::Failure { input, .. }
            | Outcome::Cancelled { input, .. } => input,
        }
    }

    pub fn output(&self) -> &Path {
        match self {
            Outcome::Success { output, .. }
            | Outcome::Failure { output, .. }
            | Outcome::Cancelled { output, .. } => output,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure { .. })
    }
}
