//! # 数据模型模块
//!
//! 定义批处理流水线的数据模型：候选集合、作业、结果与报告。
//!
//! ## 依赖关系
//! - 被 `batch/`、`transform/` 和 `commands/` 使用
//! - 子模块: candidates, format, job, report

pub mod candidates;
pub mod format;
pub mod job;
pub mod report;

pub use candidates::CandidateSet;
pub use format::ImageFormat;
pub use job::{Job, Outcome, TransformInfo};
pub use report::{BatchReport, ExitStatus, FailureRecord};
