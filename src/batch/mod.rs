//! # 批量处理模块
//!
//! 提供统一的文件批量处理流水线。
//!
//! ## 功能
//! - 收集匹配文件列表（collector）
//! - 推导输出路径（naming）
//! - 并发上限内执行（runner, policy）
//! - 进度观察（reporter）
//! - 结果汇总与退出状态（aggregator）
//!
//! ## 依赖关系
//! - 被各命令模块使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度（经由 `utils/progress.rs`）

pub mod aggregator;
pub mod collector;
pub mod naming;
pub mod policy;
pub mod reporter;
pub mod runner;

pub use aggregator::OutcomeAggregator;
pub use collector::FileCollector;
pub use naming::JobFactory;
pub use policy::{CancelToken, Concurrency, RetryPolicy};
pub use reporter::{ProgressReporter, ProgressSink, ProgressState};
pub use runner::BatchRunner;

use crate::error::Result;
use crate::models::{BatchReport, CandidateSet};
use crate::transform::TransformUnit;

use std::sync::Arc;

/// 执行完整流水线：调度 → 进度观察 → 汇总
pub fn run_pipeline<S: ProgressSink>(
    runner: &BatchRunner,
    candidates: CandidateSet,
    factory: JobFactory,
    unit: Arc<dyn TransformUnit>,
    sink: S,
) -> Result<BatchReport> {
    let stream = runner.run(candidates, factory, unit)?;
    let total = stream.total();
    let observed = ProgressReporter::new(sink).observe(stream, total);
    Ok(OutcomeAggregator::collect(observed))
}
