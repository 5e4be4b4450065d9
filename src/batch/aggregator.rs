//! # 结果汇总
//!
//! 消费完整个结果流，生成 [`BatchReport`]。汇总器把流消费到底，
//! 与执行器一起决定批次何时结束；不会因为失败而提前中止。
//!
//! ## 依赖关系
//! - 消费 `batch/runner.rs`（经 `batch/reporter.rs` 转发）的结果流
//! - 产出 `models/report.rs` 的 `BatchReport`

use crate::models::{BatchReport, FailureRecord, Outcome};

use std::time::Instant;

/// 结果汇总器
#[derive(Debug, Default)]
pub struct OutcomeAggregator {
    report: BatchReport,
}

impl OutcomeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 合并单个结果
    pub fn merge(&mut self, outcome: Outcome) {
        self.report.attempted += 1;
        match outcome {
            Outcome::Success { info, .. } => {
                self.report.succeeded += 1;
                self.report.bytes_written += info.bytes_written;
            }
            Outcome::Failure {
                input,
                output,
                cause,
            } => {
                self.report.failed += 1;
                self.report.failures.push(FailureRecord {
                    input,
                    output,
                    cause,
                });
            }
            Outcome::Cancelled { .. } => self.report.cancelled += 1,
        }
    }

    pub fn finish(self) -> BatchReport {
        self.report
    }

    /// 消费整个结果流并生成报告
    pub fn collect<I>(outcomes: I) -> BatchReport
    where
        I: IntoIterator<Item = Outcome>,
    {
        let start = Instant::now();
        let mut aggregator = Self::new();
        for outcome in outcomes {
            aggregator.merge(outcome);
        }
        let mut report = aggregator.finish();
        report.elapsed = start.elapsed();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JobError;
    use crate::models::{ExitStatus, Job, TransformInfo};
    use std::path::PathBuf;

    fn job(name: &str) -> Job {
        Job {
            index: 0,
            input: PathBuf::from(format!("{}.jpg", name)),
            output: PathBuf::from(format!("{}.png", name)),
        }
    }

    #[test]
    fn test_all_success() {
        let report = OutcomeAggregator::collect(vec![
            Outcome::success(job("a"), TransformInfo::new(5)),
            Outcome::success(job("b"), TransformInfo::new(7)),
        ]);
        assert_eq!(report.attempted, 2);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(report.bytes_written, 12);
        assert_eq!(report.exit_status(), ExitStatus::Success);
    }

    #[test]
    fn test_failures_are_preserved() {
        let report = OutcomeAggregator::collect(vec![
            Outcome::success(job("a"), TransformInfo::new(5)),
            Outcome::failure(
                job("b"),
                JobError::CorruptInput {
                    path: PathBuf::from("b.jpg"),
                    reason: "truncated".to_string(),
                },
            ),
            Outcome::failure(job("c"), JobError::UnsupportedFormat("c".to_string())),
        ]);

        assert_eq!(report.attempted, 3);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 2);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failures[0].input, PathBuf::from("b.jpg"));
        assert!(report.failures[0].cause.to_string().contains("truncated"));
        assert_eq!(report.exit_status(), ExitStatus::PartialFailure);
    }

    #[test]
    fn test_cancelled_status() {
        let report = OutcomeAggregator::collect(vec![
            Outcome::success(job("a"), TransformInfo::new(1)),
            Outcome::cancelled(job("b")),
        ]);
        assert_eq!(report.attempted, 2);
        assert_eq!(report.cancelled, 1);
        assert_eq!(report.failed, 0);
        assert_eq!(report.exit_status(), ExitStatus::Cancelled);
    }

    #[test]
    fn test_empty_stream() {
        let report = OutcomeAggregator::collect(Vec::new());
        assert_eq!(report.attempted, 0);
        assert_eq!(report.exit_status(), ExitStatus::Success);
    }
}
