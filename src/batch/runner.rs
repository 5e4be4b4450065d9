//! # 批量执行器
//!
//! 在并发上限内执行批量转换作业，按完成顺序产出结果流。
//!
//! ## 功能
//! - 专用 rayon 线程池，线程数即并发上限
//! - 原子游标按枚举顺序分派下一个作业，空出槽位立即补上
//! - 单个作业失败只产生一个 `Failure`，不影响其他作业
//! - 取消信号：停止分派新作业，未分派的作业产出 `Cancelled`
//! - 可选重试（仅 I/O 错误）
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `batch/naming.rs` 创建作业，`batch/policy.rs` 的策略
//! - 使用 `rayon` 线程池

use super::naming::JobFactory;
use super::policy::{CancelToken, Concurrency, RetryPolicy};
use crate::error::{ImgbatchError, JobError, Result};
use crate::models::{CandidateSet, Job, Outcome, TransformInfo};
use crate::transform::TransformUnit;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

/// 批量执行器
pub struct BatchRunner {
    /// 并发上限
    concurrency: Concurrency,
    retry: RetryPolicy,
    cancel: CancelToken,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new(concurrency: Concurrency) -> Self {
        Self {
            concurrency,
            retry: RetryPolicy::none(),
            cancel: CancelToken::new(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// 启动批次，返回按完成顺序产出结果的流
    ///
    /// 流恰好产出 `candidates.len()` 个结果后结束。
    pub fn run(
        &self,
        candidates: CandidateSet,
        factory: JobFactory,
        unit: Arc<dyn TransformUnit>,
    ) -> Result<OutcomeStream> {
        let total = candidates.len();
        let workers = self.concurrency.effective(total);
        let (tx, rx) = mpsc::channel();

        let dispatch = Arc::new(Dispatch {
            candidates,
            factory,
            unit,
            retry: self.retry,
            cancel: self.cancel.clone(),
            cursor: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        });

        if total == 0 {
            return Ok(OutcomeStream::new(rx, 0, dispatch, None));
        }

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("imgbatch-worker-{}", i))
            .build()
            .map_err(|e| ImgbatchError::Runtime(format!("failed to start worker pool: {}", e)))?;

        debug!(total, workers, "starting batch");
        for _ in 0..workers {
            let dispatch = Arc::clone(&dispatch);
            let tx = tx.clone();
            pool.spawn(move || dispatch.worker_loop(&tx));
        }

        Ok(OutcomeStream::new(rx, total, dispatch, Some(pool)))
    }
}

/// 一次批处理内所有工作线程共享的状态
struct Dispatch {
    candidates: CandidateSet,
    factory: JobFactory,
    unit: Arc<dyn TransformUnit>,
    retry: RetryPolicy,
    cancel: CancelToken,
    /// 下一个待分派作业的下标
    cursor: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl Dispatch {
    fn worker_loop(&self, tx: &Sender<Outcome>) {
        loop {
            let index = self.cursor.fetch_add(1, Ordering::SeqCst);
            let Some(input) = self.candidates.get(index) else {
                break;
            };
            let job = self.factory.make(index, input);

            let outcome = if self.cancel.is_cancelled() {
                Outcome::cancelled(job)
            } else {
                self.execute(job)
            };

            // 接收端已关闭，不再分派
            if tx.send(outcome).is_err() {
                break;
            }
        }
    }

    fn execute(&self, job: Job) -> Outcome {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        debug!(index = job.index, input = %job.input.display(), "dispatch");

        let result = self.transform_with_retry(&job);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match result {
            Ok(info) => Outcome::success(job, info),
            Err(cause) => {
                warn!(input = %job.input.display(), "job failed: {}", cause);
                Outcome::failure(job, cause)
            }
        }
    }

    fn transform_with_retry(&self, job: &Job) -> std::result::Result<TransformInfo, JobError> {
        let mut attempt = 1;
        loop {
            match self.unit.transform(job) {
                Err(e)
                    if e.is_transient()
                        && attempt < self.retry.max_attempts
                        && !self.cancel.is_cancelled() =>
                {
                    info!(
                        input = %job.input.display(),
                        attempt,
                        "retrying after transient error: {}",
                        e
                    );
                    thread::sleep(self.retry.delay_after(attempt));
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

/// 结果流
///
/// 惰性、有限、不可重启；按完成顺序产出结果。
pub struct OutcomeStream {
    rx: Receiver<Outcome>,
    total: usize,
    received: usize,
    dispatch: Arc<Dispatch>,
    _pool: Option<rayon::ThreadPool>,
}

impl OutcomeStream {
    fn new(
        rx: Receiver<Outcome>,
        total: usize,
        dispatch: Arc<Dispatch>,
        pool: Option<rayon::ThreadPool>,
    ) -> Self {
        Self {
            rx,
            total,
            received: 0,
            dispatch,
            _pool: pool,
        }
    }

    /// 本批次的作业总数
    pub fn total(&self) -> usize {
        self.total
    }

    /// 迄今为止同时执行的作业数峰值
    pub fn peak_in_flight(&self) -> usize {
        self.dispatch.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl Iterator for OutcomeStream {
    type Item = Outcome;

    fn next(&mut self) -> Option<Outcome> {
        if self.received >= self.total {
            return None;
        }
        let outcome = self.rx.recv().ok()?;
        self.received += 1;
        if self.received == self.total {
            debug!(
                total = self.total,
                peak_in_flight = self.peak_in_flight(),
                "batch drained"
            );
        }
        Some(outcome)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.total - self.received))
    }
}
