//! # 调度策略
//!
//! - [`Concurrency`]: 并发上限
//! - [`RetryPolicy`]: 可选的重试策略（默认不重试）
//! - [`CancelToken`]: 调用方提供的取消信号
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 使用
//! - 使用 `num_cpus` 推断默认并发度

use crate::error::{ImgbatchError, Result};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 自动并发度的上限
const AUTO_CONCURRENCY_CAP: usize = 32;

/// 并发上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    /// 固定上限（≥ 1）
    Fixed(usize),
    /// 根据 CPU 数推断
    Auto,
}

impl Concurrency {
    /// 固定并发度，0 为输入错误
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(ImgbatchError::InvalidInput(
                "concurrency limit must be at least 1".to_string(),
            ));
        }
        Ok(Concurrency::Fixed(limit))
    }

    /// 未指定时使用自动并发度
    pub fn from_option(limit: Option<usize>) -> Result<Self> {
        limit.map_or(Ok(Concurrency::Auto), Self::new)
    }

    /// 针对给定批次大小的实际工作线程数
    pub fn effective(self, batch_len: usize) -> usize {
        let limit = match self {
            Concurrency::Fixed(k) => k,
            Concurrency::Auto => (num_cpus::get() * 2).min(AUTO_CONCURRENCY_CAP),
        };
        limit.min(batch_len).max(1)
    }
}

/// 重试策略
///
/// 只重试 I/O 错误；无论重试几次，一个作业只产生一个结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 总尝试次数（含第一次），≥ 1
    pub max_attempts: u32,
    /// 每次重试前的等待时间，按尝试次数线性增长
    pub backoff: Duration,
}

impl RetryPolicy {
    /// 不重试
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// 失败后最多再重试 `retries` 次
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            backoff: Duration::from_millis(100),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 1
    }

    /// 第 `attempt` 次尝试失败后的等待时间
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// 取消信号
///
/// 发出后不再调度新作业，正在执行的作业允许完成。
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
