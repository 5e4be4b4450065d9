//! # Ctrl-C 处理
//!
//! 第一次 Ctrl-C 发出取消信号（不再调度新作业，已开始的作业跑完）；
//! 第二次直接退出。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `tokio::signal` 在独立线程上等待信号

use crate::batch::CancelToken;
use crate::models::ExitStatus;
use crate::utils::output;

use std::io;
use std::thread;
use tokio::runtime::{Builder, Runtime};
use tracing::warn;

/// 安装 Ctrl-C 处理
pub fn install_ctrl_c(cancel: CancelToken) {
    let runtime = match signal_runtime() {
        Ok(rt) => rt,
        Err(e) => {
            warn!("Ctrl-C handling unavailable: {}", e);
            return;
        }
    };

    let spawned = thread::Builder::new()
        .name("imgbatch-signal".to_string())
        .spawn(move || {
            runtime.block_on(async {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                output::print_warning("Interrupted, finishing in-flight jobs (Ctrl-C again to abort)");
                cancel.cancel();

                if tokio::signal::ctrl_c().await.is_ok() {
                    std::process::exit(ExitStatus::Cancelled.code());
                }
            });
        });

    if let Err(e) = spawned {
        warn!("Ctrl-C handling unavailable: {}", e);
    }
}

/// 等待信号用的单线程运行时
fn signal_runtime() -> io::Result<Runtime> {
    Builder::new_current_thread().enable_all().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_runtime_builds() {
        let runtime = signal_runtime().unwrap();
        assert_eq!(runtime.block_on(async { 1 + 1 }), 2);
    }
}
