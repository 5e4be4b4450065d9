//! # 日志初始化
//!
//! 使用 `tracing-subscriber` 输出到 stderr。过滤规则优先取环境变量
//! `IMGBATCH_LOG`，否则由 `-v` 次数决定。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 控制日志级别的环境变量
pub const LOG_ENV: &str = "IMGBATCH_LOG";

/// `-v` 次数对应的默认过滤规则
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// 初始化全局日志
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}
