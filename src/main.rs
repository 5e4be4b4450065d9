//! # imgbatch - 批量图像格式转换工具
//!
//! 在目录树中查找某一格式的图像，并发转换为另一格式，或导出其元数据。
//!
//! ## 子命令
//! - `convert` - 单文件格式转换
//! - `bulk-convert` - 批量格式转换
//! - `bulk-export-json` / `bulk-export-csv` - 批量导出元数据
//!
//! ## 退出码
//! - `0` 全部成功；`1` 部分失败；`2` 预检失败；`130` 被中断
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (收集、调度、进度、汇总)
//!   │     ├── transform/ (转换单元)
//!   │     ├── codec/     (图像编解码)
//!   │     ├── metadata/  (元数据读取)
//!   │     └── models/    (数据模型)
//!   ├── utils/      (输出、进度条、日志、信号)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod codec;
mod commands;
mod error;
mod metadata;
mod models;
mod transform;
mod utils;

#[cfg(test)]
mod test_support;

use batch::CancelToken;
use clap::Parser;
use cli::Cli;
use models::ExitStatus;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::logging::init(cli.verbose);

    let cancel = CancelToken::new();
    utils::signal::install_ctrl_c(cancel.clone());

    let status = match commands::run(cli.command, cancel) {
        Ok(status) => status,
        Err(e) => {
            utils::output::print_error(&format!("{}", e));
            ExitStatus::Fatal
        }
    };
    std::process::exit(status.code());
}
