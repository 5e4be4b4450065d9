//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `transform/`, `utils/`
//! - 子模块: convert, bulk

pub mod bulk;
pub mod convert;

use crate::batch::CancelToken;
use crate::cli::Commands;
use crate::error::Result;
use crate::models::ExitStatus;
use crate::transform::ExportFormat;

/// 执行命令，返回进程退出状态
pub fn run(cmd: Commands, cancel: CancelToken) -> Result<ExitStatus> {
    match cmd {
        Commands::Convert(args) => convert::execute(args),
        Commands::BulkConvert(args) => bulk::execute_convert(args, cancel),
        Commands::BulkExportJson(args) => bulk::execute_export(args, ExportFormat::Json, cancel),
        Commands::BulkExportCsv(args) => bulk::execute_export(args, ExportFormat::Csv, cancel),
    }
}
