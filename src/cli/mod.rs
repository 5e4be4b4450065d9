//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `convert`: 单文件格式转换
//! - `bulk-convert`: 批量格式转换
//! - `bulk-export-json`: 批量导出元数据为 JSON
//! - `bulk-export-csv`: 批量导出元数据为 CSV
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: convert, bulk

pub mod bulk;
pub mod convert;

use clap::{ArgAction, Parser, Subcommand};

/// imgbatch - 批量图像格式转换工具
#[derive(Parser)]
#[command(name = "imgbatch")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch image format conversion and metadata export", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); IMGBATCH_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Convert a single image to another format
    Convert(convert::ConvertArgs),

    /// Convert every matching image under a directory
    BulkConvert(bulk::BulkConvertArgs),

    /// Export metadata of every matching image as JSON sidecar files
    BulkExportJson(bulk::BulkExportArgs),

    /// Export metadata of every matching image as CSV sidecar files
    BulkExportCsv(bulk::BulkExportArgs),
}
