//! # convert 子命令 CLI 定义
//!
//! 单文件图像格式转换
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use clap::Args;
use std::path::PathBuf;

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input image file
    pub input: PathBuf,

    /// Output file or existing directory (default: next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Target format (default: inferred from the output extension, else png)
    #[arg(short = 't', long = "to-extension", visible_alias = "format")]
    pub format: Option<String>,

    /// Keep embedded metadata (ICC profile) where the target format allows it
    #[arg(long, default_value_t = false)]
    pub preserve_metadata: bool,
}
