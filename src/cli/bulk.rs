//! # bulk-* 子命令 CLI 定义
//!
//! 批量格式转换 (`bulk-convert`) 与批量元数据导出 (`bulk-export-json`,
//! `bulk-export-csv`)，共用同一组源文件参数。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/bulk.rs`

use clap::Args;
use std::path::PathBuf;

/// 批处理共用的源文件参数
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Root directory to search
    #[arg(short = 'p', long = "root-path", visible_alias = "input", default_value = "./")]
    pub root: PathBuf,

    /// Extension of the files to process (case-insensitive, no leading dot)
    #[arg(short = 'f', long = "from-extension", default_value = "jpg")]
    pub from: String,

    /// Output directory; the layout under the root is mirrored (default: next to inputs)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel jobs (default: auto)
    #[arg(short, long, env = "IMGBATCH_JOBS")]
    pub jobs: Option<usize>,

    /// Only look at files directly inside the root
    #[arg(long, default_value_t = false)]
    pub no_recursive: bool,

    /// Do not draw a progress bar
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

/// bulk-convert 子命令参数
#[derive(Args, Debug)]
pub struct BulkConvertArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Target format
    #[arg(short = 't', long = "to-extension", default_value = "png")]
    pub to: String,

    /// Keep embedded metadata (ICC profile) where the target format allows it
    #[arg(long, default_value_t = false)]
    pub preserve_metadata: bool,

    /// Retry jobs that fail with an I/O error up to N times
    #[arg(long, env = "IMGBATCH_RETRIES", default_value_t = 0)]
    pub retries: u32,
}

/// bulk-export-* 子命令参数
#[derive(Args, Debug)]
pub struct BulkExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Retry jobs that fail with an I/O error up to N times
    #[arg(long, env = "IMGBATCH_RETRIES", default_value_t = 0)]
    pub retries: u32,
}

#[cfg(test)]
mod tests {
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_bulk_convert_defaults() {
        let cli = Cli::try_parse_from(["imgbatch", "bulk-convert"]).unwrap();
        let Commands::BulkConvert(args) = cli.command else {
            panic!("expected bulk-convert");
        };
        assert_eq!(args.source.root, PathBuf::from("./"));
        assert_eq!(args.source.from, "jpg");
        assert_eq!(args.to, "png");
        assert_eq!(args.retries, 0);
        assert!(!args.preserve_metadata);
        assert!(!args.source.no_recursive);
    }

    #[test]
    fn test_bulk_convert_flags() {
        let cli = Cli::try_parse_from([
            "imgbatch",
            "-vv",
            "bulk-convert",
            "-p",
            "photos",
            "-f",
            "PNG",
            "-t",
            "webp",
            "-o",
            "out",
            "-j",
            "3",
            "--preserve-metadata",
            "--no-recursive",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::BulkConvert(args) = cli.command else {
            panic!("expected bulk-convert");
        };
        assert_eq!(args.source.root, PathBuf::from("photos"));
        assert_eq!(args.source.from, "PNG");
        assert_eq!(args.to, "webp");
        assert_eq!(args.source.output, Some(PathBuf::from("out")));
        assert_eq!(args.source.jobs, Some(3));
        assert!(args.preserve_metadata);
        assert!(args.source.no_recursive);
    }

    #[test]
    fn test_negative_jobs_rejected_by_parser() {
        assert!(Cli::try_parse_from(["imgbatch", "bulk-convert", "-j", "-1"]).is_err());
    }

    #[test]
    fn test_export_commands() {
        let cli = Cli::try_parse_from(["imgbatch", "bulk-export-csv", "--input", "pics"]).unwrap();
        assert!(matches!(cli.command, Commands::BulkExportCsv(_)));
        let cli = Cli::try_parse_from(["imgbatch", "bulk-export-json"]).unwrap();
        assert!(matches!(cli.command, Commands::BulkExportJson(_)));
    }
}
