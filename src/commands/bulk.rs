//! # bulk-* 命令实现
//!
//! 批量格式转换与批量元数据导出。
//!
//! ## 功能
//! - 预检参数（根目录、过滤器、目标格式、输出目录、并发数）
//! - 收集候选文件，推导输出路径并创建镜像目录
//! - 在并发上限内执行并实时显示进度
//! - 打印汇总，返回退出状态
//!
//! ## 依赖关系
//! - 使用 `cli/bulk.rs` 定义的参数
//! - 使用 `batch/`, `transform/`, `codec/`, `metadata/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::{
    self, BatchRunner, CancelToken, Concurrency, FileCollector, JobFactory, RetryPolicy,
};
use crate::cli::bulk::{BulkConvertArgs, BulkExportArgs, SourceArgs};
use crate::codec::ImageCodec;
use crate::error::{ImgbatchError, Result};
use crate::metadata::ImageMetadataReader;
use crate::models::{ExitStatus, ImageFormat};
use crate::transform::{ConvertUnit, ExportFormat, MetadataExportUnit, TransformOptions, TransformUnit};
use crate::utils::{output, progress};

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// 一次批处理的已验证配置
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub root: PathBuf,
    pub filter: String,
    pub output_dir: Option<PathBuf>,
    pub recursive: bool,
    pub concurrency: Concurrency,
    pub retry: RetryPolicy,
    pub quiet: bool,
}

impl BatchConfig {
    /// 由命令行参数构建并验证，所有致命错误在任何作业开始前返回
    pub fn validate(source: &SourceArgs, retries: u32) -> Result<Self> {
        let concurrency = Concurrency::from_option(source.jobs)?;

        let filter = source.from.trim().trim_start_matches('.').to_string();
        if filter.is_empty() {
            return Err(ImgbatchError::InvalidInput(
                "format filter must not be empty".to_string(),
            ));
        }

        if !source.root.exists() {
            return Err(ImgbatchError::NotFound {
                path: source.root.display().to_string(),
            });
        }
        if !source.root.is_dir() {
            return Err(ImgbatchError::InvalidInput(format!(
                "'{}' is not a directory",
                source.root.display()
            )));
        }

        if let Some(out) = &source.output {
            if out.exists() && !out.is_dir() {
                return Err(ImgbatchError::OutputNotDirectory {
                    path: out.display().to_string(),
                });
            }
            fs::create_dir_all(out).map_err(|e| ImgbatchError::FileWriteError {
                path: out.display().to_string(),
                source: e,
            })?;
        }

        Ok(Self {
            root: source.root.clone(),
            filter,
            output_dir: source.output.clone(),
            recursive: !source.no_recursive,
            concurrency,
            retry: RetryPolicy::with_retries(retries),
            quiet: source.quiet,
        })
    }
}

/// 执行 bulk-convert 命令
pub fn execute_convert(args: BulkConvertArgs, cancel: CancelToken) -> Result<ExitStatus> {
    let target: ImageFormat = args.to.parse()?;
    let config = BatchConfig::validate(&args.source, args.retries)?;

    if config.output_dir.is_none() && ImageFormat::from_extension(&config.filter) == Some(target) {
        return Err(ImgbatchError::InvalidInput(format!(
            "source and target format are both {}; use -o to write elsewhere",
            target
        )));
    }

    output::print_header(&format!(
        "Converting {} to {} format",
        config.filter.to_lowercase(),
        target
    ));

    let options = TransformOptions::new(target).preserve_metadata(args.preserve_metadata);
    let unit: Arc<dyn TransformUnit> = Arc::new(ConvertUnit::new(ImageCodec, options));
    run_batch(&config, target.extension(), unit, cancel)
}

/// 执行 bulk-export-json / bulk-export-csv 命令
pub fn execute_export(
    args: BulkExportArgs,
    format: ExportFormat,
    cancel: CancelToken,
) -> Result<ExitStatus> {
    let config = BatchConfig::validate(&args.source, args.retries)?;

    output::print_header(&format!(
        "Exporting {} metadata as {}",
        config.filter.to_lowercase(),
        format
    ));

    let unit: Arc<dyn TransformUnit> =
        Arc::new(MetadataExportUnit::new(ImageMetadataReader, format));
    run_batch(&config, format.extension(), unit, cancel)
}

/// 收集、预检、调度并汇总
fn run_batch(
    config: &BatchConfig,
    extension: &str,
    unit: Arc<dyn TransformUnit>,
    cancel: CancelToken,
) -> Result<ExitStatus> {
    let mut collector = FileCollector::new(&config.root)
        .with_filter(&config.filter)?
        .recursive(config.recursive);
    if let Some(out) = &config.output_dir {
        collector = collector.exclude(out);
    }
    let candidates = collector.collect()?;

    if candidates.is_empty() {
        output::print_warning(&format!(
            "No files matched '*.{}' under {}",
            config.filter,
            config.root.display()
        ));
        return Ok(ExitStatus::Success);
    }

    output::print_info(&format!("Found {} files to process", candidates.len()));

    let factory =
        JobFactory::new(&config.root, extension).with_output_dir(config.output_dir.clone());
    factory.check_outputs(&candidates)?;
    factory.prepare_dirs(&candidates)?;

    let runner = BatchRunner::new(config.concurrency)
        .with_retry(config.retry)
        .with_cancel(cancel);
    info!(
        jobs = config.concurrency.effective(candidates.len()),
        "starting batch"
    );
    if config.retry.is_enabled() {
        info!(
            retries = config.retry.max_attempts - 1,
            "retrying jobs that fail with I/O errors"
        );
    }

    let sink = progress::sink_for(config.quiet, "Processing");
    let report = batch::run_pipeline(&runner, candidates, factory, unit, sink)?;

    output::print_report(&report);
    Ok(report.exit_status())
}
