//! # 转换单元
//!
//! [`TransformUnit`] 是批处理执行器调用的单个作业契约：给定一个 `Job`，
//! 写出 `job.output` 或返回错误。转换单元不持有共享的可变状态。
//!
//! 所有实现都通过 [`write_atomically`] 写出结果：先写入同目录下的临时文件，
//! 成功后再重命名覆盖目标路径，失败时不留下半成品。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用
//! - 子模块: convert (格式转换), export (元数据导出)
//! - 使用 `tempfile` 实现原子写入

pub mod convert;
pub mod export;

pub use convert::ConvertUnit;
pub use export::{ExportFormat, MetadataExportUnit};

use crate::error::JobError;
use crate::models::{ImageFormat, Job, TransformInfo};

use std::fs::File;
use std::io;
use std::path::Path;
use tempfile::NamedTempFile;

/// 单个作业的转换契约
pub trait TransformUnit: Send + Sync {
    fn transform(&self, job: &Job) -> Result<TransformInfo, JobError>;
}

/// 转换选项，在批次开始时校验一次
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    pub target_format: ImageFormat,
    pub preserve_metadata: bool,
}

impl TransformOptions {
    pub fn new(target_format: ImageFormat) -> Self {
        Self {
            target_format,
            preserve_metadata: false,
        }
    }

    pub fn preserve_metadata(mut self, preserve: bool) -> Self {
        self.preserve_metadata = preserve;
        self
    }
}

/// 通过同目录临时文件原子地写出 `output`
///
/// `write` 返回写入的字节数；它出错时临时文件被删除，`output` 保持原样。
/// 输出目录不存在时返回 I/O 错误，不会自动创建。
pub fn write_atomically<F>(output: &Path, write: F) -> Result<u64, JobError>
where
    F: FnOnce(&mut File) -> Result<u64, JobError>,
{
    let dir = match output.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !dir.is_dir() {
        return Err(JobError::io(
            dir,
            io::Error::new(io::ErrorKind::NotFound, "output directory does not exist"),
        ));
    }

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| JobError::io(dir, e))?;
    let bytes = write(tmp.as_file_mut())?;
    tmp.as_file().sync_all().map_err(|e| JobError::io(output, e))?;
    tmp.persist(output)
        .map_err(|e| JobError::io(output, e.error))?;
    Ok(bytes)
}
