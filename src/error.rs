//! # 统一错误处理模块
//!
//! 定义 imgbatch 的错误类型，使用 `thiserror` 派生。
//!
//! 错误分两层：
//! - [`ImgbatchError`]: 预检/进程级错误，在任何作业调度前中止整个批次
//! - [`JobError`]: 单个作业的错误，只会被包装成 `Outcome::Failure`，不会向上传播
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 包装 `codec::CodecError` 与 `metadata::ReadError`

use crate::codec::CodecError;
use crate::metadata::ReadError;

use std::path::PathBuf;
use thiserror::Error;

/// imgbatch 进程级错误类型
#[derive(Error, Debug)]
pub enum ImgbatchError {
    // ─────────────────────────────────────────────────────────────
    // 预检错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Path not found: {path}")]
    NotFound { path: String },

    #[error("Output path exists and is not a directory: {path}")]
    OutputNotDirectory { path: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to write: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, ImgbatchError>;

/// 单个作业的错误
#[derive(Error, Debug)]
pub enum JobError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt input {}: {reason}", path.display())]
    CorruptInput { path: PathBuf, reason: String },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    MetadataRead(#[from] ReadError),
}

impl JobError {
    /// 构造 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        JobError::Io {
            path: path.into(),
            source,
        }
    }

    /// 按编解码器错误的类别归类
    ///
    /// 解码失败（含无法识别的输入格式）归为 `CorruptInput`；
    /// 编码器不支持的目标格式归为 `UnsupportedFormat`；底层 I/O 归为 `Io`。
    /// 其余错误原样包装。
    pub fn from_codec(input: &std::path::Path, err: CodecError) -> Self {
        match err {
            CodecError::Decode(reason) => JobError::CorruptInput {
                path: input.to_path_buf(),
                reason,
            },
            CodecError::Unsupported(what) => JobError::UnsupportedFormat(what),
            CodecError::Io(source) => JobError::io(input, source),
            other => JobError::Codec(other),
        }
    }

    /// 是否为可能是暂时性的错误（仅 I/O 错误可重试）
    pub fn is_transient(&self) -> bool {
        matches!(self, JobError::Io { .. })
    }
}
