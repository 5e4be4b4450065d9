//! # 元数据导出单元
//!
//! 读取每张图像的元数据标签，写成 JSON 或 CSV 旁路文件。
//! 与格式转换共用同一个批处理执行器，只是转换单元不同。
//!
//! ## 依赖关系
//! - 使用 `metadata/` 读取标签
//! - 使用 `serde_json` / `csv` 序列化
//! - 被 `commands/bulk.rs` 使用

use super::{write_atomically, TransformUnit};
use crate::error::JobError;
use crate::metadata::{MetadataReader, MetadataTags};
use crate::models::{Job, TransformInfo};

use serde::Serialize;
use std::fs::File;
use std::io::{self, Write};

/// 导出文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// JSON 导出的文档结构
#[derive(Debug, Serialize)]
struct MetadataRecord<'a> {
    source: String,
    tags: &'a MetadataTags,
}

/// 元数据导出单元
#[derive(Debug, Clone)]
pub struct MetadataExportUnit<R> {
    reader: R,
    format: ExportFormat,
}

impl<R: MetadataReader> MetadataExportUnit<R> {
    pub fn new(reader: R, format: ExportFormat) -> Self {
        Self { reader, format }
    }
}

impl<R: MetadataReader> TransformUnit for MetadataExportUnit<R> {
    fn transform(&self, job: &Job) -> Result<TransformInfo, JobError> {
        let tags = self.reader.read_metadata(&job.input)?;

        let bytes = write_atomically(&job.output, |file| {
            let result = match self.format {
                ExportFormat::Json => write_json(file, &job.input.display().to_string(), &tags),
                ExportFormat::Csv => write_csv(file, &tags),
            };
            result
                .and_then(|_| file.metadata().map(|m| m.len()))
                .map_err(|e| JobError::io(&job.output, e))
        })?;

        Ok(TransformInfo::new(bytes).with_detail(format!("{} tags", tags.len())))
    }
}

fn write_json(file: &mut File, source: &str, tags: &MetadataTags) -> io::Result<()> {
    let record = MetadataRecord {
        source: source.to_string(),
        tags,
    };
    serde_json::to_writer_pretty(&mut *file, &record)?;
    file.write_all(b"\n")?;
    file.flush()
}

fn write_csv(file: &mut File, tags: &MetadataTags) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(&mut *file);
    wtr.write_record(["key", "value"])?;
    for (key, value) in tags {
        wtr.write_record([key, value])?;
    }
    wtr.flush()
}
