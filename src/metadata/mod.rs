//! # 元数据读取
//!
//! 导出元数据的批处理变体通过 [`MetadataReader`] 读取图像的键值标签。
//! 默认实现 [`ImageMetadataReader`] 只读取头部信息，不解码像素。
//!
//! ## 依赖关系
//! - 被 `transform/export.rs` 使用
//! - 使用 `image` crate 读取头部

use image::{ImageDecoder, ImageReader};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 有序的键值标签
pub type MetadataTags = BTreeMap<String, String>;

/// 读取元数据时的错误
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read image header of {}: {reason}", path.display())]
    Header { path: PathBuf, reason: String },
}

/// 元数据读取器
pub trait MetadataReader: Send + Sync {
    fn read_metadata(&self, path: &Path) -> Result<MetadataTags, ReadError>;
}

/// 基于 `image` crate 的元数据读取器
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageMetadataReader;

impl MetadataReader for ImageMetadataReader {
    fn read_metadata(&self, path: &Path) -> Result<MetadataTags, ReadError> {
        let open_err = |source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        };
        let header_err = |e: image::ImageError| ReadError::Header {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let size = fs::metadata(path).map_err(open_err)?.len();
        let reader = ImageReader::open(path)
            .and_then(|r| r.with_guessed_format())
            .map_err(open_err)?;
        let format = reader.format();
        let mut decoder = reader.into_decoder().map_err(header_err)?;

        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();
        let icc = decoder.icc_profile().map_err(header_err)?;
        let exif = decoder.exif_metadata().map_err(header_err)?;

        let mut tags = MetadataTags::new();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        tags.insert("file.name".to_string(), name);
        tags.insert("file.size".to_string(), size.to_string());
        if let Some(format) = format {
            tags.insert(
                "image.format".to_string(),
                format!("{:?}", format).to_lowercase(),
            );
        }
        tags.insert("image.width".to_string(), width.to_string());
        tags.insert("image.height".to_string(), height.to_string());
        tags.insert("image.color_type".to_string(), format!("{:?}", color_type));
        tags.insert(
            "image.icc_profile_bytes".to_string(),
            icc.map_or(0, |p| p.len()).to_string(),
        );
        tags.insert(
            "image.exif_bytes".to_string(),
            exif.map_or(0, |e| e.len()).to_string(),
        );
        Ok(tags)
    }
}
