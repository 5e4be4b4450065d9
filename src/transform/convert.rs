//! # 格式转换单元
//!
//! 调用编解码器把输入图像转换为目标格式。
//!
//! ## 依赖关系
//! - 使用 `codec/` 进行解码/编码
//! - 被 `commands/convert.rs`、`commands/bulk.rs` 使用

use super::{write_atomically, TransformOptions, TransformUnit};
use crate::codec::{Codec, MetadataPolicy};
use crate::error::JobError;
use crate::models::{Job, TransformInfo};

/// 图像格式转换单元
#[derive(Debug, Clone)]
pub struct ConvertUnit<C> {
    codec: C,
    options: TransformOptions,
}

impl<C: Codec> ConvertUnit<C> {
    pub fn new(codec: C, options: TransformOptions) -> Self {
        Self { codec, options }
    }
}

impl<C: Codec> TransformUnit for ConvertUnit<C> {
    fn transform(&self, job: &Job) -> Result<TransformInfo, JobError> {
        let target = self.options.target_format;
        let policy = MetadataPolicy::from_flag(self.options.preserve_metadata);

        let bytes = write_atomically(&job.output, |file| {
            self.codec
                .encode(&job.input, file, target, policy)
                .map_err(|e| JobError::from_codec(&job.input, e))
        })?;

        Ok(TransformInfo::new(bytes).with_detail(format!("converted to {}", target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ImageCodec;
    use crate::models::ImageFormat;
    use crate::test_support;
    use std::fs;
    use tempfile::TempDir;

    fn unit(target: ImageFormat) -> ConvertUnit<ImageCodec> {
        ConvertUnit::new(ImageCodec, TransformOptions::new(target))
    }

    #[test]
    fn test_convert_jpeg_to_png() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("a.jpg");
        test_support::write_jpeg(&input, 10, 5);

        let job = Job {
            index: 0,
            input: input.clone(),
            output: dir.path().join("a.png"),
        };
        let info = unit(ImageFormat::Png).transform(&job).unwrap();

        assert!(info.bytes_written > 0);
        assert_eq!(info.bytes_written, fs::metadata(&job.output).unwrap().len());
        let img = image::open(&job.output).unwrap();
        assert_eq!((img.width(), img.height()), (10, 5));
    }

    #[test]
    fn test_rerun_overwrites() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("a.png");
        test_support::write_png(&input, 3, 3);
        let job = Job {
            index: 0,
            input,
            output: dir.path().join("a.bmp"),
        };

        let first = unit(ImageFormat::Bmp).transform(&job).unwrap();
        let second = unit(ImageFormat::Bmp).transform(&job).unwrap();
        assert_eq!(first.bytes_written, second.bytes_written);
        assert_eq!(
            fs::metadata(&job.output).unwrap().len(),
            second.bytes_written
        );
    }

    #[test]
    fn test_corrupt_input_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("bad.jpg");
        test_support::write_corrupt(&input);
        let job = Job {
            index: 0,
            input,
            output: dir.path().join("bad.png"),
        };

        let err = unit(ImageFormat::Png).transform(&job).unwrap_err();
        assert!(matches!(err, JobError::CorruptInput { .. }), "got {:?}", err);
        assert!(!job.output.exists());
        // 只剩输入文件，没有遗留临时文件
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = TempDir::new().unwrap();
        let job = Job {
            index: 0,
            input: dir.path().join("gone.jpg"),
            output: dir.path().join("gone.png"),
        };
        let err = unit(ImageFormat::Png).transform(&job).unwrap_err();
        assert!(matches!(err, JobError::Io { .. }));
        assert!(err.is_transient());
    }
}
