//! # 编解码器
//!
//! 转换单元通过 [`Codec`] trait 调用具体的图像库，批处理核心不关心背后是哪个库。
//! 默认实现 [`ImageCodec`] 基于 `image` crate。
//!
//! ## 依赖关系
//! - 被 `transform/convert.rs` 使用
//! - 使用 `image` crate 进行解码/编码

use crate::models::ImageFormat;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageDecoder, ImageEncoder, ImageError, ImageReader};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// 编解码器报告的错误
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("decode failed: {0}")]
    Decode(String),

    #[error("encode failed: {0}")]
    Encode(String),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("codec I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ImageError> for CodecError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::IoError(e) => CodecError::Io(e),
            ImageError::Decoding(e) => CodecError::Decode(e.to_string()),
            ImageError::Limits(e) => CodecError::Decode(e.to_string()),
            ImageError::Unsupported(e) => CodecError::Unsupported(e.to_string()),
            ImageError::Encoding(e) => CodecError::Encode(e.to_string()),
            ImageError::Parameter(e) => CodecError::Encode(e.to_string()),
        }
    }
}

/// 嵌入元数据的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataPolicy {
    /// 丢弃
    #[default]
    Strip,
    /// 尽可能保留（目前为 ICC 色彩配置）
    Preserve,
}

impl MetadataPolicy {
    pub fn from_flag(preserve: bool) -> Self {
        if preserve {
            MetadataPolicy::Preserve
        } else {
            MetadataPolicy::Strip
        }
    }
}

/// 图像编解码器
pub trait Codec: Send + Sync {
    /// 解码 `input` 并以 `target` 格式写入 `output`，返回写入的字节数
    fn encode(
        &self,
        input: &Path,
        output: &mut File,
        target: ImageFormat,
        policy: MetadataPolicy,
    ) -> Result<u64, CodecError>;
}

/// 基于 `image` crate 的编解码器
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn encode(
        &self,
        input: &Path,
        output: &mut File,
        target: ImageFormat,
        policy: MetadataPolicy,
    ) -> Result<u64, CodecError> {
        let reader = ImageReader::open(input)?.with_guessed_format()?;
        let mut decoder = reader.into_decoder().map_err(decode_error)?;

        let icc = match policy {
            MetadataPolicy::Preserve => decoder.icc_profile().map_err(decode_error)?,
            MetadataPolicy::Strip => None,
        };

        let img = DynamicImage::from_decoder(decoder).map_err(decode_error)?;
        let img = if target.supports_alpha() {
            img
        } else {
            DynamicImage::ImageRgb8(img.to_rgb8())
        };

        {
            let mut writer = BufWriter::new(&mut *output);
            write_image(&img, &mut writer, target, icc, input)?;
            writer.flush()?;
        }

        let bytes = output.metadata()?.len();
        debug!(input = %input.display(), %target, bytes, "encoded");
        Ok(bytes)
    }
}

/// 解码阶段的错误：无法识别的输入格式也算作解码失败
fn decode_error(err: ImageError) -> CodecError {
    match CodecError::from(err) {
        CodecError::Unsupported(reason) => CodecError::Decode(reason),
        other => other,
    }
}

/// 写出图像；需要保留 ICC 配置时使用具体编码器
fn write_image<W: Write + Seek>(
    img: &DynamicImage,
    writer: &mut W,
    target: ImageFormat,
    icc: Option<Vec<u8>>,
    input: &Path,
) -> Result<(), CodecError> {
    let Some(icc) = icc else {
        img.write_to(writer, target.to_image_format())?;
        return Ok(());
    };

    match target {
        ImageFormat::Png => {
            let mut encoder = PngEncoder::new(writer);
            attach_icc(&mut encoder, icc, target, input);
            img.write_with_encoder(encoder)?;
        }
        ImageFormat::Jpeg => {
            let mut encoder = JpegEncoder::new(writer);
            attach_icc(&mut encoder, icc, target, input);
            img.write_with_encoder(encoder)?;
        }
        _ => {
            warn!(
                input = %input.display(),
                %target,
                "ICC profile cannot be embedded in this format, dropping it"
            );
            img.write_to(writer, target.to_image_format())?;
        }
    }
    Ok(())
}

fn attach_icc<E: ImageEncoder>(encoder: &mut E, icc: Vec<u8>, target: ImageFormat, input: &Path) {
    if let Err(e) = encoder.set_icc_profile(icc) {
        warn!(input = %input.display(), %target, "ICC profile dropped: {}", e);
    }
}
