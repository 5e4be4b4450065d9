//! # 图像格式
//!
//! 列举支持的编解码格式，负责扩展名解析（大小写不敏感、别名）以及与
//! `image` crate 格式枚举之间的映射。
//!
//! ## 依赖关系
//! - 被 `batch/collector.rs`（扩展名过滤）、`transform/`、`codec/` 使用

use crate::error::{ImgbatchError, Result};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// 支持的图像格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
    WebP,
    Ico,
    Tga,
    Pnm,
    Qoi,
}

impl ImageFormat {
    /// 所有支持的格式
    pub const ALL: [ImageFormat; 10] = [
        ImageFormat::Png,
        ImageFormat::Jpeg,
        ImageFormat::Gif,
        ImageFormat::Bmp,
        ImageFormat::Tiff,
        ImageFormat::WebP,
        ImageFormat::Ico,
        ImageFormat::Tga,
        ImageFormat::Pnm,
        ImageFormat::Qoi,
    ];

    /// 输出文件使用的规范扩展名
    pub fn extension(self) -> &'static str {
        self.extensions()[0]
    }

    /// 该格式接受的全部扩展名（小写，不带点），第一个为规范扩展名
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            ImageFormat::Png => &["png"],
            ImageFormat::Jpeg => &["jpg", "jpeg", "jpe"],
            ImageFormat::Gif => &["gif"],
            ImageFormat::Bmp => &["bmp"],
            ImageFormat::Tiff => &["tiff", "tif"],
            ImageFormat::WebP => &["webp"],
            ImageFormat::Ico => &["ico"],
            ImageFormat::Tga => &["tga"],
            ImageFormat::Pnm => &["pnm", "ppm", "pgm", "pbm"],
            ImageFormat::Qoi => &["qoi"],
        }
    }

    /// 从扩展名识别格式（大小写不敏感，允许前导点）
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.extensions().contains(&ext.as_str()))
    }

    /// 从文件路径的扩展名识别格式
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// 映射到 `image` crate 的格式枚举
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Gif => image::ImageFormat::Gif,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Ico => image::ImageFormat::Ico,
            ImageFormat::Tga => image::ImageFormat::Tga,
            ImageFormat::Pnm => image::ImageFormat::Pnm,
            ImageFormat::Qoi => image::ImageFormat::Qoi,
        }
    }

    /// 是否支持 alpha 通道；不支持时编码前需转换为 RGB8
    pub fn supports_alpha(self) -> bool {
        !matches!(self, ImageFormat::Jpeg | ImageFormat::Pnm)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Tiff => "tiff",
            other => other.extension(),
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ImageFormat {
    type Err = ImgbatchError;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(ImgbatchError::InvalidInput(
                "target format must not be empty".to_string(),
            ));
        }
        Self::from_extension(s).ok_or_else(|| ImgbatchError::UnsupportedFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("Jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!(".tif".parse::<ImageFormat>().unwrap(), ImageFormat::Tiff);
    }

    #[test]
    fn test_unknown_and_empty_formats() {
        assert!(matches!(
            "heic".parse::<ImageFormat>(),
            Err(ImgbatchError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            "  ".parse::<ImageFormat>(),
            Err(ImgbatchError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            ImageFormat::from_path(Path::new("shots/IMG_001.JPEG")),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(ImageFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_canonical_extension_is_first() {
        for format in ImageFormat::ALL {
            assert_eq!(format.extension(), format.extensions()[0]);
        }
        assert_eq!(ImageFormat::Jpeg.to_string(), "jpeg");
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }
}
