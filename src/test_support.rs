//! 测试用的图像样本与工具

use std::fs;
use std::path::Path;

/// 写出一张 w×h 的渐变 PNG
pub fn write_png(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img = image::RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x * 30) as u8, (y * 30) as u8, 128, 255])
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// 写出一张 w×h 的 JPEG
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    ensure_parent(path);
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 20) as u8, 90, (y * 20) as u8])
    });
    img.save_with_format(path, image::ImageFormat::Jpeg).unwrap();
}

/// 写出一个扩展名看起来正确、内容却不是图像的文件
pub fn write_corrupt(path: &Path) {
    ensure_parent(path);
    fs::write(path, b"definitely not image data").unwrap();
}

/// 创建文件（含父目录）
pub fn touch(path: &Path) {
    ensure_parent(path);
    fs::write(path, b"").unwrap();
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
}
