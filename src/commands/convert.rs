//! # convert 命令实现
//!
//! 单文件图像格式转换。
//!
//! ## 功能
//! - 目标格式取自 `--to-extension`，否则由输出路径扩展名推断，默认 png
//! - 输出路径默认与输入同目录；给出已存在的目录时写入该目录
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `transform/convert.rs`、`codec/`
//! - 使用 `utils/output.rs`

use crate::batch::FileCollector;
use crate::cli::convert::ConvertArgs;
use crate::codec::ImageCodec;
use crate::error::{ImgbatchError, Result};
use crate::models::{ExitStatus, ImageFormat, Job};
use crate::transform::{ConvertUnit, TransformOptions, TransformUnit};
use crate::utils::output;

use std::path::{Path, PathBuf};

/// 默认目标格式
const DEFAULT_TARGET: ImageFormat = ImageFormat::Png;

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<ExitStatus> {
    let candidates = FileCollector::single(&args.input)?;
    let input = candidates
        .get(0)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| args.input.clone());

    let target = resolve_target(args.format.as_deref(), args.output.as_deref())?;
    let output_path = resolve_output(&input, args.output.as_deref(), target)?;

    output::print_header(&format!("Converting to {} format", target));

    let options = TransformOptions::new(target).preserve_metadata(args.preserve_metadata);
    let unit = ConvertUnit::new(ImageCodec, options);
    let job = Job {
        index: 0,
        input,
        output: output_path,
    };

    match unit.transform(&job) {
        Ok(_) => {
            output::print_conversion(
                &job.input.display().to_string(),
                &job.output.display().to_string(),
            );
            Ok(ExitStatus::Success)
        }
        Err(e) => {
            output::print_error(&format!("{}: {}", job.input.display(), e));
            Ok(ExitStatus::PartialFailure)
        }
    }
}

/// 决定目标格式：显式参数 > 输出扩展名 > 默认值
fn resolve_target(format: Option<&str>, output: Option<&Path>) -> Result<ImageFormat> {
    if let Some(format) = format {
        return format.parse();
    }
    match output {
        Some(path) if !path.is_dir() => match path.extension() {
            Some(_) => ImageFormat::from_path(path).ok_or_else(|| {
                ImgbatchError::UnsupportedFormat(format!(
                    "cannot infer a supported format from '{}'",
                    path.display()
                ))
            }),
            None => Ok(DEFAULT_TARGET),
        },
        _ => Ok(DEFAULT_TARGET),
    }
}

/// 决定输出路径
fn resolve_output(input: &Path, output: Option<&Path>, target: ImageFormat) -> Result<PathBuf> {
    let file_name = input
        .file_name()
        .map(|n| Path::new(n).with_extension(target.extension()))
        .ok_or_else(|| {
            ImgbatchError::InvalidInput(format!("'{}' has no file name", input.display()))
        })?;

    let path = match output {
        Some(dir) if dir.is_dir() => dir.join(file_name),
        Some(path) => path.to_path_buf(),
        None => input.with_file_name(file_name),
    };

    if path == input {
        return Err(ImgbatchError::InvalidInput(format!(
            "output would overwrite the input '{}'",
            input.display()
        )));
    }
    Ok(path)
}
