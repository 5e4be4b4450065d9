//! # 输出路径命名规则
//!
//! 由候选文件推导输出路径：去掉源扩展名，加上目标扩展名；
//! 指定输出目录时按相对根目录的层级镜像到输出目录。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 调用以在调度前创建 `Job`
//! - 被 `commands/` 调用以在预检阶段创建输出目录

use crate::error::{ImgbatchError, Result};
use crate::models::{CandidateSet, Job};

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

/// 作业工厂
#[derive(Debug, Clone)]
pub struct JobFactory {
    /// 候选文件的根目录，用于计算相对路径
    root: PathBuf,
    /// 输出目录；为空时输出写在输入旁边
    output_dir: Option<PathBuf>,
    /// 目标扩展名（不带点）
    extension: String,
}

impl JobFactory {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            output_dir: None,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.output_dir = dir;
        self
    }

    /// 计算输入文件对应的输出路径
    pub fn output_for(&self, input: &Path) -> PathBuf {
        let file_name = input
            .file_name()
            .map(|n| Path::new(n).with_extension(&self.extension))
            .unwrap_or_else(|| PathBuf::from(format!("output.{}", self.extension)));

        let parent = input.parent().unwrap_or_else(|| Path::new(""));
        let dir = match &self.output_dir {
            Some(out) => {
                let relative = parent.strip_prefix(&self.root).unwrap_or(Path::new(""));
                out.join(relative)
            }
            None => parent.to_path_buf(),
        };

        dir.join(file_name)
    }

    /// 为第 `index` 个候选文件创建作业
    pub fn make(&self, index: usize, input: &Path) -> Job {
        Job {
            index,
            input: input.to_path_buf(),
            output: self.output_for(input),
        }
    }

    /// 预检：输出不得覆盖输入，两个候选文件不得映射到同一输出
    pub fn check_outputs(&self, candidates: &CandidateSet) -> Result<()> {
        let mut claimed: HashMap<PathBuf, &Path> = HashMap::with_capacity(candidates.len());
        for input in candidates.iter() {
            let output = self.output_for(input);
            if output == input {
                return Err(ImgbatchError::InvalidInput(format!(
                    "output would overwrite the input '{}'",
                    input.display()
                )));
            }
            if let Some(previous) = claimed.insert(output.clone(), input) {
                return Err(ImgbatchError::InvalidInput(format!(
                    "'{}' and '{}' would both be written to '{}'",
                    previous.display(),
                    input.display(),
                    output.display()
                )));
            }
        }
        Ok(())
    }

    /// 预检阶段创建全部输出目录
    pub fn prepare_dirs(&self, candidates: &CandidateSet) -> Result<()> {
        if self.output_dir.is_none() {
            return Ok(());
        }

        let dirs: BTreeSet<PathBuf> = candidates
            .iter()
            .filter_map(|input| self.output_for(input).parent().map(Path::to_path_buf))
            .collect();

        for dir in dirs {
            fs::create_dir_all(&dir).map_err(|e| ImgbatchError::FileWriteError {
                path: dir.display().to_string(),
                source: e,
            })?;
        }
        Ok(())
    }
}
