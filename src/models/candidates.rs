//! # 候选文件集合
//!
//! 一次批处理中待转换的文件列表：有序、去重、创建后不可变。
//!
//! ## 依赖关系
//! - 由 `batch/collector.rs` 创建
//! - 被 `batch/runner.rs` 消费

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 有序、去重、不可变的候选文件集合
///
/// 内部使用 `Arc<[PathBuf]>`，克隆开销很小，可以在工作线程间共享。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateSet {
    paths: Arc<[PathBuf]>,
}

impl CandidateSet {
    /// 从路径列表创建，保留首次出现的顺序并去除重复项
    pub fn new(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        let mut seen = HashSet::new();
        let paths: Vec<PathBuf> = paths
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
        Self {
            paths: paths.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}
