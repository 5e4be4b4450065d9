//! # 文件收集器
//!
//! 根据根目录和扩展名过滤器收集待处理文件列表。
//!
//! ## 功能
//! - 递归目录搜索（不跳过以点开头的隐藏目录）
//! - 扩展名过滤，大小写不敏感，已知格式自动包含别名（jpg → jpg/jpeg/jpe）
//! - 跟随符号链接，按规范路径去重
//! - 可排除输出目录，避免匹配到自己的输出
//!
//! ## 依赖关系
//! - 被 `commands/` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配文件名

use crate::error::{ImgbatchError, Result};
use crate::models::{CandidateSet, ImageFormat};

use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// 文件收集器
pub struct FileCollector {
    /// 根目录
    root: PathBuf,
    /// 文件名匹配模式（`*.ext`）
    patterns: Vec<Pattern>,
    /// 是否递归
    recursive: bool,
    /// 排除的目录（规范路径）
    excludes: Vec<PathBuf>,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            patterns: Vec::new(),
            recursive: true,
            excludes: Vec::new(),
        }
    }

    /// 在 `root` 下递归收集扩展名为 `filter` 的文件
    #[cfg(test)]
    pub fn match_files(root: &Path, filter: &str) -> Result<CandidateSet> {
        Self::new(root).with_filter(filter)?.collect()
    }

    /// 单文件模式
    pub fn single(path: &Path) -> Result<CandidateSet> {
        if !path.exists() {
            return Err(ImgbatchError::NotFound {
                path: path.display().to_string(),
            });
        }
        if path.is_dir() {
            return Err(ImgbatchError::InvalidInput(format!(
                "'{}' is a directory, expected a file",
                path.display()
            )));
        }
        Ok(CandidateSet::new(vec![path.to_path_buf()]))
    }

    /// 设置扩展名过滤器（不带点，大小写不敏感）
    pub fn with_filter(mut self, filter: &str) -> Result<Self> {
        let token = filter.trim().trim_start_matches('.');
        if token.is_empty() {
            return Err(ImgbatchError::InvalidInput(
                "format filter must not be empty".to_string(),
            ));
        }

        let extensions: Vec<String> = match ImageFormat::from_extension(token) {
            Some(format) => format.extensions().iter().map(|e| e.to_string()).collect(),
            None => vec![token.to_ascii_lowercase()],
        };

        self.patterns = extensions
            .iter()
            .map(|ext| Pattern::new(&format!("*.{}", Pattern::escape(ext))))
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| {
                ImgbatchError::InvalidInput(format!("Invalid filter '{}': {}", filter, e))
            })?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 排除根目录之下的某个目录（通常是位于根目录内的输出目录）
    ///
    /// 排除目录就是根目录本身时不生效。
    pub fn exclude(mut self, dir: &Path) -> Self {
        if let Ok(canonical) = fs::canonicalize(dir) {
            self.excludes.push(canonical);
        }
        self
    }

    /// 收集所有匹配的文件
    pub fn collect(&self) -> Result<CandidateSet> {
        if !self.root.exists() {
            return Err(ImgbatchError::NotFound {
                path: self.root.display().to_string(),
            });
        }
        if !self.root.is_dir() {
            return Err(ImgbatchError::InvalidInput(format!(
                "'{}' is not a directory",
                self.root.display()
            )));
        }
        if self.patterns.is_empty() {
            return Err(ImgbatchError::InvalidInput(
                "format filter must not be empty".to_string(),
            ));
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.depth() > 0 && e.file_type().is_dir() && self.is_excluded(e.path()))
            });

        let mut seen = HashSet::new();
        let mut files = Vec::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if let Some(ancestor) = e.loop_ancestor() {
                        warn!(ancestor = %ancestor.display(), "skipping symlink loop");
                    } else {
                        warn!("skipping unreadable entry: {}", e);
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.matches_patterns(entry.path()) {
                continue;
            }

            let key = fs::canonicalize(entry.path()).unwrap_or_else(|_| entry.path().to_path_buf());
            if seen.insert(key) {
                files.push(entry.into_path());
            }
        }

        debug!(root = %self.root.display(), count = files.len(), "collected candidates");
        Ok(CandidateSet::new(files))
    }

    fn is_excluded(&self, dir: &Path) -> bool {
        if self.excludes.is_empty() {
            return false;
        }
        fs::canonicalize(dir)
            .map(|c| self.excludes.iter().any(|ex| *ex == c))
            .unwrap_or(false)
    }

    /// 检查文件名是否匹配任一模式
    fn matches_patterns(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        self.patterns
            .iter()
            .any(|p| p.matches_with(filename, MATCH_OPTIONS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::touch;
    use tempfile::TempDir;

    fn names(set: &CandidateSet) -> Vec<String> {
        let mut names: Vec<String> = set
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_filters_by_extension() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("b.jpg"));
        touch(&dir.path().join("c.txt"));

        let set = FileCollector::match_files(dir.path(), "jpg").unwrap();
        assert_eq!(names(&set), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_case_insensitive_and_aliases() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("one.JPG"));
        touch(&dir.path().join("two.jpeg"));
        touch(&dir.path().join("three.png"));

        let set = FileCollector::match_files(dir.path(), "JPG").unwrap();
        assert_eq!(names(&set), vec!["one.JPG", "two.jpeg"]);

        let set = FileCollector::match_files(dir.path(), ".png").unwrap();
        assert_eq!(names(&set), vec!["three.png"]);
    }

    #[test]
    fn test_unknown_extension_matches_literally() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("raw.cr2"));
        touch(&dir.path().join("raw.jpg"));

        let set = FileCollector::match_files(dir.path(), "cr2").unwrap();
        assert_eq!(names(&set), vec!["raw.cr2"]);
    }

    #[test]
    fn test_hidden_directories_are_traversed() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join(".cache/deep/x.png"));
        touch(&dir.path().join(".hidden.png"));
        touch(&dir.path().join("sub/y.png"));

        let set = FileCollector::match_files(dir.path(), "png").unwrap();
        assert_eq!(names(&set), vec![".hidden.png", "x.png", "y.png"]);
    }

    #[test]
    fn test_non_recursive() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("top.png"));
        touch(&dir.path().join("sub/nested.png"));

        let set = FileCollector::new(dir.path())
            .with_filter("png")
            .unwrap()
            .recursive(false)
            .collect()
            .unwrap();
        assert_eq!(names(&set), vec!["top.png"]);
    }

    #[test]
    fn test_deterministic() {
        let dir = TempDir::new().unwrap();
        for name in ["z.png", "m/a.png", "m/b.png", "k.png"] {
            touch(&dir.path().join(name));
        }
        let first = FileCollector::match_files(dir.path(), "png").unwrap();
        let second = FileCollector::match_files(dir.path(), "png").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_exclude_output_directory() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("out/a.png"));

        let set = FileCollector::new(dir.path())
            .with_filter("png")
            .unwrap()
            .exclude(&dir.path().join("out"))
            .collect()
            .unwrap();
        assert_eq!(set.len(), 1);
        assert!(!set.iter().any(|p| p.starts_with(dir.path().join("out"))));
    }

    #[test]
    fn test_excluding_root_keeps_all_files() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.jpg"));
        touch(&dir.path().join("sub/b.jpg"));

        let set = FileCollector::new(dir.path())
            .with_filter("jpg")
            .unwrap()
            .exclude(dir.path())
            .collect()
            .unwrap();
        assert_eq!(names(&set), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn test_output_of_other_format_is_not_matched() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("b.png"));

        let set = FileCollector::match_files(dir.path(), "jpg").unwrap();
        assert!(set.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_do_not_duplicate() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("real/a.png"));
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();
        // 指回根目录的循环链接
        std::os::unix::fs::symlink(dir.path(), dir.path().join("real/loop")).unwrap();

        let set = FileCollector::match_files(dir.path(), "png").unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = FileCollector::match_files(&dir.path().join("missing"), "jpg").unwrap_err();
        assert!(matches!(err, ImgbatchError::NotFound { .. }));
    }

    #[test]
    fn test_root_is_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.jpg");
        touch(&file);
        let err = FileCollector::match_files(&file, "jpg").unwrap_err();
        assert!(matches!(err, ImgbatchError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_filter() {
        let dir = TempDir::new().unwrap();
        let err = FileCollector::match_files(dir.path(), "").unwrap_err();
        assert!(matches!(err, ImgbatchError::InvalidInput(_)));
        let err = FileCollector::match_files(dir.path(), ".").unwrap_err();
        assert!(matches!(err, ImgbatchError::InvalidInput(_)));
    }

    #[test]
    fn test_single_file_mode() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("one.png");
        touch(&file);
        assert_eq!(FileCollector::single(&file).unwrap().len(), 1);
        assert!(matches!(
            FileCollector::single(dir.path()),
            Err(ImgbatchError::InvalidInput(_))
        ));
        assert!(matches!(
            FileCollector::single(&dir.path().join("nope.png")),
            Err(ImgbatchError::NotFound { .. })
        ));
    }
}
