//! # 文件收集器
//!
//! 根据输入路径和模式收集待处理的输出文件列表。
//!
//! ## 功能
//! - 输入可以是文件、目录或 shell 风格通配符（如 `conf_*.log`）
//! - 目录内按 `--pattern` 过滤（默认 `*.log,*.out`），可递归
//! - 排除单点能文件 `name_<suffix>.ext`，并可为频率文件查找对应的单点文件
//!
//! ## 依赖关系
//! - 被 `commands/pipeline.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 匹配模式

use crate::error::{Result, ThermoError};

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 默认匹配模式
pub const DEFAULT_PATTERN: &str = "*.log,*.out";

/// 文件收集器
pub struct FileCollector {
    /// 输入路径
    inputs: Vec<PathBuf>,
    /// 匹配模式列表
    patterns: Vec<glob::Pattern>,
    /// 是否递归
    recursive: bool,
    /// 需排除的单点能后缀
    spc_suffix: Option<String>,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            patterns: Vec::new(),
            recursive: false,
            spc_suffix: None,
        }
    }

    /// 设置匹配模式（逗号分隔的多模式）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let pattern = if pattern.trim().is_empty() { DEFAULT_PATTERN } else { pattern };
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                glob::Pattern::new(s).map_err(|e| {
                    ThermoError::InvalidArgument(format!("Invalid pattern '{}': {}", s, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 排除文件名形如 `name_<suffix>.ext` 的单点能文件
    pub fn excluding_spc(mut self, suffix: Option<&str>) -> Self {
        self.spc_suffix = suffix.map(str::to_string);
        self
    }

    /// 收集所有匹配的文件，保持输入顺序并去重
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = Vec::new();

        for input in &self.inputs {
            if input.is_file() {
                files.push(input.clone());
            } else if input.is_dir() {
                files.extend(self.walk(input));
            } else {
                files.extend(self.expand_glob(input)?);
            }
        }

        let mut unique = Vec::with_capacity(files.len());
        for file in files {
            if !unique.contains(&file) && !self.is_spc_file(&file) {
                unique.push(file);
            }
        }

        if unique.is_empty() {
            return Err(ThermoError::NoFilesFound {
                pattern: self
                    .inputs
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            });
        }
        Ok(unique)
    }

    /// 目录内匹配的文件，按路径排序
    fn walk(&self, dir: &Path) -> Vec<PathBuf> {
        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|entry| self.matches_patterns(entry.path()))
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        files
    }

    /// 把未被 shell 展开的通配符交给 glob
    fn expand_glob(&self, input: &Path) -> Result<Vec<PathBuf>> {
        let text = input.display().to_string();
        if !text.contains(['*', '?', '[']) {
            return Err(ThermoError::FileNotFound { path: text });
        }
        let paths = glob::glob(&text)
            .map_err(|e| ThermoError::InvalidArgument(format!("Invalid pattern '{}': {}", text, e)))?;
        let mut files: Vec<PathBuf> = paths.filter_map(|p| p.ok()).filter(|p| p.is_file()).collect();
        files.sort();
        Ok(files)
    }

    /// 检查文件是否匹配任一模式
    fn matches_patterns(&self, path: &Path) -> bool {
        let filename = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };

        if self.patterns.is_empty() {
            return DEFAULT_PATTERN
                .split(',')
                .filter_map(|p| glob::Pattern::new(p).ok())
                .any(|p| p.matches(filename));
        }
        self.patterns.iter().any(|p| p.matches(filename))
    }

    fn is_spc_file(&self, path: &Path) -> bool {
        match (&self.spc_suffix, path.file_name().and_then(|n| n.to_str())) {
            (Some(suffix), Some(name)) => name.contains(&format!("_{}.", suffix)),
            _ => false,
        }
    }
}

/// 频率文件对应的单点能文件 `name_<suffix>.ext`；
/// 先找同扩展名，再找 .log / .out
pub fn single_point_path(freq_file: &Path, suffix: &str) -> Option<PathBuf> {
    let stem = freq_file.file_stem()?.to_str()?;
    let dir = freq_file.parent().unwrap_or_else(|| Path::new(""));
    let own_ext = freq_file.extension().and_then(|e| e.to_str());

    own_ext
        .into_iter()
        .chain(["log", "out"])
        .map(|ext| dir.join(format!("{}_{}.{}", stem, suffix, ext)))
        .find(|p| p.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("qhthermo_collector_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(dir.join("sub")).unwrap();
        for file in ["a.log", "b.out", "a_TZ.log", "notes.txt", "sub/c.log"] {
            fs::write(dir.join(file), "x").unwrap();
        }
        dir
    }

    #[test]
    fn test_directory_uses_default_pattern() {
        let dir = scratch_dir("default");
        let files = FileCollector::new(vec![dir.clone()]).collect().unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.log", "a_TZ.log", "b.out"]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_recursive_and_spc_exclusion() {
        let dir = scratch_dir("recursive");
        let files = FileCollector::new(vec![dir.clone()])
            .with_pattern("*.log")
            .unwrap()
            .recursive(true)
            .excluding_spc(Some("TZ"))
            .collect()
            .unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| !p.to_string_lossy().contains("_TZ.")));

        assert_eq!(
            single_point_path(&dir.join("a.log"), "TZ"),
            Some(dir.join("a_TZ.log"))
        );
        assert_eq!(single_point_path(&dir.join("b.out"), "TZ"), None);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_input_is_error() {
        let result = FileCollector::new(vec![PathBuf::from("/definitely/not/here.log")]).collect();
        assert!(matches!(result, Err(ThermoError::FileNotFound { .. })));
    }

    #[test]
    fn test_invalid_pattern_is_error() {
        assert!(FileCollector::new(vec![]).with_pattern("[").is_err());
    }
}
