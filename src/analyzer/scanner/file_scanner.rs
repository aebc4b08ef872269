use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::constants::scanner::{DEFAULT_MAX_FILE_SIZE, DEFAULT_SKIP_DIRS, SOURCE_EXTENSION};
use crate::types::{DocgenError, Result};

/// Enumerates Python source files under a directory
pub struct FileScanner {
    root: PathBuf,
    exclude: Vec<glob::Pattern>,
    max_file_size: u64,
    recursive: bool,
}

impl FileScanner {
    /// Scanner over `root` with the default skip directories excluded.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let exclude = DEFAULT_SKIP_DIRS
            .iter()
            .filter_map(|d| glob::Pattern::new(&format!("**/{}/**", d)).ok())
            .collect();
        Self {
            root: root.as_ref().to_path_buf(),
            exclude,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            recursive: false,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Add glob exclude patterns; invalid patterns are rejected.
    pub fn with_exclude(mut self, patterns: &[String]) -> Result<Self> {
        for pattern in patterns {
            let compiled = glob::Pattern::new(pattern).map_err(|e| {
                DocgenError::Settings(format!("Invalid exclude pattern '{}': {}", pattern, e))
            })?;
            self.exclude.push(compiled);
        }
        Ok(self)
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Matching files, sorted by path so batch output is stable.
    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        if !self.root.is_dir() {
            return Err(DocgenError::InvalidInput(format!(
                "'{}' is not a directory",
                self.root.display()
            )));
        }

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false); // Security: prevent symlink traversal attacks
        if !self.recursive {
            builder.max_depth(Some(1));
        }

        let mut files = Vec::new();
        for entry in builder.build().filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() || !is_python_source(path) || self.should_exclude(path) {
                continue;
            }

            if let Ok(metadata) = path.metadata() {
                if metadata.len() > self.max_file_size {
                    tracing::debug!(path = %path.display(), "Skipping oversized file");
                    continue;
                }

                files.push(ScannedFile {
                    path: path.to_path_buf(),
                    size: metadata.len(),
                });
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
    }
}

pub fn is_python_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext == SOURCE_EXTENSION)
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn layout() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "text").unwrap();
        fs::create_dir(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("pkg").join("b.py"), "y = 2\n").unwrap();
        fs::create_dir(dir.path().join("__pycache__")).unwrap();
        fs::write(dir.path().join("__pycache__").join("c.py"), "").unwrap();
        dir
    }

    fn names(files: &[ScannedFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_flat_scan() {
        let dir = layout();
        let files = FileScanner::new(dir.path()).scan().unwrap();
        assert_eq!(names(&files), vec!["a.py"]);
    }

    #[test]
    fn test_recursive_scan_skips_cache_dirs() {
        let dir = layout();
        let files = FileScanner::new(dir.path()).recursive(true).scan().unwrap();
        assert_eq!(names(&files), vec!["a.py", "b.py"]);
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = layout();
        let files = FileScanner::new(dir.path())
            .recursive(true)
            .with_exclude(&["pkg/**".to_string()])
            .unwrap()
            .scan()
            .unwrap();
        assert_eq!(names(&files), vec!["a.py"]);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let dir = layout();
        assert!(FileScanner::new(dir.path()).with_exclude(&["[".to_string()]).is_err());
    }

    #[test]
    fn test_missing_directory() {
        assert!(FileScanner::new("/nonexistent/docgen/dir").scan().is_err());
    }
}
