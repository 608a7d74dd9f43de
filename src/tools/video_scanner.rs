use crate::config::VideoExtensions;
use anyhow::{Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 列出要處理的影片檔案
pub trait FileLister {
    fn list(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

#[derive(Debug, Clone)]
pub struct VideoFileLister {
    recursive: bool,
    extensions: VideoExtensions,
    excluded_dir: Option<PathBuf>,
}

impl VideoFileLister {
    #[must_use]
    pub const fn new(extensions: VideoExtensions, recursive: bool) -> Self {
        Self {
            recursive,
            extensions,
            excluded_dir: None,
        }
    }

    /// 掃描時略過此資料夾（通常是輸出資料夾，避免把已產生的片段當成來源）
    #[must_use]
    pub fn excluding(mut self, dir: impl Into<PathBuf>) -> Self {
        self.excluded_dir = Some(dir.into());
        self
    }

    /// 輸出資料夾可能在建立清單後才出現，所以每次列出時才解析
    fn resolved_excluded_dir(&self) -> Option<PathBuf> {
        self.excluded_dir
            .as_deref()
            .and_then(|dir| fs::canonicalize(dir).ok())
    }
}

impl FileLister for VideoFileLister {
    /// 單一檔案直接回傳（不檢查副檔名）；資料夾則依副檔名過濾並按路徑排序
    fn list(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if root.is_file() {
            return Ok(vec![root.to_path_buf()]);
        }
        if !root.is_dir() {
            bail!("路徑不存在: {}", root.display());
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let excluded_dir = self.resolved_excluded_dir();
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(false)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|entry| {
                let Some(excluded) = excluded_dir.as_deref() else {
                    return true;
                };
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || fs::canonicalize(entry.path()).map_or(true, |dir| dir != excluded)
            })
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| self.extensions.is_video_file(entry.path()))
            .map(walkdir::DirEntry::into_path)
            .collect();

        files.sort();
        Ok(files)
    }
}
