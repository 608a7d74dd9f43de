//! 外部工具（ffmpeg / ffprobe）的路徑解析
//!
//! 只回傳找到的執行檔路徑，不修改行程的 `PATH`

use crate::error::HighlightError;
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Ffmpeg,
    Ffprobe,
}

impl Tool {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Ffmpeg => "ffmpeg",
            Self::Ffprobe => "ffprobe",
        }
    }

    /// 目前平台上的執行檔名稱
    #[must_use]
    pub fn executable_name(&self) -> String {
        if cfg!(windows) {
            format!("{}.exe", self.name())
        } else {
            self.name().to_string()
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub trait ToolResolver {
    fn resolve(&self, tool: Tool) -> Option<PathBuf>;
}

/// 先找 `PATH`，再依序找額外目錄
#[derive(Debug, Clone)]
pub struct SystemToolResolver {
    search_path: bool,
    extra_dirs: Vec<PathBuf>,
}

impl Default for SystemToolResolver {
    /// 額外目錄預設為執行檔所在目錄與目前工作目錄
    fn default() -> Self {
        let mut extra_dirs = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            extra_dirs.push(dir);
        }
        if let Ok(dir) = std::env::current_dir() {
            extra_dirs.push(dir);
        }
        Self {
            search_path: true,
            extra_dirs,
        }
    }
}

impl SystemToolResolver {
    /// 只在指定目錄中搜尋
    #[must_use]
    pub const fn with_dirs(extra_dirs: Vec<PathBuf>) -> Self {
        Self {
            search_path: false,
            extra_dirs,
        }
    }
}

impl ToolResolver for SystemToolResolver {
    fn resolve(&self, tool: Tool) -> Option<PathBuf> {
        if self.search_path {
            if let Ok(path) = which::which(tool.name()) {
                debug!("於 PATH 找到 {tool}: {}", path.display());
                return Some(path);
            }
        }

        let file_name = tool.executable_name();
        self.extra_dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
            .inspect(|path| debug!("於額外目錄找到 {tool}: {}", path.display()))
    }
}

/// 已解析的外部工具路徑
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTools {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ResolvedTools {
    /// 一次檢查全部工具，缺少的會全部列出
    pub fn resolve(resolver: &dyn ToolResolver) -> Result<Self, HighlightError> {
        let ffmpeg = resolver.resolve(Tool::Ffmpeg);
        let ffprobe = resolver.resolve(Tool::Ffprobe);

        match (ffmpeg, ffprobe) {
            (Some(ffmpeg), Some(ffprobe)) => Ok(Self { ffmpeg, ffprobe }),
            (ffmpeg, ffprobe) => {
                let missing = [(Tool::Ffmpeg, ffmpeg), (Tool::Ffprobe, ffprobe)]
                    .into_iter()
                    .filter(|(_, path)| path.is_none())
                    .map(|(tool, _)| tool.name().to_string())
                    .collect();
                Err(HighlightError::ToolsMissing { missing })
            }
        }
    }
}
