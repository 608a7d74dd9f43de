use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// 最近使用路徑的保留數量
pub const MAX_RECENT_PATHS: usize = 10;

/// 可處理的影片副檔名（含 `.`，小寫比對）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoExtensions(pub Vec<String>);

impl VideoExtensions {
    #[must_use]
    pub fn extensions_set(&self) -> HashSet<String> {
        self.0.iter().map(|ext| ext.to_lowercase()).collect()
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        let video_extensions = self.extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| video_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}

/// 剪輯視窗的計算方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ClipMode {
    /// 以章節本身的起訖範圍，前後各延伸 pre/post 秒
    Chapter,
    /// 以章節起點為錨，產生固定 pre+post 秒長度的片段
    #[default]
    Anchor,
}

impl ClipMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Anchor => "anchor",
        }
    }
}

impl fmt::Display for ClipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 精華擷取的預設參數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    pub pre: f64,
    pub post: f64,
    pub mode: ClipMode,
    pub recursive: bool,
    pub name_with_ts: bool,
    pub reencode: bool,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            pre: 1.0,
            post: 1.0,
            mode: ClipMode::Anchor,
            recursive: true,
            name_with_ts: true,
            reencode: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub highlight: HighlightSettings,
    pub recent_paths: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub video_extensions: VideoExtensions,
    pub settings: UserSettings,
}
