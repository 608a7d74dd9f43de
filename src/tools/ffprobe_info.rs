use anyhow::{Context, Result, bail};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 容器中的一個章節（僅使用起訖時間，單位：秒）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Chapter {
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub duration_seconds: f64,
    pub chapters: Vec<Chapter>,
}

/// 取得影片長度與章節資訊
pub trait MediaProber {
    fn probe(&self, path: &Path) -> Result<MediaInfo>;
}

/// 透過 ffprobe 取得章節資訊
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    program: PathBuf,
}

impl FfprobeProber {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl MediaProber for FfprobeProber {
    fn probe(&self, path: &Path) -> Result<MediaInfo> {
        let output = Command::new(&self.program)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_chapters",
                "-show_format",
            ])
            .arg(path)
            .output()
            .with_context(|| format!("無法執行 ffprobe: {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "ffprobe 執行失敗 ({}): {}",
                output.status,
                stderr.trim()
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_probe_output(&stdout).with_context(|| format!("無法解析 ffprobe 輸出: {}", path.display()))
    }
}

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    #[serde(default)]
    chapters: Vec<ChapterInfo>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<Value>,
}

#[derive(Deserialize)]
struct ChapterInfo {
    start_time: Option<Value>,
    end_time: Option<Value>,
    start: Option<Value>,
    end: Option<Value>,
    time_base: Option<String>,
}

impl ChapterInfo {
    /// `start_time` 優先，否則以 `start * time_base` 換算
    fn start_seconds(&self) -> f64 {
        self.start_time
            .as_ref()
            .and_then(value_as_f64)
            .or_else(|| self.scaled(self.start.as_ref()))
            .unwrap_or(0.0)
    }

    fn end_seconds(&self, start: f64) -> f64 {
        self.end_time
            .as_ref()
            .and_then(value_as_f64)
            .or_else(|| self.scaled(self.end.as_ref()))
            .unwrap_or(start)
    }

    fn scaled(&self, ticks: Option<&Value>) -> Option<f64> {
        let ticks = ticks.and_then(value_as_f64)?;
        let time_base = self
            .time_base
            .as_deref()
            .and_then(parse_fraction)
            .unwrap_or(1.0);
        Some(ticks * time_base)
    }
}

/// 解析 ffprobe 的 JSON 輸出
///
/// 若 format 沒有長度，改用章節最大結束時間估算
pub fn parse_probe_output(json: &str) -> Result<MediaInfo> {
    let probe: FfprobeOutput = serde_json::from_str(json)?;

    let chapters: Vec<Chapter> = probe
        .chapters
        .iter()
        .map(|info| {
            let start_time = info.start_seconds();
            Chapter {
                start_time,
                end_time: info.end_seconds(start_time),
            }
        })
        .collect();

    let duration_seconds = probe
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(value_as_f64)
        .unwrap_or_else(|| {
            chapters
                .iter()
                .map(|c| c.end_time)
                .fold(0.0, f64::max)
        });

    Ok(MediaInfo {
        duration_seconds,
        chapters,
    })
}

/// ffprobe 的數值欄位多半以字串輸出
fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 解析分數字串（例如 "1/1000"）
fn parse_fraction(raw: &str) -> Option<f64> {
    if let Some((num_str, den_str)) = raw.split_once('/') {
        let num: f64 = num_str.parse().ok()?;
        let den: f64 = den_str.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    raw.parse().ok()
}
