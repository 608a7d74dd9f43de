//! 依章節計算剪輯視窗與輸出檔名
//!
//! 超出範圍的輸入一律夾到有效範圍內，不回報錯誤

use crate::config::ClipMode;
use crate::tools::{Chapter, MediaInfo};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 最短片段長度，避免以空區間呼叫 ffmpeg
pub const MIN_CLIP_DURATION: f64 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct PlanOptions {
    pub pre: f64,
    pub post: f64,
    pub mode: ClipMode,
    pub name_with_ts: bool,
    pub output_dir: PathBuf,
}

impl PlanOptions {
    /// 負數（或 NaN）的 pre/post 會被夾為 0
    #[must_use]
    pub fn new(
        pre: f64,
        post: f64,
        mode: ClipMode,
        name_with_ts: bool,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            pre: pre.max(0.0),
            post: post.max(0.0),
            mode,
            name_with_ts,
            output_dir: output_dir.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlan {
    pub source_path: PathBuf,
    /// 章節序號（從 1 開始）
    pub index: usize,
    pub chapter: Chapter,
    pub start_offset: f64,
    pub duration: f64,
    pub output_path: PathBuf,
}

impl ClipPlan {
    #[must_use]
    pub fn end_offset(&self) -> f64 {
        self.start_offset + self.duration
    }
}

/// 計算剪輯視窗，回傳 (起點, 長度)
///
/// 起點不會小於 0，也不會晚於 `duration - MIN_CLIP_DURATION`
#[must_use]
pub fn compute_window(
    chapter: &Chapter,
    duration: f64,
    pre: f64,
    post: f64,
    mode: ClipMode,
) -> (f64, f64) {
    let latest_start = (duration - MIN_CLIP_DURATION).max(0.0);
    let start = (chapter.start_time - pre).min(latest_start).max(0.0);

    let length = match mode {
        ClipMode::Anchor => (duration - start).min(pre + post),
        ClipMode::Chapter => (chapter.end_time + post).min(duration) - start,
    };

    (start, length.max(MIN_CLIP_DURATION))
}

#[must_use]
pub fn plan_clip(
    source_path: &Path,
    index: usize,
    chapter: &Chapter,
    duration: f64,
    options: &PlanOptions,
) -> ClipPlan {
    let (start_offset, clip_duration) =
        compute_window(chapter, duration, options.pre, options.post, options.mode);

    let stem = source_path
        .file_stem()
        .map_or_else(|| "output".to_string(), |s| s.to_string_lossy().into_owned());

    let file_name = if options.name_with_ts && options.mode == ClipMode::Anchor {
        format!("{stem}_highlight_{}.mp4", format_timestamp(chapter.start_time))
    } else {
        format!(
            "{stem}_highlight_{index:02}_{start_offset:.3}-{:.3}.mp4",
            start_offset + clip_duration
        )
    };

    ClipPlan {
        source_path: source_path.to_path_buf(),
        index,
        chapter: *chapter,
        start_offset,
        duration: clip_duration,
        output_path: options.output_dir.join(file_name),
    }
}

/// 為檔案中每個章節產生剪輯計畫
#[must_use]
pub fn plan_clips(source_path: &Path, info: &MediaInfo, options: &PlanOptions) -> Vec<ClipPlan> {
    info.chapters
        .iter()
        .enumerate()
        .map(|(i, chapter)| plan_clip(source_path, i + 1, chapter, info.duration_seconds, options))
        .collect()
}

/// 登記輸出路徑；同一批次內已被使用時改為 `<stem>_N.<ext>`（N 從 2 起）
///
/// 回傳是否改過名稱
pub fn claim_output_path(plan: &mut ClipPlan, used: &mut HashSet<PathBuf>) -> bool {
    if used.insert(plan.output_path.clone()) {
        return false;
    }

    let parent = plan
        .output_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let stem = plan
        .output_path
        .file_stem()
        .map_or_else(|| "output".to_string(), |s| s.to_string_lossy().into_owned());
    let extension = plan
        .output_path
        .extension()
        .map_or_else(|| "mp4".to_string(), |e| e.to_string_lossy().into_owned());

    let unique = (2..)
        .map(|n| parent.join(format!("{stem}_{n}.{extension}")))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| plan.output_path.clone());

    used.insert(unique.clone());
    plan.output_path = unique;
    true
}

/// 秒數轉為檔名用的 `HH-MM-SS.mmm`
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let h = total_secs / 3600;
    let m = (total_secs / 60) % 60;
    let s = total_secs % 60;
    format!("{h:02}-{m:02}-{s:02}.{ms:03}")
}
