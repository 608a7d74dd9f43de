//! 精華片段擷取元件
//!
//! 讀取 GoPro 影片中的章節標記（HiLight），以 ffmpeg 剪出每個章節附近的片段

mod batch_runner;
mod clip_planner;
mod ffmpeg_command;
mod job;
mod main;
mod summary;

pub use batch_runner::{BatchRunner, ProgressUpdate};
pub use clip_planner::{
    ClipPlan, MIN_CLIP_DURATION, PlanOptions, claim_output_path, compute_window,
    format_timestamp, plan_clip, plan_clips,
};
pub use ffmpeg_command::{ClipEncoder, CodecSelection, FfmpegCommand, FfmpegEncoder};
pub use job::HighlightJob;
pub use main::HighlightExtractor;
pub use summary::{BatchSummary, ClipOutcome, ClipResult, FileOutcome, FileReport};
