//! 命令列介面
//!
//! 沒有給輸入路徑時由 `main` 進入互動選單

use crate::component::highlight_extractor::{BatchSummary, HighlightJob, ProgressUpdate};
use crate::config::{ClipMode, Config, HighlightSettings};
use crate::error::HighlightError;
use crate::tools::{ResolvedTools, ToolResolver};
use anyhow::Result;
use clap::Parser;
use console::style;
use log::info;
use rust_i18n::t;
use std::path::{Path, PathBuf};

/// Extract highlight clips from GoPro MP4 files using their chapter markers
#[derive(Parser, Debug, Clone)]
#[command(name = "gopro_highlight", version)]
pub struct Cli {
    /// MP4 file or directory of videos (omit to open the interactive menu)
    pub input: Option<PathBuf>,

    /// Seconds before the chapter start to include
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub pre: f64,

    /// Seconds after the chapter (chapter mode) or anchor (anchor mode) to include
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub post: f64,

    /// Directory to write clips
    #[arg(long, default_value = "highlights")]
    pub outdir: PathBuf,

    /// Re-encode clips for a frame-accurate trim instead of stream copy
    #[arg(long)]
    pub reencode: bool,

    /// "chapter" uses the full chapter range; "anchor" makes a fixed pre+post clip at the chapter start
    #[arg(long, value_enum, default_value_t = ClipMode::Anchor)]
    pub mode: ClipMode,

    /// Recurse into subdirectories when the input is a directory
    #[arg(long)]
    pub recursive: bool,

    /// Name clips by highlight timestamp (HH-MM-SS.mmm), anchor mode only
    #[arg(long)]
    pub name_with_ts: bool,

    /// Write a CSV summary of created clips to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

impl Cli {
    #[must_use]
    pub const fn settings(&self) -> HighlightSettings {
        HighlightSettings {
            pre: self.pre,
            post: self.post,
            mode: self.mode,
            recursive: self.recursive,
            name_with_ts: self.name_with_ts,
            reencode: self.reencode,
        }
    }

    #[must_use]
    pub fn job(&self, input: &Path) -> HighlightJob {
        HighlightJob {
            input: input.to_path_buf(),
            output_dir: self.outdir.clone(),
            settings: self.settings(),
            csv_path: self.csv.clone(),
        }
    }
}

/// 先檢查外部工具，再檢查輸入路徑，兩者都是致命錯誤
pub fn preflight(input: &Path, resolver: &dyn ToolResolver) -> Result<ResolvedTools> {
    let tools = ResolvedTools::resolve(resolver)?;
    if !input.exists() {
        return Err(HighlightError::InputNotFound(input.to_path_buf()).into());
    }
    Ok(tools)
}

pub fn run(
    cli: &Cli,
    input: &Path,
    resolver: &dyn ToolResolver,
    config: &Config,
) -> Result<BatchSummary> {
    let tools = preflight(input, resolver)?;
    info!("ffmpeg: {}, ffprobe: {}", tools.ffmpeg.display(), tools.ffprobe.display());

    let job = cli.job(input);
    let mut report = |update: ProgressUpdate| println!("{}", update.message);
    let summary = job.run(&tools, &config.video_extensions, &mut report)?;

    print_created(&summary);
    Ok(summary)
}

fn print_created(summary: &BatchSummary) {
    let created: Vec<&Path> = summary.created().filter_map(|c| c.created_path()).collect();

    if created.is_empty() {
        println!("{}", style(t!("cli.no_clips")).yellow());
        return;
    }

    println!("\n{}", style(t!("cli.created_clips")).green().bold());
    for path in created {
        println!(" - {}", path.display());
    }
}
