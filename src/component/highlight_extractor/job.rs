use super::batch_runner::{BatchRunner, ProgressUpdate};
use super::clip_planner::PlanOptions;
use super::ffmpeg_command::{CodecSelection, FfmpegEncoder};
use super::summary::BatchSummary;
use crate::config::{HighlightSettings, VideoExtensions};
use crate::tools::{FfprobeProber, ResolvedTools, VideoFileLister};
use anyhow::Result;
use log::info;
use rust_i18n::t;
use std::path::PathBuf;

/// 一次完整的擷取工作，命令列與互動模式共用
#[derive(Debug, Clone)]
pub struct HighlightJob {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub settings: HighlightSettings,
    pub csv_path: Option<PathBuf>,
}

impl HighlightJob {
    #[must_use]
    pub fn plan_options(&self) -> PlanOptions {
        PlanOptions::new(
            self.settings.pre,
            self.settings.post,
            self.settings.mode,
            self.settings.name_with_ts,
            &self.output_dir,
        )
    }

    /// 以真正的 ffprobe / ffmpeg 執行
    pub fn run(
        &self,
        tools: &ResolvedTools,
        extensions: &VideoExtensions,
        progress: &mut dyn FnMut(ProgressUpdate),
    ) -> Result<BatchSummary> {
        let prober = FfprobeProber::new(&tools.ffprobe);
        let encoder = FfmpegEncoder::new(
            &tools.ffmpeg,
            CodecSelection::from_reencode(self.settings.reencode),
        );
        let lister = VideoFileLister::new(extensions.clone(), self.settings.recursive)
            .excluding(&self.output_dir);

        info!(
            "開始擷取: {} -> {} (mode={}, pre={}, post={})",
            self.input.display(),
            self.output_dir.display(),
            self.settings.mode,
            self.settings.pre,
            self.settings.post
        );

        let runner = BatchRunner::new(&prober, &encoder, &lister, self.plan_options());
        let summary = runner.run(&self.input, progress)?;

        if let Some(csv_path) = &self.csv_path {
            summary.write_csv(csv_path)?;
            progress(ProgressUpdate::with_percent(
                t!("runner.csv_written", path = csv_path.display()),
                100,
            ));
        }

        Ok(summary)
    }
}
