//! 互動模式的精華擷取流程
//!
//! 表單在前景執行緒收集參數，批次工作交給唯一一個背景執行緒，
//! 進度透過 channel 傳回前景執行緒更新進度條

use super::batch_runner::ProgressUpdate;
use super::job::HighlightJob;
use super::summary::BatchSummary;
use crate::config::save::{add_recent_path, save_settings};
use crate::config::{Config, HighlightSettings};
use crate::tools::{ResolvedTools, validate_path_exists};
use anyhow::{Result, anyhow};
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

/// 背景執行緒送回前景的事件
enum WorkerEvent {
    Progress(ProgressUpdate),
    Finished(Result<BatchSummary>),
}

pub struct HighlightExtractor<'a> {
    config: &'a mut Config,
    tools: ResolvedTools,
}

impl<'a> HighlightExtractor<'a> {
    pub const fn new(config: &'a mut Config, tools: ResolvedTools) -> Self {
        Self { config, tools }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style(t!("extractor.title")).cyan().bold());

        let source = self.prompt_source_path()?;
        validate_path_exists(&source)?;

        let destination = self.prompt_destination(&source)?;
        let settings = self.prompt_settings()?;

        add_recent_path(&mut self.config.settings, &source.to_string_lossy());
        if let Err(e) = save_settings(&self.config.settings) {
            warn!("無法儲存最近使用路徑: {e:#}");
        }

        let job = HighlightJob {
            csv_path: Some(destination.join("summary.csv")),
            input: source,
            output_dir: destination,
            settings,
        };

        println!();
        println!("{}", style(t!("extractor.starting")).cyan());
        let summary = self.run_in_background(job)?;
        Self::print_summary(&summary);

        Ok(())
    }

    /// 唯一的背景執行緒執行批次，前景只負責畫面
    fn run_in_background(&self, job: HighlightJob) -> Result<BatchSummary> {
        let (sender, receiver) = mpsc::channel::<WorkerEvent>();
        let tools = self.tools.clone();
        let extensions = self.config.video_extensions.clone();

        let worker = thread::spawn(move || {
            let progress_sender = sender.clone();
            let mut forward = move |update: ProgressUpdate| {
                let _ = progress_sender.send(WorkerEvent::Progress(update));
            };
            let result = job.run(&tools, &extensions, &mut forward);
            let _ = sender.send(WorkerEvent::Finished(result));
        });

        let progress_bar = ProgressBar::new(100);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );

        let mut outcome = None;
        for event in receiver {
            match event {
                WorkerEvent::Progress(update) => {
                    progress_bar.println(&update.message);
                    if let Some(percent) = update.percent {
                        progress_bar.set_position(u64::from(percent));
                    }
                }
                WorkerEvent::Finished(result) => {
                    outcome = Some(result);
                    break;
                }
            }
        }

        if worker.join().is_err() {
            error!("背景工作執行緒異常結束");
        }

        match outcome {
            Some(Ok(summary)) => {
                progress_bar.finish_with_message(t!("runner.complete").to_string());
                Ok(summary)
            }
            Some(Err(e)) => {
                progress_bar.abandon();
                Err(e)
            }
            None => {
                progress_bar.abandon();
                Err(anyhow!("背景工作未回傳結果"))
            }
        }
    }

    fn prompt_source_path(&self) -> Result<PathBuf> {
        let recent = &self.config.settings.recent_paths;
        if !recent.is_empty() {
            let mut items: Vec<String> = recent.clone();
            items.push(t!("extractor.new_path").to_string());

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(t!("extractor.source_prompt"))
                .items(&items)
                .default(0)
                .interact()?;

            if selection < recent.len() {
                return Ok(PathBuf::from(&recent[selection]));
            }
        }

        let path: String = Input::new()
            .with_prompt(t!("extractor.source_prompt"))
            .interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }

    fn prompt_destination(&self, source: &Path) -> Result<PathBuf> {
        let default = if source.is_dir() {
            source.join("highlights")
        } else {
            PathBuf::from("highlights")
        };

        let path: String = Input::new()
            .with_prompt(t!("extractor.destination_prompt"))
            .default(default.to_string_lossy().into_owned())
            .interact_text()?;
        Ok(PathBuf::from(path.trim()))
    }

    /// 以設定檔的值作為預設
    fn prompt_settings(&self) -> Result<HighlightSettings> {
        let defaults = &self.config.settings.highlight;

        let pre: f64 = Input::new()
            .with_prompt(t!("extractor.pre_prompt"))
            .default(defaults.pre)
            .interact_text()?;
        let post: f64 = Input::new()
            .with_prompt(t!("extractor.post_prompt"))
            .default(defaults.post)
            .interact_text()?;
        let recursive = Confirm::new()
            .with_prompt(t!("extractor.recursive_prompt"))
            .default(defaults.recursive)
            .interact()?;
        let name_with_ts = Confirm::new()
            .with_prompt(t!("extractor.name_ts_prompt"))
            .default(defaults.name_with_ts)
            .interact()?;
        let reencode = Confirm::new()
            .with_prompt(t!("extractor.reencode_prompt"))
            .default(defaults.reencode)
            .interact()?;

        Ok(HighlightSettings {
            pre,
            post,
            mode: defaults.mode,
            recursive,
            name_with_ts,
            reencode,
        })
    }

    fn print_summary(summary: &BatchSummary) {
        let created = summary.created_count();
        let failed = summary.failed_clip_count();
        let skipped = summary.skipped_file_count();
        let failed_files = summary.failed_file_count();

        println!();
        println!("{}", style(t!("extractor.summary_title")).cyan().bold());
        println!("  {}", t!("extractor.summary_files", count = summary.files.len()));
        println!(
            "  {}",
            style(t!("extractor.summary_created", count = created)).green()
        );
        if skipped > 0 {
            println!(
                "  {}",
                style(t!("extractor.summary_skipped", count = skipped)).yellow()
            );
        }
        if failed > 0 || failed_files > 0 {
            println!(
                "  {}",
                style(t!(
                    "extractor.summary_failed",
                    clips = failed,
                    files = failed_files
                ))
                .red()
            );
        }

        info!("擷取完成 - 成功: {created}, 失敗: {failed}, 略過: {skipped}");
    }
}
