//! 批次處理：列出檔案 → 讀取章節 → 規劃片段 → 逐一剪輯
//!
//! 單一片段或單一檔案失敗只會記錄下來，不會中止整批工作

use super::clip_planner::{PlanOptions, claim_output_path, plan_clips};
use super::ffmpeg_command::ClipEncoder;
use super::summary::{BatchSummary, ClipOutcome, ClipResult, FileOutcome, FileReport};
use crate::tools::{FileLister, MediaProber, ensure_directory_exists};
use anyhow::Result;
use log::{error, info, warn};
use rust_i18n::t;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 進度訊息；`percent` 為 `None` 時只更新訊息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub message: String,
    pub percent: Option<u8>,
}

impl ProgressUpdate {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            percent: None,
        }
    }

    pub fn with_percent(message: impl Into<String>, percent: u8) -> Self {
        Self {
            message: message.into(),
            percent: Some(percent.min(100)),
        }
    }
}

fn percent(done: usize, total: usize) -> u8 {
    (done * 100 / total.max(1)).min(100) as u8
}

pub struct BatchRunner<'a> {
    prober: &'a dyn MediaProber,
    encoder: &'a dyn ClipEncoder,
    lister: &'a dyn FileLister,
    options: PlanOptions,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        prober: &'a dyn MediaProber,
        encoder: &'a dyn ClipEncoder,
        lister: &'a dyn FileLister,
        options: PlanOptions,
    ) -> Self {
        Self {
            prober,
            encoder,
            lister,
            options,
        }
    }

    /// 處理 `root`（單一檔案或資料夾）
    ///
    /// 只有列出檔案失敗時才回傳錯誤
    pub fn run(
        &self,
        root: &Path,
        progress: &mut dyn FnMut(ProgressUpdate),
    ) -> Result<BatchSummary> {
        let files = self.lister.list(root)?;
        info!("找到 {} 個影片檔案: {}", files.len(), root.display());
        progress(ProgressUpdate::with_percent(
            t!("runner.found_files", count = files.len(), root = root.display()),
            0,
        ));

        let mut summary = BatchSummary::default();
        let mut used_outputs = HashSet::new();
        let total = files.len();

        for (i, file) in files.iter().enumerate() {
            progress(ProgressUpdate::with_percent(
                t!("runner.processing", path = file.display()),
                percent(i, total),
            ));

            let outcome = self.process_file(file, &mut summary.clips, &mut used_outputs, progress);
            let done = percent(i + 1, total);

            match &outcome {
                FileOutcome::Processed { attempted, created } => {
                    progress(ProgressUpdate::with_percent(
                        t!(
                            "runner.file_done",
                            path = file.display(),
                            created = created,
                            total = attempted
                        ),
                        done,
                    ));
                }
                FileOutcome::NoChapters => {
                    progress(ProgressUpdate::with_percent(
                        t!("runner.no_chapters", path = file.display()),
                        done,
                    ));
                }
                FileOutcome::Failed(reason) => {
                    progress(ProgressUpdate::with_percent(
                        t!("runner.file_error", path = file.display(), error = reason),
                        done,
                    ));
                }
            }

            summary.files.push(FileReport {
                source_path: file.clone(),
                outcome,
            });
        }

        info!(
            "批次完成 - 成功: {}, 失敗: {}, 無章節: {}",
            summary.created_count(),
            summary.failed_clip_count(),
            summary.skipped_file_count()
        );
        progress(ProgressUpdate::with_percent(t!("runner.complete"), 100));

        Ok(summary)
    }

    fn process_file(
        &self,
        path: &Path,
        clips: &mut Vec<ClipResult>,
        used_outputs: &mut HashSet<PathBuf>,
        progress: &mut dyn FnMut(ProgressUpdate),
    ) -> FileOutcome {
        let info = match self.prober.probe(path) {
            Ok(info) => info,
            Err(e) => {
                warn!("讀取章節失敗 {}: {e:#}", path.display());
                return FileOutcome::Failed(format!("{e:#}"));
            }
        };

        if info.chapters.is_empty() {
            info!("沒有章節，略過: {}", path.display());
            return FileOutcome::NoChapters;
        }

        progress(ProgressUpdate::message(t!(
            "runner.chapters_found",
            count = info.chapters.len(),
            duration = format!("{:.3}", info.duration_seconds)
        )));

        if let Err(e) = ensure_directory_exists(&self.options.output_dir) {
            error!(
                "無法建立輸出資料夾 {}: {e}",
                self.options.output_dir.display()
            );
            return FileOutcome::Failed(format!("{e:#}"));
        }

        let plans = plan_clips(path, &info, &self.options);
        let attempted = plans.len();
        let mut created = 0;

        for mut plan in plans {
            let planned = plan.output_path.clone();
            if claim_output_path(&mut plan, used_outputs) {
                warn!(
                    "輸出檔名重複 {}，改用 {}",
                    planned.display(),
                    plan.output_path.display()
                );
            }

            let outcome = match self.encoder.encode(&plan) {
                Ok(()) => {
                    info!("已建立: {}", plan.output_path.display());
                    progress(ProgressUpdate::message(t!(
                        "runner.created",
                        path = plan.output_path.display()
                    )));
                    created += 1;
                    ClipOutcome::Created(plan.output_path.clone())
                }
                Err(e) => {
                    error!("章節 {} 剪輯失敗 {}: {e:#}", plan.index, path.display());
                    progress(ProgressUpdate::message(t!(
                        "runner.clip_failed",
                        index = plan.index,
                        error = format!("{e:#}")
                    )));
                    ClipOutcome::Failed(format!("{e:#}"))
                }
            };
            clips.push(ClipResult { plan, outcome });
        }

        FileOutcome::Processed { attempted, created }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::highlight_extractor::ClipPlan;
    use crate::config::ClipMode;
    use crate::tools::{Chapter, MediaInfo};
    use anyhow::bail;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct FakeLister(Vec<PathBuf>);

    impl FileLister for FakeLister {
        fn list(&self, _root: &Path) -> Result<Vec<PathBuf>> {
            Ok(self.0.clone())
        }
    }

    struct FakeProber(HashMap<PathBuf, MediaInfo>);

    impl MediaProber for FakeProber {
        fn probe(&self, path: &Path) -> Result<MediaInfo> {
            match self.0.get(path) {
                Some(info) => Ok(info.clone()),
                None => bail!("probe failed"),
            }
        }
    }

    /// 記錄所有呼叫，指定序號的章節會失敗
    #[derive(Default)]
    struct FakeEncoder {
        fail_indices: Vec<usize>,
        calls: RefCell<Vec<ClipPlan>>,
    }

    impl ClipEncoder for FakeEncoder {
        fn encode(&self, plan: &ClipPlan) -> Result<()> {
            self.calls.borrow_mut().push(plan.clone());
            if self.fail_indices.contains(&plan.index) {
                bail!("encoder exploded");
            }
            Ok(())
        }
    }

    fn media(chapters: &[(f64, f64)]) -> MediaInfo {
        MediaInfo {
            duration_seconds: 60.0,
            chapters: chapters
                .iter()
                .map(|&(start_time, end_time)| Chapter {
                    start_time,
                    end_time,
                })
                .collect(),
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0, 4), 0);
        assert_eq!(percent(1, 4), 25);
        assert_eq!(percent(4, 4), 100);
        assert_eq!(percent(0, 0), 0);
    }

    #[test]
    fn test_failed_clip_does_not_stop_batch() {
        let temp_dir = TempDir::new().unwrap();
        let a = PathBuf::from("a.mp4");
        let b = PathBuf::from("b.mp4");
        let lister = FakeLister(vec![a.clone(), b.clone()]);
        let prober = FakeProber(HashMap::from([
            (a.clone(), media(&[(5.0, 6.0), (10.0, 12.5), (20.0, 21.0)])),
            (b.clone(), media(&[(3.0, 4.0)])),
        ]));
        let encoder = FakeEncoder {
            fail_indices: vec![2],
            ..Default::default()
        };
        let options = PlanOptions::new(1.0, 1.0, ClipMode::Anchor, false, temp_dir.path());

        let runner = BatchRunner::new(&prober, &encoder, &lister, options);
        let summary = runner.run(Path::new("."), &mut |_| {}).unwrap();

        assert_eq!(encoder.calls.borrow().len(), 4);
        assert_eq!(summary.clips.len(), 4);
        assert_eq!(summary.created_count(), 3);
        assert!(matches!(summary.clips[1].outcome, ClipOutcome::Failed(_)));
        assert_eq!(
            summary.files[0].outcome,
            FileOutcome::Processed {
                attempted: 3,
                created: 2
            }
        );
        assert_eq!(summary.clips[3].plan.source_path, b);
    }

    #[test]
    fn test_no_chapters_and_unreadable_file_are_reported() {
        let temp_dir = TempDir::new().unwrap();
        let empty = PathBuf::from("empty.mp4");
        let broken = PathBuf::from("broken.mp4");
        let good = PathBuf::from("good.mp4");
        let lister = FakeLister(vec![empty.clone(), broken.clone(), good.clone()]);
        let prober = FakeProber(HashMap::from([
            (empty.clone(), media(&[])),
            (good.clone(), media(&[(10.0, 12.5)])),
        ]));
        let encoder = FakeEncoder::default();
        let options = PlanOptions::new(1.0, 1.0, ClipMode::Chapter, false, temp_dir.path());

        let runner = BatchRunner::new(&prober, &encoder, &lister, options);
        let summary = runner.run(Path::new("."), &mut |_| {}).unwrap();

        assert_eq!(summary.files.len(), 3);
        assert_eq!(summary.files[0].outcome, FileOutcome::NoChapters);
        assert!(matches!(summary.files[1].outcome, FileOutcome::Failed(_)));
        assert_eq!(summary.created_count(), 1);

        let calls = encoder.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!((calls[0].start_offset - 9.0).abs() < 1e-9);
        assert!((calls[0].end_offset() - 13.5).abs() < 1e-9);
    }

    #[test]
    fn test_progress_percentages() {
        let temp_dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..4).map(|i| PathBuf::from(format!("{i}.mp4"))).collect();
        let lister = FakeLister(files.clone());
        let prober = FakeProber(
            files
                .iter()
                .map(|f| (f.clone(), media(&[(1.0, 2.0)])))
                .collect(),
        );
        let encoder = FakeEncoder::default();
        let options = PlanOptions::new(1.0, 1.0, ClipMode::Anchor, false, temp_dir.path());
        let runner = BatchRunner::new(&prober, &encoder, &lister, options);

        let mut percents = Vec::new();
        runner
            .run(Path::new("."), &mut |update| {
                if let Some(p) = update.percent {
                    percents.push(p);
                }
            })
            .unwrap();

        assert_eq!(percents.first(), Some(&0));
        assert_eq!(percents.last(), Some(&100));
        assert!(percents.windows(2).all(|w| w[0] <= w[1]));
        assert!(percents.contains(&25));
        assert!(percents.contains(&75));
    }

    #[test]
    fn test_empty_batch_completes() {
        let temp_dir = TempDir::new().unwrap();
        let lister = FakeLister(Vec::new());
        let prober = FakeProber(HashMap::new());
        let encoder = FakeEncoder::default();
        let options = PlanOptions::new(1.0, 1.0, ClipMode::Anchor, false, temp_dir.path());
        let runner = BatchRunner::new(&prober, &encoder, &lister, options);

        let mut updates = Vec::new();
        let summary = runner
            .run(Path::new("."), &mut |update| updates.push(update))
            .unwrap();

        assert!(summary.clips.is_empty());
        assert_eq!(updates.last().and_then(|u| u.percent), Some(100));
    }

    #[test]
    fn test_output_directory_created_on_demand() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("highlights");
        let a = PathBuf::from("a.mp4");
        let lister = FakeLister(vec![a.clone()]);
        let prober = FakeProber(HashMap::from([(a, media(&[(1.0, 2.0)]))]));
        let encoder = FakeEncoder::default();
        let options = PlanOptions::new(1.0, 1.0, ClipMode::Anchor, false, &out);
        let runner = BatchRunner::new(&prober, &encoder, &lister, options);

        runner.run(Path::new("."), &mut |_| {}).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_same_named_sources_get_distinct_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let a = PathBuf::from("day1/GX010001.MP4");
        let b = PathBuf::from("day2/GX010001.MP4");
        let lister = FakeLister(vec![a.clone(), b.clone()]);
        let prober = FakeProber(HashMap::from([
            (a, media(&[(10.0, 11.0), (10.0, 12.0)])),
            (b, media(&[(10.0, 11.0)])),
        ]));
        let encoder = FakeEncoder::default();
        let options = PlanOptions::new(1.0, 1.0, ClipMode::Anchor, true, temp_dir.path());
        let runner = BatchRunner::new(&prober, &encoder, &lister, options);

        let summary = runner.run(Path::new("."), &mut |_| {}).unwrap();
        let outputs: Vec<PathBuf> = encoder
            .calls
            .borrow()
            .iter()
            .map(|plan| plan.output_path.clone())
            .collect();

        assert_eq!(summary.created_count(), 3);
        assert_eq!(
            outputs,
            vec![
                temp_dir.path().join("GX010001_highlight_00-00-10.000.mp4"),
                temp_dir.path().join("GX010001_highlight_00-00-10.000_2.mp4"),
                temp_dir.path().join("GX010001_highlight_00-00-10.000_3.mp4"),
            ]
        );
        assert_eq!(summary.clips[2].plan.output_path, outputs[2]);
    }
}
