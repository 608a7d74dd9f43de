use super::clip_planner::ClipPlan;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipOutcome {
    Created(PathBuf),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ClipResult {
    pub plan: ClipPlan,
    pub outcome: ClipOutcome,
}

impl ClipResult {
    #[must_use]
    pub fn created_path(&self) -> Option<&Path> {
        match &self.outcome {
            ClipOutcome::Created(path) => Some(path),
            ClipOutcome::Failed(_) => None,
        }
    }
}

/// 單一來源檔案的處理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Processed { attempted: usize, created: usize },
    NoChapters,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct FileReport {
    pub source_path: PathBuf,
    pub outcome: FileOutcome,
}

/// 整批處理的結果，`clips` 依處理順序排列
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub clips: Vec<ClipResult>,
    pub files: Vec<FileReport>,
}

impl BatchSummary {
    pub fn created(&self) -> impl Iterator<Item = &ClipResult> {
        self.clips.iter().filter(|c| c.created_path().is_some())
    }

    #[must_use]
    pub fn created_count(&self) -> usize {
        self.created().count()
    }

    #[must_use]
    pub fn failed_clip_count(&self) -> usize {
        self.clips.len() - self.created_count()
    }

    #[must_use]
    pub fn skipped_file_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome == FileOutcome::NoChapters)
            .count()
    }

    #[must_use]
    pub fn failed_file_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Failed(_)))
            .count()
    }

    /// 寫出 `clip,source` 兩欄的摘要（只含成功的片段）
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("無法建立資料夾: {}", parent.display()))?;
        }

        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("無法建立 CSV: {}", path.display()))?;

        writer.write_record(["clip", "source"])?;
        for clip in self.created() {
            let Some(clip_path) = clip.created_path() else {
                continue;
            };
            let source = std::path::absolute(&clip.plan.source_path)
                .unwrap_or_else(|_| clip.plan.source_path.clone());
            let clip_field = clip_path.to_string_lossy();
            let source_field = source.to_string_lossy();
            writer.write_record([clip_field.as_bytes(), source_field.as_bytes()])?;
        }

        writer
            .flush()
            .with_context(|| format!("無法寫入 CSV: {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Chapter;
    use tempfile::TempDir;

    fn result(source: &str, output: &str, ok: bool) -> ClipResult {
        let plan = ClipPlan {
            source_path: PathBuf::from(source),
            index: 1,
            chapter: Chapter {
                start_time: 1.0,
                end_time: 2.0,
            },
            start_offset: 0.0,
            duration: 2.0,
            output_path: PathBuf::from(output),
        };
        let outcome = if ok {
            ClipOutcome::Created(plan.output_path.clone())
        } else {
            ClipOutcome::Failed("boom".to_string())
        };
        ClipResult { plan, outcome }
    }

    #[test]
    fn test_counts() {
        let summary = BatchSummary {
            clips: vec![
                result("/v/a.mp4", "out/a1.mp4", true),
                result("/v/a.mp4", "out/a2.mp4", false),
            ],
            files: vec![
                FileReport {
                    source_path: PathBuf::from("/v/a.mp4"),
                    outcome: FileOutcome::Processed {
                        attempted: 2,
                        created: 1,
                    },
                },
                FileReport {
                    source_path: PathBuf::from("/v/b.mp4"),
                    outcome: FileOutcome::NoChapters,
                },
                FileReport {
                    source_path: PathBuf::from("/v/c.mp4"),
                    outcome: FileOutcome::Failed("probe".to_string()),
                },
            ],
        };
        assert_eq!(summary.created_count(), 1);
        assert_eq!(summary.failed_clip_count(), 1);
        assert_eq!(summary.skipped_file_count(), 1);
        assert_eq!(summary.failed_file_count(), 1);
    }

    #[test]
    fn test_write_csv_only_created_clips() {
        let temp_dir = TempDir::new().unwrap();
        let csv_path = temp_dir.path().join("nested").join("summary.csv");
        let summary = BatchSummary {
            clips: vec![
                result("/v/a.mp4", "out/a1.mp4", true),
                result("/v/a.mp4", "out/a2.mp4", false),
                result("/v/b,c.mp4", "out/b1.mp4", true),
            ],
            files: Vec::new(),
        };

        summary.write_csv(&csv_path).unwrap();
        let content = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "clip,source");
        assert!(lines[1].starts_with("out/a1.mp4,"));
        assert!(lines[1].ends_with("a.mp4"));
        assert!(lines[2].starts_with("out/b1.mp4,\""));

        // 讀回時逗號與引號都要還原
        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let sources: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[1].to_string())
            .collect();
        assert_eq!(sources.len(), 2);
        assert!(sources[1].ends_with("b,c.mp4"));
    }

    #[test]
    fn test_write_csv_quotes_embedded_quotes() {
        let temp_dir = TempDir::new().unwrap();
        let csv_path = temp_dir.path().join("summary.csv");
        let summary = BatchSummary {
            clips: vec![result("/v/a.mp4", "out/say \"hi\".mp4", true)],
            files: Vec::new(),
        };

        summary.write_csv(&csv_path).unwrap();
        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert!(content.contains("\"out/say \"\"hi\"\".mp4\""));
    }

    #[test]
    fn test_write_csv_empty_batch_has_header() {
        let temp_dir = TempDir::new().unwrap();
        let csv_path = temp_dir.path().join("summary.csv");
        BatchSummary::default().write_csv(&csv_path).unwrap();
        assert_eq!(std::fs::read_to_string(&csv_path).unwrap(), "clip,source\n");
    }
}
