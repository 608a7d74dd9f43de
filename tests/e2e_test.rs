//! E2E 測試 - 使用系統上的 ffmpeg / ffprobe
//!
//! 找不到外部工具時直接跳過

use std::fs;
use std::path::Path;
use std::process::Command;

use gopro_highlight::component::highlight_extractor::HighlightJob;
use gopro_highlight::config::{ClipMode, Config, HighlightSettings};
use gopro_highlight::tools::{
    FfprobeProber, MediaProber, ResolvedTools, SystemToolResolver, ToolResolver,
};
use tempfile::TempDir;

const CHAPTERS_METADATA: &str = ";FFMETADATA1
[CHAPTER]
TIMEBASE=1/1000
START=0
END=2000
title=HiLight 1
[CHAPTER]
TIMEBASE=1/1000
START=3000
END=4000
title=HiLight 2
";

fn tools() -> Option<ResolvedTools> {
    let resolver: &dyn ToolResolver = &SystemToolResolver::default();
    ResolvedTools::resolve(resolver).ok()
}

/// 產生 6 秒測試影片，`with_chapters` 決定是否寫入章節
fn make_video(tools: &ResolvedTools, dir: &Path, name: &str, with_chapters: bool) -> bool {
    let output = dir.join(name);
    let mut cmd = Command::new(&tools.ffmpeg);
    cmd.args(["-hide_banner", "-loglevel", "error", "-y"])
        .args(["-f", "lavfi", "-i", "testsrc=duration=6:size=160x120:rate=10"]);

    if with_chapters {
        let metadata = dir.join(format!("{name}.ffmeta"));
        fs::write(&metadata, CHAPTERS_METADATA).unwrap();
        cmd.arg("-i")
            .arg(&metadata)
            .args(["-map", "0:v", "-map_metadata", "1", "-map_chapters", "1"]);
    }

    cmd.args(["-c:v", "mpeg4"]).arg(&output);
    cmd.status().is_ok_and(|s| s.success())
}

fn settings(mode: ClipMode) -> HighlightSettings {
    HighlightSettings {
        pre: 1.0,
        post: 1.0,
        mode,
        recursive: false,
        name_with_ts: false,
        reencode: false,
    }
}

#[test]
fn test_read_real_chapters() {
    let Some(tools) = tools() else {
        println!("跳過測試：找不到 ffmpeg / ffprobe");
        return;
    };
    let temp_dir = TempDir::new().unwrap();
    if !make_video(&tools, temp_dir.path(), "chapters.mp4", true) {
        println!("跳過測試：無法產生測試影片");
        return;
    }

    let info = FfprobeProber::new(&tools.ffprobe)
        .probe(&temp_dir.path().join("chapters.mp4"))
        .unwrap();

    assert_eq!(info.chapters.len(), 2);
    assert!((info.chapters[1].start_time - 3.0).abs() < 0.01);
    assert!((info.duration_seconds - 6.0).abs() < 0.5);
}

#[test]
fn test_extract_directory_end_to_end() {
    let Some(tools) = tools() else {
        println!("跳過測試：找不到 ffmpeg / ffprobe");
        return;
    };
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("source");
    fs::create_dir_all(&source).unwrap();
    if !make_video(&tools, &source, "GX010001.mp4", true)
        || !make_video(&tools, &source, "GX010002.mp4", false)
    {
        println!("跳過測試：無法產生測試影片");
        return;
    }

    let output_dir = temp_dir.path().join("highlights");
    let csv_path = output_dir.join("summary.csv");
    let job = HighlightJob {
        input: source,
        output_dir: output_dir.clone(),
        settings: settings(ClipMode::Anchor),
        csv_path: Some(csv_path.clone()),
    };

    let extensions = Config::load_embedded_video_extensions().unwrap();
    let summary = job.run(&tools, &extensions, &mut |_| {}).unwrap();

    assert_eq!(summary.files.len(), 2);
    assert_eq!(summary.skipped_file_count(), 1);
    assert_eq!(summary.created_count(), 2);
    for clip in summary.created() {
        let path = clip.created_path().unwrap();
        assert!(path.exists(), "片段應該存在: {}", path.display());
        assert!(fs::metadata(path).unwrap().len() > 0);
    }

    let csv = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 3);
}
