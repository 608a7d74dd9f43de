use super::clip_planner::ClipPlan;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// 串流複製（快，切點對齊關鍵影格）或重新編碼（慢，影格精準）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecSelection {
    #[default]
    StreamCopy,
    Reencode,
}

impl CodecSelection {
    #[must_use]
    pub const fn from_reencode(reencode: bool) -> Self {
        if reencode {
            Self::Reencode
        } else {
            Self::StreamCopy
        }
    }

    const fn codec_args(self) -> &'static [&'static str] {
        match self {
            Self::StreamCopy => &["-c", "copy"],
            Self::Reencode => &["-c:v", "libx264", "-c:a", "aac", "-b:a", "128k"],
        }
    }
}

/// 將剪輯計畫實際輸出為檔案
pub trait ClipEncoder {
    fn encode(&self, plan: &ClipPlan) -> Result<()>;
}

pub struct FfmpegCommand<'a> {
    program: &'a Path,
    plan: &'a ClipPlan,
    codec: CodecSelection,
}

impl<'a> FfmpegCommand<'a> {
    #[must_use]
    pub const fn new(program: &'a Path, plan: &'a ClipPlan, codec: CodecSelection) -> Self {
        Self {
            program,
            plan,
            codec,
        }
    }

    #[must_use]
    pub fn build_command(&self) -> Command {
        let mut cmd = Command::new(self.program);

        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y"]);
        cmd.args(["-ss", &format!("{:.3}", self.plan.start_offset)]);
        cmd.arg("-i").arg(&self.plan.source_path);
        cmd.args(["-t", &format!("{:.3}", self.plan.duration)]);
        cmd.args(self.codec.codec_args());
        cmd.arg(&self.plan.output_path);

        cmd
    }

    /// 供日誌顯示的完整命令列
    #[must_use]
    pub fn display(&self) -> String {
        let cmd = self.build_command();
        std::iter::once(cmd.get_program())
            .chain(cmd.get_args())
            .map(|part| part.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
    codec: CodecSelection,
}

impl FfmpegEncoder {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, codec: CodecSelection) -> Self {
        Self {
            program: program.into(),
            codec,
        }
    }
}

impl ClipEncoder for FfmpegEncoder {
    fn encode(&self, plan: &ClipPlan) -> Result<()> {
        let command = FfmpegCommand::new(&self.program, plan, self.codec);
        log::info!("執行: {}", command.display());

        let output = command
            .build_command()
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("無法啟動 ffmpeg: {}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("ffmpeg 執行失敗 ({}): {}", output.status, stderr.trim());
        }

        Ok(())
    }
}
