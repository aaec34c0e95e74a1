use super::ffmpeg_runner::run_cancellable;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::AtomicBool;

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
}

fn ffprobe_command(path: &Path) -> Command {
    let mut cmd = Command::new("ffprobe");
    cmd.args(["-v", "quiet", "-print_format", "json", "-show_format"]);
    cmd.arg(path);
    cmd
}

/// 使用 ffprobe 取得媒體長度（秒），收到中斷信號時終止 ffprobe
pub fn get_media_duration(path: &Path, shutdown_signal: &AtomicBool) -> Result<f64> {
    read_duration(ffprobe_command(path), path, shutdown_signal)
}

fn read_duration(command: Command, path: &Path, shutdown_signal: &AtomicBool) -> Result<f64> {
    let stdout = run_cancellable(command, shutdown_signal)?;

    parse_duration(&stdout).with_context(|| format!("無法取得媒體長度: {}", path.display()))
}

fn parse_duration(raw: &[u8]) -> Result<f64> {
    let probe: FfprobeOutput = serde_json::from_slice(raw).context("無法解析 ffprobe 輸出")?;

    let duration = probe
        .format
        .and_then(|f| f.duration)
        .and_then(|d| d.trim().parse::<f64>().ok())
        .ok_or_else(|| anyhow::anyhow!("ffprobe 輸出缺少 duration"))?;

    if !duration.is_finite() || duration < 0.0 {
        bail!("無效的媒體長度: {duration}");
    }

    Ok(duration)
}
