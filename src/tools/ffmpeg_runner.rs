use anyhow::{Context, Result, bail};
use std::io::Read;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;
use thiserror::Error;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// 工作因中斷信號被終止
#[derive(Debug, Error)]
#[error("已取消: {task}")]
pub struct Cancelled {
    pub task: String,
}

/// 執行外部程式並收集 stdout，收到中斷信號時終止子程序
pub fn run_cancellable(mut command: Command, shutdown_signal: &AtomicBool) -> Result<Vec<u8>> {
    let program = command.get_program().to_string_lossy().into_owned();

    if shutdown_signal.load(Ordering::SeqCst) {
        return Err(Cancelled { task: program }.into());
    }

    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("無法執行 {program}"))?;

    // stdout 與 stderr 必須同時讀取，否則管線滿了子程序會卡住
    let stdout_reader = child.stdout.take().map(|mut stdout| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = stdout.read_to_end(&mut buffer);
            buffer
        })
    });
    let stderr_reader = child.stderr.take().map(|mut stderr| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = stderr.read_to_end(&mut buffer);
            buffer
        })
    });

    let status = loop {
        if shutdown_signal.load(Ordering::SeqCst) {
            let _ = child.kill();
            let _ = child.wait();
            return Err(Cancelled { task: program }.into());
        }

        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => {
                let _ = child.kill();
                return Err(e).with_context(|| format!("等待 {program} 結束失敗"));
            }
        }
    };

    let stdout = stdout_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();
    let stderr = stderr_reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default();

    if !status.success() {
        let message = String::from_utf8_lossy(&stderr);
        bail!("{program} 執行失敗 ({status}): {}", message.trim());
    }

    Ok(stdout)
}
