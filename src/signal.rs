use log::warn;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 安裝 Ctrl-C 處理器，回傳所有元件共用的中斷旗標
///
/// 旗標設定後：掃描停止、worker 不再接新工作、執行中的 ffmpeg 會被終止。
#[must_use]
pub fn setup_shutdown_signal() -> Arc<AtomicBool> {
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let signal_clone = Arc::clone(&shutdown_signal);

    ctrlc::set_handler(move || {
        // 第二次中斷不重複提示
        if !signal_clone.swap(true, Ordering::SeqCst) {
            warn!("收到中斷信號");
            eprintln!("\n收到中斷信號，正在安全關閉...");
        }
    })
    .expect("無法設定 Ctrl-C 處理器");

    shutdown_signal
}

#[must_use]
pub fn is_shutdown_requested(shutdown_signal: &AtomicBool) -> bool {
    shutdown_signal.load(Ordering::SeqCst)
}
