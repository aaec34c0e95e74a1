use super::pipeline::{BatchPipeline, BatchSummary};
use super::progress::ProgressReporter;
use crate::component::path_prompt::prompt_path;
use crate::config::Config;
use crate::config::save::remember_path;
use crate::tools::validate_path_exists;
use anyhow::Result;
use console::style;
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 批次預熱快取元件
pub struct BatchCacher {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl BatchCacher {
    pub const fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    /// 執行後的設定，包含新記錄的路徑歷史
    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn run(&mut self) -> Result<()> {
        println!("{}", style("=== 批次建立調色盤快取 ===").cyan().bold());

        let Some(input_path) = prompt_path(&self.config, "請輸入媒體檔案或資料夾路徑")? else {
            return Ok(());
        };
        let root = PathBuf::from(&input_path);
        validate_path_exists(&root)?;

        if let Err(e) = remember_path(&mut self.config.settings, &input_path) {
            warn!("無法儲存路徑歷史: {e}");
        }

        let summary = self.run_paths(&[root]);
        print_summary(&summary);

        Ok(())
    }

    /// 不經互動直接處理多個路徑
    #[must_use]
    pub fn run_paths(&self, roots: &[PathBuf]) -> BatchSummary {
        let pipeline = BatchPipeline::from_config(&self.config);
        println!(
            "{}",
            style(format!(
                "快取位置: {}，使用 {} 個 worker",
                self.config.cache_dir().display(),
                pipeline.worker_count()
            ))
            .dim()
        );

        let mut reporter = ProgressReporter::new();
        pipeline.run_with(roots, &self.shutdown_signal, |snapshot| {
            reporter.update(snapshot);
        })
    }
}

pub fn print_summary(summary: &BatchSummary) {
    println!();
    println!("{}", style("=== 批次快取摘要 ===").cyan().bold());
    println!("  處理檔案: {} 個", summary.processed());
    println!("  新增快取: {} 個", style(summary.completed).green());
    if summary.skipped > 0 {
        println!("  已有快取: {} 個", style(summary.skipped).yellow());
    }
    if summary.scan.skipped_errors > 0 {
        println!(
            "  無法讀取的路徑: {} 個",
            style(summary.scan.skipped_errors).yellow()
        );
    }
    if !summary.failed.is_empty() {
        println!("  失敗: {} 個", style(summary.failed.len()).red());
        for (path, message) in &summary.failed {
            println!("    {} {}: {}", style("✗").red(), path.display(), message);
        }
    }
    println!("  耗時: {:.1} 秒", summary.elapsed.as_secs_f64());
    if summary.interrupted {
        println!("{}", style("操作已中斷").yellow());
    }
}
