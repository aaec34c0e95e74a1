use super::engine::{GeneratedPalette, PaletteEngine};
use super::render::render_palette;
use crate::color::parse_color;
use crate::component::path_prompt::prompt_path;
use crate::config::Config;
use crate::config::save::remember_path;
use anyhow::{Context, Result};
use dialoguer::Input;
use console::style;
use log::warn;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 單檔產生與重新產生調色盤元件
pub struct PaletteGenerator {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl PaletteGenerator {
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
        println!("{}", style("=== 從媒體檔產生調色盤 ===").cyan().bold());

        let Some(input_path) = prompt_path(&self.config, "請輸入圖片或影片路徑")? else {
            return Ok(());
        };

        if let Err(e) = remember_path(&mut self.config.settings, &input_path) {
            warn!("無法儲存路徑歷史: {e}");
        }

        println!("{}", style("分析中...").dim());
        let engine = PaletteEngine::from_config(&self.config);
        let generated =
            engine.generate_from_file(&PathBuf::from(&input_path), &self.shutdown_signal)?;

        self.show(&generated)
    }

    pub fn run_regenerate(&self) -> Result<()> {
        println!("{}", style("=== 重新產生上次的調色盤 ===").cyan().bold());

        let engine = PaletteEngine::from_config(&self.config);
        let generated = engine.regenerate(&self.shutdown_signal)?;

        self.show(&generated)
    }

    pub fn run_color(&self) -> Result<()> {
        println!("{}", style("=== 從顏色產生調色盤 ===").cyan().bold());

        let value: String = Input::new()
            .with_prompt("請輸入色名或色碼（例如 hot_pink、#ff0000）")
            .interact_text()?;

        self.show_color(&value)
    }

    /// 解析色名或色碼後產生並輸出調色盤
    pub fn show_color(&self, value: &str) -> Result<()> {
        let color = parse_color(value)?;
        let engine = PaletteEngine::from_config(&self.config);
        let generated = engine.generate_from_color(color)?;

        self.show(&generated)
    }

    fn show(&self, generated: &GeneratedPalette) -> Result<()> {
        println!();
        if self.config.settings.print_json {
            let json = serde_json::to_string_pretty(generated).context("無法序列化調色盤")?;
            println!("{json}");
        } else {
            println!("{}", render_palette(generated));
        }
        Ok(())
    }
}
