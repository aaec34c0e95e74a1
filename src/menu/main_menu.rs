use crate::config::{Base16Method, Config, PreviewFormat, UserSettings};
use crate::menu::handlers::{
    run_batch_cacher, run_color_generator, run_palette_generator, run_regenerate,
};
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== 媒體調色盤產生器 ===").cyan().bold());
    println!("{}", style("(按 ESC 離開)").dim());

    let options = vec![
        "從媒體檔產生調色盤",
        "從顏色產生調色盤",
        "重新產生上次的調色盤",
        "批次建立快取",
        "設定",
        "離開",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇功能")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => {
            run_palette_generator(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(1) => {
            run_color_generator(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(2) => {
            run_regenerate(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(3) => {
            run_batch_cacher(term, shutdown_signal, config)?;
            Ok(true)
        }
        Some(4) => {
            show_settings_menu(term, config)?;
            Ok(true)
        }
        Some(5) | None => Ok(false),
        _ => unreachable!(),
    }
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style("=== 設定 ===").cyan().bold());
        println!("{}", style("(按 ESC 返回)").dim());

        let settings = &config.settings;
        let options = vec![
            format!("產生方式: {}", settings.base16.method),
            format!("混色比例: {}", settings.base16.blend),
            format!("深色模式: {}", on_off(settings.dark)),
            format!("影片取樣幀數: {}", settings.frames),
            format!("影片取樣秒數: {}", settings.max_duration_secs),
            format!(
                "Worker 數量: {}",
                settings
                    .worker_count
                    .map_or_else(|| format!("自動 ({})", config.worker_count()), |n| n.to_string())
            ),
            format!("預覽圖格式: {}", settings.preview_format),
            format!("輸出 JSON: {}", on_off(settings.print_json)),
            "返回".to_string(),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇要修改的設定")
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        let mut updated = config.settings.clone();
        match selection {
            Some(0) => {
                let Some(method) = select_method(term, updated.base16.method)? else {
                    continue;
                };
                updated.base16.method = method;
            }
            Some(1) => {
                updated.base16.blend = Input::new()
                    .with_prompt("混色比例 (0–1)")
                    .default(updated.base16.blend)
                    .interact_text()?;
            }
            Some(2) => updated.dark = !updated.dark,
            Some(3) => {
                updated.frames = Input::new()
                    .with_prompt("影片取樣幀數")
                    .default(updated.frames)
                    .interact_text()?;
            }
            Some(4) => {
                updated.max_duration_secs = Input::new()
                    .with_prompt("影片取樣秒數")
                    .default(updated.max_duration_secs)
                    .interact_text()?;
            }
            Some(5) => {
                let count: usize = Input::new()
                    .with_prompt("Worker 數量（0 表示自動）")
                    .default(updated.worker_count.unwrap_or(0))
                    .interact_text()?;
                updated.worker_count = (count > 0).then_some(count);
            }
            Some(6) => {
                let Some(format) = select_preview_format(term, updated.preview_format)? else {
                    continue;
                };
                updated.preview_format = format;
            }
            Some(7) => updated.print_json = !updated.print_json,
            Some(8) | None => break,
            _ => unreachable!(),
        }

        apply_settings(term, config, updated)?;
    }

    Ok(())
}

fn apply_settings(term: &Term, config: &mut Config, updated: UserSettings) -> Result<()> {
    if let Err(e) = config.update_settings(updated) {
        eprintln!("{} {:#}", style("設定未儲存:").red().bold(), e);
        crate::pause(term)?;
    }
    Ok(())
}

fn select_method(term: &Term, current: Base16Method) -> Result<Option<Base16Method>> {
    let methods = [Base16Method::Static, Base16Method::Dynamic];
    let items = ["static：基底色混向主色", "dynamic：從取樣色挑選色相"];
    let default_index = methods.iter().position(|&m| m == current).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇產生方式")
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    Ok(selection.map(|i| methods[i]))
}

fn select_preview_format(term: &Term, current: PreviewFormat) -> Result<Option<PreviewFormat>> {
    let formats = [
        PreviewFormat::Jpg,
        PreviewFormat::Jpeg,
        PreviewFormat::Png,
        PreviewFormat::Webm,
    ];
    let items: Vec<String> = formats.iter().map(ToString::to_string).collect();
    let default_index = formats.iter().position(|&f| f == current).unwrap_or(0);

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇預覽圖格式")
        .items(&items)
        .default(default_index)
        .interact_on_opt(term)?;

    Ok(selection.map(|i| formats[i]))
}

const fn on_off(value: bool) -> &'static str {
    if value { "開" } else { "關" }
}
