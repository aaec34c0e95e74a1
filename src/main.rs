use anyhow::Result;
use console::{Term, style};
use log::{info, warn};
use media_palette::component::{BatchCacher, PaletteGenerator};
use media_palette::component::batch_cache::{EXIT_INTERRUPTED, print_summary};
use media_palette::config::Config;
use media_palette::init;
use media_palette::menu::show_main_menu;
use media_palette::signal::{is_shutdown_requested, setup_shutdown_signal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

const USAGE: &str = "用法: media_palette [cache <路徑>... | color <色名或色碼>]";

fn main() -> Result<ExitCode> {
    init::init();
    let shutdown_signal = setup_shutdown_signal();

    // 設定錯誤在開始任何工作前就回報
    let mut config = Config::new()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.split_first() {
        None => run_interactive(&shutdown_signal, &mut config),
        Some((command, paths)) if command == "cache" => {
            Ok(run_batch(&shutdown_signal, config, paths))
        }
        Some((command, [value])) if command == "color" => {
            Ok(run_color(&shutdown_signal, config, value))
        }
        Some(_) => {
            eprintln!("{USAGE}");
            Ok(ExitCode::from(2))
        }
    }
}

fn run_batch(shutdown_signal: &Arc<AtomicBool>, config: Config, paths: &[String]) -> ExitCode {
    if paths.is_empty() {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }

    let roots: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();
    let cacher = BatchCacher::new(config, Arc::clone(shutdown_signal));
    let summary = cacher.run_paths(&roots);
    print_summary(&summary);

    ExitCode::from(u8::try_from(summary.exit_code()).unwrap_or(1))
}

fn run_color(shutdown_signal: &Arc<AtomicBool>, config: Config, value: &str) -> ExitCode {
    let generator = PaletteGenerator::new(config, Arc::clone(shutdown_signal));

    match generator.show_color(value) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run_interactive(shutdown_signal: &Arc<AtomicBool>, config: &mut Config) -> Result<ExitCode> {
    let term = Term::stdout();

    loop {
        match show_main_menu(&term, shutdown_signal, config) {
            Ok(true) if is_shutdown_requested(shutdown_signal) => {
                warn!("Interrupted, exiting");
                return Ok(ExitCode::from(EXIT_INTERRUPTED as u8));
            }
            Ok(true) => {}
            Ok(false) => {
                term.clear_screen()?;
                println!("\n{}", style("再見！").green().bold());
                info!("Program exited normally");
                break;
            }
            Err(e) => {
                warn!("Program error: {e}");
                eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
