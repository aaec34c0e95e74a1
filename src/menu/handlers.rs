use crate::component::{BatchCacher, PaletteGenerator};
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_palette_generator(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let mut generator = PaletteGenerator::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = generator.run() {
        eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
    }
    config.clone_from(generator.config());

    pause(term)?;
    Ok(())
}

pub fn run_color_generator(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let generator = PaletteGenerator::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = generator.run_color() {
        eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_regenerate(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let generator = PaletteGenerator::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = generator.run_regenerate() {
        eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
    }

    pause(term)?;
    Ok(())
}

pub fn run_batch_cacher(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let mut cacher = BatchCacher::new(config.clone(), Arc::clone(shutdown_signal));

    if let Err(e) = cacher.run() {
        eprintln!("{} {:#}", style("錯誤:").red().bold(), e);
    }
    config.clone_from(cacher.config());

    pause(term)?;
    Ok(())
}
