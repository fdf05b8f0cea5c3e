slint::include_modules!();

mod callbacks;
mod worker;

use anyhow::{Context, Result};
use clap::Parser;
use roi_configurator::config::{AppConfig, config_path, load_config, load_config_from, save_config_to};
use roi_configurator::logging::setup_logger;
use roi_configurator::{HttpSensorApi, PageController};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "roi-configurator", version, about = "Draw and save per-sensor regions of interest")]
struct Args {
    /// Sensor server base URL (overrides the config file)
    #[arg(long)]
    server: Option<String>,

    /// Config file to use instead of the platform default
    #[arg(long)]
    config: Option<PathBuf>,

    /// ROI type offered in the selector; repeat for several (overrides the config file)
    #[arg(long = "roi-type")]
    roi_types: Vec<String>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

fn resolve_config(args: &Args) -> AppConfig {
    let mut config = match &args.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    if let Some(server) = &args.server {
        config.server.base_url = server.clone();
    }
    if !args.roi_types.is_empty() {
        config.roi.types = args.roi_types.clone();
    }
    config
}

fn main() -> Result<()> {
    setup_logger();
    let args = Args::parse();
    let config = resolve_config(&args);

    if args.write_config {
        let path = args
            .config
            .clone()
            .or_else(config_path)
            .context("Failed to determine config directory")?;
        save_config_to(&config, &path).map_err(anyhow::Error::msg)?;
        log::info!("Wrote config to {}", path.display());
        return Ok(());
    }

    log::info!("Using sensor server {}", config.server.base_url);
    let api = HttpSensorApi::new(
        &config.server.base_url,
        Duration::from_secs(config.server.timeout_secs),
    )?;
    let controller = Rc::new(RefCell::new(PageController::from_config(&config.roi)));

    let ui = AppWindow::new()?;
    callbacks::refresh_canvas(&ui, &controller.borrow());

    callbacks::drawing::setup_drawing_callbacks(&ui, controller.clone());
    callbacks::submit::setup_submit_callbacks(&ui, controller.clone(), api.clone());
    callbacks::snapshot::setup_snapshot_callbacks(&ui, controller.clone(), api.clone());
    callbacks::sensors::setup_sensor_callbacks(&ui, controller, api);

    ui.run()?;
    Ok(())
}
