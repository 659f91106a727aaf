use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use eframe::egui;
use tokio::sync::mpsc;

mod app;
mod config;
mod error;
mod midi;
mod note;
mod staff;
mod state;
mod ui;

use app::MonitorApp;
use config::Config;
use error::Error;
use state::NoteState;

#[derive(Parser)]
#[command(name = "midi-staff", about = "Show incoming MIDI notes on a staff")]
#[command(version)]
struct Cli {
    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Connect to the first input port whose name contains this
    #[arg(long)]
    device: Option<String>,

    /// Print the available input ports and exit
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if cli.device.is_some() {
        config.preferred_device = cli.device;
    }

    let devices = midi::list_devices()?;
    if devices.is_empty() {
        log::error!("no MIDI input ports found");
        return Err(Error::NoDevices.into());
    }
    if cli.list {
        for device in &devices {
            println!("{}", device.name);
        }
        return Ok(());
    }

    let font = config
        .font_path
        .as_deref()
        .map(ui::load_font)
        .transpose()?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let state = Arc::new(NoteState::new(config.history_len));
    let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
    runtime.spawn(midi::pump(rx, Arc::clone(&state)));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_resizable(false)
            .with_title(config.title.clone()),
        ..Default::default()
    };

    let title = config.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            if let Some(bytes) = font {
                ui::install_font(&cc.egui_ctx, bytes);
            }
            let mut app = MonitorApp::new(devices, state, tx, &config);
            if let Some(pattern) = config.preferred_device.as_deref() {
                app.auto_select(pattern);
            }
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow!("window error: {e}"))?;

    log::info!("Closed");
    Ok(())
}
