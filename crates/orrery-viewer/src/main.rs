mod app;
mod config;
mod geometry;

use anyhow::Result;

use orrery_engine::device::GpuInit;
use orrery_engine::logging::{init_logging, LoggingConfig};
use orrery_engine::window::{Runtime, RuntimeConfig};

use crate::app::{PlaygroundApp, SceneAssets};
use crate::config::ViewerConfig;

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = ViewerConfig::from_env();
    log::info!("assets from '{}'", config.assets_dir.display());

    let assets = SceneAssets::load(&config)?;
    let app = PlaygroundApp::new(&config, assets);

    Runtime::run(RuntimeConfig::default(), GpuInit::default(), app)
}
