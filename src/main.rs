mod app;
mod catalog;
mod config;
mod markers;
mod session;
mod transform;

use anyhow::Context;
use eframe::egui;
use std::path::PathBuf;

use crate::app::ExplorerApp;
use crate::catalog::Catalog;
use crate::config::ViewerConfig;

const USAGE: &str = "\
Usage: image-explorer [--config <file.json>] [--assets <dir>]

  --config <file>  JSON viewer settings (zoom bounds, wheel sensitivity, ...)
  --assets <dir>   directory holding the catalog images (default: ./assets)
  -h, --help       print this help";

struct Args {
    config: Option<PathBuf>,
    assets: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Option<Args>> {
    let mut pargs = pico_args::Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        return Ok(None);
    }
    let args = Args {
        config: pargs.opt_value_from_str("--config")?,
        assets: pargs.opt_value_from_str("--assets")?,
    };
    let rest = pargs.finish();
    if !rest.is_empty() {
        anyhow::bail!("unexpected arguments: {rest:?}\n\n{USAGE}");
    }
    Ok(Some(args))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(args) = parse_args()? else {
        println!("{USAGE}");
        return Ok(());
    };

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(assets) = args.assets {
        config.assets_dir = assets;
    }
    if !config.assets_dir.is_dir() {
        log::warn!(
            "assets directory {} not found; images will show as placeholders",
            config.assets_dir.display()
        );
    }
    log::debug!("config: {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_title("Image Explorer"),
        ..Default::default()
    };

    let catalog = Catalog::new(catalog::sample_entries());
    eframe::run_native(
        "image-explorer",
        options,
        Box::new(move |_cc| Ok(Box::new(ExplorerApp::new(config, catalog)))),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
    .context("failed to run the viewer window")
}
