//! wcschat desktop — application entry.

mod app;
mod window;

use eframe::egui;
use wcschat::config::{self, Config};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match config::load_config(None) {
        Ok((config, path)) => {
            log::info!("config: {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("failed to load config, using defaults: {:#}", e);
            Config::default()
        }
    };

    let title = config.window.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([config.window.width, config.window.height]),
        ..Default::default()
    };
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Box::new(app::ChatApp::new(cc, config))),
    )
}
