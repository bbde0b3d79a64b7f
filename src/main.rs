mod app;
mod backend;
mod chat;
mod config;

use clap::Parser;
use env_logger::Env;

use crate::backend::BackendClient;
use crate::config::{Args, Config};

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = match Config::from_args(Args::parse()) {
        Ok(config) => config,
        Err(error) => {
            log::error!("invalid configuration: {error:#}");
            eprintln!("error: {error:#}");
            std::process::exit(2);
        }
    };

    let client = match BackendClient::new(config.server.clone()) {
        Ok(client) => client,
        Err(error) => {
            log::error!("failed to create backend client: {error:#}");
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 920.0])
            .with_title("Chat Constellation"),
        ..Default::default()
    };

    eframe::run_native(
        "chat-constellation",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ConstellationApp::new(
                cc,
                client,
                config.page,
            )))
        }),
    )
}
