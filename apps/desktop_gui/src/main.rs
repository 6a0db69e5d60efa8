use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::StorefrontApp;

#[derive(Parser, Debug)]
struct Args {
    /// Farm endpoint override; falls back to corn.toml / CORN_FARM_URL.
    #[arg(long)]
    farm_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let settings = client_core::load_settings().with_override(args.farm_url);

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Bob's Corn Storefront")
            .with_inner_size([460.0, 420.0])
            .with_min_inner_size([380.0, 340.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Bob's Corn Storefront",
        options,
        Box::new(|_cc| Ok(Box::new(StorefrontApp::new(cmd_tx, ui_rx)))),
    )
}
