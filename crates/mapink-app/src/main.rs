//! Headless map editor (native).

use mapink_app::{AppConfig, AppError, Editor, run_commands};
use mapink_core::{LocalTransport, MapStore, ToolCatalog, Transport, WsTransport};
use std::io;

fn main() {
    env_logger::init();
    log::info!("Starting MapInk");

    if let Err(e) = pollster::block_on(run()) {
        log::error!("{e}");
        eprintln!("mapink: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_args(std::env::args().skip(1))?;
    let catalog = ToolCatalog::standard();

    let transport: Box<dyn Transport> = if config.local {
        log::info!("Editing against an in-process store");
        Box::new(LocalTransport::new(MapStore::new(catalog.clone())))
    } else {
        Box::new(WsTransport::connect(&config.server_url)?)
    };

    let mut editor = Editor::with_snap_radius(catalog, transport, config.snap_radius);
    editor.start().await;

    let stdin = io::stdin();
    run_commands(&mut editor, &config, stdin.lock(), io::stdout()).await
}
