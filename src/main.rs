use std::path::{Path, PathBuf};

use color_eyre::eyre::Result;

use cp2020_sheets::{
    app::App,
    dice::RandomRoller,
    logging,
    settings::{SETTINGS_PATH, Settings},
    store::RecordStore,
    tui::Tui,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let settings = Settings::load().unwrap_or_else(|e| {
        eprintln!("Failed to load settings, using defaults: {e}");
        Settings::default()
    });
    if let Err(e) = logging::init(settings.debug_mode) {
        eprintln!("Failed to initialize logger: {e}");
    }
    log::info!("Sheet editor start: {}", chrono::Local::now());
    if !Path::new(SETTINGS_PATH).exists() {
        // Leave a settings file behind for the user to edit.
        if let Err(e) = settings.save() {
            log::warn!("Could not write default settings: {e}");
        }
    }

    // The first argument overrides the configured store.
    let store_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.store_path.clone());
    let store = RecordStore::load(&store_path)?;

    let mut app = App::new(settings, store_path, store, Box::new(RandomRoller::new()));

    let mut tui = Tui::new()?;
    tui.enter()?;
    let result = app.run(&mut tui).await;
    tui.exit()?;

    if let Err(e) = result {
        log::error!("Application error: {e}");
        return Err(e.into());
    }
    Ok(())
}
