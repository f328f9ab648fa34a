pub mod apps;
pub mod auth;
pub mod config;
pub mod goal;
pub mod ledger;
pub mod settings;
pub mod stats;

use focushub_core::{Config, Shell, Store};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Shell over the on-disk store and the loaded configuration.
pub fn open_shell() -> Result<(Shell, Config), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let store = Store::open()?;
    Ok((Shell::with_browser(store, &config), config))
}

/// Single-threaded runtime for commands that call the generation service.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
