mod config;
pub mod store;

pub use config::{AccessConfig, Config, GenerationConfig, StatsConfig};
pub use store::{Store, StoreKey};

use std::path::PathBuf;

/// Returns `~/.config/focushub[-dev]/` based on FOCUSHUB_ENV.
///
/// Set FOCUSHUB_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUSHUB_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focushub-dev")
    } else {
        base_dir.join("focushub")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
