use clap::Subcommand;
use focushub_core::generation::credentials::{self, KeySource};

use super::CliResult;

#[derive(Subcommand)]
pub enum AuthAction {
    /// Store the generation API key in the OS keyring
    SetKey {
        /// API key
        key: String,
    },
    /// Remove the stored API key
    ClearKey,
    /// Show where the active API key comes from
    Status,
}

pub fn run(action: AuthAction) -> CliResult {
    match action {
        AuthAction::SetKey { key } => {
            if key.trim().is_empty() {
                return Err("API key must not be empty".into());
            }
            credentials::set(&key)?;
            println!("API key saved to keyring");
        }
        AuthAction::ClearKey => {
            credentials::delete()?;
            println!("API key removed from keyring");
        }
        AuthAction::Status => match credentials::resolve() {
            Some((_, KeySource::Environment)) => {
                println!("configured ({})", credentials::API_KEY_ENV)
            }
            Some((_, KeySource::Keyring)) => println!("configured (keyring)"),
            None => println!("not configured"),
        },
    }
    Ok(())
}
