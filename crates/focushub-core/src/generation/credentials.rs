//! API key storage in the OS keyring.
//!
//! `GEMINI_API_KEY` in the environment takes precedence over the keyring.

const SERVICE: &str = "focushub";
const API_KEY: &str = "gemini_api_key";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Where the active API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Environment,
    Keyring,
}

fn entry() -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(SERVICE, API_KEY)
}

pub fn get() -> Result<Option<String>, keyring::Error> {
    match entry()?.get_password() {
        Ok(pw) => Ok(Some(pw)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn set(value: &str) -> Result<(), keyring::Error> {
    entry()?.set_password(value.trim())
}

pub fn delete() -> Result<(), keyring::Error> {
    match entry()?.delete_credential() {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Resolve the API key, environment first.
pub fn resolve() -> Option<(String, KeySource)> {
    if let Some(key) = std::env::var(API_KEY_ENV)
        .ok()
        .filter(|k| !k.trim().is_empty())
    {
        return Some((key, KeySource::Environment));
    }
    match get() {
        Ok(Some(key)) if !key.trim().is_empty() => Some((key, KeySource::Keyring)),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read API key from keyring");
            None
        }
    }
}
