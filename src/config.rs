// Configuration: API key, verbosity and base URL.
//
// Values come from the environment (after `.env` is loaded by the binary).
// The API key falls back to a key file in the user's home directory, which
// the CLI writes after prompting for a key.

use crate::error::{Result, UptimeError};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.uptimerobot.com/v2/";
pub const API_KEY_VAR: &str = "UPTIMEROBOT_APIKEY";
pub const BASE_URL_VAR: &str = "UPTIMEROBOT_BASE_URL";
pub const DEBUG_VAR: &str = "IS_DEBUG";
const KEY_FILE: &str = ".uptimerobot_apikey";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Empty when no key is configured; the client then skips every request.
    pub api_key: String,
    pub verbose: bool,
    pub base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: String::new(),
            verbose: false,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Resolve settings from the environment, falling back to the key file
    /// for the API key.
    pub fn from_env() -> Self {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .or_else(|| load_api_key().ok())
            .unwrap_or_default();

        let base_url = std::env::var(BASE_URL_VAR)
            .ok()
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());

        Settings {
            api_key,
            verbose: debug_enabled(),
            base_url: with_trailing_slash(base_url),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// `IS_DEBUG=1` turns on request/response diagnostics.
pub fn debug_enabled() -> bool {
    std::env::var(DEBUG_VAR).map(|v| v == "1").unwrap_or(false)
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}

fn key_file_path() -> PathBuf {
    let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    dir.join(KEY_FILE)
}

/// Persist an API key into the user's home directory.
pub fn persist_api_key(key: &str) -> Result<()> {
    std::fs::write(key_file_path(), key.trim())?;
    Ok(())
}

/// Load the API key stored by `persist_api_key`.
pub fn load_api_key() -> Result<String> {
    let data = std::fs::read_to_string(key_file_path())?;
    let key = data.trim().to_string();
    if key.is_empty() {
        return Err(UptimeError::Config(format!(
            "{} is empty",
            key_file_path().display()
        )));
    }
    Ok(key)
}
