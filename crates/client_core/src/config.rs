use std::{fs, path::Path, time::Duration};

use serde::Deserialize;

use crate::{
    controller::{ControllerOptions, ResponseOrdering, COPY_CONFIRMATION_DURATION},
    session::DEFAULT_FUNCTION,
};

pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const SETTINGS_FILE: &str = "redstr.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub api_url: String,
    pub default_function: String,
    pub request_timeout_secs: Option<u64>,
    pub copy_confirmation_ms: u64,
    pub response_ordering: ResponseOrdering,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            default_function: DEFAULT_FUNCTION.into(),
            request_timeout_secs: None,
            copy_confirmation_ms: COPY_CONFIRMATION_DURATION.as_millis() as u64,
            response_ordering: ResponseOrdering::LastResolved,
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            copy_confirmation: Duration::from_millis(self.copy_confirmation_ms),
            response_ordering: self.response_ordering,
        }
    }
}

/// Reads `redstr.toml` from the working directory, then applies
/// environment overrides. Called once at startup.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match raw.parse::<toml::Table>() {
            Ok(file_cfg) => {
                let file_value = |key: &str| file_cfg.get(key).map(toml_value_to_string);
                apply_overrides(&mut settings, file_value);
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unparseable settings file");
            }
        }
    }

    apply_overrides(&mut settings, |key| {
        let env_key = format!("APP__{}", key.to_ascii_uppercase());
        env(&env_key)
    });
    if let Some(v) = env("REDSTR_API_URL") {
        settings.api_url = v;
    }

    settings.api_url = normalize_api_url(&settings.api_url);
    settings
}

fn apply_overrides(settings: &mut ClientSettings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("api_url") {
        settings.api_url = v;
    }
    if let Some(v) = lookup("default_function") {
        let v = v.trim();
        if !v.is_empty() {
            settings.default_function = v.to_string();
        }
    }
    if let Some(v) = lookup("request_timeout_secs") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }
    if let Some(v) = lookup("copy_confirmation_ms") {
        if let Ok(parsed) = v.trim().parse::<u64>() {
            settings.copy_confirmation_ms = parsed;
        }
    }
    if let Some(v) = lookup("response_ordering") {
        match v.parse::<ResponseOrdering>() {
            Ok(parsed) => settings.response_ordering = parsed,
            Err(err) => tracing::warn!("{err}; keeping {:?}", settings.response_ordering),
        }
    }
}

fn toml_value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Trims whitespace and trailing slashes. Blank input falls back to the
/// default address.
pub fn normalize_api_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_API_URL.to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
