use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub http: Http,
    pub log: Log,
    pub store: Store,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Http {
    pub address: String,
    /// Directory served for paths no user route claims.
    #[serde(default)]
    pub static_dir: Option<String>,
    /// TLS is enabled only when both paths are set.
    #[serde(default)]
    pub cert_path: Option<String>,
    #[serde(default)]
    pub key_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Store {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub backend: String, // "fake" or "real"
}

fn default_max_connections() -> u32 {
    5
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bundled_dev_settings() {
        let settings = parse_settings(Some("settings/dev.toml")).unwrap();
        assert_eq!(settings.user.backend, "real");
        assert!(settings.store.url.starts_with("sqlite:"));
        assert!(settings.http.cert_path.is_none());
    }

    #[test]
    fn parses_bundled_release_settings() {
        let settings = parse_settings(Some("settings/release.toml")).unwrap();
        assert_eq!(settings.http.address, "0.0.0.0:8080");
        assert_eq!(settings.store.max_connections, 16);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(parse_settings(Some("settings/does-not-exist.toml")).is_err());
    }
}
