//! # bz-config
//!
//! Runtime settings for the bazaar server, read from the process environment
//! (optionally seeded from a `.env` file).

use config::{Config, ConfigError, Environment};
use secrecy::SecretString;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("invalid HOST '{0}'")]
    InvalidHost(String),
}

/// How log lines are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// What happened to the `.env` file. Settings are read before logging is
/// set up, so the outcome is kept and reported later with [`DotenvOutcome::log`].
#[derive(Debug)]
pub enum DotenvOutcome {
    Loaded(PathBuf),
    NotFound,
    Failed(dotenvy::Error),
}

impl DotenvOutcome {
    fn from_result(result: Result<PathBuf, dotenvy::Error>) -> Self {
        match result {
            Ok(path) => Self::Loaded(path),
            Err(e) if e.not_found() => Self::NotFound,
            Err(e) => Self::Failed(e),
        }
    }

    pub fn log(&self) {
        match self {
            Self::Loaded(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Self::NotFound => {}
            Self::Failed(e) => tracing::warn!(error = %e, "ignoring unreadable .env"),
        }
    }
}

/// Seeds the process environment from `.env` in the working directory or a parent.
pub fn load_dotenv() -> DotenvOutcome {
    DotenvOutcome::from_result(dotenvy::dotenv())
}

/// Same as [`load_dotenv`] for an explicit file.
pub fn load_dotenv_from(path: &Path) -> DotenvOutcome {
    DotenvOutcome::from_result(dotenvy::from_path(path).map(|()| path.to_path_buf()))
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Root directory for stored uploads
    pub upload_dir: PathBuf,
    /// Public URL prefix the upload directory is served under
    pub media_url_prefix: String,
    /// Request body cap for multipart submissions
    pub max_upload_bytes: usize,
    /// HS256 key bearer tokens are signed with
    pub jwt_secret: SecretString,
    pub log_format: LogFormat,
}

impl Settings {
    /// Reads the environment over the defaults. Call [`load_dotenv`] first
    /// to seed the environment from a `.env` file.
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_source(Environment::default().try_parsing(true))
    }

    /// Builds settings from any `config` source; used by `load` and by tests.
    pub fn from_source<S>(source: S) -> Result<Self, SettingsError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8000)?
            .set_default("database_url", "sqlite:bazaar.db")?
            .set_default("upload_dir", "./data/uploads")?
            .set_default("media_url_prefix", "/uploads")?
            .set_default("max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("log_format", "pretty")?
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| SettingsError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::File;
    use config::FileFormat;
    use secrecy::ExposeSecret;

    fn from_toml(toml: &str) -> Result<Settings, SettingsError> {
        Settings::from_source(File::from_str(toml, FileFormat::Toml))
    }

    #[test]
    fn defaults_fill_everything_but_the_secret() {
        let s = from_toml(r#"jwt_secret = "s3cret""#).unwrap();
        assert_eq!(s.port, 8000);
        assert_eq!(s.database_url, "sqlite:bazaar.db");
        assert_eq!(s.media_url_prefix, "/uploads");
        assert_eq!(s.log_format, LogFormat::Pretty);
        assert_eq!(s.jwt_secret.expose_secret(), "s3cret");
        assert_eq!(s.bind_addr().unwrap().to_string(), "0.0.0.0:8000");
    }

    #[test]
    fn missing_secret_is_an_error() {
        assert!(matches!(from_toml(""), Err(SettingsError::Load(_))));
    }

    #[test]
    fn overrides_apply() {
        let s = from_toml(
            r#"
            jwt_secret = "k"
            host = "127.0.0.1"
            port = 9001
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(s.log_format, LogFormat::Json);
        assert_eq!(s.bind_addr().unwrap().to_string(), "127.0.0.1:9001");
    }

    #[test]
    fn dotenv_outcomes() {
        let dir = std::env::temp_dir();
        let missing = dir.join("bz-config-missing-dotenv-file");
        assert!(matches!(load_dotenv_from(&missing), DotenvOutcome::NotFound));

        let file = dir.join(format!("bz-config-{}.env", std::process::id()));
        std::fs::write(&file, "BZ_CONFIG_DOTENV_SEEDED=seeded\n").unwrap();
        match load_dotenv_from(&file) {
            DotenvOutcome::Loaded(path) => assert_eq!(path, file),
            other => panic!("expected Loaded, got {other:?}"),
        }
        assert_eq!(std::env::var("BZ_CONFIG_DOTENV_SEEDED").unwrap(), "seeded");
        std::fs::remove_file(file).ok();
    }

    #[test]
    fn bad_host_is_reported() {
        let s = from_toml(
            r#"
            jwt_secret = "k"
            host = "not-an-ip"
            "#,
        )
        .unwrap();
        assert!(matches!(s.bind_addr(), Err(SettingsError::InvalidHost(_))));
    }
}
