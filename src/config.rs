use std::{net::SocketAddr, path::PathBuf};

use serde::Deserialize;

/// Environment variable pointing to the config file.
pub const PATH_VAR: &str = "ADNUVERSE_CONFIG";

/// Config file used when [`PATH_VAR`] is unset.
pub const DEFAULT_PATH: &str = "./data/config.toml";

/// Describing the server configuration.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    /// Socket the server listens on.
    pub addr: SocketAddr,
    /// Root directory of persisted records.
    /// Records are kept in memory only if absent.
    pub data_dir: Option<PathBuf>,
    /// Days before a login token expires. `0` means never.
    pub token_expiration_days: u16,
    /// Email domains allowed to register, any domain if empty.
    pub allowed_email_domains: Vec<String>,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
    pub story_lifetime_hours: u32,
    /// Google sign-in, disabled if absent.
    pub google: Option<Google>,
}

/// Describing Google sign-in configuration.
#[derive(Deserialize, Debug, Clone)]
pub struct Google {
    /// OAuth client id, expected as the audience of ID tokens.
    pub client_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: None,
            token_expiration_days: 7,
            allowed_email_domains: vec![],
            allowed_origins: vec!["http://localhost:5173".to_owned()],
            story_lifetime_hours: 24,
            google: None,
        }
    }
}

impl Config {
    pub fn from_path(path: &std::path::Path) -> Result<Self, crate::Error> {
        Ok(toml::from_str(&std::fs::read_to_string(path)?)?)
    }

    /// Reads the config file named by [`PATH_VAR`], or [`DEFAULT_PATH`].
    ///
    /// A missing file yields the default config.
    pub fn load() -> Result<Self, crate::Error> {
        let path = std::env::var_os(PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PATH));

        if path.exists() {
            tracing::info!("reading config from {}", path.display());
            Self::from_path(&path)
        } else {
            tracing::warn!("config {} not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Whether accounts may register with this address.
    pub fn email_allowed(&self, email: &lettre::Address) -> bool {
        self.allowed_email_domains.is_empty()
            || self
                .allowed_email_domains
                .iter()
                .any(|d| d.eq_ignore_ascii_case(email.domain()))
    }

    #[inline]
    pub fn story_lifetime(&self) -> chrono::Duration {
        chrono::Duration::hours(self.story_lifetime_hours as i64)
    }
}
