//! Application configuration. Store backend, identity, paths.

use serde::Deserialize;
use std::time::Duration;

/// Seconds the "profile saved" notice stays visible.
pub const DEFAULT_NOTICE_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sqlite,
    Http,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Document store backend. Read from GYM_PORTAL_STORE.
    #[serde(default)]
    pub store: Option<StoreBackend>,

    /// Directory for the SQLite store. Read from GYM_PORTAL_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Remote document API root (http backend). Read from GYM_PORTAL_STORE_URL.
    #[serde(default)]
    pub store_url: Option<String>,

    /// Bearer token for the remote document API. Read from GYM_PORTAL_STORE_TOKEN.
    #[serde(default)]
    pub store_token: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Signed-in member (supplied by the auth provider in production)
    // ─────────────────────────────────────────────────────────────────────────
    /// Read from GYM_PORTAL_MEMBER_ID.
    #[serde(default)]
    pub member_id: Option<String>,

    /// Read from GYM_PORTAL_MEMBER_NAME.
    #[serde(default)]
    pub member_name: Option<String>,

    /// Read from GYM_PORTAL_GYM_ID.
    #[serde(default)]
    pub gym_id: Option<String>,

    /// Success notice lifetime in seconds. Read from GYM_PORTAL_NOTICE_SECS.
    #[serde(default)]
    pub notice_secs: Option<u64>,

    /// Seed sample documents into the memory store. Read from GYM_PORTAL_SEED_DEMO.
    #[serde(default)]
    pub seed_demo: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("GYM_PORTAL").try_parsing(true));
        if let Ok(path) = std::env::var("GYM_PORTAL_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    pub fn store_or_default(&self) -> StoreBackend {
        self.store.unwrap_or_default()
    }

    /// Defaults to ./data.
    pub fn data_dir_or_default(&self) -> String {
        self.data_dir.clone().unwrap_or_else(|| "./data".to_string())
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_secs.unwrap_or(DEFAULT_NOTICE_SECS))
    }

    /// Demo data is seeded only into the memory store, and only unless disabled.
    pub fn should_seed_demo(&self) -> bool {
        self.store_or_default() == StoreBackend::Memory && self.seed_demo.unwrap_or(true)
    }

    /// Demo identity when running the memory store without configuration.
    pub fn member_id_or_demo(&self) -> Option<String> {
        match (&self.member_id, self.store_or_default()) {
            (Some(id), _) => Some(id.clone()),
            (None, StoreBackend::Memory) => Some("demo-member".to_string()),
            (None, _) => None,
        }
    }
}
