//! Wiring & DI. Entry point: bootstrap adapters, inject into the UI, run.
//! No business logic here; screens live in the use cases.

use dotenv::dotenv;
use gym_portal::adapters::auth::ConfigAuth;
use gym_portal::adapters::persistence::demo_seed::seed_demo;
use gym_portal::adapters::persistence::{MemoryStore, SqliteStore};
use gym_portal::adapters::remote::HttpStore;
use gym_portal::adapters::ui::tui::TuiInputPort;
use gym_portal::ports::{AuthPort, DocumentStore, InputPort};
use gym_portal::shared::config::{AppConfig, StoreBackend};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config load failed; using defaults");
        AppConfig::default()
    });

    gym_portal::adapters::ui::init_ui();

    let data_path = PathBuf::from(cfg.data_dir_or_default());

    // --- Auth: identity from config (demo identity for the memory store) ---
    let member_id = cfg.member_id_or_demo();
    let member_name = cfg
        .member_name
        .clone()
        .or_else(|| member_id.as_ref().map(|_| "Demo Member".to_string()));
    if member_id.is_none() {
        warn!("GYM_PORTAL_MEMBER_ID not set; screens will show empty state");
    }

    // --- Document store ---
    let store: Arc<dyn DocumentStore> = match cfg.store_or_default() {
        StoreBackend::Memory => {
            let memory = MemoryStore::new();
            if cfg.should_seed_demo() {
                if let Some(id) = &member_id {
                    seed_demo(
                        &memory,
                        id,
                        member_name.as_deref().unwrap_or("Demo Member"),
                        cfg.gym_id.as_deref(),
                    )
                    .await;
                }
            }
            info!("using in-memory document store");
            Arc::new(memory)
        }
        StoreBackend::Sqlite => Arc::new(
            SqliteStore::connect(&data_path)
                .await
                .map_err(|e| anyhow::anyhow!("SQLite connect failed: {}", e))?,
        ),
        StoreBackend::Http => {
            let Some(url) = cfg.store_url.clone() else {
                anyhow::bail!("Set GYM_PORTAL_STORE_URL for the http store");
            };
            info!(url = %url, "using remote document store");
            Arc::new(HttpStore::new(url, cfg.store_token.clone()))
        }
    };

    let auth: Arc<dyn AuthPort> = Arc::new(ConfigAuth::new(
        member_id,
        member_name,
        cfg.gym_id.clone(),
    ));

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        store,
        auth,
        cfg.notice_ttl(),
        data_path.join("exports"),
    ));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
