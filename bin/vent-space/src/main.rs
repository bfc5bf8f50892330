//! # Vent Space Binary
//!
//! The entry point that assembles the application from compile-time
//! features and runtime configuration.

use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::EnvFilter;
use vs_api::{configure_routes, middleware, AppState};
use vs_config::{LogSettings, Settings, StoreBackend, StoreSettings};
use vs_core::traits::VentStore;
use vs_moderation_wordlist::WordListFilter;

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn open_store(settings: &StoreSettings) -> anyhow::Result<Arc<dyn VentStore>> {
    match settings.backend {
        #[cfg(feature = "store-memory")]
        StoreBackend::Memory => Ok(Arc::new(vs_store_memory::MemoryVentStore::new())),

        #[cfg(feature = "store-sqlite")]
        StoreBackend::Sqlite => {
            let store = vs_store_sqlite::SqliteVentStore::new(&settings.database_url)
                .await
                .with_context(|| format!("failed to open {}", settings.database_url))?;
            Ok(Arc::new(store))
        }

        #[allow(unreachable_patterns)]
        ref other => anyhow::bail!("store backend {other:?} is not compiled into this build"),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing(&settings.log);

    // 1. Initialize the store implementation
    let store = open_store(&settings.store).await?;
    tracing::info!(backend = ?settings.store.backend, "store ready");

    // 2. Initialize moderation
    let moderation = &settings.moderation;
    let moderator = WordListFilter::new()
        .with_words(&moderation.extra_words)
        .without_words(&moderation.allowed_words)
        .with_placeholder(moderation.placeholder);
    tracing::info!(terms = moderator.len(), "moderation ready");

    // 3. Mount the live view and share it across workers
    let state = web::Data::new(AppState::new(store, Arc::new(moderator)).await);

    let (host, port) = settings.bind_addr();
    tracing::info!("Vent Space starting on http://{host}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::standard_middleware())
            .wrap(middleware::cors_policy())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
