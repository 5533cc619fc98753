//! Book catalog service.
//!
//! Wires the document store, the module registry and the HTTP server
//! together. The catalog operations themselves live in
//! [`modules::books::catalog`].

pub mod modules;

use anyhow::Context;
use catalog_db::Store;
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::books::catalog::{BookCatalog, CatalogError};
pub use modules::books::models::{Book, BookDraft, BookPatch, Genre};

/// Build a registry holding the store lifecycle module and the books module
pub fn build_registry(store: &Store) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store);
    registry
}

/// Open the document store named in the settings
pub async fn connect_store(settings: &Settings) -> anyhow::Result<Store> {
    catalog_db::connect(&settings.database.endpoint, &settings.database.database)
        .await
        .with_context(|| {
            format!(
                "failed to connect to document store at '{}'",
                settings.database.endpoint
            )
        })
}

/// Run the service until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = connect_store(&settings).await?;
    let registry = build_registry(&store);

    let ctx = InitCtx {
        settings: &settings,
        store: &store,
    };
    registry.boot(&ctx).await?;

    let served = catalog_http::start_server(&registry, &settings, shutdown_signal()).await;

    registry.shutdown().await?;
    served
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
