use anyhow::Context;
use async_trait::async_trait;
use catalog_db::Store;
use catalog_kernel::{InitCtx, Module};

/// Core module owning the document store connection lifecycle.
///
/// Verifies the store on init and closes it on stop, after every custom
/// module has stopped.
pub struct StoreModule {
    store: Store,
}

impl StoreModule {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for StoreModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.store
            .ping()
            .await
            .with_context(|| format!("store at '{}' is unreachable", ctx.settings.database.endpoint))?;

        tracing::info!(
            module = self.name(),
            backend = self.store.backend(),
            "document store ready"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.store
            .close()
            .await
            .context("failed to close document store")?;
        tracing::info!(module = self.name(), "document store closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_db::{MemoryStore, StoreError};
    use catalog_kernel::settings::Settings;
    use std::sync::Arc;

    #[tokio::test]
    async fn stop_closes_the_store() {
        let store: Store = Arc::new(MemoryStore::new("test"));
        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
            store: &store,
        };
        let module = StoreModule::new(store.clone());

        module.init(&ctx).await.unwrap();
        module.stop().await.unwrap();

        assert!(matches!(store.ping().await, Err(StoreError::Closed)));
        assert!(module.init(&ctx).await.is_err());
    }
}
