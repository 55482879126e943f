use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AuthService, PostService, SeaOrmAuthService, SeaOrmPostService};

/// Process-wide state. The connection pool inside `store` is the only
/// shared mutable resource; everything request-scoped is built per call.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub post_service: Arc<dyn PostService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::from_config(&config.database).await?;
        Ok(Self::with_store(config, store))
    }

    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        ));
        let post_service: Arc<dyn PostService> = Arc::new(SeaOrmPostService::new(store.clone()));

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            post_service,
        }
    }
}
