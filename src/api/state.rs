use std::sync::Arc;

use crate::config::QueryConfig;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub query: QueryConfig,
    pub cors_origin: String,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, query: QueryConfig, cors_origin: impl Into<String>) -> Self {
        Self {
            store,
            query,
            cors_origin: cors_origin.into(),
        }
    }
}
