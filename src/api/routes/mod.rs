pub mod activity;
pub mod comps;
pub mod leaderboard;
pub mod options;
pub mod players;
pub mod stats;

use std::collections::HashMap;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::query::{FilterContext, OptionParams};
use crate::store::parse_page;

/// Raw query parameters. Every endpoint normalizes its own keys.
pub type Params = HashMap<String, String>;

/// Resolve the request's selection.
pub(crate) async fn resolve_context(
    state: &AppState,
    params: &Params,
) -> Result<FilterContext, ApiError> {
    let options = OptionParams::from_raw(params);
    Ok(FilterContext::resolve(state.store.as_ref(), &options).await?)
}

pub(crate) fn page_param(params: &Params) -> Option<u32> {
    parse_page(params.get("page").map(String::as_str))
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::api::build_router;
    use crate::api::state::AppState;
    use crate::config::QueryConfig;
    use crate::storage::LadderData;
    use crate::store::{MemoryStore, Store, UnavailableStore};

    pub fn app(data: LadderData) -> Router {
        app_with(data, QueryConfig::default())
    }

    pub fn app_with(data: LadderData, query: QueryConfig) -> Router {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new(data));
        build_router(AppState::new(store, query, "*"))
    }

    pub fn unavailable_app() -> Router {
        build_router(AppState::new(
            Arc::new(UnavailableStore),
            QueryConfig::default(),
            "*",
        ))
    }

    pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    /// Status and `Location` header of a response.
    pub async fn get_location(app: Router, uri: &str) -> (StatusCode, Option<String>) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let location = resp
            .headers()
            .get("location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        (resp.status(), location)
    }
}
