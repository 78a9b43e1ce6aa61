use std::sync::Arc;

use poem::{get, post, EndpointExt, Route};

use crate::handlers::{audit, engines, health, query, tables};
use crate::state::AppState;

/// Assembles the HTTP surface of spec §4.8/§6. `state` is injected as
/// poem `Data` so every handler can reach the shared repository, engine
/// registry, adapter registry, and audit logger.
pub fn build_routes(state: Arc<AppState>) -> Route {
    Route::new()
        .at("/healthz", get(health::healthz))
        .at("/readyz", get(health::readyz))
        .at("/tables", get(tables::list_tables))
        .at("/tables/:name", get(tables::get_table).put(tables::put_table).delete(tables::delete_table))
        .at("/query/validate", post(query::validate))
        .at("/query/explain", post(query::explain))
        .at("/query", post(query::execute_query))
        .at("/audit/summary", get(audit::audit_summary))
        .at("/engines", get(engines::list_engines))
        .at("/engines/:name", get(engines::get_engine))
        .data(state)
}
