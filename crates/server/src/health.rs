use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use catalog_core::CatalogQueries;
use chrono::Utc;
use serde::Serialize;

#[derive(Clone)]
pub struct HealthState {
    queries: CatalogQueries,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub catalog: HealthCheck,
    pub product_count: usize,
    pub checked_at: String,
}

pub fn router(queries: CatalogQueries) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { queries })
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let product_count = state.queries.store().len();
    let catalog = catalog_check(product_count);
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        catalog,
        product_count,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(product_count: usize) -> HealthCheck {
    if product_count == 0 {
        HealthCheck { status: "degraded", detail: "catalog loaded but contains no products".into() }
    } else {
        HealthCheck { status: "ready", detail: format!("{product_count} products loaded") }
    }
}
