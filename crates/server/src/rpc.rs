//! RPC front for the product catalog.
//!
//! Endpoints (JSON over HTTP, all `POST`):
//! - `/rpc/catalog.ProductCatalogService/ListProducts`: full catalog
//! - `/rpc/catalog.ProductCatalogService/GetProduct`: `{"id": "..."}`
//! - `/rpc/catalog.ProductCatalogService/SearchProducts`: `{"query": "..."}`
//!
//! Failures carry `{"code", "message", "correlation_id"}` with an HTTP status
//! per error class; an unknown product id is always `404` / `not_found`.

use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use catalog_core::{ApplicationError, CatalogQueries, InterfaceError, Product};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

pub const SERVICE_PATH: &str = "/rpc/catalog.ProductCatalogService";

#[derive(Clone)]
pub struct RpcState {
    queries: CatalogQueries,
    extra_latency: Duration,
}

impl RpcState {
    pub fn new(queries: CatalogQueries, extra_latency: Duration) -> Self {
        Self { queries, extra_latency }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetProductRequest {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchProductsRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListProductsResponse {
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchProductsResponse {
    pub results: Vec<Product>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RpcErrorBody {
    pub code: String,
    pub message: String,
    pub user_message: String,
    pub correlation_id: String,
}

type RpcResult<T> = Result<Json<T>, (StatusCode, Json<RpcErrorBody>)>;

pub fn router(state: RpcState) -> Router {
    Router::new()
        .route(&format!("{SERVICE_PATH}/ListProducts"), post(list_products))
        .route(&format!("{SERVICE_PATH}/GetProduct"), post(get_product))
        .route(&format!("{SERVICE_PATH}/SearchProducts"), post(search_products))
        .with_state(state)
}

pub async fn list_products(State(state): State<RpcState>) -> RpcResult<ListProductsResponse> {
    let correlation_id = new_correlation_id();
    apply_extra_latency(&state).await;

    let products = state.queries.list_products().to_vec();
    info!(
        event_name = "rpc.list_products.completed",
        correlation_id = %correlation_id,
        product_count = products.len(),
        "list products served"
    );
    Ok(Json(ListProductsResponse { products }))
}

pub async fn get_product(
    State(state): State<RpcState>,
    payload: Result<Json<GetProductRequest>, JsonRejection>,
) -> RpcResult<Product> {
    let correlation_id = new_correlation_id();
    let Json(request) = payload.map_err(|rejection| {
        reject(ApplicationError::InvalidArgument(rejection.body_text()), &correlation_id)
    })?;
    apply_extra_latency(&state).await;

    match state.queries.get_product(&request.id) {
        Ok(product) => {
            info!(
                event_name = "rpc.get_product.completed",
                correlation_id = %correlation_id,
                product_id = %product.id,
                "product served"
            );
            Ok(Json(product.clone()))
        }
        Err(error) => Err(reject(ApplicationError::from(error), &correlation_id)),
    }
}

pub async fn search_products(
    State(state): State<RpcState>,
    payload: Result<Json<SearchProductsRequest>, JsonRejection>,
) -> RpcResult<SearchProductsResponse> {
    let correlation_id = new_correlation_id();
    let Json(request) = payload.map_err(|rejection| {
        reject(ApplicationError::InvalidArgument(rejection.body_text()), &correlation_id)
    })?;
    apply_extra_latency(&state).await;

    let results: Vec<Product> =
        state.queries.search_products(&request.query).into_iter().cloned().collect();
    info!(
        event_name = "rpc.search_products.completed",
        correlation_id = %correlation_id,
        query = %request.query,
        result_count = results.len(),
        "search served"
    );
    Ok(Json(SearchProductsResponse { results }))
}

fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

async fn apply_extra_latency(state: &RpcState) {
    if !state.extra_latency.is_zero() {
        tokio::time::sleep(state.extra_latency).await;
    }
}

fn reject(error: ApplicationError, correlation_id: &str) -> (StatusCode, Json<RpcErrorBody>) {
    let interface = error.into_interface(correlation_id);
    let status = status_for(&interface);
    warn!(
        event_name = "rpc.request.rejected",
        correlation_id = %correlation_id,
        code = interface.code(),
        status = status.as_u16(),
        error = %interface,
        "rpc request rejected"
    );

    let body = RpcErrorBody {
        code: interface.code().to_string(),
        message: interface.to_string(),
        user_message: interface.user_message().to_string(),
        correlation_id: interface.correlation_id().to_string(),
    };
    (status, Json(body))
}

fn status_for(error: &InterfaceError) -> StatusCode {
    match error {
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
