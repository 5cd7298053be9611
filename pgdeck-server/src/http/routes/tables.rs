//! Table data endpoints
//!
//! GET /table-data/{table_name} and POST /tableOperations/insert/{table_name}

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::db::TableRepo;
use crate::http::error::ApiError;
use crate::http::extractors::{InsertBody, ValidTableName};
use crate::http::server::AppState;
use crate::models::Record;

#[derive(Serialize)]
pub struct TableDataResponse {
    pub data: Vec<Record>,
}

#[derive(Serialize)]
pub struct InsertResponse {
    pub message: &'static str,
}

/// GET /table-data/{table_name}
async fn table_data(
    State(state): State<Arc<AppState>>,
    ValidTableName(table): ValidTableName,
) -> Result<Json<TableDataResponse>, ApiError> {
    let data = TableRepo::new(&state.pool).fetch_all(&table).await?;
    Ok(Json(TableDataResponse { data }))
}

/// POST /tableOperations/insert/{table_name}
async fn insert_row(
    State(state): State<Arc<AppState>>,
    ValidTableName(table): ValidTableName,
    InsertBody(payload): InsertBody,
) -> Result<Json<InsertResponse>, ApiError> {
    TableRepo::new(&state.pool)
        .insert(&table, &payload)
        .await
        .map_err(ApiError::insert_failed)?;

    tracing::info!(table = %table, columns = payload.len(), "row inserted");
    Ok(Json(InsertResponse {
        message: "row inserted successfully",
    }))
}

/// Table data routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/table-data/{table_name}", get(table_data))
        .route("/tableOperations/insert/{table_name}", post(insert_row))
}
