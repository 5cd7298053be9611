//! Introspection endpoints
//!
//! GET /pg-version, /table-names, /table-schema/{table_name}, /constraints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::db::CatalogRepo;
use crate::http::error::ApiError;
use crate::http::extractors::ValidTableName;
use crate::http::server::AppState;
use crate::models::{ColumnDescriptor, ConstraintDescriptor};

#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Serialize)]
pub struct TableNamesResponse {
    pub table_names: Vec<String>,
}

#[derive(Serialize)]
pub struct TableSchemaResponse {
    pub table_schema: Vec<ColumnDescriptor>,
}

#[derive(Serialize)]
pub struct ConstraintsResponse {
    pub constraints: Vec<ConstraintDescriptor>,
}

/// GET /pg-version
async fn pg_version(State(state): State<Arc<AppState>>) -> Result<Json<VersionResponse>, ApiError> {
    let version = CatalogRepo::new(&state.pool).server_version().await?;
    Ok(Json(VersionResponse { version }))
}

/// GET /table-names
async fn table_names(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TableNamesResponse>, ApiError> {
    let table_names = CatalogRepo::new(&state.pool).list_tables().await?;
    Ok(Json(TableNamesResponse { table_names }))
}

/// GET /table-schema/{table_name}
async fn table_schema(
    State(state): State<Arc<AppState>>,
    ValidTableName(table): ValidTableName,
) -> Result<Json<TableSchemaResponse>, ApiError> {
    let table_schema = CatalogRepo::new(&state.pool).table_schema(&table).await?;
    Ok(Json(TableSchemaResponse { table_schema }))
}

/// GET /constraints
async fn constraints(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ConstraintsResponse>, ApiError> {
    let constraints = CatalogRepo::new(&state.pool).list_constraints().await?;
    Ok(Json(ConstraintsResponse { constraints }))
}

/// Catalog routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pg-version", get(pg_version))
        .route("/table-names", get(table_names))
        .route("/table-schema/{table_name}", get(table_schema))
        .route("/constraints", get(constraints))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::super::test_support::unreachable_router;

    #[tokio::test]
    async fn malformed_schema_name_is_400() {
        let response = unreachable_router()
            .oneshot(
                Request::get("/table-schema/users%3B%20DROP%20TABLE%20users")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unreachable_database_is_503() {
        let response = unreachable_router()
            .oneshot(Request::get("/pg-version").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
