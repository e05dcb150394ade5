//! HTTP handlers for the REST API

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{error, instrument};

use crate::status::{self, ClusterRef, DatabaseList, DatabaseStatus};

use super::dto::{ErrorResponse, HealthResponse, ListQuery};
use super::server::AppState;

const STATUS_FAILED: &str = "Failed to get database status";
const LIST_FAILED: &str = "Failed to list databases";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

/// Health check endpoint
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// List database clusters, optionally restricted to one namespace
#[instrument(skip(state))]
pub async fn list_databases(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<DatabaseList> {
    match status::list_databases(state.source.as_ref(), query.namespace.as_deref()).await {
        Ok(list) => Ok(Json(list)),
        Err(e) => {
            error!("Failed to list databases: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(LIST_FAILED, &e.message())),
            ))
        }
    }
}

/// Composite status of one database cluster.
///
/// A missing cluster is answered with 200 and the not-found document.
#[instrument(skip(state), fields(name = %name, namespace = %namespace))]
pub async fn database_status(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult<DatabaseStatus> {
    let target = ClusterRef::new(namespace, name);

    match status::database_status(state.source.as_ref(), &target).await {
        Ok(doc) => Ok(Json(doc)),
        Err(e) => {
            error!(
                "Failed to get status of {}: {:?}",
                target.qualified_name(),
                e
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(STATUS_FAILED, &e.message())),
            ))
        }
    }
}
