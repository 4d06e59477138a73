//! Read-only status service.
//!
//! Serves stored user and guild records by id so external dashboards can
//! read them without going through the chat client.
//!
//! Response policy:
//! - stored record: 200 with the stored payload
//! - no record: 200 with the default payload for that table
//! - backend failure: 502

use crate::database::{RecordStore, RecordTable};
use crate::error::Result;
use crate::records::default_payload;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Shared state for the status routes.
#[derive(Clone)]
pub struct StatusState {
    store: Arc<dyn RecordStore>,
}

/// Build the status router.
pub fn router(store: Arc<dyn RecordStore>) -> Router {
    Router::new()
        .route("/servers/:id", get(get_server_info))
        .route("/servers/:id/", get(get_server_info))
        .route("/users/:id", get(get_user_info))
        .route("/users/:id/", get(get_user_info))
        .with_state(StatusState { store })
}

/// Run the status service on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, store: Arc<dyn RecordStore>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Status service listening on {}", addr);
    }

    axum::serve(listener, router(store))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Status service stopped");
    Ok(())
}

async fn get_server_info(State(state): State<StatusState>, Path(id): Path<u64>) -> Response {
    lookup(&state, RecordTable::ServData, id).await
}

async fn get_user_info(State(state): State<StatusState>, Path(id): Path<u64>) -> Response {
    lookup(&state, RecordTable::UserData, id).await
}

async fn lookup(state: &StatusState, table: RecordTable, id: u64) -> Response {
    match state.store.fetch(table, id).await {
        Ok(Some(payload)) => json_response(payload),
        Ok(None) => json_response(default_payload(table)),
        Err(e) => {
            tracing::error!(table = table.as_str(), id, "Status lookup failed: {}", e);
            (StatusCode::BAD_GATEWAY, "Failed to fetch info!").into_response()
        }
    }
}

fn json_response(payload: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        payload,
    )
        .into_response()
}
