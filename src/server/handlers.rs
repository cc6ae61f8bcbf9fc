use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::Deserialize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::{self, DispatchError, Params};

use super::state::AppState;

// ─── GET /api/locations ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct LocationQuery {
    pub state: Option<String>,
    pub district: Option<String>,
    pub block: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn locations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LocationQuery>,
) -> Response {
    let start = Instant::now();

    let params = Params::from_raw(
        query.state.as_deref(),
        query.district.as_deref(),
        query.block.as_deref(),
        query.kind.as_deref(),
    );
    let filters = params.filters();

    // The lookups themselves are infallible; a panic anywhere below is
    // reported as the internal-error envelope, filters still echoed.
    let outcome =
        panic::catch_unwind(AssertUnwindSafe(|| dispatch::dispatch(&state.store, &params)));

    match outcome {
        Ok(Ok(envelope)) => {
            log_request(&params, &format!("{} items", envelope.metadata.total_count), start);
            (StatusCode::OK, Json(envelope)).into_response()
        }
        Ok(Err(err)) => {
            log_request(&params, &format!("400 {}", err), start);
            (StatusCode::BAD_REQUEST, Json(err.envelope())).into_response()
        }
        Err(cause) => {
            let err = DispatchError::Internal {
                error: panic_text(cause.as_ref()),
                filters,
            };
            log_request(&params, &format!("500 {}", err), start);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(err.envelope())).into_response()
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────

fn panic_text(cause: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = cause.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = cause.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected failure during lookup".to_string()
    }
}

fn log_request(params: &Params, outcome: &str, start: Instant) {
    eprintln!(
        "[{}] GET /api/locations{} -> {} ({:.1}ms)",
        Utc::now().format("%H:%M:%S"),
        query_echo(params),
        outcome,
        start.elapsed().as_secs_f64() * 1000.0,
    );
}

fn query_echo(params: &Params) -> String {
    let mut parts = Vec::new();
    if let Some(s) = &params.state {
        parts.push(format!("state={}", s));
    }
    if let Some(d) = &params.district {
        parts.push(format!("district={}", d));
    }
    if let Some(b) = &params.block {
        parts.push(format!("block={}", b));
    }
    if let Some(k) = &params.kind {
        parts.push(format!("type={}", k));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("?{}", parts.join("&"))
    }
}
