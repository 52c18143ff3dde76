//! HTTP surface.
//!
//! Every response is HTTP 200 with a JSON body; failures are signalled by
//! `success: false` and a message, never by the status code.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use wishstone_types::api::{ProcessResponse, RecordsResponse, SubmissionRequest};
use wishstone_types::RECENT_RECORDS_LIMIT;

use crate::gatekeeper::SubmissionOutcome;
use crate::AppState;

/// Message of an accepted submission.
pub const MSG_SUCCESS: &str = "All information was processed successfully.";

/// Message when no cipher is configured.
pub const MSG_DISABLED: &str = "Submissions are currently disabled.";

/// Body of `GET /`.
pub const INDEX_MESSAGE: &str = "Backend API Server is running";

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/", get(index))
        .route("/process-all", post(process_all))
        .route("/get-records", get(get_records))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /`
pub async fn index() -> Json<Value> {
    Json(json!({ "message": INDEX_MESSAGE }))
}

/// `POST /process-all`
pub async fn process_all(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmissionRequest>, JsonRejection>,
) -> Json<ProcessResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Rejected submission body: {rejection}");
            return Json(ProcessResponse::rejected(processing_error(
                &rejection.body_text(),
            )));
        }
    };

    let Some(gatekeeper) = state.gatekeeper.as_ref() else {
        warn!("Submission refused, cipher not configured");
        return Json(ProcessResponse::rejected(MSG_DISABLED));
    };

    let response = match gatekeeper.submit(&request).await {
        SubmissionOutcome::Accepted(accepted) => {
            let labels = accepted.classification.labels();
            info!(
                wish_type = %labels.wish_type,
                sentiment = %labels.sentiment,
                saved = accepted.persisted(),
                "Submission processed"
            );
            ProcessResponse::accepted(MSG_SUCCESS, accepted.persisted())
        }
        SubmissionOutcome::GlobalQuotaExceeded { limit, .. } => {
            ProcessResponse::rejected(global_quota_message(limit))
        }
        SubmissionOutcome::IpQuotaExceeded { limit, .. } => {
            ProcessResponse::rejected(ip_quota_message(limit))
        }
        SubmissionOutcome::Failed(reason) => {
            ProcessResponse::rejected(processing_error(&reason))
        }
    };
    Json(response)
}

/// `GET /get-records`
pub async fn get_records(State(state): State<Arc<AppState>>) -> Json<RecordsResponse> {
    match state.store.recent(RECENT_RECORDS_LIMIT).await {
        Ok(records) => Json(RecordsResponse::found(records)),
        Err(e) => {
            error!("Record fetch failed: {e}");
            Json(RecordsResponse::failed(format!(
                "An error occurred while fetching records: {e}"
            )))
        }
    }
}

pub fn global_quota_message(limit: u64) -> String {
    format!("Daily processing limit exceeded. Please try again tomorrow. (limit: {limit}/day)")
}

pub fn ip_quota_message(limit: u64) -> String {
    format!(
        "This IP has already been processed today. Please try again tomorrow. (per-IP limit: {limit}/day)"
    )
}

pub fn processing_error(detail: &str) -> String {
    format!("An error occurred during processing: {detail}")
}
