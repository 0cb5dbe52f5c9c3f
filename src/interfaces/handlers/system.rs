use actix_web::{web, get, HttpResponse, Responder};
use humantime::format_duration;
use chrono::Utc;
use serde::Serialize;
use std::time::Duration;

use crate::{constants::START_TIME, repositories::contact_me::SubmissionRepository, AppState};

#[derive(Serialize)]
struct HealthCheckResponse {
    status: &'static str,
    uptime: String,
    timestamp: String,
    start_at: String,
    store: &'static str,
    tracked_clients: usize,
    version: &'static str,
}

#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime_secs = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let store = match state.contact_handler.submission_repo.check_connection().await {
        Ok(()) => "OK",
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            "Unavailable"
        }
    };

    let response = HealthCheckResponse {
        status: if store == "OK" { "healthy" } else { "degraded" },
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        store,
        tracked_clients: state.contact_handler.rate_limiter.tracked_identifiers(),
        version: env!("CARGO_PKG_VERSION"),
    };

    HttpResponse::Ok().json(response)
}
