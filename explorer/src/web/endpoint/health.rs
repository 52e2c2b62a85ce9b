use std::time::{Duration, Instant};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::Utc;
use db_explorer_database::client::ExplorerDbClient;
use log::warn;

use crate::web::model::health::{Health, HealthStatus};
use crate::web::web_server;

pub const PATH: &str = "/api/health";

/// When the web server started accepting requests
#[derive(Clone, Copy)]
pub struct StartedAt(pub Instant);

#[utoipa::path(
    method(get),
    path = PATH,
    tag = web_server::INFO_TAG,
    description = "Get health details",
    responses(
        (status = StatusCode::OK, description = "Success", body = Health, content_type = "application/json"),
        (status = StatusCode::SERVICE_UNAVAILABLE, description = "Failed", body = Health, content_type = "application/json")
    )
)]
pub async fn get_health(
    Extension(database_client): Extension<ExplorerDbClient>,
    Extension(started_at): Extension<StartedAt>,
) -> impl IntoResponse {
    let uptime = humantime::format_duration(Duration::from_secs(started_at.0.elapsed().as_secs())).to_string();
    let mut health = Health {
        status: HealthStatus::UP,
        last_updated: Utc::now().timestamp_millis() as u64,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime,
        database: None,
        error: None,
    };
    match database_client.select_database_details().await {
        Ok(database_details) => health.database = Some(database_details.into()),
        Err(e) => {
            warn!("Failed to select database details: {}", e);
            health.status = HealthStatus::DOWN;
            health.error = Some(e.to_string());
        }
    }
    let status_code = if health.status == HealthStatus::UP { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(&health)).into_response()
}
