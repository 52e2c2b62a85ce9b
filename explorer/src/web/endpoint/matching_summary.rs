use axum::{Extension, Json};

use crate::service::matching_summary::MatchingSummaryService;
use crate::web::model::error::{ApiError, ErrorResponse};
use crate::web::model::matching_summary::MatchingSummaryResponse;
use crate::web::web_server;

pub const PATH: &str = "/api/matching-summary";

#[utoipa::path(
    method(get),
    path = PATH,
    tag = web_server::MATCHING_TAG,
    description = "Get matched donation totals, per donor and per donor project",
    responses(
        (status = StatusCode::OK, description = "Success", body = MatchingSummaryResponse, content_type = "application/json"),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Failed", body = ErrorResponse, content_type = "application/json")
    )
)]
pub async fn get_matching_summary(
    Extension(matching_summary): Extension<MatchingSummaryService>,
) -> Result<Json<MatchingSummaryResponse>, ApiError> {
    let summary = matching_summary.get_summary().await?;
    Ok(Json(summary.into()))
}
