use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use db_explorer_database::error::DbError;
use log::error;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[schema(example = "Query failed: error returned from database: relation \"public.ordersDROPTABLEx\" does not exist")]
    pub error: String,
}

/// Every failure is reported as a 500 with a best-effort message, error kinds are only visible in the log
pub struct ApiError(pub DbError);

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse { error: self.0.to_string() })).into_response()
    }
}
