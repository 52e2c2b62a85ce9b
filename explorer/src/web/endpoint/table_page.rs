use axum::extract::{Path, Query};
use axum::{Extension, Json};

use crate::service::table_page::TablePageService;
use crate::web::model::error::{ApiError, ErrorResponse};
use crate::web::model::table_page::{TablePageParams, TablePageResponse};
use crate::web::web_server;

pub const PATH: &str = "/api/tables/{table}";

#[utoipa::path(
    method(get),
    path = PATH,
    tag = web_server::TABLES_TAG,
    description = "Get column metadata and one page of rows. The table name is reduced to [A-Za-z0-9_]",
    params(
        ("table" = String, Path, description = "Table name", example = "donations"),
        TablePageParams,
    ),
    responses(
        (status = StatusCode::OK, description = "Success", body = TablePageResponse, content_type = "application/json"),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Failed", body = ErrorResponse, content_type = "application/json")
    )
)]
pub async fn get_table_page(
    Extension(pages): Extension<TablePageService>,
    Path(table): Path<String>,
    Query(params): Query<TablePageParams>,
) -> Result<Json<TablePageResponse>, ApiError> {
    let page = pages.get_page(&table, params.page(), params.limit()).await?;
    Ok(Json(page.into()))
}
