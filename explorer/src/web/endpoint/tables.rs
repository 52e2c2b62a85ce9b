use axum::{Extension, Json};

use crate::service::catalog::TableCatalogService;
use crate::web::model::error::{ApiError, ErrorResponse};
use crate::web::model::tables::TablesResponse;
use crate::web::web_server;

pub const PATH: &str = "/api/tables";

#[utoipa::path(
    method(get),
    path = PATH,
    tag = web_server::TABLES_TAG,
    description = "List the tables of the browsed schema with live row counts",
    responses(
        (status = StatusCode::OK, description = "Success", body = TablesResponse, content_type = "application/json"),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Failed", body = ErrorResponse, content_type = "application/json")
    )
)]
pub async fn get_tables(Extension(catalog): Extension<TableCatalogService>) -> Result<Json<TablesResponse>, ApiError> {
    let tables = catalog.list_tables().await?;
    Ok(Json(TablesResponse { tables: tables.into_iter().map(|table| table.into()).collect() }))
}
