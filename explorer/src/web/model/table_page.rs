use db_explorer_database::models::column_descriptor::ColumnDescriptor;
use db_explorer_database::models::table_row::TableRow;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::service::table_page::{Pagination, TablePage, DEFAULT_LIMIT, DEFAULT_PAGE};

/// Kept as strings so that garbage falls back to the defaults instead of rejecting the request
#[derive(IntoParams, Clone, Debug, Default, Deserialize)]
#[into_params(parameter_in = Query)]
pub struct TablePageParams {
    /// Page number, starting at 1
    #[param(example = "1")]
    pub page: Option<String>,
    /// Rows per page, 1-1000
    #[param(example = "50")]
    pub limit: Option<String>,
}

impl TablePageParams {
    pub fn page(&self) -> i64 {
        self.page.as_deref().and_then(|page| page.trim().parse::<i64>().ok()).unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> u64 {
        self.limit.as_deref().and_then(|limit| limit.trim().parse::<i64>().ok()).map(|limit| limit.max(1) as u64).unwrap_or(DEFAULT_LIMIT)
    }
}

#[derive(ToSchema, Clone, Serialize)]
pub struct TablePageResponse {
    #[schema(example = "donations")]
    pub table: String,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<TableRow>,
    pub columns: Vec<ColumnInfo>,
    pub pagination: PaginationInfo,
}

impl From<TablePage> for TablePageResponse {
    fn from(page: TablePage) -> Self {
        Self {
            table: page.table,
            data: page.rows,
            columns: page.columns.into_iter().map(|column| column.into()).collect(),
            pagination: page.pagination.into(),
        }
    }
}

#[derive(ToSchema, Clone, Serialize, Deserialize)]
pub struct ColumnInfo {
    #[schema(example = "created_at")]
    pub column_name: String,
    #[schema(example = "timestamp without time zone")]
    pub data_type: String,
    #[schema(example = "YES")]
    pub is_nullable: String,
}

impl From<ColumnDescriptor> for ColumnInfo {
    fn from(column: ColumnDescriptor) -> Self {
        Self { column_name: column.column_name, data_type: column.data_type, is_nullable: column.is_nullable }
    }
}

#[derive(ToSchema, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    #[schema(example = "1")]
    pub page: i64,
    #[schema(example = "50")]
    pub limit: u64,
    #[schema(example = "120")]
    pub total: u64,
    #[schema(example = "3")]
    pub total_pages: u64,
}

impl From<Pagination> for PaginationInfo {
    fn from(pagination: Pagination) -> Self {
        Self { page: pagination.page, limit: pagination.limit, total: pagination.total, total_pages: pagination.total_pages }
    }
}
