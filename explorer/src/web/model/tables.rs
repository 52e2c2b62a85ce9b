use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::catalog::TableDescriptor;

#[derive(ToSchema, Clone, Serialize, Deserialize)]
pub struct TablesResponse {
    pub tables: Vec<TableInfo>,
}

#[derive(ToSchema, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableInfo {
    #[schema(example = "donations")]
    pub name: String,
    #[schema(example = "120")]
    pub row_count: u64,
}

impl From<TableDescriptor> for TableInfo {
    fn from(table: TableDescriptor) -> Self {
        Self { name: table.name, row_count: table.row_count }
    }
}
