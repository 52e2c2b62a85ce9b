use db_explorer_database::client::ExplorerDbClient;
use db_explorer_database::error::DbError;
use db_explorer_database::models::column_descriptor::ColumnDescriptor;
use db_explorer_database::models::table_row::TableRow;
use db_explorer_database::models::types::identifier::Identifier;
use log::debug;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: u64 = 50;
pub const MAX_LIMIT: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    /// As requested, pages past the end are allowed and come back empty
    pub page: i64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: i64, limit: u64, total: u64) -> Self {
        let limit = limit.clamp(1, MAX_LIMIT);
        Pagination { page, limit, total, total_pages: total.div_ceil(limit) }
    }

    pub fn offset(&self) -> u64 {
        ((self.page.max(1) - 1) as u64).saturating_mul(self.limit)
    }
}

#[derive(Clone, Debug)]
pub struct TablePage {
    pub table: String,
    pub columns: Vec<ColumnDescriptor>,
    pub rows: Vec<TableRow>,
    pub pagination: Pagination,
}

/// Picks `id` if present, else the first declared column.
///
/// Neither is guaranteed to be unique, so with concurrent writes rows may shift between pages
/// for tables without an `id` column.
pub fn order_column(columns: &[ColumnDescriptor]) -> Option<Identifier> {
    columns
        .iter()
        .find(|column| column.column_name == "id")
        .or_else(|| columns.first())
        .map(|column| Identifier::trusted(&column.column_name))
}

#[derive(Clone)]
pub struct TablePageService {
    database: ExplorerDbClient,
}

impl TablePageService {
    pub fn new(database: ExplorerDbClient) -> Self {
        TablePageService { database }
    }

    pub async fn get_page(&self, raw_table: &str, page: i64, limit: u64) -> Result<TablePage, DbError> {
        let table = Identifier::sanitized(raw_table);
        if table.as_str() != raw_table {
            debug!("Sanitized table name '{}' to '{}'", raw_table, table);
        }
        let total = self.database.select_row_count(&table).await?;
        let pagination = Pagination::new(page, limit, total);
        let columns = self.database.select_columns(&table).await?;
        let order_column = order_column(&columns);
        let rows =
            self.database.select_rows(&table, &columns, order_column.as_ref(), pagination.limit, pagination.offset()).await?;
        debug!("Fetched {} rows from {} (page {}, limit {})", rows.len(), table, pagination.page, pagination.limit);
        Ok(TablePage { table: table.to_string(), columns, rows, pagination })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str) -> ColumnDescriptor {
        ColumnDescriptor {
            column_name: name.to_string(),
            data_type: "text".to_string(),
            udt_name: "text".to_string(),
            is_nullable: "YES".to_string(),
        }
    }

    #[test]
    fn pagination_of_120_rows() {
        let first = Pagination::new(1, 50, 120);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.offset(), 0);
        assert_eq!(Pagination::new(3, 50, 120).offset(), 100);
        assert_eq!(Pagination::new(4, 50, 120).offset(), 150);
    }

    #[test]
    fn pagination_edges() {
        assert_eq!(Pagination::new(1, 50, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 50, 50).total_pages, 1);
        assert_eq!(Pagination::new(1, 50, 51).total_pages, 2);
        assert_eq!(Pagination::new(0, 50, 10).offset(), 0);
        assert_eq!(Pagination::new(-3, 50, 10).offset(), 0);
        assert_eq!(Pagination::new(-3, 50, 10).page, -3);
        assert_eq!(Pagination::new(1, 0, 10).limit, 1);
        assert_eq!(Pagination::new(1, 50_000, 10).limit, MAX_LIMIT);
    }

    #[test]
    fn prefers_id_column() {
        let columns = vec![column("created_at"), column("id"), column("status")];
        assert_eq!(order_column(&columns), Some(Identifier::trusted("id")));
    }

    #[test]
    fn falls_back_to_first_column() {
        let columns = vec![column("donorId"), column("projectSlug")];
        assert_eq!(order_column(&columns), Some(Identifier::trusted("donorId")));
        assert_eq!(order_column(&[]), None);
    }
}
