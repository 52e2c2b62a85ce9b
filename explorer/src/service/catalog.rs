use db_explorer_database::client::ExplorerDbClient;
use db_explorer_database::error::DbError;
use db_explorer_database::models::types::identifier::Identifier;
use futures_util::future::join_all;
use log::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDescriptor {
    pub name: String,
    pub row_count: u64,
}

#[derive(Clone)]
pub struct TableCatalogService {
    database: ExplorerDbClient,
}

impl TableCatalogService {
    pub fn new(database: ExplorerDbClient) -> Self {
        TableCatalogService { database }
    }

    /// Lists every table in the browsed schema with a live row count.
    /// A table that can't be counted is reported with 0 rows instead of failing the listing.
    pub async fn list_tables(&self) -> Result<Vec<TableDescriptor>, DbError> {
        let table_names = self.database.select_table_names().await?;
        debug!("Counting rows in {} tables", table_names.len());
        let row_counts = join_all(table_names.iter().map(|name| self.count_rows(name))).await;
        Ok(into_descriptors(table_names, row_counts))
    }

    async fn count_rows(&self, table_name: &str) -> u64 {
        match self.database.select_row_count(&Identifier::trusted(table_name)).await {
            Ok(row_count) => row_count,
            Err(e) => {
                warn!("Failed to count rows for {}: {}", table_name, e);
                0
            }
        }
    }
}

fn into_descriptors(table_names: Vec<String>, row_counts: Vec<u64>) -> Vec<TableDescriptor> {
    let mut tables: Vec<TableDescriptor> =
        table_names.into_iter().zip(row_counts).map(|(name, row_count)| TableDescriptor { name, row_count }).collect();
    // pg_tables ordering follows the database collation
    tables.sort_by(|a, b| a.name.cmp(&b.name));
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_are_sorted_by_name() {
        let tables = into_descriptors(
            vec!["donations".to_string(), "MatchingDonationLog".to_string(), "accounts".to_string()],
            vec![120, 3, 0],
        );
        assert_eq!(
            tables,
            vec![
                TableDescriptor { name: "MatchingDonationLog".to_string(), row_count: 3 },
                TableDescriptor { name: "accounts".to_string(), row_count: 0 },
                TableDescriptor { name: "donations".to_string(), row_count: 120 },
            ]
        );
    }
}
