use std::str::FromStr;
use std::time::Duration;

use log::{debug, info, LevelFilter};
use regex::Regex;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, Pool, Postgres};

use crate::error::DbError;
use crate::models::column_descriptor::ColumnDescriptor;
use crate::models::matching::{DonationTotals, DonorProjectTotal, DonorTotal, MatchingLogTotals};
use crate::models::query::database_details::DatabaseDetails;
use crate::models::table_row::TableRow;
use crate::models::types::identifier::Identifier;
use crate::query;

#[derive(Clone, Debug)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    /// Browsed schema, also used as the connections' search_path
    pub schema: String,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self { max_connections: 20, acquire_timeout: Duration::from_secs(2), idle_timeout: Duration::from_secs(30), schema: "public".to_string() }
    }
}

#[derive(Clone)]
pub struct ExplorerDbClient {
    pool: Pool<Postgres>,
    schema: Identifier,
}

impl ExplorerDbClient {
    pub async fn new(url: &str) -> Result<ExplorerDbClient, DbError> {
        Self::new_with_args(url, PoolSettings::default()).await
    }

    pub async fn new_with_args(url: &str, settings: PoolSettings) -> Result<ExplorerDbClient, DbError> {
        let url_cleaned = redact_url(url);
        debug!("Connecting to PostgreSQL {}", url_cleaned);
        let schema = Identifier::trusted(&settings.schema);
        // Unquoted names in search_path are folded to lower case
        let connect_opts = PgConnectOptions::from_str(url)?
            .options([("search_path", schema.quoted())])
            .log_slow_statements(LevelFilter::Warn, Duration::from_secs(5));
        let pool = PgPoolOptions::new()
            .acquire_timeout(settings.acquire_timeout)
            .idle_timeout(settings.idle_timeout)
            .max_connections(settings.max_connections)
            .connect_with(connect_opts)
            .await?;
        info!("Connected to PostgreSQL {}, schema: {}", url_cleaned, settings.schema);
        Ok(ExplorerDbClient { pool, schema })
    }

    pub fn schema(&self) -> &Identifier {
        &self.schema
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn select_database_details(&self) -> Result<DatabaseDetails, DbError> {
        Ok(query::select::select_database_details(&self.pool).await?)
    }

    pub async fn select_table_names(&self) -> Result<Vec<String>, DbError> {
        Ok(query::select::select_table_names(&self.schema, &self.pool).await?)
    }

    pub async fn select_row_count(&self, table: &Identifier) -> Result<u64, DbError> {
        let count = query::select::select_row_count(&self.schema, table, &self.pool).await?;
        Ok(count.max(0) as u64)
    }

    pub async fn select_columns(&self, table: &Identifier) -> Result<Vec<ColumnDescriptor>, DbError> {
        Ok(query::select::select_columns(&self.schema, table, &self.pool).await?)
    }

    pub async fn select_rows(
        &self,
        table: &Identifier,
        columns: &[ColumnDescriptor],
        order_column: Option<&Identifier>,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<TableRow>, DbError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);
        Ok(query::select::select_rows(&self.schema, table, columns, order_column, limit, offset, &self.pool).await?)
    }

    pub async fn select_matching_log_totals(&self) -> Result<MatchingLogTotals, DbError> {
        Ok(query::select::select_matching_log_totals(&self.schema, &self.pool).await?)
    }

    pub async fn select_donation_totals(&self) -> Result<DonationTotals, DbError> {
        Ok(query::select::select_donation_totals(&self.schema, &self.pool).await?)
    }

    pub async fn select_donor_totals(&self) -> Result<Vec<DonorTotal>, DbError> {
        Ok(query::select::select_donor_totals(&self.schema, &self.pool).await?)
    }

    pub async fn select_donor_project_totals(&self) -> Result<Vec<DonorProjectTotal>, DbError> {
        Ok(query::select::select_donor_project_totals(&self.schema, &self.pool).await?)
    }
}

fn redact_url(url: &str) -> String {
    Regex::new(r"(postgres(?:ql)?://[^:/@]+:)[^@]+(@)").expect("Failed to parse url").replace(url, "$1$2").to_string()
}
