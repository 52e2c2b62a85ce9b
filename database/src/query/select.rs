use crate::models::cell_value::is_native_udt;
use crate::models::column_descriptor::ColumnDescriptor;
use crate::models::matching::{DonationTotals, DonorProjectTotal, DonorTotal, MatchingLogTotals};
use crate::models::query::database_details::DatabaseDetails;
use crate::models::table_row::TableRow;
use crate::models::types::identifier::Identifier;
use sqlx::{Error, Pool, Postgres, Row};

pub const MATCHING_LOG_TABLE: &str = "MatchingDonationLog";
pub const DONATIONS_TABLE: &str = "donations";

pub async fn select_database_details(pool: &Pool<Postgres>) -> Result<DatabaseDetails, Error> {
    sqlx::query_as::<_, DatabaseDetails>(
        "
        SELECT
            current_database()::text AS database_name,
            current_schema()::text AS schema_name,
            current_setting('server_version') AS server_version,
            pg_database_size(current_database()) AS database_size,
            (SELECT count(*) FROM pg_stat_activity WHERE datname = current_database()) AS active_connections,
            (SELECT setting::int FROM pg_settings WHERE name = 'max_connections') AS max_connections
    ",
    )
    .fetch_one(pool)
    .await
}

pub async fn select_table_names(schema: &Identifier, pool: &Pool<Postgres>) -> Result<Vec<String>, Error> {
    let rows = sqlx::query("SELECT tablename::text FROM pg_tables WHERE schemaname = $1 ORDER BY tablename")
        .bind(schema.as_str())
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(|row| row.try_get(0)).collect()
}

pub async fn select_row_count(schema: &Identifier, table: &Identifier, pool: &Pool<Postgres>) -> Result<i64, Error> {
    sqlx::query(&format!("SELECT COUNT(*) FROM {}.{}", schema.quoted(), table.quoted())).fetch_one(pool).await?.try_get(0)
}

pub async fn select_columns(schema: &Identifier, table: &Identifier, pool: &Pool<Postgres>) -> Result<Vec<ColumnDescriptor>, Error> {
    sqlx::query_as::<_, ColumnDescriptor>(
        "
        SELECT
            column_name::text AS column_name,
            data_type::text AS data_type,
            udt_name::text AS udt_name,
            is_nullable::text AS is_nullable
        FROM information_schema.columns
        WHERE table_schema = $1
        AND table_name = $2
        ORDER BY ordinal_position
    ",
    )
    .bind(schema.as_str())
    .bind(table.as_str())
    .fetch_all(pool)
    .await
}

/// Columns without a binary decoder are cast to their text form
pub fn select_list(columns: &[ColumnDescriptor]) -> String {
    if columns.is_empty() {
        return "*".to_string();
    }
    columns
        .iter()
        .map(|column| {
            let name = Identifier::trusted(&column.column_name).quoted();
            if is_native_udt(&column.udt_name) {
                name
            } else {
                format!("{name}::text AS {name}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub async fn select_rows(
    schema: &Identifier,
    table: &Identifier,
    columns: &[ColumnDescriptor],
    order_column: Option<&Identifier>,
    limit: i64,
    offset: i64,
    pool: &Pool<Postgres>,
) -> Result<Vec<TableRow>, Error> {
    let order_by = order_column.map(|column| format!("ORDER BY {} DESC", column.quoted())).unwrap_or_default();
    let sql =
        format!("SELECT {} FROM {}.{} {} LIMIT $1 OFFSET $2", select_list(columns), schema.quoted(), table.quoted(), order_by);
    let rows = sqlx::query(&sql).bind(limit).bind(offset).fetch_all(pool).await?;
    rows.iter().map(TableRow::from_pg_row).collect()
}

pub async fn select_matching_log_totals(schema: &Identifier, pool: &Pool<Postgres>) -> Result<MatchingLogTotals, Error> {
    sqlx::query_as::<_, MatchingLogTotals>(&format!(
        "
        SELECT
            COUNT(*) AS entry_count,
            COALESCE(SUM(\"matchedAmount\"), 0)::numeric AS total_matched
        FROM {}.\"{MATCHING_LOG_TABLE}\"
    ",
        schema.quoted()
    ))
    .fetch_one(pool)
    .await
}

pub async fn select_donation_totals(schema: &Identifier, pool: &Pool<Postgres>) -> Result<DonationTotals, Error> {
    sqlx::query_as::<_, DonationTotals>(&format!(
        "
        SELECT
            COUNT(*) AS total_donations,
            COUNT(*) FILTER (WHERE processed = true) AS processed_donations,
            COUNT(*) FILTER (WHERE success = true) AS successful_donations
        FROM {}.\"{DONATIONS_TABLE}\"
    ",
        schema.quoted()
    ))
    .fetch_one(pool)
    .await
}

pub async fn select_donor_totals(schema: &Identifier, pool: &Pool<Postgres>) -> Result<Vec<DonorTotal>, Error> {
    sqlx::query_as::<_, DonorTotal>(&format!(
        "
        SELECT
            \"donorId\"::text AS donor_id,
            COUNT(*) AS entry_count,
            COALESCE(SUM(\"matchedAmount\"), 0)::numeric AS total_matched
        FROM {}.\"{MATCHING_LOG_TABLE}\"
        WHERE \"donorId\" IS NOT NULL
        GROUP BY \"donorId\"
        ORDER BY total_matched DESC, donor_id
    ",
        schema.quoted()
    ))
    .fetch_all(pool)
    .await
}

pub async fn select_donor_project_totals(schema: &Identifier, pool: &Pool<Postgres>) -> Result<Vec<DonorProjectTotal>, Error> {
    sqlx::query_as::<_, DonorProjectTotal>(&format!(
        "
        SELECT
            \"donorId\"::text AS donor_id,
            COALESCE(\"projectSlug\"::text, '') AS project_slug,
            COUNT(*) AS entry_count,
            COALESCE(SUM(\"matchedAmount\"), 0)::numeric AS amount
        FROM {}.\"{MATCHING_LOG_TABLE}\"
        WHERE \"donorId\" IS NOT NULL
        GROUP BY \"donorId\", \"projectSlug\"
        ORDER BY donor_id, amount DESC, project_slug
    ",
        schema.quoted()
    ))
    .fetch_all(pool)
    .await
}
