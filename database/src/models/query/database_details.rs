#[derive(Clone, Debug, sqlx::FromRow)]
pub struct DatabaseDetails {
    pub database_name: String,
    pub schema_name: Option<String>,
    pub server_version: String,
    pub database_size: i64,
    pub active_connections: i64,
    pub max_connections: i32,
}
