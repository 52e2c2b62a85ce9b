use bytesize::ByteSize;
use db_explorer_database::models::query::database_details::DatabaseDetails;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt;
use utoipa::ToSchema;

#[skip_serializing_none]
#[derive(ToSchema, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: HealthStatus,
    #[schema(example = "1738706345528")]
    pub last_updated: u64,
    #[schema(example = "0.4.0")]
    pub version: String,
    #[schema(example = "43m 35s")]
    pub uptime: String,
    pub database: Option<HealthDatabase>,
    pub error: Option<String>,
}

#[derive(ToSchema, Clone, Serialize, Deserialize, PartialEq, Debug)]
pub enum HealthStatus {
    UP,
    DOWN,
}

#[skip_serializing_none]
#[derive(ToSchema, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDatabase {
    #[schema(example = "postgres")]
    pub database_name: String,
    #[schema(example = "public")]
    pub schema_name: Option<String>,
    #[schema(example = "16.4")]
    pub server_version: String,
    #[schema(example = "1901425123")]
    pub database_size: u64,
    #[schema(example = "1.9 GB")]
    pub database_size_pretty: String,
    #[schema(example = "7")]
    pub active_connections: u64,
    #[schema(example = "100")]
    pub max_connections: u64,
}

impl From<DatabaseDetails> for HealthDatabase {
    fn from(database_details: DatabaseDetails) -> Self {
        let database_size = database_details.database_size.max(0) as u64;
        Self {
            database_name: database_details.database_name,
            schema_name: database_details.schema_name,
            server_version: database_details.server_version,
            database_size,
            database_size_pretty: ByteSize(database_size).to_string(),
            active_connections: database_details.active_connections.max(0) as u64,
            max_connections: database_details.max_connections.max(0) as u64,
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status_str = match self {
            HealthStatus::UP => "UP",
            HealthStatus::DOWN => "DOWN",
        };
        write!(f, "{}", status_str)
    }
}
