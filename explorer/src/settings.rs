use chrono_tz::Tz;
use db_explorer_cli::cli_args::CliArgs;
use db_explorer_database::client::PoolSettings;
use directories::ProjectDirs;
use thiserror::Error;

use crate::dashboard::format::DisplayZone;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set, pass --database-url or add it to .env")]
    MissingDatabaseUrl,
    #[error("Unknown timezone '{0}', expected an IANA name like 'America/Los_Angeles'")]
    UnknownTimezone(String),
    #[error("Invalid pool size {0}, must be at least 1")]
    InvalidPoolSize(u32),
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub cli_args: CliArgs,
    pub database_url: String,
    pub display_timezone: Tz,
    pub naive_timezone: Tz,
}

impl Settings {
    pub fn new(cli_args: CliArgs) -> Result<Settings, ConfigError> {
        let database_url =
            cli_args.database_url.clone().filter(|url| !url.trim().is_empty()).ok_or(ConfigError::MissingDatabaseUrl)?;
        if cli_args.pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize(cli_args.pool_size));
        }
        let display_timezone = parse_timezone(&cli_args.display_timezone)?;
        let naive_timezone = parse_timezone(&cli_args.naive_timezone)?;
        Ok(Settings { cli_args, database_url, display_timezone, naive_timezone })
    }

    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings { max_connections: self.cli_args.pool_size, schema: self.cli_args.schema.clone(), ..PoolSettings::default() }
    }

    pub fn display_zone(&self) -> DisplayZone {
        DisplayZone { display: self.display_timezone, naive_source: self.naive_timezone }
    }
}

fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.parse::<Tz>().map_err(|_| ConfigError::UnknownTimezone(name.to_string()))
}

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "db-explorer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli_args(args: &[&str]) -> CliArgs {
        CliArgs::parse_from(["db-explorer"].iter().chain(args.iter()))
    }

    #[test]
    fn missing_database_url_is_fatal() {
        let mut args = cli_args(&[]);
        args.database_url = None;
        assert_eq!(Settings::new(args).unwrap_err(), ConfigError::MissingDatabaseUrl);

        let mut args = cli_args(&[]);
        args.database_url = Some("  ".to_string());
        assert_eq!(Settings::new(args).unwrap_err(), ConfigError::MissingDatabaseUrl);
    }

    #[test]
    fn parses_timezones() {
        let settings = Settings::new(cli_args(&[
            "--database-url",
            "postgres://localhost/app",
            "--display-timezone",
            "America/Los_Angeles",
        ]))
        .unwrap();
        assert_eq!(settings.display_timezone, chrono_tz::America::Los_Angeles);
        assert_eq!(settings.naive_timezone, chrono_tz::UTC);
        assert_eq!(settings.pool_settings().max_connections, 20);
    }

    #[test]
    fn rejects_unknown_timezone() {
        let result = Settings::new(cli_args(&["--database-url", "postgres://localhost/app", "--naive-timezone", "Mars/Olympus"]));
        assert_eq!(result.unwrap_err(), ConfigError::UnknownTimezone("Mars/Olympus".to_string()));
    }
}
