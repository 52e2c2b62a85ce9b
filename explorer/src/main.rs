use std::fs::{self, File};

use db_explorer::dashboard;
use db_explorer::settings::{project_dirs, Settings};
use db_explorer::signal::signal_handler::shutdown_signal;
use db_explorer::web::web_server::WebServer;
use db_explorer_cli::cli_args::{get_cli_args, CliArgs, CliCommand};
use db_explorer_database::client::ExplorerDbClient;
use env_logger::{Target, WriteStyle};
use log::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli_args = get_cli_args();
    let command = cli_args.command();
    init_logger(&cli_args, &command);

    if command == CliCommand::Serve {
        println!();
        println!("**************************************************************");
        println!("************************* DB Explorer ************************");
        println!("**************************************************************");
        println!();
    }

    let settings = Settings::new(cli_args).unwrap_or_else(|e| panic!("Invalid configuration: {e}"));
    let database = ExplorerDbClient::new_with_args(&settings.database_url, settings.pool_settings())
        .await
        .expect("Database connection FAILED");

    match command {
        CliCommand::Serve => {
            let server = WebServer::new(settings, database.clone());
            if let Err(e) = server.run(shutdown_signal()).await {
                error!("Web server failed: {}", e);
            }
        }
        CliCommand::Browse => {
            if let Err(e) = dashboard::run(&settings, database.clone()).await {
                eprintln!("Dashboard failed: {e}");
            }
        }
    }
    database.close().await;
    info!("Database pool closed");
}

/// The dashboard owns the terminal, so browse mode logs to a file instead of stdout
fn init_logger(cli_args: &CliArgs, command: &CliCommand) {
    let mut builder = env_logger::builder();
    builder
        .parse_filters(&cli_args.log_level)
        .write_style(if cli_args.log_no_color { WriteStyle::Never } else { WriteStyle::Always })
        .format_target(false)
        .format_timestamp_millis();

    match command {
        CliCommand::Serve => {
            builder.target(Target::Stdout);
        }
        CliCommand::Browse => match browse_log_file() {
            Some(file) => {
                builder.target(Target::Pipe(Box::new(file))).write_style(WriteStyle::Never);
            }
            None => {
                builder.filter_level(log::LevelFilter::Off);
            }
        },
    }
    builder.init();
}

fn browse_log_file() -> Option<File> {
    let dir = project_dirs()?.data_local_dir().to_path_buf();
    fs::create_dir_all(&dir).ok()?;
    File::create(dir.join("browse.log")).ok()
}
