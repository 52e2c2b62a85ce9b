use std::process;

use log::warn;
#[cfg(windows)]
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

/// Resolves on the first SIGINT/SIGTERM. A second signal terminates the process immediately.
pub async fn shutdown_signal() {
    let name = next_signal().await;
    warn!("{} received, stopping... (repeat for forced close)", name);
    tokio::spawn(async {
        let name = next_signal().await;
        warn!("{} received, terminating...", name);
        process::exit(1);
    });
}

#[cfg(unix)]
async fn next_signal() -> &'static str {
    let mut sigterm = signal(SignalKind::terminate()).expect("Failed to set up SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("Failed to set up SIGINT handler");
    tokio::select! {
        _ = sigint.recv() => "SIGINT",
        _ = sigterm.recv() => "SIGTERM",
    }
}

#[cfg(windows)]
async fn next_signal() -> &'static str {
    ctrl_c().await.expect("Failed to set up Ctrl+C handler");
    "Ctrl+C"
}
