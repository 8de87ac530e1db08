use std::{error::Error, process::exit};

use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;

use ledger_rs::{
    AppState, Config, DotenvStatus, build_router, graceful_shutdown, setup_logging,
};

#[tokio::main]
async fn main() {
    let dotenv_status = DotenvStatus::from_result(dotenvy::dotenv());

    let config = Config::parse();

    if let Err(error) = setup_logging(config.log_file.as_deref()) {
        eprintln!("Could not open log file: {error}");
        exit(1);
    }

    dotenv_status.log();

    if let Err(error) = run(config).await {
        tracing::error!("Server exited with an error: {error}");
        exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let addr = config.socket_address();

    tracing::info!("Opening database at {}", config.db_path.display());
    let conn = Connection::open(&config.db_path)?;
    let state = AppState::new(conn, &config.rates_url)?;

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(build_router(state).into_make_service())
        .await?;

    Ok(())
}
