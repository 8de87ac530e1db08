#![allow(missing_docs)]

use axum::Router;
use axum_test::TestServer;
use rusqlite::Connection;
use tokio::net::TcpListener;

use crate::{AppState, DEFAULT_RATES_URL, build_router};

/// App state over a fresh in-memory database.
pub(crate) fn test_app_state() -> AppState {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory database.");

    AppState::new(connection, DEFAULT_RATES_URL).expect("Could not create app state.")
}

/// A test server for the full router over a fresh in-memory database.
pub(crate) fn test_server() -> TestServer {
    TestServer::try_new(build_router(test_app_state())).expect("Could not create test server.")
}

/// Serve `router` on an ephemeral local port and return its base URL, e.g.
/// "http://127.0.0.1:54321".
///
/// The server runs until the test's runtime shuts down.
pub(crate) async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind test listener.");
    let address = listener
        .local_addr()
        .expect("Could not get test listener address.");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed.");
    });

    format!("http://{address}")
}

/// A URL on the local machine that nothing is listening on.
pub(crate) async fn unused_local_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Could not bind test listener.");
    let address = listener
        .local_addr()
        .expect("Could not get test listener address.");
    drop(listener);

    format!("http://{address}")
}
