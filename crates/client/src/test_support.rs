//! Mock platform helpers for facade tests

use axum::Router;
use common::ClientConfig;
use tokio::net::TcpListener;

use crate::Client;

pub(crate) const APP: &str = "app_test";

/// Serve `router` on an ephemeral port and return its base URL.
pub(crate) async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Path of an application-scoped endpoint on the mock server.
pub(crate) fn scoped(path: &str) -> String {
    format!("/api/v1/applications/{APP}/{path}")
}

pub(crate) async fn client_for(router: Router) -> Client {
    let base = serve(router).await;
    Client::new(ClientConfig::new(base, APP)).unwrap()
}
