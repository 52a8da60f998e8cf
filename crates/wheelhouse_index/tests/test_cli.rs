use std::future::IntoFuture;
use std::net::SocketAddr;
use std::process::Command;
use std::sync::Arc;

use assert_cmd::cargo::CommandCargoExt;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use tokio::net::TcpListener;

async fn serve_release(Extension(body): Extension<Arc<String>>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "application/json")],
        body.as_str().to_owned(),
    )
}

async fn serve_error() -> impl IntoResponse {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(axum::serve(listener, router).into_future());
    address
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cli_writes_the_index() {
    let body = r#"{"assets": [{"name": "foo-1.0-py3-none-any.whl", "browser_download_url": "https://x/foo-1.0-py3-none-any.whl"}]}"#;
    let address = spawn(
        Router::new()
            .route("/release", get(serve_release))
            .layer(Extension(Arc::new(body.to_owned()))),
    )
    .await;

    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("docs");

    let mut cmd = Command::cargo_bin("wheelhouse-index").unwrap();
    let output = cmd
        .args([
            "--release-url",
            &format!("http://{address}/release"),
            "--output",
            root.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");

    assert!(root.join("index.html").exists());
    assert!(root.join("foo").join("index.html").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cli_fails_on_listing_error() {
    let address = spawn(Router::new().route("/release", get(serve_error))).await;

    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path().join("docs");

    let mut cmd = Command::cargo_bin("wheelhouse-index").unwrap();
    let output = cmd
        .args([
            "--release-url",
            &format!("http://{address}/release"),
            "--output",
            root.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!root.exists());
}
