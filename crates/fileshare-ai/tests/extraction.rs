use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use fileshare_ai::{ContentExtractor, HttpExtractor};
use fileshare_shared::constants::EXTRACTION_PLACEHOLDER;

/// Serve one canned HTTP response, then close.
async fn one_shot_server(status_line: &'static str, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = stream.read(&mut buf).await;
        let response = format!(
            "{status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
        let _ = stream.shutdown().await;
    });
    addr
}

#[tokio::test]
async fn extract_strips_markup_on_success() {
    let addr = one_shot_server(
        "HTTP/1.1 200 OK",
        "<html><head><title>t</title></head><body><h1>Example  Domain</h1></body></html>",
    )
    .await;

    let text = HttpExtractor::new()
        .extract(&format!("http://{addr}/"))
        .await;
    assert_eq!(text, "t Example Domain");
}

#[tokio::test]
async fn extract_degrades_on_server_error() {
    let addr = one_shot_server("HTTP/1.1 500 Internal Server Error", "boom").await;

    let text = HttpExtractor::new()
        .extract(&format!("http://{addr}/"))
        .await;
    assert_eq!(text, EXTRACTION_PLACEHOLDER);
}

#[tokio::test]
async fn extract_degrades_on_connection_failure() {
    // Bind then drop to get a port nobody is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let text = HttpExtractor::new()
        .extract(&format!("http://{addr}/"))
        .await;
    assert_eq!(text, EXTRACTION_PLACEHOLDER);
}
