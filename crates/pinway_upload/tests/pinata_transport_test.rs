//! Tests for the Pinata transport against a local HTTP listener.

use chrono::{TimeZone, Utc};
use pinway_core::{ContentId, MediaKind};
use pinway_error::UploadErrorKind;
use pinway_upload::{PinRequest, PinTransport, PinataTransport, UploadPolicy, UploadSource};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Captured = Arc<Mutex<Vec<String>>>;

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let header_end = buf
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .map(|at| at + 4);
        if let Some(end) = header_end {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok());
            let complete = match length {
                Some(length) => buf.len() >= end + length,
                None if head.contains("transfer-encoding: chunked") => buf.ends_with(b"0\r\n\r\n"),
                None => true,
            };
            if complete {
                return Some(String::from_utf8_lossy(&buf).to_string());
            }
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return None,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
}

/// Records every request and answers with `status` and `body`.
async fn spawn_backend(status: &'static str, body: &'static str) -> (SocketAddr, Captured) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let log = captured.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let log = log.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                log.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (addr, captured)
}

fn transport(addr: SocketAddr) -> PinataTransport {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    PinataTransport::with_client(client, format!("http://{addr}/"), "test-jwt")
}

fn request() -> PinRequest {
    let source = UploadSource::new(b"fake-jpeg".to_vec(), "selfie.jpg", MediaKind::Image);
    let at = Utc.timestamp_millis_opt(1_714_560_000_123).unwrap();
    PinRequest::prepare(source, "0xA11ce", &UploadPolicy::default(), at)
}

#[tokio::test]
async fn test_pin_sends_multipart_with_metadata() -> anyhow::Result<()> {
    let (addr, captured) =
        spawn_backend("200 OK", r#"{"IpfsHash":"bafypinned","PinSize":9,"Timestamp":"2024-05-01T10:40:00Z"}"#).await;

    let cid = transport(addr).pin_file(&request()).await?;
    assert_eq!(cid.as_str(), "bafypinned");

    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let raw = &requests[0];
    assert!(raw.starts_with("POST /pinning/pinFileToIPFS HTTP/1.1"));
    assert!(raw.to_lowercase().contains("authorization: bearer test-jwt"));
    assert!(raw.contains("multipart/form-data"));
    assert!(raw.contains(r#"name="file"; filename="0xA11ce_1714560000123_selfie.jpg""#));
    assert!(raw.contains("fake-jpeg"));
    assert!(raw.contains(r#"name="pinataMetadata""#));
    assert!(raw.contains(r#""keyvalues":{"type":"image","fileType":"image/jpeg","userId":"0xA11ce","uploadedAt":"2024-05-01T10:40:00.123Z"}"#));
    assert!(raw.contains(r#"name="pinataOptions""#));
    assert!(raw.contains(r#"{"cidVersion":1,"wrapWithDirectory":false}"#));
    Ok(())
}

#[tokio::test]
async fn test_pin_classifies_server_error_as_retryable() {
    let (addr, _) = spawn_backend("503 Service Unavailable", "try later").await;

    let err = transport(addr).pin_file(&request()).await.unwrap_err();

    assert!(matches!(err.kind, UploadErrorKind::Server { status: 503, .. }));
    assert!(err.kind.is_retryable());
}

#[tokio::test]
async fn test_pin_classifies_client_error_as_terminal() {
    let (addr, _) = spawn_backend("403 Forbidden", r#"{"error":"quota"}"#).await;

    let err = transport(addr).pin_file(&request()).await.unwrap_err();

    assert!(matches!(err.kind, UploadErrorKind::Rejected { status: 403, .. }));
    assert!(!err.kind.is_retryable());
}

#[tokio::test]
async fn test_pin_without_hash_is_malformed() {
    let (addr, _) = spawn_backend("200 OK", r#"{"PinSize":9}"#).await;

    let err = transport(addr).pin_file(&request()).await.unwrap_err();

    assert!(matches!(err.kind, UploadErrorKind::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = transport(addr).pin_file(&request()).await.unwrap_err();

    assert!(matches!(err.kind, UploadErrorKind::Network(_)));
}

#[tokio::test]
async fn test_unpin_sends_delete() -> anyhow::Result<()> {
    let (addr, captured) = spawn_backend("200 OK", "OK").await;

    transport(addr).unpin(&ContentId::new("bafyold")?).await?;

    let requests = captured.lock().unwrap().clone();
    assert!(requests[0].starts_with("DELETE /pinning/unpin/bafyold HTTP/1.1"));
    assert!(requests[0].to_lowercase().contains("authorization: bearer test-jwt"));
    Ok(())
}

#[tokio::test]
async fn test_unpin_unknown_cid_is_rejected() -> anyhow::Result<()> {
    let (addr, _) = spawn_backend("404 Not Found", "not pinned").await;

    let err = transport(addr)
        .unpin(&ContentId::new("bafymissing")?)
        .await
        .unwrap_err();

    assert!(matches!(err.kind, UploadErrorKind::Rejected { status: 404, .. }));
    Ok(())
}
