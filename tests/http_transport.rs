use std::time::Duration;

use bunnystore::{BunnyStorage, ClientConfig, EntryKind, OperationResult};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    sync::oneshot,
};

/// Serves one connection with a canned raw HTTP/1.1 response and hands back
/// the request head it received.
async fn serve_once(response: Vec<u8>) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }

        socket.write_all(&response).await.unwrap();
        socket.flush().await.unwrap();
        let _ = socket.shutdown().await;
        let _ = tx.send(String::from_utf8_lossy(&head).to_string());
    });

    (format!("http://{}/zone/", addr), rx)
}

fn storage(base_url: &str) -> BunnyStorage {
    let config = ClientConfig::new("secret-key", "zone", "")
        .unwrap()
        .with_base_url(base_url)
        .with_timeout(Duration::from_secs(5));

    BunnyStorage::connect(config).unwrap()
}

#[tokio::test]
async fn test_list_objects_over_http() {
    let body = r#"[{"Guid":"1","ObjectName":"a.txt","IsDirectory":false,"Length":5},{"Guid":"2","ObjectName":"sub","IsDirectory":true,"Length":0}]"#;
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let (base_url, head) = serve_once(response.into_bytes()).await;

    let result = storage(&base_url).list_objects().await;
    let head = head.await.unwrap().to_lowercase();

    assert!(head.starts_with("get /zone/ http/1.1"), "unexpected request: {}", head);
    assert!(head.contains("accesskey: secret-key"));
    assert!(head.contains("accept: application/json"));
    assert!(head.contains("content-type: application/json"));

    let entries = result.into_data().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, EntryKind::File);
    assert_eq!(entries[0].name, "a.txt");
    assert_eq!(entries[1].kind, EntryKind::Directory);
    assert_eq!(entries[1].name, "sub");
}

#[tokio::test]
async fn test_download_chunked_over_http() {
    let response = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n2\r\nHe\r\n3\r\nllo\r\n0\r\n\r\n".to_vec();
    let (base_url, head) = serve_once(response).await;

    let result = storage(&base_url).download_file("dir/hello.txt").await;
    let head = head.await.unwrap().to_lowercase();

    assert!(head.starts_with("get /zone/dir/hello.txt http/1.1"), "unexpected request: {}", head);
    assert_eq!(result.status(), 200);
    assert_eq!(result.into_data().unwrap(), b"Hello".to_vec());
}

#[tokio::test]
async fn test_download_escapes_reserved_characters_over_http() {
    let cases = vec![
        ("notes#1.txt", "get /zone/notes%231.txt http/1.1"),
        ("what?.txt", "get /zone/what%3f.txt http/1.1"),
        ("dir/my file.txt", "get /zone/dir/my%20file.txt http/1.1"),
    ];

    for (file_name, expected) in cases {
        let response = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok".to_vec();
        let (base_url, head) = serve_once(response).await;

        let result = storage(&base_url).download_file(file_name).await;
        let head = head.await.unwrap().to_lowercase();

        assert!(
            head.starts_with(expected),
            "failed on request line for case: {}, got: {}",
            file_name,
            head
        );
        assert_eq!(result.into_data().unwrap(), b"ok".to_vec(), "failed on data for case: {}", file_name);
    }
}

#[tokio::test]
async fn test_download_not_found_over_http() {
    let body = r#"{"HttpCode":404,"Message":"Object Not Found"}"#;
    let response = format!(
        "HTTP/1.1 404 Not Found\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let (base_url, _head) = serve_once(response.into_bytes()).await;

    let result = storage(&base_url).download_file("missing.txt").await;

    assert!(matches!(result, OperationResult::Error { status: 404, .. }));
    assert!(result.message().contains("Not Found"));
}

#[tokio::test]
async fn test_download_truncated_body_keeps_status() {
    let response = b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\nConnection: close\r\n\r\npartial".to_vec();
    let (base_url, _head) = serve_once(response).await;

    let result = storage(&base_url).download_file("big.bin").await;

    assert!(matches!(result, OperationResult::Error { status: 200, .. }));
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = storage(&format!("http://{}/zone/", addr)).list_objects().await;

    assert!(matches!(result, OperationResult::Error { status: 0, .. }));
    assert!(!result.message().is_empty());
}
