use super::*;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;

fn enabled(container_url: Option<&str>, token: Option<&str>) -> UploadSettings {
    UploadSettings {
        enabled: true,
        container_url: container_url.map(str::to_string),
        token: token.map(str::to_string),
        token_env: None,
    }
}

fn no_env(_: &str) -> Option<String> {
    None
}

/// Read one HTTP request: lowercased head lines and the body.
fn read_request(reader: &mut BufReader<std::net::TcpStream>) -> (Vec<String>, String) {
    let mut head = Vec::new();
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        if line == "\r\n" || line.is_empty() {
            break;
        }
        let lower = line.to_ascii_lowercase();
        if let Some(len) = lower.strip_prefix("content-length:") {
            content_length = len.trim().parse().unwrap();
        }
        head.push(lower.trim_end().to_string());
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body).unwrap();
    (head, String::from_utf8(body).unwrap())
}

#[test]
fn disabled_upload_is_local_only() {
    let publisher = select_publisher(&UploadSettings::default(), no_env).unwrap();
    assert_eq!(publisher.describe(), "local output only");
}

#[test]
fn enabled_without_container_fails() {
    let err = select_publisher(&enabled(None, Some("t")), no_env)
        .err()
        .unwrap();
    assert!(matches!(err, TriageError::Upload(_)));
    assert!(err.to_string().contains("container_url"), "got: {err}");
}

#[test]
fn enabled_without_token_fails() {
    let err = select_publisher(&enabled(Some("https://s/v1/c"), None), no_env)
        .err()
        .unwrap();
    assert!(err.to_string().contains("TRIAGE_STORAGE_TOKEN"), "got: {err}");
}

#[test]
fn token_can_come_from_environment() {
    let mut settings = enabled(Some("https://s/v1/c/"), None);
    settings.token_env = Some("MY_TOKEN".to_string());
    let publisher = select_publisher(&settings, |name| {
        (name == "MY_TOKEN").then(|| "secret".to_string())
    })
    .unwrap();
    assert_eq!(publisher.describe(), "object storage at https://s/v1/c");
}

#[test]
fn object_store_puts_page_with_token_and_type() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/v1/acct/triage", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let (head, body) = read_request(&mut reader);
        tx.send((head, body)).unwrap();
        stream
            .write_all(b"HTTP/1.1 201 Created\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
            .unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("index.html");
    fs::write(&page, "<html>hi</html>").unwrap();

    let store = ObjectStore::new(&base, "tok".to_string()).unwrap();
    store.publish("index.html", &page, "text/html").unwrap();

    let (head, body) = rx.recv().unwrap();
    assert_eq!(head[0], "put /v1/acct/triage/index.html http/1.1");
    assert!(head.contains(&"x-auth-token: tok".to_string()));
    assert!(head.contains(&"content-type: text/html".to_string()));
    assert_eq!(body, "<html>hi</html>");
}

#[test]
fn object_store_rejection_is_upload_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}/c", listener.local_addr().unwrap());
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        read_request(&mut reader);
        stream
            .write_all(b"HTTP/1.1 401 Unauthorized\r\ncontent-length: 6\r\nconnection: close\r\n\r\ndenied")
            .unwrap();
    });

    let dir = tempfile::tempdir().unwrap();
    let page = dir.path().join("index.html");
    fs::write(&page, "x").unwrap();

    let store = ObjectStore::new(&base, "bad".to_string()).unwrap();
    let err = store.publish("index.html", &page, "text/html").unwrap_err();
    assert!(matches!(err, TriageError::Upload(_)));
    assert!(err.to_string().contains("401"), "got: {err}");
}
