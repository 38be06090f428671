use fileserver::config::Config;
use fileserver::http::request::Method;
use fileserver::http::response::{BadRequestReason, Response, ResponseOutcome, StatusCode};
use fileserver::http::writer::{ResponseWriter, serialize_error, serialize_head, status_line};
use std::path::PathBuf;
use tempfile::TempDir;

fn docroot() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), b"<h1>hi</h1>\n").unwrap();
    std::fs::write(dir.path().join(".secret"), b"hidden").unwrap();
    std::fs::create_dir(dir.path().join("dir")).unwrap();
    std::fs::write(dir.path().join("dir").join("page.css"), b"body{}").unwrap();
    dir
}

fn config_for(dir: &TempDir, directory_listing: bool) -> Config {
    Config {
        document_root: dir.path().to_path_buf(),
        directory_listing,
        file_buffer_size: 4,
        ..Config::default()
    }
}

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::RequestTimeout.as_u16(), 408);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
    assert_eq!(StatusCode::NotImplemented.as_u16(), 501);
}

#[test]
fn test_status_text() {
    assert_eq!(StatusCode::Ok.status_text(), "200 OK");
    assert_eq!(StatusCode::RequestTimeout.status_text(), "408 Request Time-out");
    assert_eq!(StatusCode::InternalServerError.status_text(), "500 Internal Server Error");
    assert_eq!(StatusCode::NotImplemented.status_text(), "501 Not Implemented");
}

#[test]
fn test_status_line_defaults_version() {
    assert_eq!(status_line("", StatusCode::NotImplemented), "HTTP/1.1 501 Not Implemented\r\n");
    assert_eq!(status_line("1.0", StatusCode::Ok), "HTTP/1.0 200 OK\r\n");
}

#[test]
fn test_serialize_head_keeps_header_order() {
    let head = serialize_head(
        "1.1",
        StatusCode::Ok,
        &[("Connection", "close".to_string()), ("Content-Length", "3".to_string())],
    );

    assert_eq!(head, b"HTTP/1.1 200 OK\r\nConnection: close\r\nContent-Length: 3\r\n\r\n".to_vec());
}

#[test]
fn test_serialize_error_body() {
    let bytes = serialize_error("", StatusCode::RequestTimeout, "408 Request Time-out");

    assert_eq!(
        String::from_utf8(bytes).unwrap(),
        "HTTP/1.1 408 Request Time-out\r\n\r\n<html><title></title><body><h1>408 Request Time-out</h1></body></html>"
    );
}

#[test]
fn test_serialize_error_without_body_text() {
    let bytes = serialize_error("1.0", StatusCode::InternalServerError, "");
    assert_eq!(bytes, b"HTTP/1.0 500 Internal Server Error\r\n\r\n".to_vec());
}

#[test]
fn test_outcome_status() {
    assert_eq!(ResponseOutcome::NotFound.status(), StatusCode::NotFound);
    assert_eq!(ResponseOutcome::Timeout.status(), StatusCode::RequestTimeout);
    assert_eq!(ResponseOutcome::ServerError.status(), StatusCode::InternalServerError);
    assert_eq!(
        ResponseOutcome::VersionNotImplemented { version: "0.9".into() }.status(),
        StatusCode::NotImplemented
    );
    assert_eq!(
        ResponseOutcome::BadRequest { reason: BadRequestReason::MissingParent }.status(),
        StatusCode::BadRequest
    );
}

#[tokio::test]
async fn test_decide_serves_file() {
    let dir = docroot();
    let cfg = config_for(&dir, true);

    let response = Response::decide("HEAD /index.html HTTP/1.0", &cfg).await;

    assert_eq!(response.version, "1.0");
    assert_eq!(
        response.outcome,
        ResponseOutcome::ServeFile {
            path: dir.path().join("index.html"),
            method: Method::HEAD,
        }
    );
}

#[tokio::test]
async fn test_decide_unparseable_line() {
    let dir = docroot();
    let cfg = config_for(&dir, true);

    let response = Response::decide("POST /index.html HTTP/1.1", &cfg).await;

    assert_eq!(response.version, "");
    assert!(matches!(response.outcome, ResponseOutcome::NotImplemented { .. }));
}

#[tokio::test]
async fn test_decide_unsupported_version() {
    let dir = docroot();
    let cfg = config_for(&dir, true);

    let response = Response::decide("GET /index.html HTTP/0.9", &cfg).await;

    assert_eq!(response.version, "0.9");
    assert_eq!(response.outcome, ResponseOutcome::VersionNotImplemented { version: "0.9".into() });
}

#[tokio::test]
async fn test_decide_missing_parent_is_bad_request() {
    let dir = docroot();
    let cfg = config_for(&dir, true);

    let response = Response::decide("GET /nothing/index.html HTTP/1.1", &cfg).await;

    assert_eq!(
        response.outcome,
        ResponseOutcome::BadRequest { reason: BadRequestReason::MissingParent }
    );
}

#[tokio::test]
async fn test_decide_missing_file_is_not_found() {
    let dir = docroot();
    let cfg = config_for(&dir, true);

    let response = Response::decide("GET /dir/nothing.html HTTP/1.1", &cfg).await;
    assert_eq!(response.outcome, ResponseOutcome::NotFound);
}

#[tokio::test]
async fn test_decide_hidden_file_is_not_found() {
    let dir = docroot();
    let cfg = config_for(&dir, true);

    let response = Response::decide("GET /.secret HTTP/1.1", &cfg).await;
    assert_eq!(response.outcome, ResponseOutcome::NotFound);
}

#[tokio::test]
async fn test_decide_directory_depends_on_listing_flag() {
    let dir = docroot();

    let listed = Response::decide("GET /dir HTTP/1.1", &config_for(&dir, true)).await;
    assert_eq!(
        listed.outcome,
        ResponseOutcome::ServeDirectoryListing { path: dir.path().join("dir") }
    );

    let unlisted = Response::decide("GET /dir HTTP/1.1", &config_for(&dir, false)).await;
    assert_eq!(unlisted.outcome, ResponseOutcome::NotFound);
}

#[tokio::test]
async fn test_decide_traversal_stays_under_root() {
    let dir = docroot();
    let cfg = config_for(&dir, true);

    let response = Response::decide("GET /../../etc/passwd HTTP/1.1", &cfg).await;

    // "etc" does not exist beneath the document root.
    assert_eq!(
        response.outcome,
        ResponseOutcome::BadRequest { reason: BadRequestReason::MissingParent }
    );
}

#[tokio::test]
async fn test_writer_streams_file_in_chunks() {
    let dir = docroot();
    let path: PathBuf = dir.path().join("dir").join("page.css");

    let mut out = Vec::new();
    let mut writer = ResponseWriter::new(&mut out, 4);
    let written = writer.write_file("1.1", &path, Method::GET).await.unwrap();

    assert_eq!(written, 6);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "HTTP/1.1 200 OK\r\nContent-Type: text/css\r\nConnection: close\r\nContent-Length: 6\r\n\r\nbody{}"
    );
}

#[tokio::test]
async fn test_writer_body_stops_at_declared_length() {
    let source: &[u8] = b"abcdefghij";

    let mut out = Vec::new();
    let mut writer = ResponseWriter::new(&mut out, 3);
    let written = writer.write_body(source, 7).await.unwrap();

    assert_eq!(written, 7);
    assert_eq!(out, b"abcdefg");
}

#[tokio::test]
async fn test_writer_body_shorter_source() {
    let source: &[u8] = b"abc";

    let mut out = Vec::new();
    let mut writer = ResponseWriter::new(&mut out, 2);
    let written = writer.write_body(source, 10).await.unwrap();

    assert_eq!(written, 3);
    assert_eq!(out, b"abc");
}

#[tokio::test]
async fn test_writer_omits_unknown_content_type() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    std::fs::write(&path, [0u8, 1, 2]).unwrap();

    let mut out = Vec::new();
    let mut writer = ResponseWriter::new(&mut out, 1024);
    writer.write_file("1.0", &path, Method::HEAD).await.unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text, "HTTP/1.0 200 OK\r\nConnection: close\r\nContent-Length: 3\r\n\r\n");
}

#[tokio::test]
async fn test_write_not_found() {
    let cfg = Config::default();
    let response = Response {
        version: "1.1".to_string(),
        outcome: ResponseOutcome::NotFound,
    };

    let mut out = Vec::new();
    response.write_to(&mut out, &cfg).await.unwrap();

    assert_eq!(out, b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_vec());
}

#[tokio::test]
async fn test_write_version_not_implemented_echoes_version() {
    let cfg = Config::default();
    let response = Response {
        version: "0.9".to_string(),
        outcome: ResponseOutcome::VersionNotImplemented { version: "0.9".to_string() },
    };

    let mut out = Vec::new();
    response.write_to(&mut out, &cfg).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("HTTP/0.9 501 Not Implemented\r\n\r\n"));
    assert!(text.contains("<h1>501 Not Implemented  (http version 0.9)</h1>"));
}

#[tokio::test]
async fn test_write_rejected_bad_request_has_body() {
    let cfg = Config::default();
    let response = Response::rejected(ResponseOutcome::BadRequest {
        reason: BadRequestReason::EmptyRequest,
    });

    let mut out = Vec::new();
    response.write_to(&mut out, &cfg).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("HTTP/1.1 400 Bad Request\r\n\r\n"));
    assert!(text.contains("<h1>400 Bad Request</h1>"));
    assert!(!text.contains("Content-Length"));
}
