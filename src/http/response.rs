use crate::config::Config;
use crate::http::listing;
use crate::http::parser::{is_supported_version, parse_request_line};
use crate::http::request::Method;
use crate::http::writer::ResponseWriter;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWrite;

/// HTTP status codes the server produces.
///
/// - `Ok` (200): File or directory listing served
/// - `BadRequest` (400): Malformed request, or a path whose parent is missing
/// - `NotFound` (404): Nothing servable at the resolved path
/// - `RequestTimeout` (408): The client was too slow sending its request
/// - `InternalServerError` (500): Transport failure while reading
/// - `NotImplemented` (501): Unsupported method, request line or version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 408 Request Time-out
    RequestTimeout,
    /// 500 Internal Server Error
    InternalServerError,
    /// 501 Not Implemented
    NotImplemented,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use fileserver::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::RequestTimeout.as_u16(), 408);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::RequestTimeout => 408,
            StatusCode::InternalServerError => 500,
            StatusCode::NotImplemented => 501,
        }
    }

    /// Returns the reason phrase sent on the status line.
    ///
    /// # Example
    ///
    /// ```
    /// # use fileserver::http::response::StatusCode;
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// assert_eq!(StatusCode::RequestTimeout.reason_phrase(), "Request Time-out");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::RequestTimeout => "Request Time-out",
            StatusCode::InternalServerError => "Internal Server Error",
            StatusCode::NotImplemented => "Not Implemented",
        }
    }

    /// Code and reason together, e.g. `404 Not Found`.
    pub fn status_text(&self) -> String {
        format!("{} {}", self.as_u16(), self.reason_phrase())
    }
}

/// Why a request was answered with 400.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadRequestReason {
    /// No request line, or no accepted header lines
    EmptyRequest,
    /// The parent directory of the resolved path does not exist
    MissingParent,
}

/// The single decided result for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    ServeFile { path: PathBuf, method: Method },
    ServeDirectoryListing { path: PathBuf },
    BadRequest { reason: BadRequestReason },
    NotFound,
    NotImplemented { reason: String },
    VersionNotImplemented { version: String },
    Timeout,
    ServerError,
}

impl ResponseOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            ResponseOutcome::ServeFile { .. } | ResponseOutcome::ServeDirectoryListing { .. } => StatusCode::Ok,
            ResponseOutcome::BadRequest { .. } => StatusCode::BadRequest,
            ResponseOutcome::NotFound => StatusCode::NotFound,
            ResponseOutcome::NotImplemented { .. } | ResponseOutcome::VersionNotImplemented { .. } => {
                StatusCode::NotImplemented
            }
            ResponseOutcome::Timeout => StatusCode::RequestTimeout,
            ResponseOutcome::ServerError => StatusCode::InternalServerError,
        }
    }
}

/// A decided outcome plus the HTTP version to answer with.
///
/// An empty version means no version was parsed; the status line then
/// falls back to `HTTP/1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub version: String,
    pub outcome: ResponseOutcome,
}

impl Response {
    /// An error response raised before the request line was interpreted.
    pub fn rejected(outcome: ResponseOutcome) -> Self {
        Self {
            version: String::new(),
            outcome,
        }
    }

    /// Decides how to answer `line`, probing the filesystem under the
    /// document root.
    pub async fn decide(line: &str, config: &Config) -> Self {
        let Some(request_line) = parse_request_line(line) else {
            return Self::rejected(ResponseOutcome::NotImplemented {
                reason: "unparseable request line".to_string(),
            });
        };

        let version = request_line.version;

        if !is_supported_version(&version) {
            return Self {
                version: version.clone(),
                outcome: ResponseOutcome::VersionNotImplemented { version },
            };
        }

        let path = resolve_path(&config.document_root, &request_line.uri);
        tracing::trace!(uri = %request_line.uri, path = %path.display(), "resolved request path");

        let outcome = if !parent_exists(&path).await {
            ResponseOutcome::BadRequest {
                reason: BadRequestReason::MissingParent,
            }
        } else {
            let metadata = tokio::fs::metadata(&path).await.ok();
            let is_dir = metadata.as_ref().is_some_and(|m| m.is_dir());
            let is_file = metadata.as_ref().is_some_and(|m| m.is_file());

            if config.directory_listing && is_dir {
                ResponseOutcome::ServeDirectoryListing { path }
            } else if is_file && !is_hidden(&path) {
                ResponseOutcome::ServeFile {
                    path,
                    method: request_line.method,
                }
            } else {
                ResponseOutcome::NotFound
            }
        };

        Self { version, outcome }
    }

    /// Writes the complete response for this outcome and flushes it.
    pub async fn write_to<W>(&self, out: &mut W, config: &Config) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut writer = ResponseWriter::new(out, config.file_buffer_size);
        let status = self.outcome.status();

        match &self.outcome {
            ResponseOutcome::ServeFile { path, method } => {
                writer.write_file(&self.version, path, *method).await?;
            }
            ResponseOutcome::ServeDirectoryListing { path } => {
                let html = listing::render(path).await;
                writer.write_listing(&self.version, html.as_bytes()).await?;
            }
            ResponseOutcome::BadRequest {
                reason: BadRequestReason::MissingParent,
            }
            | ResponseOutcome::NotFound => {
                writer.write_empty(&self.version, status).await?;
            }
            ResponseOutcome::VersionNotImplemented { version } => {
                let text = format!("{}  (http version {})", status.status_text(), version);
                writer.write_error(&self.version, status, &text).await?;
            }
            ResponseOutcome::BadRequest {
                reason: BadRequestReason::EmptyRequest,
            }
            | ResponseOutcome::NotImplemented { .. }
            | ResponseOutcome::Timeout
            | ResponseOutcome::ServerError => {
                writer.write_error(&self.version, status, &status.status_text()).await?;
            }
        }

        writer.flush().await
    }
}

/// Maps a request URI onto the filesystem.
///
/// Every literal `..` is removed and leading slashes are stripped before the
/// remainder is joined to `document_root`. This is a textual filter only;
/// symlinks and encoded sequences are not inspected.
pub fn resolve_path(document_root: &Path, uri: &str) -> PathBuf {
    let cleaned = uri.replace("..", "");
    document_root.join(cleaned.trim_start_matches('/'))
}

async fn parent_exists(path: &Path) -> bool {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    tokio::fs::try_exists(parent).await.unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}
