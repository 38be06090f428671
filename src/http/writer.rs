use bytes::BytesMut;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::mime;
use crate::http::request::Method;
use crate::http::response::StatusCode;

const CRLF: &str = "\r\n";
const DEFAULT_VERSION: &str = "1.1";

/// `HTTP/<version> <code> <reason>\r\n`, with a blank version shown as 1.1.
pub fn status_line(version: &str, status: StatusCode) -> String {
    let version = if version.is_empty() { DEFAULT_VERSION } else { version };
    format!("HTTP/{} {}{}", version, status.status_text(), CRLF)
}

/// Status line and headers, terminated by the blank line.
pub fn serialize_head(version: &str, status: StatusCode, headers: &[(&str, String)]) -> Vec<u8> {
    let mut buf = status_line(version, status).into_bytes();

    for (k, v) in headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(CRLF.as_bytes());
    }

    buf.extend_from_slice(CRLF.as_bytes());
    buf
}

/// An error response: status line, blank line, then a one-heading HTML body
/// when `body_text` is non-empty. No `Content-Length` is sent; the client
/// reads until the connection closes.
pub fn serialize_error(version: &str, status: StatusCode, body_text: &str) -> Vec<u8> {
    let mut buf = serialize_head(version, status, &[]);

    if !body_text.is_empty() {
        buf.extend_from_slice(b"<html><title></title><body>");
        buf.extend_from_slice(format!("<h1>{}</h1>", body_text).as_bytes());
        buf.extend_from_slice(b"</body></html>");
    }

    buf
}

/// Writes responses onto one connection's output.
pub struct ResponseWriter<'a, W> {
    out: &'a mut W,
    buffer_size: usize,
}

impl<'a, W> ResponseWriter<'a, W>
where
    W: AsyncWrite + Unpin,
{
    /// `buffer_size` is the chunk size used when streaming file bodies.
    pub fn new(out: &'a mut W, buffer_size: usize) -> Self {
        Self { out, buffer_size }
    }

    pub async fn write_error(&mut self, version: &str, status: StatusCode, body_text: &str) -> std::io::Result<()> {
        self.out.write_all(&serialize_error(version, status, body_text)).await
    }

    /// Status line plus `Content-Length: 0` and no body.
    pub async fn write_empty(&mut self, version: &str, status: StatusCode) -> std::io::Result<()> {
        let head = serialize_head(version, status, &[("Content-Length", "0".to_string())]);
        self.out.write_all(&head).await
    }

    pub async fn write_listing(&mut self, version: &str, html: &[u8]) -> std::io::Result<()> {
        let head = serialize_head(
            version,
            StatusCode::Ok,
            &[
                ("Content-Type", "text/html".to_string()),
                ("Connection", "close".to_string()),
                ("Content-Length", html.len().to_string()),
            ],
        );
        self.out.write_all(&head).await?;
        self.out.write_all(html).await
    }

    /// Sends the 200 head for `path` and, for GET, the file bytes in chunks
    /// of at most `buffer_size`. Returns the number of body bytes written.
    pub async fn write_file(&mut self, version: &str, path: &Path, method: Method) -> std::io::Result<u64> {
        let mut file = File::open(path).await?;
        let length = file.metadata().await?.len();

        let mut headers = Vec::with_capacity(3);
        let content_type = mime::content_type(path);
        if !content_type.is_empty() {
            headers.push(("Content-Type", content_type.to_string()));
        }
        headers.push(("Connection", "close".to_string()));
        headers.push(("Content-Length", length.to_string()));

        self.out.write_all(&serialize_head(version, StatusCode::Ok, &headers)).await?;

        if method == Method::HEAD {
            return Ok(0);
        }

        let written = self.write_body(&mut file, length).await?;

        tracing::trace!(path = %path.display(), bytes = written, "file body sent");
        Ok(written)
    }

    /// Copies at most `length` bytes of `source` in `buffer_size` chunks.
    /// Anything past `length` is left unread so the body never overruns the
    /// `Content-Length` already sent.
    pub async fn write_body<R>(&mut self, source: R, length: u64) -> std::io::Result<u64>
    where
        R: AsyncRead + Unpin,
    {
        let mut source = source.take(length);
        let mut buffer = BytesMut::with_capacity(self.buffer_size);
        let mut written = 0u64;

        loop {
            buffer.clear();
            let n = source.read_buf(&mut buffer).await?;
            if n == 0 {
                break;
            }

            self.out.write_all(&buffer).await?;
            written += n as u64;
        }

        Ok(written)
    }

    pub async fn flush(&mut self) -> std::io::Result<()> {
        self.out.flush().await
    }
}
