use crate::config::Config;
use crate::http::parser::{parse_header_line, trim_line_ending};
use crate::http::request::{HeaderMap, Request};
use std::fmt;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::time::timeout;
use tracing::{info, trace};

/// Which part of the request the reader was waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPhase {
    RequestLine,
    Headers,
}

impl fmt::Display for ReadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadPhase::RequestLine => f.write_str("request line"),
            ReadPhase::Headers => f.write_str("request headers"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("timed out waiting for {phase}")]
    Timeout { phase: ReadPhase },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ReadError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ReadError::Timeout { .. })
    }
}

/// Reads the request line and the header block.
///
/// # Returns
///
/// - `Ok(Some(request))`: a non-empty request line and whatever header lines
///   were accepted (possibly none)
/// - `Ok(None)`: the peer closed the connection or sent an empty first line
/// - `Err(ReadError::Timeout)`: nothing arrived within the line timeout, or
///   the header block was not terminated within the header timeout
/// - `Err(ReadError::Io)`: any other transport failure
pub async fn read_request<R>(reader: &mut R, config: &Config) -> Result<Option<Request>, ReadError>
where
    R: AsyncBufRead + Unpin,
{
    let line = timeout(config.line_read_timeout(), read_line(reader))
        .await
        .map_err(|_| ReadError::Timeout {
            phase: ReadPhase::RequestLine,
        })??;

    trace!(line = ?line, "request line");

    let line = match line {
        Some(line) if !line.is_empty() => line,
        _ => return Ok(None),
    };

    let headers = timeout(config.header_read_timeout(), read_headers(reader))
        .await
        .map_err(|_| ReadError::Timeout {
            phase: ReadPhase::Headers,
        })??;

    Ok(Some(Request { line, headers }))
}

/// Reads header lines up to the blank line that ends the block.
///
/// A peer that closes the connection mid-block ends the block too.
async fn read_headers<R>(reader: &mut R) -> io::Result<HeaderMap>
where
    R: AsyncBufRead + Unpin,
{
    let mut headers = HeaderMap::new();

    while let Some(line) = read_line(reader).await? {
        if line.is_empty() {
            break;
        }

        trace!(line = %line, "request header line");

        match parse_header_line(&line) {
            Some((name, value)) => headers.insert(name, value),
            None => info!(line = %line, "Skipping invalid header"),
        }
    }

    Ok(headers)
}

/// Reads one `\n`-terminated line, lossily decoded. `None` at end of stream.
async fn read_line<R>(reader: &mut R) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();

    if reader.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(None);
    }

    let text = String::from_utf8_lossy(&buf);
    Ok(Some(trim_line_ending(&text).to_string()))
}
