use crate::http::request::{Method, RequestLine};
use regex::Regex;
use std::sync::LazyLock;

static REQUEST_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(GET|HEAD) ([^ ]+) HTTP/([0-9]\.[0-9])$").expect("request line pattern is valid")
});

static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]*):\s*(.*)$").expect("header line pattern is valid"));

/// Versions the server answers. Everything else gets 501.
pub const SUPPORTED_VERSIONS: [&str; 2] = ["1.0", "1.1"];

/// Matches `(GET|HEAD) <uri> HTTP/<digit>.<digit>` against the whole line.
///
/// Returns `None` for any other method or shape; the version is not checked
/// against [`SUPPORTED_VERSIONS`] here.
pub fn parse_request_line(line: &str) -> Option<RequestLine> {
    let caps = REQUEST_LINE.captures(line)?;

    Some(RequestLine {
        method: Method::from_str(&caps[1])?,
        uri: caps[2].to_string(),
        version: caps[3].to_string(),
    })
}

/// Splits a header line into name and raw value.
///
/// The name is everything before the first colon (possibly empty); leading
/// whitespace of the value is dropped.
pub fn parse_header_line(line: &str) -> Option<(&str, &str)> {
    let caps = HEADER_LINE.captures(line)?;
    let name = caps.get(1)?.as_str();
    let value = caps.get(2)?.as_str();
    Some((name, value))
}

pub fn is_supported_version(version: &str) -> bool {
    SUPPORTED_VERSIONS.contains(&version)
}

/// Strips a trailing `\n` and one `\r` before it.
pub fn trim_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
