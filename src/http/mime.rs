use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

const TEXT_HTML: &str = "text/html";

static MIME_TYPES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("html", TEXT_HTML),
        ("htm", TEXT_HTML),
        ("css", "text/css"),
        ("gif", "image/gif"),
        ("jpeg", "image/jpeg"),
        ("jpg", "image/jpeg"),
        ("png", "image/png"),
        ("js", "application/javascript"),
        ("xml", "application/xml"),
        ("pdf", "application/pdf"),
    ])
});

/// Content type for a file, keyed on the text after the last `.` of its
/// name (case-sensitive).
///
/// Unknown extensions yield an empty string rather than
/// `application/octet-stream`, leaving the type for the client to sniff.
pub fn content_type(path: &Path) -> &'static str {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    let extension = match name.rfind('.') {
        Some(i) => &name[i + 1..],
        None => return "",
    };

    MIME_TYPES.get(extension).copied().unwrap_or("")
}
