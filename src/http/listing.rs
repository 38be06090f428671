use std::path::Path;

/// One immediate child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub is_dir: bool,
}

/// Builds the HTML listing for `dir`, entries in enumeration order.
///
/// A directory that cannot be read lists as empty.
pub async fn render(dir: &Path) -> String {
    let entries = match read_entries(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot read directory, listing it as empty");
            Vec::new()
        }
    };

    tracing::trace!(dir = %dir.display(), entries = entries.len(), "directory listing");

    let timestamp = chrono::Local::now().format("%a %b %d %H:%M:%S %:z %Y").to_string();
    render_entries(&entries, &timestamp)
}

async fn read_entries(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut entries = Vec::new();
    let mut read_dir = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = read_dir.next_entry().await? {
        // Follows symlinks so a link to a directory lists as one.
        let is_dir = tokio::fs::metadata(entry.path())
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        entries.push(Entry {
            name: entry.file_name().to_string_lossy().into_owned(),
            is_dir,
        });
    }

    Ok(entries)
}

pub fn render_entries(entries: &[Entry], timestamp: &str) -> String {
    let mut html = String::from("<html>\n<title>Directory listing</title>\n<body>\n");
    html.push_str("<a href=\"..\">Parent Directory</a><br>\n");

    for entry in entries {
        let name = escape_html(&entry.name);
        let slash = if entry.is_dir { "/" } else { "" };
        html.push_str(&format!("<a href=\"{name}{slash}\">{name}{slash}</a><br>"));
    }

    html.push_str(&format!("<p><hr><br><i>{timestamp}</i>\n"));
    html.push_str("</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_get_a_trailing_slash() {
        let entries = vec![
            Entry { name: "docs".to_string(), is_dir: true },
            Entry { name: "a.txt".to_string(), is_dir: false },
        ];

        let html = render_entries(&entries, "now");

        assert!(html.starts_with("<html>\n<title>Directory listing</title>"));
        assert!(html.contains("<a href=\"..\">Parent Directory</a><br>\n"));
        assert!(html.contains("<a href=\"docs/\">docs/</a><br>"));
        assert!(html.contains("<a href=\"a.txt\">a.txt</a><br>"));
        assert!(html.contains("<i>now</i>"));
    }

    #[tokio::test]
    async fn unreadable_directory_lists_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let html = render(&dir.path().join("gone")).await;

        assert!(html.contains("<a href=\"..\">Parent Directory</a><br>\n<p><hr>"));
        assert_eq!(html.matches("<a href=").count(), 1);
    }

    #[test]
    fn names_are_escaped() {
        let entries = vec![Entry { name: "<b>&\"x".to_string(), is_dir: false }];
        let html = render_entries(&entries, "now");

        assert!(html.contains("<a href=\"&lt;b&gt;&amp;&quot;x\">"));
    }
}
