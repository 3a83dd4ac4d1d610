//! Minimal server-side HTML for the operator pages.

use std::fmt::Write;

const STYLE: &str = r#"
        :root {
            --bg: #f8fafc;
            --surface: #ffffff;
            --border: #e2e8f0;
            --text: #1e293b;
            --muted: #64748b;
            --accent: #2563eb;
            --ok: #15803d;
            --error: #b91c1c;
        }
        * { box-sizing: border-box; }
        body { font-family: system-ui, -apple-system, sans-serif; background: var(--bg); color: var(--text); margin: 0; }
        nav { background: var(--surface); border-bottom: 1px solid var(--border); padding: 0.75rem 1.5rem; display: flex; gap: 1rem; }
        nav a { color: var(--accent); text-decoration: none; font-size: 0.875rem; }
        main { max-width: 1000px; margin: 0 auto; padding: 1.5rem; }
        h1 { font-size: 1.25rem; font-weight: 600; }
        table { width: 100%; border-collapse: collapse; background: var(--surface); }
        th, td { text-align: left; padding: 0.5rem 0.75rem; border-bottom: 1px solid var(--border); font-size: 0.875rem; }
        th { color: var(--muted); font-weight: 500; }
        .empty { color: var(--muted); }
        .card { background: var(--surface); border: 1px solid var(--border); border-radius: 0.5rem; padding: 1rem 1.25rem; margin-bottom: 1rem; }
        .columns { color: var(--muted); font-size: 0.875rem; }
        .warning { color: var(--error); font-size: 0.875rem; }
        .result.ok { color: var(--ok); }
        .result.failed { color: var(--error); }
"#;

const NAV: &[(&str, &str)] = &[
    ("/", "Chart"),
    ("/data_upload", "Upload data"),
    ("/buildings", "Buildings"),
    ("/meters", "Meters"),
    ("/meter_readings", "Meter readings"),
];

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap `body` (already escaped) in the shared page chrome.
pub fn page(title: &str, body: &str) -> String {
    let mut nav = String::new();
    for (href, label) in NAV {
        let _ = write!(nav, r#"<a href="{href}">{label}</a>"#);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
<nav>{nav}</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Render a table. Cells must already be escaped.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return r#"<p class="empty">Nothing here yet.</p>"#.to_string();
    }

    let mut out = String::from("<table>\n<thead><tr>");
    for h in headers {
        let _ = write!(out, "<th>{}</th>", escape(h));
    }
    out.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{cell}</td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>");
    out
}

/// An anchor with escaped text.
pub fn link(href: &str, text: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, escape(href), escape(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape("Library"), "Library");
    }

    #[test]
    fn page_escapes_title_and_keeps_body() {
        let html = page("A & B", "<p>body</p>");
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains("<p>body</p>"));
        assert!(html.contains(r#"<a href="/data_upload">Upload data</a>"#));
    }

    #[test]
    fn empty_table_renders_placeholder() {
        assert!(table(&["Id"], &[]).contains("Nothing here yet."));
    }

    #[test]
    fn table_renders_headers_and_cells() {
        let html = table(&["Id", "Name"], &[vec!["1".into(), "Library".into()]]);
        assert!(html.contains("<th>Id</th><th>Name</th>"));
        assert!(html.contains("<tr><td>1</td><td>Library</td></tr>"));
    }

    #[test]
    fn link_escapes_both_parts() {
        assert_eq!(
            link("/buildings/1", "<Hall>"),
            r#"<a href="/buildings/1">&lt;Hall&gt;</a>"#
        );
    }
}
