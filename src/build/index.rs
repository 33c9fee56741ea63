//! `index.html` generation

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::fs;
use std::path::Path;

const DEFAULT_INDEX: &str = include_str!("index.html");

static PAGE_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(TITLE|LANG|CONFIG)\}\}").expect("valid regex"));

/// Client that reloads the page whenever the server announces a rebuild.
pub const LIVE_RELOAD_SNIPPET: &str = r#"<script>
    new EventSource('/__livereload').addEventListener('reload', function () { location.reload(); });
</script>
"#;

/// Page skeleton: `<root>/index.html` when present, else the built-in page.
pub fn load_index_template(root: Option<&Path>) -> Result<String> {
    if let Some(path) = root.map(|r| r.join("index.html")).filter(|p| p.is_file()) {
        return fs::read_to_string(&path)
            .with_context(|| format!("Failed reading page template: {}", path.display()));
    }
    Ok(DEFAULT_INDEX.to_string())
}

/// Fill in `{{TITLE}}`, `{{LANG}}` and `{{CONFIG}}`; inject the reload client when asked.
///
/// Placeholders are filled in one pass, so inserted values are never scanned again.
pub fn render_index(page: &str, resolved: &Value, live_reload: bool) -> String {
    let title = escape_html(resolved.get("title").and_then(Value::as_str).unwrap_or(""));
    let lang = escape_html(resolved.get("lang").and_then(Value::as_str).unwrap_or("en"));
    // The config sits inside a <script> element.
    let config = resolved.to_string().replace("</", "<\\/");

    let mut html = PAGE_PLACEHOLDER
        .replace_all(page, |caps: &Captures| match &caps[1] {
            "TITLE" => title.clone(),
            "LANG" => lang.clone(),
            _ => config.clone(),
        })
        .into_owned();

    if live_reload {
        match html.rfind("</body>") {
            Some(pos) => html.insert_str(pos, LIVE_RELOAD_SNIPPET),
            None => html.push_str(LIVE_RELOAD_SNIPPET),
        }
    }
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
