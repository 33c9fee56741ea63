//! PDF export through a headless Chromium-family browser

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Executables tried, in order, when no browser is configured.
pub const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
    "microsoft-edge",
    "msedge",
];

pub fn pdf_path(src_dir: &Path, id: &str) -> PathBuf {
    src_dir.join(format!("{id}.pdf"))
}

/// Page address that switches the deck into print layout.
pub fn print_url(base: &str) -> String {
    format!("{}/?print-pdf", base.trim_end_matches('/'))
}

/// Use `explicit` when given, else the first candidate found on `PATH`.
pub fn find_browser(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return which::which(path)
            .with_context(|| format!("Browser not found: {}", path.display()));
    }

    BROWSER_CANDIDATES
        .iter()
        .find_map(|name| which::which(name).ok())
        .with_context(|| {
            format!(
                "No headless browser found (tried {}); install Chromium or pass --browser",
                BROWSER_CANDIDATES.join(", ")
            )
        })
}

pub fn browser_args(output: &Path, url: &str) -> Vec<OsString> {
    let mut print_to = OsString::from("--print-to-pdf=");
    print_to.push(output);
    vec![
        "--headless=new".into(),
        "--disable-gpu".into(),
        "--no-pdf-header-footer".into(),
        "--run-all-compositor-stages-before-draw".into(),
        "--virtual-time-budget=10000".into(),
        print_to,
        url.into(),
    ]
}

/// Print `url` to `output` and wait for the browser to exit.
pub async fn print_pdf(browser: &Path, output: &Path, url: &str) -> Result<()> {
    tracing::debug!("printing {} with {}", url, browser.display());
    let result = Command::new(browser)
        .args(browser_args(output, url))
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("Failed starting {}", browser.display()))?;

    if !result.status.success() {
        anyhow::bail!(
            "{} exited with {}: {}",
            browser.display(),
            result.status,
            String::from_utf8_lossy(&result.stderr).trim()
        );
    }
    if !output.is_file() {
        anyhow::bail!("Browser finished without writing {}", output.display());
    }
    Ok(())
}
