//! Tool settings (server address, tool root, destination folder, browser)

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "gitshow.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolSettings {
    /// Installation root holding `runtime/`, `templates/`, `index.html` and `samples/`.
    pub root: Option<PathBuf>,
    pub host: String,
    pub port: u16,
    /// Destination folder name, relative to the presentation folder.
    pub dest: String,
    /// Headless browser used for PDF export.
    pub browser: Option<PathBuf>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            root: None,
            host: "localhost".to_string(),
            port: 8000,
            dest: "dist".to_string(),
            browser: None,
        }
    }
}

/// Values given on the command line; unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser: Option<PathBuf>,
}

/// Layer defaults, `<src_dir>/gitshow.toml`, `GITSHOW_*` variables and CLI overrides.
pub fn load_settings(src_dir: &Path, overrides: &SettingsOverrides) -> Result<ToolSettings> {
    let settings_file = src_dir.join(SETTINGS_FILE);
    if settings_file.is_file() {
        tracing::debug!("Reading tool settings from {}", settings_file.display());
    }

    let mut settings: ToolSettings = Figment::from(Serialized::defaults(ToolSettings::default()))
        .merge(Toml::file(&settings_file))
        .merge(Env::prefixed("GITSHOW_"))
        .merge(Serialized::defaults(overrides))
        .extract()
        .with_context(|| format!("Invalid tool settings (see {})", settings_file.display()))?;

    // A relative root in gitshow.toml is relative to the presentation.
    if let Some(root) = settings.root.as_mut() {
        if root.is_relative() {
            *root = src_dir.join(&*root);
        }
    }

    Ok(settings)
}
