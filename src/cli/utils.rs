//! Shared CLI utilities.

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{load_settings, SettingsOverrides, ToolSettings};
use crate::error::ProjectError;

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg} [{elapsed}]";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

/// Arguments every project command accepts.
#[derive(Args, Debug, Clone, Default)]
pub struct ProjectArgs {
    /// Presentation folder (defaults to the current directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Tool root holding runtime/, templates/, index.html and samples/
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

impl ProjectArgs {
    /// The presentation folder, which must already exist.
    ///
    /// A missing folder has no config either, so it reports [`ProjectError::ConfigMissing`].
    pub fn source_dir(&self) -> Result<PathBuf> {
        let dir = match &self.path {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("Cannot determine the current directory")?,
        };
        if !dir.exists() {
            return Err(ProjectError::ConfigMissing(dir).into());
        }
        let dir = dir
            .canonicalize()
            .with_context(|| format!("Presentation folder not found: {}", dir.display()))?;
        if !dir.is_dir() {
            anyhow::bail!("Not a directory: {}", dir.display());
        }
        Ok(dir)
    }

    pub fn overrides(&self) -> SettingsOverrides {
        SettingsOverrides { root: self.root.clone(), ..Default::default() }
    }
}

/// Resolve the source folder and settings and announce the folder on stdout.
pub fn open_project(args: &ProjectArgs, overrides: SettingsOverrides) -> Result<(PathBuf, ToolSettings)> {
    let src_dir = args.source_dir()?;
    println!("Using source directory: {}", style(src_dir.display()).cyan());
    let settings = load_settings(&src_dir, &overrides)?;
    tracing::debug!("settings: {:?}", settings);
    Ok((src_dir, settings))
}

/// Multi-threaded runtime for the server and PDF commands.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed starting the async runtime")
}

pub fn success(message: impl std::fmt::Display) {
    println!("{} {}", style("✔").green().bold(), message);
}

/// Spinner for waits of unknown length.
pub fn spinner(message: impl Into<std::borrow::Cow<'static, str>>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
        pb.set_style(spinner_style.tick_chars(SPINNER_CHARS));
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
