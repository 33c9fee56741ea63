//! Init command implementation

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use super::utils::success;
use crate::build::copy::copy_tree;
use crate::config::{ensure_no_config, load_settings, SettingsOverrides, CONFIG_FILE};
use crate::template::find_template;

const STARTER_CONFIG: &str = include_str!("../../samples/start/presentation.json");
const STARTER_SLIDES: &str = include_str!("../../samples/start/slides.md");

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Folder for the new presentation (created when missing)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Template the presentation starts from
    #[arg(short, long, value_name = "NAME")]
    pub template: Option<String>,

    /// Tool root holding templates/ and samples/start
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

pub fn run(args: InitArgs) -> Result<()> {
    let dir = match args.path {
        Some(path) => path,
        None => std::env::current_dir().context("Cannot determine the current directory")?,
    };
    fs::create_dir_all(&dir).with_context(|| format!("Failed creating {}", dir.display()))?;
    println!("Using source directory: {}", dir.display());

    ensure_no_config(&dir)?;

    let overrides = SettingsOverrides { root: args.root, ..Default::default() };
    let settings = load_settings(&dir, &overrides)?;

    // Fail on an unknown template before anything is written.
    let template = match &args.template {
        Some(name) => Some(find_template(name, settings.root.as_deref(), &dir)?),
        None => None,
    };

    write_starter(&dir, settings.root.as_deref())?;

    if let (Some(name), Some(template)) = (&args.template, &template) {
        set_template(&dir.join(CONFIG_FILE), name, Value::Object(template.properties()))?;
    }

    success(format!("Created a new presentation in {}", dir.display()));
    println!("Run `gitshow serve` there to preview it.");
    Ok(())
}

/// Copy `<root>/samples/start` when present, else the built-in starter.
fn write_starter(dir: &Path, root: Option<&Path>) -> Result<()> {
    if let Some(sample) = root.map(|r| r.join("samples").join("start")).filter(|p| p.is_dir()) {
        tracing::debug!("Copying starter from {}", sample.display());
        copy_tree(&sample, dir)?;
        return Ok(());
    }
    fs::write(dir.join(CONFIG_FILE), STARTER_CONFIG)
        .with_context(|| format!("Failed writing {}", dir.join(CONFIG_FILE).display()))?;
    let slides = dir.join("slides.md");
    if !slides.exists() {
        fs::write(&slides, STARTER_SLIDES)
            .with_context(|| format!("Failed writing {}", slides.display()))?;
    }
    Ok(())
}

fn set_template(config_path: &Path, name: &str, properties: Value) -> Result<()> {
    let raw = fs::read_to_string(config_path)
        .with_context(|| format!("Failed reading {}", config_path.display()))?;
    let mut config: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid starter config {}", config_path.display()))?;

    if let Some(object) = config.as_object_mut() {
        let mut template = serde_json::Map::new();
        template.insert("name".into(), Value::from(name));
        template.insert("properties".into(), properties);
        object.insert("template".into(), Value::Object(template));
    }

    fs::write(config_path, serde_json::to_string_pretty(&config)? + "\n")
        .with_context(|| format!("Failed writing {}", config_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_starter_config_is_valid() {
        let config: crate::domain::Presentation =
            serde_json::from_str(STARTER_CONFIG).expect("starter parses");
        assert_eq!(config.contents, ["slides.md"]);
        assert_eq!(config.template_name(), "default");
    }

    #[test]
    fn test_set_template_replaces_block() {
        let tmp = TempDir::new().expect("tmp");
        write_starter(tmp.path(), None).expect("starter");
        let path = tmp.path().join(CONFIG_FILE);
        set_template(&path, "fit", serde_json::json!({"footer": ""})).expect("set");

        let config: Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("parse");
        assert_eq!(config["template"], serde_json::json!({"name": "fit", "properties": {"footer": ""}}));
        assert_eq!(config["title"], "New presentation");
    }
}
