//! Presentation templates
//!
//! A template is a `template.json` description plus the files (stylesheets, images)
//! that are staged into `dest/template`. Built-in templates are compiled into the
//! binary; others live in `<root>/templates/<name>` or at an explicit path.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub mod builtin;

use crate::error::ProjectError;
pub use builtin::{builtin, BUILTIN_NAMES};

pub const TEMPLATE_FILE: &str = "template.json";

/// A file shipped inside the binary for a built-in template.
#[derive(Debug, Clone, Copy)]
pub struct EmbeddedFile {
    pub path: &'static str,
    pub contents: &'static str,
}

#[derive(Debug, Clone)]
pub enum TemplateSource {
    Builtin(&'static [EmbeddedFile]),
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    /// The parsed `template.json` tree, placeholders unresolved.
    pub description: Value,
    pub source: TemplateSource,
}

impl Template {
    pub fn from_directory(name: &str, dir: &Path) -> Result<Self> {
        let path = dir.join(TEMPLATE_FILE);
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed reading template description: {}", path.display()))?;
        let description: Value = serde_json::from_str(&content)
            .with_context(|| format!("Invalid template description: {}", path.display()))?;
        Ok(Self {
            name: name.to_string(),
            description,
            source: TemplateSource::Directory(dir.to_path_buf()),
        })
    }

    /// Default property bag declared by the template.
    pub fn properties(&self) -> Map<String, Value> {
        match self.description.get("properties") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        match &self.source {
            TemplateSource::Directory(dir) => Some(dir),
            TemplateSource::Builtin(_) => None,
        }
    }
}

/// Locate the template a presentation asks for.
///
/// Lookup order: `<root>/templates/<reference>`, the built-in of that name, then `reference`
/// as a directory path (relative to the presentation folder unless absolute).
pub fn find_template(reference: &str, root: Option<&Path>, src_dir: &Path) -> Result<Template> {
    if let Some(root) = root {
        let dir = root.join("templates").join(reference);
        if dir.join(TEMPLATE_FILE).is_file() {
            tracing::debug!("Using template {} from {}", reference, dir.display());
            return Template::from_directory(reference, &dir);
        }
    }

    if let Some(template) = builtin(reference) {
        tracing::debug!("Using built-in template {}", reference);
        return Ok(template);
    }

    let candidate = src_dir.join(reference);
    if candidate.join(TEMPLATE_FILE).is_file() {
        let name = candidate.file_name().and_then(|n| n.to_str()).unwrap_or(reference).to_string();
        tracing::debug!("Using template directory {}", candidate.display());
        return Template::from_directory(&name, &candidate);
    }

    Err(ProjectError::TemplateNotFound(candidate.display().to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_template(dir: &Path, description: Value) {
        fs::create_dir_all(dir).expect("mkdir template");
        fs::write(dir.join(TEMPLATE_FILE), description.to_string()).expect("write template");
    }

    #[test]
    fn test_builtin_lookup_without_root() {
        let tmp = TempDir::new().expect("tmp");
        let template = find_template("fit", None, tmp.path()).expect("fit");
        assert_eq!(template.name, "fit");
        assert!(template.directory().is_none());
        assert_eq!(template.properties()["footer"], json!(""));
    }

    #[test]
    fn test_root_template_shadows_builtin() {
        let root = TempDir::new().expect("root");
        let src = TempDir::new().expect("src");
        let dir = root.path().join("templates").join("fit");
        write_template(&dir, json!({"id": "fit", "properties": {"footer": "custom"}}));

        let template = find_template("fit", Some(root.path()), src.path()).expect("fit");
        assert_eq!(template.directory(), Some(dir.as_path()));
        assert_eq!(template.properties()["footer"], json!("custom"));
    }

    #[test]
    fn test_template_by_relative_path() {
        let src = TempDir::new().expect("src");
        write_template(&src.path().join("my-theme"), json!({"styles": ["template/my.css"]}));

        let template = find_template("my-theme", None, src.path()).expect("path template");
        assert_eq!(template.name, "my-theme");
        assert!(template.properties().is_empty());
    }

    #[test]
    fn test_unknown_template_is_reported() {
        let src = TempDir::new().expect("src");
        let err = find_template("nope", None, src.path()).expect_err("missing");
        let project = err.downcast_ref::<ProjectError>().expect("project error");
        assert_eq!(project.exit_code(), 5);
    }

    #[test]
    fn test_invalid_description_is_an_error() {
        let src = TempDir::new().expect("src");
        let dir = src.path().join("broken");
        fs::create_dir_all(&dir).expect("mkdir");
        fs::write(dir.join(TEMPLATE_FILE), "{ not json").expect("write");

        let err = find_template("broken", None, src.path()).expect_err("invalid");
        assert!(err.to_string().contains("Invalid template description"));
    }
}
