//! Presentation config file loading

use crate::domain::Presentation;
use crate::error::ProjectError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "presentation.json";

/// Read and parse `<src_dir>/presentation.json`.
pub fn load_presentation(src_dir: &Path) -> Result<Presentation> {
    let config_file = src_dir.join(CONFIG_FILE);
    if !config_file.is_file() {
        return Err(ProjectError::ConfigMissing(src_dir.to_path_buf()).into());
    }

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let presentation: Presentation = serde_json::from_str(&content)
        .with_context(|| format!("Invalid presentation config: {}", config_file.display()))?;

    if presentation.contents.is_empty() {
        tracing::warn!("{} lists no contents; the presentation will be empty", config_file.display());
    }

    Ok(presentation)
}

/// Fail when `src_dir` already holds a presentation (used before `init`).
pub fn ensure_no_config(src_dir: &Path) -> Result<(), ProjectError> {
    if src_dir.join(CONFIG_FILE).exists() {
        return Err(ProjectError::ConfigExists(src_dir.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_project_error() {
        let tmp = TempDir::new().expect("tmp");
        let err = load_presentation(tmp.path()).expect_err("missing");
        let project = err.downcast_ref::<ProjectError>().expect("project error");
        assert_eq!(project.exit_code(), 3);
    }

    #[test]
    fn test_load_presentation_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"{"title": "Talk", "contents": ["a.md"], "template": {"name": "fit"}}"#,
        )
        .expect("write");

        let cfg = load_presentation(tmp.path()).expect("config");
        assert_eq!(cfg.title, "Talk");
        assert_eq!(cfg.contents, ["a.md"]);
        assert_eq!(cfg.template_name(), "fit");
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(CONFIG_FILE), "{ \"title\": ").expect("write");

        let err = load_presentation(tmp.path()).expect_err("invalid");
        assert!(err.to_string().contains("Invalid presentation config"));
        assert!(err.downcast_ref::<ProjectError>().is_none());
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join(CONFIG_FILE), r#"{"contents": "a.md"}"#).expect("write");
        assert!(load_presentation(tmp.path()).is_err());
    }

    #[test]
    fn test_ensure_no_config() {
        let tmp = TempDir::new().expect("tmp");
        assert!(ensure_no_config(tmp.path()).is_ok());

        fs::write(tmp.path().join(CONFIG_FILE), "{}").expect("write");
        let err = ensure_no_config(tmp.path()).expect_err("exists");
        assert_eq!(err.exit_code(), 2);
    }
}
