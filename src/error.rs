//! Project-level failures that map to process exit codes

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Presentation config file (presentation.json) already exists in {}. Aborting init.", .0.display())]
    ConfigExists(PathBuf),

    #[error(
        "No presentation config file (presentation.json) found in {}. Use the 'init' command to create an empty presentation.",
        .0.display()
    )]
    ConfigMissing(PathBuf),

    #[error("Couldn't create the destination folder {}. Aborting.", .path.display())]
    DestFolder {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Destination '{dest}' would overwrite the presentation folder {}. Choose a subfolder.",
        .src_dir.display()
    )]
    UnsafeDest { dest: String, src_dir: PathBuf },

    #[error("Couldn't find template {0}.")]
    TemplateNotFound(String),
}

impl ProjectError {
    /// Exit status reported by the CLI.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::ConfigExists(_) => 2,
            Self::ConfigMissing(_) => 3,
            Self::DestFolder { .. } | Self::UnsafeDest { .. } => 4,
            Self::TemplateNotFound(_) => 5,
        }
    }
}
