//! Configuration loading
//!
//! Two sources: the presentation's own `presentation.json`, and the tool settings
//! layered with figment (defaults < `gitshow.toml` < `GITSHOW_*` env < CLI).

pub mod loader;
pub mod settings;

pub use loader::{ensure_no_config, load_presentation, CONFIG_FILE};
pub use settings::{load_settings, SettingsOverrides, ToolSettings};
