//! Presentation configuration model (`presentation.json`)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_TEMPLATE: &str = "default";
pub const DEFAULT_PRESENTATION_ID: &str = "presentation";

/// Typed view of a presentation's `presentation.json`.
///
/// Keys the tool does not interpret are kept in `extra` and forwarded untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub title: String,

    #[serde(default = "default_lang")]
    pub lang: String,

    /// Slide sources, relative to the presentation folder unless absolute.
    #[serde(default)]
    pub contents: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateRef>,

    /// Overrides for the slide-deck library.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub reveal: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_plugins: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `template` block of a presentation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TemplateRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub properties: Map<String, Value>,
}

fn default_lang() -> String {
    "en".to_string()
}

impl Presentation {
    /// Base name for generated archives and PDFs.
    pub fn id(&self) -> &str {
        self.id.as_deref().filter(|id| !id.is_empty()).unwrap_or(DEFAULT_PRESENTATION_ID)
    }

    pub fn template_name(&self) -> &str {
        self.template
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_TEMPLATE)
    }

    /// Properties the presentation passes to its template.
    pub fn template_properties(&self) -> Map<String, Value> {
        self.template.as_ref().map(|t| t.properties.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_minimal_config() {
        let cfg: Presentation = serde_json::from_value(json!({"title": "Talk"})).expect("parse");
        assert_eq!(cfg.title, "Talk");
        assert_eq!(cfg.lang, "en");
        assert_eq!(cfg.id(), "presentation");
        assert_eq!(cfg.template_name(), "default");
        assert!(cfg.contents.is_empty());
        assert!(cfg.use_plugins.is_none());
    }

    #[test]
    fn test_recognised_keys_and_extras() {
        let cfg: Presentation = serde_json::from_value(json!({
            "id": "lecture-01",
            "title": "Lecture",
            "lang": "cs",
            "contents": ["intro.md", "/abs/outro.md"],
            "template": {"name": "fit", "properties": {"footer": "FIT"}},
            "reveal": {"controls": false},
            "usePlugins": ["rewrite"],
            "author": "R. B."
        }))
        .expect("parse");

        assert_eq!(cfg.id(), "lecture-01");
        assert_eq!(cfg.template_name(), "fit");
        assert_eq!(cfg.template_properties()["footer"], json!("FIT"));
        assert_eq!(cfg.reveal["controls"], json!(false));
        assert_eq!(cfg.use_plugins.as_deref(), Some(&["rewrite".to_string()][..]));
        assert_eq!(cfg.extra["author"], json!("R. B."));

        let back = serde_json::to_value(&cfg).expect("serialize");
        assert_eq!(back["usePlugins"], json!(["rewrite"]));
        assert_eq!(back["author"], json!("R. B."));
    }

    #[test]
    fn test_empty_template_name_falls_back_to_default() {
        let cfg: Presentation =
            serde_json::from_value(json!({"template": {"name": ""}})).expect("parse");
        assert_eq!(cfg.template_name(), "default");
    }
}
