//! Configuration resolution
//!
//! Turns a template description, a property bag and the presentation's own
//! overrides into the single configuration tree handed to the slide deck.
//!
//! Resolution is split in two stages that callers can run independently:
//! [`resolve_template`] substitutes `${name}` placeholders, and [`merge_layers`]
//! shallow-merges the resulting layers. [`resolve_presentation`] runs both in the
//! order the build uses.

use serde_json::{json, Map, Value};

pub mod merge;
pub mod placeholder;

use crate::domain::Presentation;
use crate::template::Template;
pub use merge::{as_layer, merge_layers};
pub use placeholder::{has_placeholders, substitute_placeholders, Properties};

/// Substitute `properties` through a template tree. No merging happens here.
pub fn resolve_template(template_tree: &Value, properties: &Properties) -> Value {
    substitute_placeholders(template_tree, properties)
}

/// Deck options applied before any template or presentation layer.
pub fn default_reveal() -> Map<String, Value> {
    as_layer(Some(&json!({ "hash": true })))
}

/// Produce the fully resolved configuration for `presentation` rendered with `template`.
///
/// The property bag is the template's declared defaults overridden by the
/// presentation's `template.properties`. Deck options are layered
/// defaults → resolved template `reveal` → presentation `reveal`. Template styles
/// that still reference unknown properties are dropped, and a presentation that
/// lists its own `styles` replaces them. `usePlugins` falls back to the
/// template's plugin list.
pub fn resolve_presentation(presentation: &Presentation, template: &Template) -> Value {
    let properties = merge_layers(&[template.properties(), presentation.template_properties()]);
    let resolved = resolve_template(&template.description, &properties);

    let reveal = merge_layers(&[
        default_reveal(),
        as_layer(resolved.get("reveal")),
        presentation.reveal.clone(),
    ]);

    let template_styles: Vec<Value> = resolved
        .get("styles")
        .and_then(Value::as_array)
        .map(|styles| {
            styles
                .iter()
                .filter(|style| {
                    let usable = style.is_string() && !has_placeholders(style);
                    if !usable {
                        tracing::debug!("Skipping unresolved template style {}", style);
                    }
                    usable
                })
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    let styles = match presentation.extra.get("styles") {
        Some(own) => own.clone(),
        None => json!(template_styles),
    };

    let plugins = match &presentation.use_plugins {
        Some(plugins) => json!(plugins),
        None => resolved.get("plugins").cloned().unwrap_or_else(|| json!([])),
    };

    let base = match serde_json::to_value(presentation) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    let resolved_layer = as_layer(Some(&json!({
        "template": { "name": template.name, "properties": properties },
        "reveal": reveal,
        "styles": styles,
        "usePlugins": plugins,
    })));

    Value::Object(merge_layers(&[base, resolved_layer]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::builtin;
    use serde_json::json;

    fn presentation(value: Value) -> Presentation {
        serde_json::from_value(value).expect("presentation")
    }

    #[test]
    fn test_resolve_template_only_substitutes() {
        let tree = json!({"reveal": {"footer": "${footer}"}, "keep": "${other}"});
        let bag = as_layer(Some(&json!({"footer": "Course"})));
        assert_eq!(
            resolve_template(&tree, &bag),
            json!({"reveal": {"footer": "Course"}, "keep": "${other}"})
        );
    }

    #[test]
    fn test_fit_footer_flows_into_rewrite_properties() {
        let pres = presentation(json!({
            "title": "Networks",
            "contents": ["a.md"],
            "template": {"name": "fit", "properties": {"footer": "IPK 2024"}}
        }));
        let resolved = resolve_presentation(&pres, &builtin("fit").expect("fit"));

        assert_eq!(resolved["reveal"]["rewrite"]["properties"]["footer"], json!("IPK 2024"));
        assert_eq!(resolved["reveal"]["width"], json!(1920));
        assert_eq!(resolved["template"]["properties"]["footer"], json!("IPK 2024"));
        assert_eq!(resolved["styles"], json!(["css/theme/sky.css", "template/fit.css"]));
    }

    #[test]
    fn test_presentation_reveal_replaces_template_keys_wholesale() {
        let pres = presentation(json!({
            "template": {"name": "fit"},
            "reveal": {"width": 1280, "rewrite": {"rules": []}}
        }));
        let resolved = resolve_presentation(&pres, &builtin("fit").expect("fit"));

        assert_eq!(resolved["reveal"]["width"], json!(1280));
        assert_eq!(resolved["reveal"]["rewrite"], json!({"rules": []}));
        assert_eq!(resolved["reveal"]["height"], json!(1080));
    }

    #[test]
    fn test_reveal_key_order_follows_layers() {
        let pres = presentation(json!({"reveal": {"controls": false, "hash": false}}));
        let resolved = resolve_presentation(&pres, &builtin("default").expect("default"));
        let keys: Vec<&str> =
            resolved["reveal"].as_object().expect("reveal").keys().map(String::as_str).collect();
        assert_eq!(keys, ["hash", "controls"]);
        assert_eq!(resolved["reveal"]["hash"], json!(false));
    }

    #[test]
    fn test_default_theme_and_optional_highlight() {
        let plain = resolve_presentation(&presentation(json!({})), &builtin("default").expect("d"));
        assert_eq!(plain["styles"], json!(["css/theme/white.css"]));

        let themed = presentation(json!({
            "template": {"properties": {"theme": "black", "highlight": "monokai"}}
        }));
        let resolved = resolve_presentation(&themed, &builtin("default").expect("d"));
        assert_eq!(resolved["styles"], json!(["css/theme/black.css", "template/monokai.css"]));
    }

    #[test]
    fn test_presentation_styles_win_over_template() {
        let pres = presentation(json!({"styles": ["my.css"], "template": {"name": "fit"}}));
        let resolved = resolve_presentation(&pres, &builtin("fit").expect("fit"));
        assert_eq!(resolved["styles"], json!(["my.css"]));
        assert_eq!(resolved["reveal"]["width"], json!(1920));

        let keys: Vec<&str> = resolved.as_object().expect("tree").keys().map(String::as_str).collect();
        assert_eq!(keys.iter().filter(|key| **key == "styles").count(), 1);
    }

    #[test]
    fn test_plugins_follow_presentation_then_template() {
        let template = builtin("fit").expect("fit");
        let inherited = resolve_presentation(&presentation(json!({})), &template);
        assert_eq!(
            inherited["usePlugins"],
            json!(["markdown", "highlight", "notes", "rewrite", "references"])
        );

        let chosen = resolve_presentation(&presentation(json!({"usePlugins": ["notes"]})), &template);
        assert_eq!(chosen["usePlugins"], json!(["notes"]));
    }

    #[test]
    fn test_presentation_fields_are_kept() {
        let pres = presentation(json!({
            "id": "talk",
            "title": "Talk",
            "lang": "de",
            "contents": ["one.md", "two.md"],
            "speaker": "someone"
        }));
        let resolved = resolve_presentation(&pres, &builtin("default").expect("d"));
        assert_eq!(resolved["id"], json!("talk"));
        assert_eq!(resolved["title"], json!("Talk"));
        assert_eq!(resolved["lang"], json!("de"));
        assert_eq!(resolved["contents"], json!(["one.md", "two.md"]));
        assert_eq!(resolved["speaker"], json!("someone"));
        assert_eq!(resolved["template"]["name"], json!("default"));
    }
}
