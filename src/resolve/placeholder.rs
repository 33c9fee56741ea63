//! `${name}` placeholder substitution over JSON trees

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Property bag consulted during substitution.
pub type Properties = Map<String, Value>;

/// Any `${...}` occurrence; the name runs up to the next `}`.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").expect("valid regex"));

/// A string that is nothing but a single placeholder.
static EXACT_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$\{([^}]*)\}$").expect("valid regex"));

/// Replace every resolvable placeholder in `value`, returning a new tree of the same shape.
///
/// A string consisting of exactly one placeholder is an atomic lookup and takes the
/// property value as-is, so it may become a number, array or object. Placeholders
/// embedded in longer text are replaced by the property's string form. Names missing
/// from `properties` are left verbatim. Object keys are never substituted.
pub fn substitute_placeholders(value: &Value, properties: &Properties) -> Value {
    match value {
        Value::String(s) => substitute_string(s, properties),
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| substitute_placeholders(item, properties)).collect())
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), substitute_placeholders(item, properties)))
                .collect(),
        ),
        Value::Number(_) | Value::Bool(_) | Value::Null => value.clone(),
    }
}

fn substitute_string(s: &str, properties: &Properties) -> Value {
    if let Some(caps) = EXACT_PLACEHOLDER.captures(s) {
        return match properties.get(&caps[1]) {
            Some(replacement) => replacement.clone(),
            None => Value::String(s.to_string()),
        };
    }

    let replaced = PLACEHOLDER.replace_all(s, |caps: &Captures<'_>| match properties.get(&caps[1]) {
        Some(replacement) => string_form(replacement),
        None => caps[0].to_string(),
    });
    Value::String(replaced.into_owned())
}

/// Text used when a property is interpolated into a longer string.
pub fn string_form(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether any string leaf of `value` still carries placeholder syntax.
pub fn has_placeholders(value: &Value) -> bool {
    match value {
        Value::String(s) => PLACEHOLDER.is_match(s),
        Value::Array(items) => items.iter().any(has_placeholders),
        Value::Object(map) => map.values().any(has_placeholders),
        Value::Number(_) | Value::Bool(_) | Value::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(value: Value) -> Properties {
        match value {
            Value::Object(map) => map,
            _ => panic!("properties must be an object"),
        }
    }

    #[test]
    fn placeholder_free_values_are_unchanged() {
        let tree = json!({
            "title": "Intro",
            "width": 1920,
            "center": false,
            "margin": null,
            "contents": ["a.md", "b.md"],
            "nested": {"text": "no $ {placeholders} here", "braces": "{x}"}
        });
        let bag = props(json!({"title": "ignored", "x": "1"}));
        assert_eq!(substitute_placeholders(&tree, &bag), tree);
    }

    #[test]
    fn exact_placeholder_takes_raw_value() {
        let bag = props(json!({
            "footer": "FIT VUT",
            "width": 1280,
            "layout": {"numbering": true},
            "flags": [1, 2]
        }));
        assert_eq!(substitute_placeholders(&json!("${footer}"), &bag), json!("FIT VUT"));
        assert_eq!(substitute_placeholders(&json!("${width}"), &bag), json!(1280));
        assert_eq!(
            substitute_placeholders(&json!("${layout}"), &bag),
            json!({"numbering": true})
        );
        assert_eq!(substitute_placeholders(&json!("${flags}"), &bag), json!([1, 2]));
    }

    #[test]
    fn exact_placeholder_with_unknown_name_is_kept() {
        let bag = props(json!({"other": "x"}));
        assert_eq!(substitute_placeholders(&json!("${theme}"), &bag), json!("${theme}"));
    }

    #[test]
    fn mixed_text_is_interpolated() {
        let bag = props(json!({"x": "1", "y": "2"}));
        assert_eq!(
            substitute_placeholders(&json!("a ${x} b ${y} c"), &bag),
            json!("a 1 b 2 c")
        );
    }

    #[test]
    fn mixed_text_keeps_unknown_names() {
        let bag = props(json!({"x": "1"}));
        assert_eq!(
            substitute_placeholders(&json!("a ${x} b ${y} c"), &bag),
            json!("a 1 b ${y} c")
        );
    }

    #[test]
    fn mixed_text_coerces_non_string_values() {
        let bag = props(json!({"n": 3, "on": true, "none": null, "obj": {"a": 1}}));
        assert_eq!(
            substitute_placeholders(&json!("${n}/${on}/${none}/${obj}"), &bag),
            json!("3/true/null/{\"a\":1}")
        );
    }

    #[test]
    fn adjacent_and_repeated_placeholders() {
        let bag = props(json!({"a": "x", "b": "y"}));
        assert_eq!(substitute_placeholders(&json!("${a}${b}${a}"), &bag), json!("xyx"));
        assert_eq!(
            substitute_placeholders(&json!("template/${a}.css"), &bag),
            json!("template/x.css")
        );
    }

    #[test]
    fn empty_name_is_a_placeholder() {
        let bag = props(json!({"": "blank"}));
        assert_eq!(substitute_placeholders(&json!("${}"), &bag), json!("blank"));
        assert_eq!(substitute_placeholders(&json!("<${}>"), &bag), json!("<blank>"));
    }

    #[test]
    fn containers_keep_shape_and_keys() {
        let tree = json!({
            "${key}": "${value}",
            "list": ["${value}", 7, "plain", ["${missing}"]],
            "inner": {"z": "${value}!", "a": null}
        });
        let bag = props(json!({"key": "renamed", "value": "v"}));
        let out = substitute_placeholders(&tree, &bag);

        assert_eq!(
            out,
            json!({
                "${key}": "v",
                "list": ["v", 7, "plain", ["${missing}"]],
                "inner": {"z": "v!", "a": null}
            })
        );
        let keys: Vec<&str> = out.as_object().expect("object").keys().map(String::as_str).collect();
        assert_eq!(keys, ["${key}", "list", "inner"]);
        let inner_keys: Vec<&str> =
            out["inner"].as_object().expect("object").keys().map(String::as_str).collect();
        assert_eq!(inner_keys, ["z", "a"]);
    }

    #[test]
    fn substitution_is_idempotent() {
        let tree = json!({
            "footer": "${footer} ${unknown}",
            "styles": ["css/theme/${theme}.css", "${missing}"]
        });
        let bag = props(json!({"footer": "Talk", "theme": "sky"}));
        let once = substitute_placeholders(&tree, &bag);
        let twice = substitute_placeholders(&once, &bag);
        assert_eq!(once, twice);
    }

    #[test]
    fn input_tree_is_not_mutated() {
        let tree = json!({"a": "${x}"});
        let bag = props(json!({"x": 1}));
        let _ = substitute_placeholders(&tree, &bag);
        assert_eq!(tree, json!({"a": "${x}"}));
    }

    #[test]
    fn has_placeholders_finds_nested_leaves() {
        assert!(!has_placeholders(&json!({"a": ["b", 1, {"c": "d"}]})));
        assert!(has_placeholders(&json!({"a": ["b", 1, {"c": "x${d}"}]})));
        assert!(!has_placeholders(&json!({"${key}": "value"})));
    }
}
