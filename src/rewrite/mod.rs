//! Slide text rewriting rules
//!
//! Templates configure `reveal.rewrite = { properties, rules }` for the browser
//! rewrite plugin. This module compiles the same rules so the build can reject
//! broken ones early, and applies them to slide markup as a plain string transform.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

pub mod rules;
pub mod slides;

use crate::resolve::{merge_layers, placeholder::string_form};
pub use rules::{translate_replacement, CompiledRule, RewriteError, RuleSpec};
pub use slides::split_markdown;

/// `{{name}}` properties inside a rule result.
static PROPERTY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([a-zA-Z0-9_]+)\}\}").expect("valid regex"));

/// A slide as the rewriter sees it: markup plus the classes of its section.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    pub content: String,
    pub classes: Vec<String>,
    /// Vertical sub-slides; a non-empty list makes this a stack.
    pub children: Vec<Slide>,
}

impl Slide {
    pub fn new(content: impl Into<String>, classes: &[&str]) -> Self {
        Self {
            content: content.into(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            children: Vec::new(),
        }
    }

    pub fn stack(children: Vec<Slide>) -> Self {
        Self { children, ..Self::default() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    rules: Vec<CompiledRule>,
    properties: Map<String, Value>,
}

impl Rewriter {
    /// Build from a `rewrite` block, skipping rules that fail to compile.
    ///
    /// The skipped rules are returned alongside so callers can report them.
    pub fn from_config(config: &Value) -> (Self, Vec<RewriteError>) {
        let properties = match config.get("properties") {
            Some(Value::Object(map)) => map.clone(),
            _ => Map::new(),
        };

        let mut compiled = Vec::new();
        let mut errors = Vec::new();
        let specs = config.get("rules").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
        for (index, raw) in specs.iter().enumerate() {
            let spec = match serde_json::from_value::<RuleSpec>(raw.clone()) {
                Ok(spec) => spec,
                Err(e) => {
                    errors.push(RewriteError::Malformed { index, message: e.to_string() });
                    continue;
                }
            };
            match CompiledRule::compile(index, &spec) {
                Ok(rule) => compiled.push(rule),
                Err(e) => errors.push(e),
            }
        }

        (Self { rules: compiled, properties }, errors)
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    /// Apply every matching rule in order to one slide's markup.
    ///
    /// `slide_props` (slide numbers and the like) are layered over the configured
    /// properties. Unknown `{{name}}` properties expand to nothing.
    pub fn rewrite_slide(&self, content: &str, classes: &[&str], slide_props: &Map<String, Value>) -> String {
        let props = merge_layers([&self.properties, slide_props]);
        let mut content = content.to_string();
        for rule in self.rules.iter().filter(|rule| rule.applies_to(classes)) {
            let groups = rule.regex.captures_len() - 1;
            let target = translate_replacement(&expand_properties(&rule.result, &props), groups);
            if rule.debug {
                tracing::debug!("Before: {}", content);
            }
            content = if rule.global {
                rule.regex.replace_all(&content, target.as_str()).into_owned()
            } else {
                rule.regex.replace(&content, target.as_str()).into_owned()
            };
            if rule.debug {
                tracing::debug!("After: {}", content);
            }
        }
        content
    }

    /// Rewrite a whole deck, numbering slides the way the deck reports them.
    ///
    /// `indexh` counts horizontal positions, `indexv` restarts at 1 inside each
    /// stack, `totalIndex` counts every leaf slide and `totalSlides` is the leaf
    /// count. All are 1-based. Returns the rewritten markup of every leaf slide in
    /// document order.
    pub fn rewrite_deck(&self, slides: &[Slide]) -> Vec<String> {
        let total: usize = slides.iter().map(|s| s.children.len().max(1)).sum();
        let mut out = Vec::with_capacity(total);
        let mut total_index = 1;

        for (h, slide) in slides.iter().enumerate() {
            let leaves: Vec<(usize, &Slide)> = if slide.children.is_empty() {
                vec![(1, slide)]
            } else {
                slide.children.iter().enumerate().map(|(v, s)| (v + 1, s)).collect()
            };
            for (indexv, leaf) in leaves {
                let mut props = Map::new();
                props.insert("indexh".into(), Value::from(h + 1));
                props.insert("indexv".into(), Value::from(indexv));
                props.insert("totalIndex".into(), Value::from(total_index));
                props.insert("totalSlides".into(), Value::from(total));
                let classes: Vec<&str> = leaf.classes.iter().map(String::as_str).collect();
                out.push(self.rewrite_slide(&leaf.content, &classes, &props));
                total_index += 1;
            }
        }
        out
    }
}

fn expand_properties(src: &str, props: &Map<String, Value>) -> String {
    PROPERTY
        .replace_all(src, |caps: &Captures<'_>| props.get(&caps[1]).map(string_form).unwrap_or_default())
        .into_owned()
}

/// Check the `rewrite` block of resolved deck options, returning every rule problem.
pub fn validate(reveal: &Map<String, Value>) -> Vec<RewriteError> {
    match reveal.get("rewrite") {
        Some(config) => Rewriter::from_config(config).1,
        None => Vec::new(),
    }
}
