//! Rewrite rule compilation
//!
//! Rules are written for the browser rewrite plugin, so patterns, flags and
//! replacement strings follow JavaScript `RegExp` conventions. They are translated
//! to the `regex` crate here; constructs it cannot express are reported.

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RewriteError {
    #[error("rule {index}: invalid pattern '{pattern}': {message}")]
    InvalidPattern { index: usize, pattern: String, message: String },

    #[error("rule {index}: unsupported flag '{flag}'")]
    UnsupportedFlag { index: usize, flag: char },

    #[error("rule {index}: unsupported selector '{selector}' (only class selectors are understood)")]
    UnsupportedSelector { index: usize, selector: String },

    #[error("rule {index}: {message}")]
    Malformed { index: usize, message: String },
}

/// One entry of `rewrite.rules` as written in the configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RuleSpec {
    #[serde(default)]
    pub pattern: Option<String>,

    #[serde(default)]
    pub result: Option<String>,

    #[serde(default)]
    pub flags: Option<String>,

    /// Slide selector restricting the rule, e.g. `.normal`.
    #[serde(default, rename = "match")]
    pub selector: Option<String>,

    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub regex: Regex,
    /// Replacement text in JavaScript syntax, with `{{name}}` properties unexpanded.
    pub result: String,
    pub global: bool,
    /// Classes a slide must carry for the rule to apply.
    pub classes: Vec<String>,
    pub debug: bool,
}

impl CompiledRule {
    pub fn compile(index: usize, spec: &RuleSpec) -> Result<Self, RewriteError> {
        let (Some(pattern), Some(result)) = (&spec.pattern, &spec.result) else {
            return Err(RewriteError::Malformed {
                index,
                message: "both 'pattern' and 'result' are required".to_string(),
            });
        };

        let mut inline = String::new();
        let mut global = false;
        for flag in spec.flags.as_deref().unwrap_or("").chars() {
            match flag {
                'g' => global = true,
                'i' | 'm' | 's' => inline.push(flag),
                'u' | 'd' => {}
                other => return Err(RewriteError::UnsupportedFlag { index, flag: other }),
            }
        }
        let source =
            if inline.is_empty() { pattern.clone() } else { format!("(?{inline}){pattern}") };
        let regex = Regex::new(&source).map_err(|e| RewriteError::InvalidPattern {
            index,
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let classes = match &spec.selector {
            Some(selector) => parse_class_selector(selector).ok_or_else(|| {
                RewriteError::UnsupportedSelector { index, selector: selector.clone() }
            })?,
            None => Vec::new(),
        };

        Ok(Self { regex, result: result.clone(), global, classes, debug: spec.debug })
    }

    pub fn applies_to(&self, slide_classes: &[&str]) -> bool {
        self.classes.iter().all(|class| slide_classes.contains(&class.as_str()))
    }
}

/// Parse `.a` or `.a.b` into its class names.
fn parse_class_selector(selector: &str) -> Option<Vec<String>> {
    let selector = selector.trim();
    let rest = selector.strip_prefix('.')?;
    let classes: Vec<String> = rest.split('.').map(str::to_string).collect();
    let valid = classes.iter().all(|class| {
        !class.is_empty()
            && class.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    });
    valid.then_some(classes)
}

/// Translate a JavaScript replacement string to `regex` syntax for a pattern with
/// `groups` capture groups.
///
/// `$n` and `$nn` become `${n}` only when that group exists. A two digit reference
/// to a missing group falls back to its first digit. `$&` becomes `${0}` and `$$`
/// stays a literal dollar. Any other `$`, including `$0`, is copied through.
pub fn translate_replacement(js: &str, groups: usize) -> String {
    let digit = |c: char| c.to_digit(10).map(|d| d as usize);
    let mut out = String::with_capacity(js.len());
    let mut chars = js.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some('$') => {
                chars.next();
                out.push_str("$$");
            }
            Some('&') => {
                chars.next();
                out.push_str("${0}");
            }
            Some(first) if first.is_ascii_digit() => {
                chars.next();
                let tens = digit(first).unwrap_or_default();
                let two = chars.peek().copied().and_then(digit).map(|units| tens * 10 + units);
                match two {
                    Some(group) if (1..=groups).contains(&group) => {
                        chars.next();
                        out.push_str(&format!("${{{group}}}"));
                    }
                    _ if (1..=groups).contains(&tens) => out.push_str(&format!("${{{tens}}}")),
                    _ => {
                        out.push_str("$$");
                        out.push(first);
                    }
                }
            }
            _ => out.push_str("$$"),
        }
    }
    out
}
