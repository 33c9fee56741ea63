//! Markdown deck splitting

use once_cell::sync::Lazy;
use regex::Regex;

use super::Slide;

static HORIZONTAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n---\r?\n").expect("valid regex"));
static VERTICAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r?\n--\r?\n").expect("valid regex"));
static SLIDE_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<!--\s*\.slide:[^>]*?class="([^"]*)"[^>]*-->"#).expect("valid regex")
});

/// Split a markdown deck on `---` (horizontal) and `--` (vertical) separator lines.
///
/// Slide classes come from `<!-- .slide: class="..." -->` annotations.
pub fn split_markdown(source: &str) -> Vec<Slide> {
    HORIZONTAL
        .split(source)
        .map(|section| {
            let mut children: Vec<Slide> = VERTICAL.split(section).map(leaf).collect();
            if children.len() == 1 {
                children.remove(0)
            } else {
                Slide::stack(children)
            }
        })
        .collect()
}

fn leaf(content: &str) -> Slide {
    let classes: Vec<&str> = SLIDE_CLASS
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .flat_map(|m| m.as_str().split_whitespace())
        .collect();
    Slide::new(content, &classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_horizontal_and_vertical() {
        let deck = split_markdown("# One\n---\n# Two\n--\n## Two b\n---\n# Three");
        assert_eq!(deck.len(), 3);
        assert_eq!(deck[0].content, "# One");
        assert!(deck[0].children.is_empty());
        assert_eq!(deck[1].children.len(), 2);
        assert_eq!(deck[1].children[1].content, "## Two b");
        assert_eq!(deck[2].content, "# Three");
    }

    #[test]
    fn test_dashes_inside_text_do_not_split() {
        let deck = split_markdown("a --- b\nc -- d");
        assert_eq!(deck.len(), 1);
        assert_eq!(deck[0].content, "a --- b\nc -- d");
    }

    #[test]
    fn test_slide_classes() {
        let deck = split_markdown("<!-- .slide: class=\"title dark\" -->\n# Hi");
        assert_eq!(deck[0].classes, ["title", "dark"]);
    }
}
