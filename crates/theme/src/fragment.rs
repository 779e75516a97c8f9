//! Theme fragments and placeholder substitution.
//!
//! A fragment is an HTML snippet with `{{key}}` placeholders:
//!
//! ```html
//! <header class="navbar"><a href="/">{{store_name}}</a></header>
//! ```
//!
//! Placeholders are filled from a props map at render time. A placeholder
//! with no matching prop is a render error - the slot's author referenced
//! data the page did not supply, which is a real bug rather than a routine
//! miss, and the consumer boundary reports it as such.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Props supplied to a fragment at render time.
pub type Props = serde_json::Map<String, Value>;

/// Regex for matching placeholders.
///
/// Matches: `{{key}}`, with optional interior whitespace.
/// Example: `{{ store_name }}`
static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}").expect("Invalid regex"));

/// Error parsing a fragment's source.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unclosed placeholder starting at byte {0}")]
    UnclosedPlaceholder(usize),
}

/// Error rendering a fragment with a given props map.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no prop supplied for placeholder {{{{{name}}}}}")]
    MissingProp { name: String },
}

/// A parsed theme fragment.
#[derive(Debug)]
pub struct Fragment {
    source: String,
    placeholders: Vec<String>,
}

impl Fragment {
    /// Parse fragment source, collecting its placeholder names.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnclosedPlaceholder`] when a `{{` has no
    /// matching `}}` - the analog of an import-time throw, so the loader
    /// treats it as a load failure and falls back.
    pub fn parse(source: impl Into<String>) -> Result<Self, ParseError> {
        let source = source.into();

        let mut placeholders: Vec<String> = PLACEHOLDER_RE
            .captures_iter(&source)
            .map(|caps| caps[1].to_string())
            .collect();
        placeholders.sort();
        placeholders.dedup();

        // Any `{{` left over after removing well-formed placeholders is
        // an authoring error.
        let stripped = PLACEHOLDER_RE.replace_all(&source, "");
        if let Some(pos) = stripped.find("{{") {
            return Err(ParseError::UnclosedPlaceholder(pos));
        }

        Ok(Self {
            source,
            placeholders,
        })
    }

    /// The distinct placeholder names this fragment references.
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    /// Render the fragment, substituting every placeholder from `props`.
    ///
    /// Values are HTML-escaped; raw markup belongs in the fragment itself,
    /// not in props.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingProp`] if a placeholder has no
    /// matching prop.
    pub fn render(&self, props: &Props) -> Result<String, RenderError> {
        if let Some(name) = self.placeholders.iter().find(|n| !props.contains_key(*n)) {
            return Err(RenderError::MissingProp { name: name.clone() });
        }

        Ok(PLACEHOLDER_RE
            .replace_all(&self.source, |caps: &regex::Captures| {
                // Guarded above: every placeholder has a prop.
                props
                    .get(&caps[1])
                    .map(|value| escape_html(&value_to_display(value)))
                    .unwrap_or_default()
            })
            .into_owned())
    }
}

/// Render a JSON value the way a template author expects: strings bare,
/// everything else in its JSON form.
fn value_to_display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn props(pairs: &[(&str, Value)]) -> Props {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_parse_collects_placeholders() {
        let fragment =
            Fragment::parse("<h1>{{title}}</h1><p>{{ subtitle }}</p><p>{{title}}</p>").unwrap();
        assert_eq!(fragment.placeholders(), ["subtitle", "title"]);
    }

    #[test]
    fn test_parse_rejects_unclosed_placeholder() {
        let err = Fragment::parse("<h1>{{title</h1>").unwrap_err();
        assert!(matches!(err, ParseError::UnclosedPlaceholder(_)));
    }

    #[test]
    fn test_render_substitutes_props() {
        let fragment = Fragment::parse("<a href=\"/\">{{store_name}}</a>").unwrap();
        let html = fragment
            .render(&props(&[("store_name", json!("Acme"))]))
            .unwrap();
        assert_eq!(html, "<a href=\"/\">Acme</a>");
    }

    #[test]
    fn test_render_escapes_values() {
        let fragment = Fragment::parse("<span>{{name}}</span>").unwrap();
        let html = fragment
            .render(&props(&[("name", json!("<script>alert(1)</script>"))]))
            .unwrap();
        assert_eq!(html, "<span>&lt;script&gt;alert(1)&lt;/script&gt;</span>");
    }

    #[test]
    fn test_render_missing_prop_is_an_error() {
        let fragment = Fragment::parse("<h1>{{title}}</h1>").unwrap();
        let err = fragment.render(&Props::new()).unwrap_err();
        assert!(matches!(err, RenderError::MissingProp { name } if name == "title"));
    }

    #[test]
    fn test_render_non_string_values() {
        let fragment = Fragment::parse("{{count}} items").unwrap();
        let html = fragment.render(&props(&[("count", json!(3))])).unwrap();
        assert_eq!(html, "3 items");
    }

    #[test]
    fn test_static_fragment_needs_no_props() {
        let fragment = Fragment::parse("<footer>No placeholders here</footer>").unwrap();
        let html = fragment.render(&Props::new()).unwrap();
        assert_eq!(html, "<footer>No placeholders here</footer>");
    }
}
