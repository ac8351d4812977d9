//! Anonymous vizjson documents and their inclusion in page scripts.

use crate::models::{Privacy, Visualization};
use serde::Serialize;

pub const VIZJSON_VERSION: &str = "3.0.0";

/// Client-side description of a visualization as handed to the embed page.
#[derive(Debug, Serialize)]
pub struct VizJson<'a> {
    pub id: &'a str,
    pub version: &'static str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub updated_at: String,
    pub privacy: Privacy,
    pub map_id: Option<&'a str>,
    pub vector: bool,
}

impl<'a> VizJson<'a> {
    pub fn for_visualization(visualization: &'a Visualization, vector: bool) -> Self {
        Self {
            id: &visualization.id,
            version: VIZJSON_VERSION,
            title: &visualization.name,
            description: visualization.description.as_deref(),
            updated_at: visualization.updated_at.to_rfc3339(),
            privacy: visualization.privacy,
            map_id: visualization.map_id.as_deref(),
            vector,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Token list as the page script parses it: `null` when there is nothing to
/// hand out, a JSON array otherwise.
pub fn auth_tokens_json(tokens: &[String]) -> Result<String, serde_json::Error> {
    if tokens.is_empty() {
        Ok("null".to_string())
    } else {
        serde_json::to_string(tokens)
    }
}

/// Escapes `input` for a single-quoted JavaScript string literal inside an
/// inline `<script>` block.
pub fn escape_javascript(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + input.len() / 8);
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                escaped.push_str("\\n");
            }
            '<' if chars.peek() == Some(&'/') => {
                chars.next();
                escaped.push_str("<\\/");
            }
            '\u{2028}' => escaped.push_str("&#x2028;"),
            '\u{2029}' => escaped.push_str("&#x2029;"),
            other => escaped.push(other),
        }
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vizjson_carries_vector_flag() {
        let viz = Visualization::new("owner", "Quakes", Privacy::Public);

        let json = VizJson::for_visualization(&viz, false).to_json().unwrap();
        assert!(json.contains("\"vector\":false"));
        assert!(json.contains("\"title\":\"Quakes\""));
        assert!(json.contains("\"version\":\"3.0.0\""));

        let json = VizJson::for_visualization(&viz, true).to_json().unwrap();
        assert!(json.contains("\"vector\":true"));
    }

    #[test]
    fn test_auth_tokens_json() {
        assert_eq!(auth_tokens_json(&[]).unwrap(), "null");
        assert_eq!(
            auth_tokens_json(&["a".to_string(), "b".to_string()]).unwrap(),
            "[\"a\",\"b\"]"
        );
    }

    #[test]
    fn test_escape_javascript() {
        assert_eq!(escape_javascript(r#"{"vector":false}"#), r#"{\"vector\":false}"#);
        assert_eq!(escape_javascript("it's"), r"it\'s");
        assert_eq!(escape_javascript(r"a\b"), r"a\\b");
        assert_eq!(escape_javascript("a\r\nb\nc\rd"), r"a\nb\nc\nd");
        assert_eq!(escape_javascript("</script>"), r"<\/script>");
        assert_eq!(escape_javascript("a < b"), "a < b");
        assert_eq!(escape_javascript("a\u{2028}b\u{2029}c"), "a&#x2028;b&#x2029;c");
        assert_eq!(escape_javascript("null"), "null");
    }
}
