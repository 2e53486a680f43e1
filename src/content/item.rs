//! Content item models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::FrontMatter;

/// Which fields a full item carries besides its metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Metadata only
    None,
    /// Metadata plus the raw Markdown body
    RawBody,
    /// Metadata plus the body rendered to HTML
    #[default]
    RenderedHtml,
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(RenderMode::None),
            "raw" | "raw_body" | "raw-body" => Ok(RenderMode::RawBody),
            "html" | "rendered_html" | "rendered-html" => Ok(RenderMode::RenderedHtml),
            other => Err(format!(
                "Unknown render mode: {}. Available: none, raw_body, rendered_html",
                other
            )),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderMode::None => "none",
            RenderMode::RawBody => "raw_body",
            RenderMode::RenderedHtml => "rendered_html",
        })
    }
}

/// A single addressable piece of content, e.g. a blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// File name with the content extension stripped
    pub id: String,

    /// Header fields, passed through as written
    pub metadata: FrontMatter,

    /// Raw markdown content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Rendered HTML content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered_html: Option<String>,
}

impl ContentItem {
    /// Create an item carrying only metadata
    pub fn summary(id: impl Into<String>, metadata: FrontMatter) -> Self {
        Self {
            id: id.into(),
            metadata,
            body: None,
            rendered_html: None,
        }
    }

    pub fn title(&self) -> Option<String> {
        self.metadata.title()
    }

    pub fn date(&self) -> Option<String> {
        self.metadata.date()
    }

    /// True when neither body nor HTML was loaded
    pub fn is_summary(&self) -> bool {
        self.body.is_none() && self.rendered_html.is_none()
    }
}

/// Route parameters for one generated page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParams {
    pub id: String,
}

/// Routing descriptor, shaped as `{ "params": { "id": ... } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePath {
    pub params: RouteParams,
}

impl RoutePath {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            params: RouteParams { id: id.into() },
        }
    }

    pub fn id(&self) -> &str {
        &self.params.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_mode_from_str() {
        assert_eq!("none".parse::<RenderMode>(), Ok(RenderMode::None));
        assert_eq!("raw".parse::<RenderMode>(), Ok(RenderMode::RawBody));
        assert_eq!("rendered_html".parse::<RenderMode>(), Ok(RenderMode::RenderedHtml));
        assert!("markdown".parse::<RenderMode>().is_err());
        assert_eq!(RenderMode::default(), RenderMode::RenderedHtml);
        assert_eq!(RenderMode::RawBody.to_string(), "raw_body");
    }

    #[test]
    fn test_summary_serialization_omits_content() {
        let mut metadata = FrontMatter::default();
        metadata.insert("title", "Hello");
        metadata.insert("date", "2021-01-01");
        let item = ContentItem::summary("hello-world", metadata);

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "hello-world",
                "metadata": { "title": "Hello", "date": "2021-01-01" }
            })
        );
        assert!(item.is_summary());
    }

    #[test]
    fn test_rendered_html_key_is_camel_case() {
        let mut item = ContentItem::summary("a", FrontMatter::default());
        item.rendered_html = Some("<p>x</p>".to_string());
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""renderedHtml":"<p>x</p>""#));
    }

    #[test]
    fn test_route_path_shape() {
        let json = serde_json::to_value(RoutePath::new("first-post")).unwrap();
        assert_eq!(json, serde_json::json!({ "params": { "id": "first-post" } }));
    }
}
