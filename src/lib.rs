//! posts-rs: Markdown post indexing and rendering for static blogs
//!
//! This crate reads a flat directory of Markdown files with front-matter,
//! and hands a page generator sorted summaries, routing descriptors and
//! fully rendered items.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ContentStore, MarkdownRenderer, RenderMode};

/// Name of the optional configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A blog rooted at a base directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Content directory
    pub content_dir: PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Blog from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);

        Self {
            config,
            base_dir,
            content_dir,
        }
    }

    /// Build the content store described by the configuration
    pub fn store(&self) -> Result<ContentStore> {
        let store = ContentStore::new(&self.content_dir).with_extension(&self.config.extension);

        let store = match self.config.render_mode {
            RenderMode::RenderedHtml => {
                let highlight = &self.config.highlight;
                let renderer =
                    MarkdownRenderer::with_options(&highlight.theme, highlight.line_number)?
                        .strict_languages(highlight.strict_languages);
                store.with_renderer(renderer)
            }
            mode => store.with_mode(mode),
        };

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.content_dir, dir.path().join("posts"));
        assert_eq!(blog.store().unwrap().mode(), RenderMode::RenderedHtml);
    }

    #[test]
    fn test_config_file_drives_store() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "content_dir: articles\nrender_mode: none\n",
        )
        .unwrap();
        fs::create_dir(dir.path().join("articles")).unwrap();
        fs::write(dir.path().join("articles/one.md"), "---\ntitle: One\n---\nbody").unwrap();

        let blog = Blog::new(dir.path()).unwrap();
        let store = blog.store().unwrap();
        assert_eq!(store.root(), dir.path().join("articles"));

        let item = store.get_item("one").unwrap();
        assert!(item.is_summary());
        assert_eq!(item.title(), Some("One".to_string()));
    }

    #[test]
    fn test_unknown_theme_fails_store() {
        let mut config = config::SiteConfig::default();
        config.highlight.theme = "nope".to_string();
        let blog = Blog::with_config("/tmp", config);
        assert!(blog.store().is_err());
    }
}
