//! Content store errors

use std::path::PathBuf;
use thiserror::Error;

use super::frontmatter::FrontMatterError;
use super::markdown::RenderError;

/// Failure of a content store operation; no operation returns partial results
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("No content with id '{id}' (expected {})", .path.display())]
    ItemNotFound { id: String, path: PathBuf },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("Failed to render {}: {source}", .path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Content task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ContentError {
    /// Missing directory or missing item
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ContentError::DirectoryNotFound(_) | ContentError::ItemNotFound { .. }
        )
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ContentError::Parse { .. })
    }

    pub fn is_render(&self) -> bool {
        matches!(self, ContentError::Render { .. })
    }
}
