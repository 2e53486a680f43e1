//! Content store - indexes and loads items from a flat content directory

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::task::JoinSet;
use walkdir::WalkDir;

use super::sorting::sort_items;
use super::{ContentError, ContentItem, FrontMatter, MarkdownRenderer, RenderMode, RoutePath};

/// Default content file extension
pub const DEFAULT_EXTENSION: &str = "md";

/// A content file found during enumeration
#[derive(Debug, Clone)]
struct Entry {
    id: String,
    path: PathBuf,
}

/// What `get_item` loads besides metadata
#[derive(Clone)]
enum Expansion {
    None,
    RawBody,
    Html(Arc<MarkdownRenderer>),
}

/// Read-only view over a directory of content files.
///
/// Every call re-reads the directory; nothing is cached between calls.
#[derive(Clone)]
pub struct ContentStore {
    root: PathBuf,
    suffix: String,
    expansion: Expansion,
}

impl ContentStore {
    /// Create a store over `root` that loads raw bodies for `.md` files
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: suffix_for(DEFAULT_EXTENSION),
            expansion: Expansion::RawBody,
        }
    }

    /// Use a different content extension, with or without the leading dot
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.suffix = suffix_for(extension);
        self
    }

    /// Select which fields `get_item` populates
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.expansion = match (mode, self.expansion) {
            (RenderMode::None, _) => Expansion::None,
            (RenderMode::RawBody, _) => Expansion::RawBody,
            (RenderMode::RenderedHtml, Expansion::Html(renderer)) => Expansion::Html(renderer),
            (RenderMode::RenderedHtml, _) => Expansion::Html(Arc::new(MarkdownRenderer::new())),
        };
        self
    }

    /// Render full items to HTML with the given renderer
    pub fn with_renderer(mut self, renderer: MarkdownRenderer) -> Self {
        self.expansion = Expansion::Html(Arc::new(renderer));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mode(&self) -> RenderMode {
        match self.expansion {
            Expansion::None => RenderMode::None,
            Expansion::RawBody => RenderMode::RawBody,
            Expansion::Html(_) => RenderMode::RenderedHtml,
        }
    }

    /// Derive an item id from a file name, or `None` if the file is not content
    pub fn id_from_file_name<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        file_name
            .strip_suffix(self.suffix.as_str())
            .filter(|id| !id.is_empty())
    }

    /// All items with metadata only, sorted by `(date, title)`
    pub fn list_summaries(&self) -> Result<Vec<ContentItem>, ContentError> {
        let mut items = self
            .entries()?
            .iter()
            .map(|entry| self.load_summary(entry))
            .collect::<Result<Vec<_>, _>>()?;

        sort_items(&mut items);
        tracing::debug!("Listed {} items from {:?}", items.len(), self.root);
        Ok(items)
    }

    /// One routing descriptor per content file, in directory order
    pub fn list_identifiers(&self) -> Result<Vec<RoutePath>, ContentError> {
        Ok(self
            .entries()?
            .into_iter()
            .map(|entry| RoutePath::new(entry.id))
            .collect())
    }

    /// Load one item with the fields selected by the store's mode
    pub fn get_item(&self, id: &str) -> Result<ContentItem, ContentError> {
        let path = self.root.join(format!("{}{}", id, self.suffix));
        if !is_plain_id(id) {
            return Err(ContentError::ItemNotFound {
                id: id.to_string(),
                path,
            });
        }
        if !self.root.is_dir() {
            return Err(ContentError::DirectoryNotFound(self.root.clone()));
        }
        if !path.is_file() {
            return Err(ContentError::ItemNotFound {
                id: id.to_string(),
                path,
            });
        }

        let entry = Entry {
            id: id.to_string(),
            path,
        };
        self.load_full(&entry)
    }

    /// Same as [`list_summaries`](Self::list_summaries), parsing each file on
    /// the blocking pool and sorting once the whole batch has finished
    pub async fn list_summaries_async(&self) -> Result<Vec<ContentItem>, ContentError> {
        let entries = self.entries()?;

        let mut tasks = JoinSet::new();
        for entry in entries {
            let store = self.clone();
            tasks.spawn_blocking(move || store.load_summary(&entry));
        }

        let mut items = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            // Returning early drops the set, which aborts the remaining tasks
            items.push(joined??);
        }

        sort_items(&mut items);
        tracing::debug!("Listed {} items from {:?}", items.len(), self.root);
        Ok(items)
    }

    /// Same as [`get_item`](Self::get_item), run on the blocking pool
    pub async fn get_item_async(&self, id: &str) -> Result<ContentItem, ContentError> {
        let store = self.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || store.get_item(&id)).await?
    }

    /// Enumerate content files in the root, in directory order
    fn entries(&self) -> Result<Vec<Entry>, ContentError> {
        if !self.root.is_dir() {
            return Err(ContentError::DirectoryNotFound(self.root.clone()));
        }

        let mut entries = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
        {
            let entry = entry.map_err(|e| ContentError::Io {
                path: e.path().map_or_else(|| self.root.clone(), Path::to_path_buf),
                source: io::Error::from(e),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str() else {
                tracing::debug!("Skipping non UTF-8 file name {:?}", entry.path());
                continue;
            };

            match self.id_from_file_name(file_name) {
                Some(id) => entries.push(Entry {
                    id: id.to_string(),
                    path: entry.path().to_path_buf(),
                }),
                None => tracing::debug!("Skipping non-content file {:?}", entry.path()),
            }
        }

        Ok(entries)
    }

    fn read(&self, entry: &Entry) -> Result<String, ContentError> {
        let bytes = fs::read(&entry.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ContentError::ItemNotFound {
                id: entry.id.clone(),
                path: entry.path.clone(),
            },
            _ => ContentError::Io {
                path: entry.path.clone(),
                source: e,
            },
        })?;

        String::from_utf8(bytes).map_err(|e| ContentError::Parse {
            path: entry.path.clone(),
            source: e.into(),
        })
    }

    fn parse<'c>(
        &self,
        entry: &Entry,
        content: &'c str,
    ) -> Result<(FrontMatter, &'c str), ContentError> {
        FrontMatter::parse(content).map_err(|source| ContentError::Parse {
            path: entry.path.clone(),
            source,
        })
    }

    fn load_summary(&self, entry: &Entry) -> Result<ContentItem, ContentError> {
        let content = self.read(entry)?;
        let (metadata, _) = self.parse(entry, &content)?;
        Ok(ContentItem::summary(entry.id.clone(), metadata))
    }

    fn load_full(&self, entry: &Entry) -> Result<ContentItem, ContentError> {
        let content = self.read(entry)?;
        let (metadata, body) = self.parse(entry, &content)?;

        let mut item = ContentItem::summary(entry.id.clone(), metadata);
        match &self.expansion {
            Expansion::None => {}
            Expansion::RawBody => item.body = Some(body.to_string()),
            Expansion::Html(renderer) => {
                let html = renderer.render(body).map_err(|source| ContentError::Render {
                    path: entry.path.clone(),
                    source,
                })?;
                item.rendered_html = Some(html);
            }
        }

        tracing::debug!("Loaded {} ({})", item.id, self.mode());
        Ok(item)
    }
}

fn suffix_for(extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() {
        String::new()
    } else {
        format!(".{}", extension)
    }
}

/// An id that can only name a file directly inside the root
fn is_plain_id(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0'])
}
