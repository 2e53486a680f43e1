//! Content module - discovers, parses, renders and orders content items

mod error;
mod frontmatter;
mod item;
mod markdown;
mod sorting;
pub mod store;

pub use error::ContentError;
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use item::{ContentItem, RenderMode, RouteParams, RoutePath};
pub use markdown::{MarkdownRenderer, RenderError, DEFAULT_THEME};
pub use sorting::sort_items;
pub use store::ContentStore;
