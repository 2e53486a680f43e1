//! Export the content store as JSON data files

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tokio::task::JoinSet;

use super::paths::StaticPaths;
use crate::Blog;

/// Counts of what an export wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub items: usize,
}

/// Write `index.json`, `paths.json` and one `items/<id>.json` per item
pub async fn run(blog: &Blog, out_dir: &Path) -> Result<ExportSummary> {
    let start = std::time::Instant::now();
    let store = blog.store()?;

    let summaries = store.list_summaries_async().await?;
    let paths = store.list_identifiers()?;

    let mut tasks = JoinSet::new();
    for path in &paths {
        let store = store.clone();
        let id = path.id().to_string();
        tasks.spawn(async move { store.get_item_async(&id).await });
    }

    let mut items = Vec::with_capacity(paths.len());
    while let Some(joined) = tasks.join_next().await {
        items.push(joined??);
    }

    // Start from a clean items directory so removed posts disappear
    let items_dir = out_dir.join("items");
    if items_dir.exists() {
        fs::remove_dir_all(&items_dir)
            .with_context(|| format!("Failed to clean {:?}", items_dir))?;
    }
    fs::create_dir_all(&items_dir)?;

    write_json(&out_dir.join("index.json"), &summaries)?;
    write_json(&out_dir.join("paths.json"), &StaticPaths::new(paths))?;
    for item in &items {
        write_json(&items_dir.join(format!("{}.json", item.id)), item)?;
    }

    tracing::info!(
        "Exported {} items to {:?} in {:.2}s",
        items.len(),
        out_dir,
        start.elapsed().as_secs_f64()
    );

    Ok(ExportSummary { items: items.len() })
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    tracing::debug!("Wrote {:?}", path);
    Ok(())
}
