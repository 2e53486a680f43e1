//! List content summaries

use anyhow::Result;

use crate::content::ContentItem;
use crate::Blog;

/// List all items, oldest first
pub fn run(blog: &Blog, json: bool) -> Result<()> {
    let items = blog.store()?.list_summaries()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    println!("Posts ({}):", items.len());
    for item in &items {
        println!("  {}", summary_line(item));
    }

    Ok(())
}

fn summary_line(item: &ContentItem) -> String {
    format!(
        "{} - {} [{}]",
        item.date().unwrap_or_else(|| "(no date)".to_string()),
        item.title().unwrap_or_else(|| "Untitled".to_string()),
        item.id
    )
}
