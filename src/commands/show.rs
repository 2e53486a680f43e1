//! Show a single content item

use anyhow::Result;

use crate::content::ContentItem;
use crate::Blog;

pub fn run(blog: &Blog, id: &str, json: bool) -> Result<()> {
    let item = blog.store()?.get_item(id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        print!("{}", render_text(&item)?);
    }

    Ok(())
}

/// Metadata as YAML, followed by the HTML or body when loaded
fn render_text(item: &ContentItem) -> Result<String> {
    let mut out = String::new();
    if !item.metadata.is_empty() {
        out.push_str("---\n");
        out.push_str(&serde_yaml::to_string(&item.metadata)?);
        out.push_str("---\n");
    }
    if let Some(content) = item.rendered_html.as_ref().or(item.body.as_ref()) {
        out.push_str(content);
        if !content.ends_with('\n') {
            out.push('\n');
        }
    }
    Ok(out)
}
