//! Print routing descriptors for the page generator

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::content::RoutePath;
use crate::Blog;

/// Static paths for dynamic routes; every page is known at build time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPaths {
    pub paths: Vec<RoutePath>,
    pub fallback: bool,
}

impl StaticPaths {
    pub fn new(paths: Vec<RoutePath>) -> Self {
        Self {
            paths,
            fallback: false,
        }
    }
}

pub fn run(blog: &Blog) -> Result<()> {
    let paths = StaticPaths::new(blog.store()?.list_identifiers()?);
    println!("{}", serde_json::to_string_pretty(&paths)?);
    Ok(())
}
