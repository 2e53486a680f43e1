//! CLI commands

pub mod export;
pub mod list;
pub mod paths;
pub mod show;
