//! Document metadata and alternate document layouts.
//!
//! - [`split_frontmatter`]: separate the leading YAML block from the body
//! - [`KanbanRenderer`]: board of columns and cards (`layout: kanban`)
//! - [`render_links`]: grouped link cards (`layout: links`)

mod frontmatter;
mod kanban;
mod links;

pub use frontmatter::{FrontmatterError, Layout, Metadata, split_frontmatter};
pub use kanban::{Board, Card, Column, KanbanRenderer, Subtask, Transform};
pub use links::{LinkItem, LinkPage, LinkSection, LinksError, render_links};
