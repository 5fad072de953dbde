//! Link-list layout.
//!
//! ```text
//! # Team bookmarks
//!
//! ## Tools
//! Everyday services.
//! - [Tracker](https://tracker.example.com) - issues and sprints
//! - [CI](https://ci.example.com)
//! ```
//!
//! `## ` headings open sections; every list item must be a single link,
//! optionally followed by ` - description`. Other lines in a section become
//! its description.

use std::sync::LazyLock;

use regex::Regex;
use wiki_renderer::escape_html;

/// `- [Title](url) - description`
static LINK_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]\(\s*([^)\s]+)\s*\)(?:\s+[-:]\s+(.*))?$").unwrap()
});

/// Error type for link-list rendering.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LinksError {
    /// The document has no link items at all.
    #[error("document contains no links")]
    NoLinks,
    /// A list item is not a `[title](url)` link.
    #[error("line {line}: list item is not a link")]
    MalformedItem { line: usize },
}

/// One link card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkItem {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

/// A titled group of links.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkSection {
    /// Empty for links before the first heading.
    pub title: String,
    pub description: String,
    pub links: Vec<LinkItem>,
}

/// Parsed link page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkPage {
    /// Text of a leading `# ` heading.
    pub title: Option<String>,
    pub sections: Vec<LinkSection>,
}

impl LinkPage {
    /// Parse link-list markdown.
    ///
    /// # Errors
    ///
    /// Returns [`LinksError::MalformedItem`] for a list item that is not a
    /// link, and [`LinksError::NoLinks`] if the page has no links.
    pub fn parse(body: &str) -> Result<Self, LinksError> {
        let mut page = Self::default();
        let mut current = LinkSection::default();

        for (index, line) in body.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            if let Some(title) = trimmed.strip_prefix("## ") {
                let finished = std::mem::replace(
                    &mut current,
                    LinkSection {
                        title: title.trim().to_owned(),
                        ..LinkSection::default()
                    },
                );
                push_section(&mut page, finished);
                continue;
            }

            if let Some(title) = trimmed.strip_prefix("# ")
                && page.title.is_none()
                && page.sections.is_empty()
                && current.links.is_empty()
            {
                page.title = Some(title.trim().to_owned());
                continue;
            }

            if let Some(item) = list_item_text(trimmed) {
                let caps = LINK_ITEM_RE
                    .captures(item)
                    .ok_or(LinksError::MalformedItem { line: index + 1 })?;
                current.links.push(LinkItem {
                    title: caps[1].trim().to_owned(),
                    url: caps[2].to_owned(),
                    description: caps
                        .get(3)
                        .map(|m| m.as_str().trim().to_owned())
                        .filter(|d| !d.is_empty()),
                });
                continue;
            }

            if !current.description.is_empty() {
                current.description.push(' ');
            }
            current.description.push_str(trimmed);
        }
        push_section(&mut page, current);

        if page.sections.iter().all(|s| s.links.is_empty()) {
            return Err(LinksError::NoLinks);
        }
        Ok(page)
    }
}

/// Keep a section unless it is the empty implicit one before the first heading.
fn push_section(page: &mut LinkPage, section: LinkSection) {
    if section.title.is_empty() && section.description.is_empty() && section.links.is_empty() {
        return;
    }
    page.sections.push(section);
}

fn list_item_text(line: &str) -> Option<&str> {
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('+'))?;
    rest.starts_with(char::is_whitespace).then(|| rest.trim())
}

/// Render link-list markdown (frontmatter already removed) to HTML.
///
/// # Errors
///
/// Returns [`LinksError`] if the document is not a valid link list; the
/// caller decides how to fall back.
pub fn render_links(body: &str) -> Result<String, LinksError> {
    let page = LinkPage::parse(body)?;
    let mut out = String::with_capacity(body.len() * 2);

    out.push_str(r#"<div class="links-page">"#);
    if let Some(title) = &page.title {
        out.push_str(&format!(r#"<h1 class="links-title">{}</h1>"#, escape_html(title)));
    }

    for section in &page.sections {
        out.push_str(r#"<section class="links-section">"#);
        if !section.title.is_empty() {
            out.push_str(&format!("<h2>{}</h2>", escape_html(&section.title)));
        }
        if !section.description.is_empty() {
            out.push_str(&format!(
                r#"<p class="links-section-description">{}</p>"#,
                escape_html(&section.description)
            ));
        }

        out.push_str(r#"<div class="links-grid">"#);
        for link in &section.links {
            out.push_str(&format!(
                r#"<a class="link-card" href="{}" target="_blank"><span class="link-title">{}</span>"#,
                escape_html(&link.url),
                escape_html(&link.title)
            ));
            if let Some(description) = &link.description {
                out.push_str(&format!(
                    r#"<span class="link-description">{}</span>"#,
                    escape_html(description)
                ));
            }
            out.push_str("</a>");
        }
        out.push_str("</div></section>");
    }
    out.push_str("</div>");

    Ok(out)
}
