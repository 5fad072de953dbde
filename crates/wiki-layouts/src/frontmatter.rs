//! Leading YAML metadata block.
//!
//! A document may start with a block delimited by `---` lines:
//!
//! ```text
//! ---
//! layout: kanban
//! title: Sprint 12
//! ---
//! ## Todo
//! ```
//!
//! Only `layout` matters to rendering; every other field is kept as-is for
//! whoever needs it.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Opening and closing delimiter line.
const DELIMITER: &str = "---";

/// Alternative closing delimiter allowed by YAML.
const DOCUMENT_END: &str = "...";

/// Document layout selected by the `layout` field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Regular markdown page.
    #[default]
    Default,
    /// Board of columns and cards.
    Kanban,
    /// Grouped list of link cards.
    Links,
}

impl Layout {
    /// Parse a layout tag. Anything but exactly `kanban` or `links` is the
    /// default layout.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "kanban" => Self::Kanban,
            "links" => Self::Links,
            _ => Self::Default,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Kanban => "kanban",
            Self::Links => "links",
        }
    }
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed frontmatter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    pub layout: Layout,
    /// Page title, if given.
    pub title: Option<String>,
    /// All other fields, untouched.
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(default)]
    layout: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

/// Error type for frontmatter parsing.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    /// YAML parsing error.
    #[error("invalid frontmatter: {0}")]
    Parse(#[from] serde_yaml::Error),
}

impl Metadata {
    /// Parse metadata from the YAML between the delimiters.
    ///
    /// Empty content yields default metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or not a mapping.
    pub fn from_yaml(content: &str) -> Result<Self, FrontmatterError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        let raw: RawMetadata = serde_yaml::from_str(trimmed)?;
        Ok(Self {
            layout: raw.layout.as_deref().map(Layout::from_tag).unwrap_or_default(),
            title: raw.title,
            extra: raw.extra,
        })
    }
}

/// Split a document into its metadata and body.
///
/// Returns `None` and the unchanged text when the document has no metadata
/// block, or when the block is unterminated or malformed.
///
/// # Example
///
/// ```
/// use wiki_layouts::{Layout, split_frontmatter};
///
/// let (metadata, body) = split_frontmatter("---\nlayout: links\n---\n## Tools\n");
/// assert_eq!(metadata.map(|m| m.layout), Some(Layout::Links));
/// assert_eq!(body, "## Tools\n");
///
/// let (metadata, body) = split_frontmatter("# Plain\n");
/// assert!(metadata.is_none());
/// assert_eq!(body, "# Plain\n");
/// ```
#[must_use]
pub fn split_frontmatter(text: &str) -> (Option<Metadata>, &str) {
    let Some((yaml, body)) = find_block(text) else {
        return (None, text);
    };

    match Metadata::from_yaml(yaml) {
        Ok(metadata) => (Some(metadata), body),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed frontmatter");
            (None, text)
        }
    }
}

/// Locate the metadata block, returning (yaml, body).
fn find_block(text: &str) -> Option<(&str, &str)> {
    let rest = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut lines = rest.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for line in lines {
        let trimmed = line.trim_end();
        if trimmed == DELIMITER || trimmed == DOCUMENT_END {
            return Some((&rest[yaml_start..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_frontmatter_returns_original() {
        let text = "# Title\n\nBody\n";
        let (metadata, body) = split_frontmatter(text);
        assert!(metadata.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_kanban_layout() {
        let (metadata, body) = split_frontmatter("---\nlayout: kanban\n---\n## Todo\n");
        let metadata = metadata.unwrap();
        assert_eq!(metadata.layout, Layout::Kanban);
        assert_eq!(body, "## Todo\n");
    }

    #[test]
    fn test_auxiliary_fields_preserved() {
        let (metadata, _) =
            split_frontmatter("---\ntitle: Sprint\nowner: team-a\ntags: [a, b]\n---\n");
        let metadata = metadata.unwrap();
        assert_eq!(metadata.layout, Layout::Default);
        assert_eq!(metadata.title.as_deref(), Some("Sprint"));
        assert_eq!(
            metadata.extra.get("owner"),
            Some(&serde_yaml::Value::String("team-a".to_owned()))
        );
        assert!(metadata.extra.contains_key("tags"));
    }

    #[test]
    fn test_layout_must_match_exactly() {
        assert_eq!(Layout::from_tag("kanban"), Layout::Kanban);
        assert_eq!(Layout::from_tag("Kanban"), Layout::Default);
        assert_eq!(Layout::from_tag("links "), Layout::Default);
        assert_eq!(Layout::from_tag(""), Layout::Default);
    }

    #[test]
    fn test_empty_block_is_present() {
        let (metadata, body) = split_frontmatter("---\n---\nText");
        assert_eq!(metadata, Some(Metadata::default()));
        assert_eq!(body, "Text");
    }

    #[test]
    fn test_unterminated_block_is_absent() {
        let text = "---\nlayout: kanban\n## Todo\n";
        let (metadata, body) = split_frontmatter(text);
        assert!(metadata.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_malformed_yaml_is_absent() {
        let text = "---\nlayout: [kanban\n---\nBody\n";
        let (metadata, body) = split_frontmatter(text);
        assert!(metadata.is_none());
        assert_eq!(body, text);
    }

    #[test]
    fn test_non_mapping_yaml_is_absent() {
        let text = "---\n- a\n- b\n---\nBody\n";
        assert!(split_frontmatter(text).0.is_none());
    }

    #[test]
    fn test_delimiter_must_start_document() {
        let text = "\n---\nlayout: kanban\n---\n";
        assert!(split_frontmatter(text).0.is_none());
    }

    #[test]
    fn test_crlf_and_document_end_marker() {
        let (metadata, body) = split_frontmatter("---\r\nlayout: links\r\n...\r\nBody");
        assert_eq!(metadata.unwrap().layout, Layout::Links);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_byte_order_mark_skipped() {
        let (metadata, body) = split_frontmatter("\u{feff}---\nlayout: kanban\n---\nBody");
        assert_eq!(metadata.unwrap().layout, Layout::Kanban);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_horizontal_rule_later_in_document_is_not_frontmatter() {
        let text = "Intro\n\n---\n\nMore";
        let (metadata, body) = split_frontmatter(text);
        assert!(metadata.is_none());
        assert_eq!(body, text);
    }
}
