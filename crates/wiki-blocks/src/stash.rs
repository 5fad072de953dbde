//! Extraction and restoration of protected blocks.

use wiki_renderer::escape_html;

use crate::family::{BlockFamily, TOKEN_SUFFIX, TextDirection};
use crate::fence::{ListContext, parse_opening};

/// A captured ```` ```rtl ```` / ```` ```ltr ```` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionBlock {
    pub direction: TextDirection,
    /// Markdown between the fences, with the fence indentation removed.
    pub content: String,
}

/// Result of a restoration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Restoration {
    pub html: String,
    /// Tokens minted by extraction that were not found in the HTML.
    pub unmatched: Vec<String>,
}

/// Blocks captured from one document, indexed by their tokens.
///
/// A stash belongs to a single conversion: create one, extract, convert,
/// restore from the same stash, then drop it.
///
/// # Example
///
/// ```
/// use wiki_blocks::BlockStash;
///
/// let mut stash = BlockStash::new();
/// let markdown = stash.extract("Intro\n\n```mermaid\ngraph TD\n```\n");
/// assert_eq!(markdown, "Intro\n\n%%WIKI_MERMAID_BLOCK_0%%\n\n");
///
/// let html = "<p>Intro</p><p>%%WIKI_MERMAID_BLOCK_0%%</p>";
/// let restored = stash.restore_diagrams(html);
/// assert_eq!(restored.html, "<p>Intro</p><pre class=\"mermaid\">graph TD\n</pre>");
/// assert!(restored.unmatched.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct BlockStash {
    diagrams: Vec<String>,
    directions: Vec<DirectionBlock>,
}

/// What a recognised opening fence captures into.
enum Slot {
    Diagram,
    Direction(TextDirection),
}

impl Slot {
    fn for_language(family: BlockFamily, language: &str) -> Option<Self> {
        match family {
            BlockFamily::Diagram if family.accepts(language) => Some(Self::Diagram),
            BlockFamily::Diagram => None,
            BlockFamily::Direction => TextDirection::from_language(language).map(Self::Direction),
        }
    }
}

impl BlockStash {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured diagram sources, in token order.
    #[must_use]
    pub fn diagrams(&self) -> &[String] {
        &self.diagrams
    }

    /// Captured directional blocks, in token order.
    #[must_use]
    pub fn directions(&self) -> &[DirectionBlock] {
        &self.directions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagrams.len() + self.directions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagrams.is_empty() && self.directions.is_empty()
    }

    /// Replace diagram and directional blocks in `markdown` with tokens.
    #[must_use]
    pub fn extract(&mut self, markdown: &str) -> String {
        let without_diagrams = self.extract_family(markdown, BlockFamily::Diagram);
        self.extract_family(&without_diagrams, BlockFamily::Direction)
    }

    /// Replace every block of `family` with a token on its own line.
    ///
    /// Fences of other languages are copied through untouched, together with
    /// anything nested inside them. A block without a closing fence runs to
    /// the end of the input. A fence indented as code (four columns past the
    /// enclosing list item, or the margin) is left alone.
    #[must_use]
    pub fn extract_family(&mut self, markdown: &str, family: BlockFamily) -> String {
        let mut out = String::with_capacity(markdown.len());
        let mut lines = markdown.split_inclusive('\n');
        let mut last_blank = true;
        let mut lists = ListContext::default();

        while let Some(line) = lines.next() {
            lists.observe(line);
            let Some(fence) = parse_opening(line).filter(|_| lists.allows_fence(line)) else {
                last_blank = line.trim().is_empty();
                out.push_str(line);
                continue;
            };

            let Some(slot) = Slot::for_language(family, fence.language()) else {
                out.push_str(line);
                for inner in lines.by_ref() {
                    out.push_str(inner);
                    if fence.is_closed_by(inner) {
                        break;
                    }
                }
                last_blank = false;
                continue;
            };

            let mut content = String::new();
            for inner in lines.by_ref() {
                if fence.is_closed_by(inner) {
                    break;
                }
                content.push_str(fence.strip_indent(inner));
            }

            let token = self.stash(slot, content);
            // The token must be a paragraph of its own.
            if !last_blank {
                out.push('\n');
            }
            out.push_str(fence.indent);
            out.push_str(&token);
            out.push_str("\n\n");
            last_blank = true;
        }

        out
    }

    fn stash(&mut self, slot: Slot, content: String) -> String {
        match slot {
            Slot::Diagram => {
                self.diagrams.push(content);
                BlockFamily::Diagram.token(self.diagrams.len() - 1)
            }
            Slot::Direction(direction) => {
                self.directions.push(DirectionBlock { direction, content });
                BlockFamily::Direction.token(self.directions.len() - 1)
            }
        }
    }

    /// Put diagram sources back as `<pre class="mermaid">` elements.
    #[must_use]
    pub fn restore_diagrams(&self, html: &str) -> Restoration {
        replace_tokens(html, BlockFamily::Diagram, self.diagrams.len(), |index| {
            let source = self.diagrams.get(index)?;
            Some(format!(
                r#"<pre class="mermaid">{}</pre>"#,
                escape_html(source)
            ))
        })
    }

    /// Put directional blocks back, converting their content with `convert`.
    ///
    /// `convert` receives the block's markdown and returns HTML; it is called
    /// once per token found.
    pub fn restore_directions<F>(&self, html: &str, mut convert: F) -> Restoration
    where
        F: FnMut(&str) -> String,
    {
        replace_tokens(html, BlockFamily::Direction, self.directions.len(), |index| {
            let block = self.directions.get(index)?;
            Some(format!(
                r#"<div class="direction-block" dir="{}">{}</div>"#,
                block.direction.as_str(),
                convert(&block.content)
            ))
        })
    }
}

/// Replace the tokens of `family` in a single pass.
///
/// Markers that do not parse as a token, or name an index with no block, are
/// kept as-is.
fn replace_tokens<F>(html: &str, family: BlockFamily, count: usize, mut render: F) -> Restoration
where
    F: FnMut(usize) -> Option<String>,
{
    if count == 0 {
        return Restoration {
            html: html.to_owned(),
            unmatched: Vec::new(),
        };
    }

    let prefix = family.token_prefix();
    let mut found = vec![false; count];
    let mut result = String::with_capacity(html.len());
    let mut remaining = html;

    while let Some(start) = remaining.find(prefix) {
        let after_prefix = &remaining[start + prefix.len()..];
        let digits = after_prefix.bytes().take_while(u8::is_ascii_digit).count();
        let replacement = if digits > 0 && after_prefix[digits..].starts_with(TOKEN_SUFFIX) {
            after_prefix[..digits]
                .parse::<usize>()
                .ok()
                .and_then(|index| Some((index, render(index)?)))
        } else {
            None
        };

        let Some((index, replacement)) = replacement else {
            result.push_str(&remaining[..start + prefix.len()]);
            remaining = after_prefix;
            continue;
        };

        let mut before = &remaining[..start];
        let mut after = &after_prefix[digits + TOKEN_SUFFIX.len()..];
        // A token alone in a paragraph takes the paragraph with it.
        if let (Some(b), Some(a)) = (before.strip_suffix("<p>"), after.strip_prefix("</p>")) {
            before = b;
            after = a;
        }

        result.push_str(before);
        result.push_str(&replacement);
        if let Some(seen) = found.get_mut(index) {
            *seen = true;
        }
        remaining = after;
    }
    result.push_str(remaining);

    let unmatched = found
        .iter()
        .enumerate()
        .filter(|(_, seen)| !**seen)
        .map(|(index, _)| family.token(index))
        .collect();

    Restoration {
        html: result,
        unmatched,
    }
}
