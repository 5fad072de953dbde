//! Shared state structs for markdown rendering.
//!
//! These structs track context while the renderer walks the event stream.

use std::collections::HashMap;

use pulldown_cmark::{Alignment, CowStr, Event, Tag, TagEnd};

/// State for tracking code block rendering.
#[derive(Default)]
pub(crate) struct CodeBlockState {
    /// Whether we're inside a code block.
    active: bool,
    /// Language of current code block (e.g., "rust", "python").
    language: Option<String>,
    /// Buffer for code block content.
    buffer: String,
}

impl CodeBlockState {
    /// Start a new code block with optional language.
    pub(crate) fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.buffer.clear();
    }

    /// End the current code block and return (language, content).
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.buffer))
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    pub(crate) fn push_newline(&mut self) {
        self.buffer.push('\n');
    }
}

/// State for tracking table rendering.
#[derive(Default)]
pub(crate) struct TableState {
    /// Whether we're inside the table header row.
    in_head: bool,
    /// Column alignments for current table.
    alignments: Vec<Alignment>,
    /// Current column index in table row.
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    /// Get the alignment style for the current cell.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align:left""#,
            Some(Alignment::Center) => r#" style="text-align:center""#,
            Some(Alignment::Right) => r#" style="text-align:right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// State for tracking image alt text capture.
#[derive(Default)]
pub(crate) struct ImageState {
    active: bool,
    alt_text: String,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        self.active = true;
        self.alt_text.clear();
    }

    /// End image capture and return the alt text.
    pub(crate) fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt_text)
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt_text.push_str(text);
    }
}

/// A heading that has been fully collected and is ready to be written.
pub(crate) struct CompletedHeading {
    pub(crate) level: u8,
    pub(crate) id: String,
    pub(crate) classes: Vec<String>,
    pub(crate) html: String,
}

/// State for tracking headings and generating unique anchor ids.
#[derive(Default)]
pub(crate) struct HeadingState {
    /// Current heading level being processed (None if not in a heading).
    current_level: Option<u8>,
    /// Id given with attribute syntax (`## Title {#custom}`).
    explicit_id: Option<String>,
    /// Classes given with attribute syntax (`## Title {.note}`).
    classes: Vec<String>,
    /// Buffer for heading plain text (used for the slug).
    text: String,
    /// Buffer for heading HTML (with inline formatting).
    html: String,
    /// Counter for generating unique heading IDs.
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    pub(crate) fn is_active(&self) -> bool {
        self.current_level.is_some()
    }

    pub(crate) fn start_heading(
        &mut self,
        level: u8,
        explicit_id: Option<String>,
        classes: Vec<String>,
    ) {
        self.current_level = Some(level);
        self.explicit_id = explicit_id;
        self.classes = classes;
        self.text.clear();
        self.html.clear();
    }

    /// Complete the heading being collected.
    ///
    /// Returns `None` if no heading was started.
    pub(crate) fn complete_heading(&mut self) -> Option<CompletedHeading> {
        let level = self.current_level.take()?;
        let text = std::mem::take(&mut self.text);
        let html = std::mem::take(&mut self.html);

        let id = match self.explicit_id.take() {
            Some(id) => {
                // Reserve the explicit id so later generated ids don't collide with it.
                *self.id_counts.entry(id.clone()).or_default() += 1;
                id
            }
            None => self.generate_id(&text),
        };

        Some(CompletedHeading {
            level,
            id,
            classes: std::mem::take(&mut self.classes),
            html,
        })
    }

    /// Generate a unique ID for a heading.
    fn generate_id(&mut self, text: &str) -> String {
        let mut base_id = slugify(text);
        if base_id.is_empty() {
            base_id.push_str("heading");
        }
        let count = self.id_counts.entry(base_id.clone()).or_default();
        let id = match *count {
            0 => base_id,
            n => format!("{base_id}-{n}"),
        };
        *count += 1;
        id
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }
}

/// Child events of a link collected until the link closes.
///
/// The link hook needs the complete display text before anything is written,
/// so the renderer holds the children back and replays them only when the
/// hook asks for it.
pub(crate) struct LinkCapture {
    pub(crate) dest_url: String,
    pub(crate) title: String,
    /// Plain text of all child nodes.
    pub(crate) text: String,
    pub(crate) events: Vec<Event<'static>>,
    /// Links opened inside this one (never produced by `CommonMark`, tracked anyway).
    depth: usize,
}

impl LinkCapture {
    pub(crate) fn new(dest_url: CowStr<'_>, title: CowStr<'_>) -> Self {
        Self {
            dest_url: dest_url.into_string(),
            title: title.into_string(),
            text: String::new(),
            events: Vec::new(),
            depth: 0,
        }
    }

    /// Record a child event.
    ///
    /// Returns `false` when the event closes the captured link; that event is
    /// not recorded.
    pub(crate) fn push(&mut self, event: Event<'_>) -> bool {
        match &event {
            Event::Start(Tag::Link { .. }) => self.depth += 1,
            Event::End(TagEnd::Link) if self.depth == 0 => return false,
            Event::End(TagEnd::Link) => self.depth -= 1,
            Event::Text(text) | Event::Code(text) => self.text.push_str(text),
            _ => {}
        }
        self.events.push(event.into_static());
        true
    }
}

/// Convert text to URL-safe slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single dashes,
/// and removes other non-alphanumeric characters. Non-ASCII letters are kept so
/// headings in right-to-left scripts still get meaningful ids.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
