//! Kanban board layout.
//!
//! ```text
//! Intro paragraph, rendered above the board.
//!
//! ## Todo
//! - [ ] Write release notes
//!   - [x] Collect changes
//! - Plain card
//!
//! ## Done
//! - [x] Ship it
//! ```
//!
//! Each `## ` heading opens a column, top-level list items are cards, and
//! indented list items are subtasks of the card above them. The markup of
//! every piece of text goes through the renderer's cell pipeline:
//! preprocessors, conversion, post-processors.

use std::sync::LazyLock;

use regex::Regex;
use wiki_blocks::FenceTracker;
use wiki_renderer::{escape_html, slugify};

/// `- [ ] text`, `* [x] text`, `+ text`, with leading indentation.
static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)[-*+]\s+(?:\[([ xX])\](?:\s+|$))?(.*)$").unwrap()
});

/// A text-to-text stage of the cell pipeline.
pub type Transform<'a> = Box<dyn Fn(&str) -> String + 'a>;

/// Parsed board.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    /// Markdown before the first column.
    pub intro: String,
    pub columns: Vec<Column>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    /// Markdown between the heading and the first card.
    pub description: String,
    pub cards: Vec<Card>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Card {
    /// Card markdown, continuation lines included.
    pub text: String,
    /// `None` for a plain list item, otherwise the checkbox state.
    pub checked: Option<bool>,
    pub subtasks: Vec<Subtask>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Subtask {
    pub text: String,
    pub checked: Option<bool>,
}

impl Board {
    /// Parse board markdown. Parsing never fails; lines that fit nowhere else
    /// are kept as text of the nearest preceding element.
    #[must_use]
    pub fn parse(body: &str) -> Self {
        let mut board = Self::default();
        let mut fences = FenceTracker::new();
        // Content column of the current card; fenced lines lose this much indent.
        let mut card_indent = 0;

        for line in body.lines() {
            let in_fence = fences.update(line) || fences.in_fence();

            if !in_fence && let Some(title) = line.strip_prefix("## ") {
                board.columns.push(Column {
                    title: title.trim().trim_end_matches('#').trim_end().to_owned(),
                    ..Column::default()
                });
                continue;
            }

            let Some(column) = board.columns.last_mut() else {
                push_line(&mut board.intro, line);
                continue;
            };

            if !in_fence && let Some(caps) = LIST_ITEM_RE.captures(line) {
                let indent = caps.get(1).map_or(0, |m| m.as_str().len());
                let checked = caps.get(2).map(|m| m.as_str() != " ");
                let text = caps.get(3).map_or("", |m| m.as_str()).trim().to_owned();

                match column.cards.last_mut() {
                    Some(card) if indent > 0 => card.subtasks.push(Subtask { text, checked }),
                    _ => {
                        let after_marker = &line[indent + 1..];
                        card_indent =
                            indent + 1 + after_marker.len() - after_marker.trim_start().len();
                        column.cards.push(Card {
                            text,
                            checked,
                            subtasks: Vec::new(),
                        });
                    }
                }
                continue;
            }

            match column.cards.last_mut() {
                Some(card) if in_fence => {
                    push_line(&mut card.text, strip_indent(line, card_indent));
                }
                Some(card) if !line.trim().is_empty() => push_line(&mut card.text, line.trim()),
                Some(_) => {}
                None => push_line(&mut column.description, line),
            }
        }

        board
    }
}

fn strip_indent(line: &str, width: usize) -> &str {
    let spaces = line.bytes().take(width).take_while(|&b| b == b' ').count();
    &line[spaces..]
}

fn push_line(buffer: &mut String, line: &str) {
    if !buffer.is_empty() {
        buffer.push('\n');
    }
    buffer.push_str(line);
}

/// Board renderer.
///
/// `convert` turns cell markdown into HTML. Preprocessors run on each cell
/// before it, post-processors on its output, both in the order they were added.
pub struct KanbanRenderer<'a> {
    preprocessors: Vec<Transform<'a>>,
    convert: Transform<'a>,
    postprocessors: Vec<Transform<'a>>,
}

impl<'a> KanbanRenderer<'a> {
    #[must_use]
    pub fn new(convert: impl Fn(&str) -> String + 'a) -> Self {
        Self {
            preprocessors: Vec::new(),
            convert: Box::new(convert),
            postprocessors: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_preprocessor(mut self, transform: impl Fn(&str) -> String + 'a) -> Self {
        self.preprocessors.push(Box::new(transform));
        self
    }

    #[must_use]
    pub fn with_postprocessor(mut self, transform: impl Fn(&str) -> String + 'a) -> Self {
        self.postprocessors.push(Box::new(transform));
        self
    }

    /// Render board markdown (frontmatter already removed) to HTML.
    #[must_use]
    pub fn render(&self, body: &str) -> String {
        let board = Board::parse(body);
        let mut out = String::with_capacity(body.len() * 2);

        out.push_str(r#"<div class="kanban-board">"#);
        if !board.intro.trim().is_empty() {
            out.push_str(r#"<div class="kanban-intro">"#);
            out.push_str(&self.render_cell(&board.intro));
            out.push_str("</div>");
        }
        for column in &board.columns {
            self.render_column(column, &mut out);
        }
        out.push_str("</div>");

        out
    }

    fn render_column(&self, column: &Column, out: &mut String) {
        out.push_str(&format!(
            r#"<div class="kanban-column" data-column="{}"><div class="kanban-column-header"><h3>{}</h3><span class="kanban-count">{}</span></div>"#,
            escape_html(&slugify(&column.title)),
            escape_html(&column.title),
            column.cards.len()
        ));
        if !column.description.trim().is_empty() {
            out.push_str(r#"<div class="kanban-column-description">"#);
            out.push_str(&self.render_cell(&column.description));
            out.push_str("</div>");
        }

        out.push_str(r#"<div class="kanban-cards">"#);
        for card in &column.cards {
            let class = if card.checked == Some(true) {
                "kanban-card kanban-card-done"
            } else {
                "kanban-card"
            };
            out.push_str(&format!(r#"<div class="{class}">"#));
            push_checkbox(card.checked, out);
            out.push_str(r#"<div class="kanban-card-content">"#);
            out.push_str(&self.render_cell(&card.text));
            out.push_str("</div>");

            if !card.subtasks.is_empty() {
                out.push_str(r#"<ul class="kanban-subtasks">"#);
                for subtask in &card.subtasks {
                    let class = if subtask.checked == Some(true) {
                        "kanban-subtask kanban-subtask-done"
                    } else {
                        "kanban-subtask"
                    };
                    out.push_str(&format!(r#"<li class="{class}">"#));
                    push_checkbox(subtask.checked, out);
                    out.push_str(&self.render_cell(&subtask.text));
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            out.push_str("</div>");
        }
        out.push_str("</div></div>");
    }

    /// Run one piece of text through the cell pipeline.
    fn render_cell(&self, markdown: &str) -> String {
        let prepared = self
            .preprocessors
            .iter()
            .fold(markdown.to_owned(), |text, transform| transform(&text));
        let html = (self.convert)(&prepared);
        self.postprocessors
            .iter()
            .fold(html, |text, transform| transform(&text))
    }
}

fn push_checkbox(checked: Option<bool>, out: &mut String) {
    match checked {
        Some(true) => out.push_str(r#"<input type="checkbox" class="kanban-checkbox" checked disabled>"#),
        Some(false) => out.push_str(r#"<input type="checkbox" class="kanban-checkbox" disabled>"#),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn paragraph(markdown: &str) -> String {
        format!("<p>{}</p>", markdown.trim())
    }

    #[test]
    fn test_parse_columns_cards_and_subtasks() {
        let board = Board::parse(
            "Intro text\n\n## Todo\n- [ ] Write notes\n  - [x] Collect changes\n  - Ask team\n- Plain card\n\n## Done ##\n* [X] Ship it\n",
        );

        assert_eq!(board.intro, "Intro text\n");
        assert_eq!(board.columns.len(), 2);

        let todo = &board.columns[0];
        assert_eq!(todo.title, "Todo");
        assert_eq!(todo.cards.len(), 2);
        assert_eq!(todo.cards[0].text, "Write notes");
        assert_eq!(todo.cards[0].checked, Some(false));
        assert_eq!(
            todo.cards[0].subtasks,
            vec![
                Subtask {
                    text: "Collect changes".to_owned(),
                    checked: Some(true),
                },
                Subtask {
                    text: "Ask team".to_owned(),
                    checked: None,
                },
            ]
        );
        assert_eq!(todo.cards[1].checked, None);

        let done = &board.columns[1];
        assert_eq!(done.title, "Done");
        assert_eq!(done.cards[0].checked, Some(true));
        assert_eq!(done.cards[0].text, "Ship it");
    }

    #[test]
    fn test_parse_continuation_and_description() {
        let board = Board::parse("## Doing\nWork in progress.\n- Card\n  more details\n");
        let column = &board.columns[0];
        assert_eq!(column.description, "Work in progress.");
        assert_eq!(column.cards[0].text, "Card\nmore details");
    }

    #[test]
    fn test_parse_keeps_card_code_verbatim() {
        let board = Board::parse(
            "## Col\n- [ ] Card\n  ```mermaid\n  graph TD\n\n      A-->B\n  ```\n\n  after\n",
        );
        assert_eq!(
            board.columns[0].cards[0].text,
            "Card\n```mermaid\ngraph TD\n\n    A-->B\n```\nafter"
        );
    }

    #[test]
    fn test_parse_ignores_headings_inside_fences() {
        let board = Board::parse("```\n## not a column\n```\n## Real\n");
        assert_eq!(board.columns.len(), 1);
        assert_eq!(board.columns[0].title, "Real");
        assert!(board.intro.contains("## not a column"));
    }

    #[test]
    fn test_render_board() {
        let html = KanbanRenderer::new(paragraph).render("## To Do\n- [ ] Task\n- [x] Done task\n");
        assert_eq!(
            html,
            concat!(
                r#"<div class="kanban-board">"#,
                r#"<div class="kanban-column" data-column="to-do"><div class="kanban-column-header"><h3>To Do</h3><span class="kanban-count">2</span></div>"#,
                r#"<div class="kanban-cards">"#,
                r#"<div class="kanban-card"><input type="checkbox" class="kanban-checkbox" disabled><div class="kanban-card-content"><p>Task</p></div></div>"#,
                r#"<div class="kanban-card kanban-card-done"><input type="checkbox" class="kanban-checkbox" checked disabled><div class="kanban-card-content"><p>Done task</p></div></div>"#,
                "</div></div></div>"
            )
        );
    }

    #[test]
    fn test_render_intro_and_subtasks() {
        let html = KanbanRenderer::new(paragraph).render("Hello\n## A\n- Card\n  - [x] Sub\n");
        assert!(html.starts_with(r#"<div class="kanban-board"><div class="kanban-intro"><p>Hello</p></div>"#));
        assert!(html.contains(
            r#"<ul class="kanban-subtasks"><li class="kanban-subtask kanban-subtask-done"><input type="checkbox" class="kanban-checkbox" checked disabled><p>Sub</p></li></ul>"#
        ));
    }

    #[test]
    fn test_cell_pipeline_order() {
        let html = KanbanRenderer::new(|md: &str| format!("<{md}>"))
            .with_preprocessor(|md: &str| format!("{md}1"))
            .with_preprocessor(|md: &str| format!("{md}2"))
            .with_postprocessor(|html: &str| format!("{html}3"))
            .with_postprocessor(|html: &str| format!("{html}4"))
            .render("## Col\n- x\n");
        assert!(html.contains(r#"<div class="kanban-card-content"><x12>34</div>"#));
    }

    #[test]
    fn test_titles_are_escaped() {
        let html = KanbanRenderer::new(paragraph).render("## <b>Q&A</b>\n");
        assert!(html.contains("<h3>&lt;b&gt;Q&amp;A&lt;/b&gt;</h3>"));
    }

    #[test]
    fn test_empty_board() {
        assert_eq!(
            KanbanRenderer::new(paragraph).render(""),
            r#"<div class="kanban-board"></div>"#
        );
    }
}
