//! Generic markdown renderer with pluggable backend.

use std::collections::HashMap;
use std::fmt::Write;
use std::marker::PhantomData;
use std::sync::Arc;

use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream,
};

use crate::backend::{AlertKind, RenderBackend};
use crate::engine::ConvertError;
use crate::link::{LinkNode, LinkRenderer, WalkStatus};
use crate::state::{CodeBlockState, HeadingState, ImageState, LinkCapture, TableState, escape_html};
use crate::util::{heading_level_to_num, linkify};

/// Generic markdown renderer with pluggable backend.
///
/// Uses the [`RenderBackend`] trait to delegate format-specific rendering
/// while handling common elements (tables, lists, inline formatting) generically.
///
/// # Link hook
///
/// A [`LinkRenderer`] installed with [`with_link_renderer`](Self::with_link_renderer)
/// takes over emission of inline and reference links. Without one, links are
/// written as plain `<a href="...">` anchors.
pub struct MarkdownRenderer<B: RenderBackend> {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    pending_image: Option<(String, String)>,
    link_renderer: Option<Arc<dyn LinkRenderer>>,
    /// Link currently being collected for the hook.
    link_capture: Option<LinkCapture>,
    /// Open links written directly (autolinks, or every link without a hook).
    direct_links: usize,
    /// Replaying a captured link's children inside the hook's anchor.
    replaying_link: bool,
    footnote_numbers: HashMap<String, usize>,
    hard_wraps: bool,
    linkify: bool,
    /// Stack of alert kinds for nested blockquotes (regular blockquote uses None).
    alert_stack: Vec<Option<AlertKind>>,
    _backend: PhantomData<B>,
}

impl<B: RenderBackend> MarkdownRenderer<B> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            pending_image: None,
            link_renderer: None,
            link_capture: None,
            direct_links: 0,
            replaying_link: false,
            footnote_numbers: HashMap::new(),
            hard_wraps: false,
            linkify: false,
            alert_stack: Vec::new(),
            _backend: PhantomData,
        }
    }

    /// Install a hook that owns emission of link nodes.
    #[must_use]
    pub fn with_link_renderer(mut self, renderer: Arc<dyn LinkRenderer>) -> Self {
        self.link_renderer = Some(renderer);
        self
    }

    /// Render single newlines inside paragraphs as line breaks.
    #[must_use]
    pub fn with_hard_wraps(mut self, enabled: bool) -> Self {
        self.hard_wraps = enabled;
        self
    }

    /// Turn bare `http(s)://` and `www.` URLs in text into anchors.
    #[must_use]
    pub fn with_linkify(mut self, enabled: bool) -> Self {
        self.linkify = enabled;
        self
    }

    /// Parser options used by [`render_markdown`](Self::render_markdown).
    ///
    /// Tables, strikethrough, footnotes, definition lists, heading attributes
    /// and the GFM superset (alerts) are enabled. Task list syntax is left to
    /// preprocessing.
    #[must_use]
    pub fn parser_options() -> Options {
        Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM
    }

    /// Render markdown text using [`parser_options`](Self::parser_options).
    ///
    /// Adjacent text events are merged first, so linkify sees URLs the
    /// parser split at escapes, entities or brackets.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the event stream is inconsistent or writing fails.
    pub fn render_markdown(&mut self, markdown: &str) -> Result<String, ConvertError> {
        self.render(TextMergeStream::new(Parser::new_ext(
            markdown,
            Self::parser_options(),
        )))
    }

    /// Render markdown events and return the HTML.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the event stream is inconsistent or writing fails.
    pub fn render<'a, I>(&mut self, events: I) -> Result<String, ConvertError>
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event)?;
        }

        if self.link_capture.is_some() || self.direct_links != 0 {
            return Err(ConvertError::UnbalancedLink);
        }

        Ok(std::mem::take(&mut self.output))
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    fn process_event(&mut self, event: Event<'_>) -> Result<(), ConvertError> {
        if let Some(capture) = self.link_capture.as_mut() {
            if !capture.push(event) {
                let capture = self.link_capture.take().ok_or(ConvertError::UnbalancedLink)?;
                self.emit_captured_link(capture)?;
            }
            return Ok(());
        }

        match event {
            Event::Start(tag) => self.start_tag(tag)?,
            Event::End(tag) => self.end_tag(tag)?,
            Event::Text(text) => self.text(&text)?,
            Event::Code(code) => self.inline_code(&code)?,
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.hard_break(),
            Event::Rule => B::horizontal_rule(&mut self.output),
            Event::TaskListMarker(_) => {
                // Task lists are rewritten before parsing; the parser option is off.
            }
            Event::FootnoteReference(label) => {
                let number = self.footnote_number(&label);
                let mut html = String::new();
                B::footnote_reference(&label, number, &mut html)?;
                self.push_inline(&html);
            }
            Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Math is typeset client-side; the parser option is off.
            }
        }
        Ok(())
    }

    /// Write a link collected for the hook.
    fn emit_captured_link(&mut self, capture: LinkCapture) -> Result<(), ConvertError> {
        let Some(hook) = self.link_renderer.clone() else {
            return Err(ConvertError::UnbalancedLink);
        };
        let node = LinkNode {
            dest_url: &capture.dest_url,
            title: &capture.title,
            text: &capture.text,
        };

        let mut html = String::new();
        let status = hook.enter(&node, &mut html)?;
        self.push_inline(&html);

        match status {
            WalkStatus::Continue => {
                self.replaying_link = true;
                let replayed = capture
                    .events
                    .iter()
                    .cloned()
                    .try_for_each(|event| self.process_event(event));
                self.replaying_link = false;
                replayed?;
            }
            WalkStatus::SkipChildren => {
                if self.heading.is_active() {
                    self.heading.push_text(&capture.text);
                }
            }
        }

        let mut html = String::new();
        hook.leave(&node, &mut html)?;
        self.push_inline(&html);
        Ok(())
    }

    fn footnote_number(&mut self, label: &str) -> usize {
        let next = self.footnote_numbers.len() + 1;
        *self
            .footnote_numbers
            .entry(label.to_owned())
            .or_insert(next)
    }

    fn start_tag(&mut self, tag: Tag<'_>) -> Result<(), ConvertError> {
        match tag {
            Tag::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading {
                level, id, classes, ..
            } => {
                // Opening tag is written in end_tag once the id is known.
                self.heading.start_heading(
                    heading_level_to_num(level),
                    id.map(CowStr::into_string),
                    classes.into_iter().map(CowStr::into_string).collect(),
                );
            }
            Tag::BlockQuote(kind) => {
                if let Some(bq_kind) = kind {
                    let alert_kind = AlertKind::from(bq_kind);
                    self.alert_stack.push(Some(alert_kind));
                    B::alert_start(alert_kind, &mut self.output)?;
                } else {
                    self.alert_stack.push(None);
                    B::blockquote_start(&mut self.output);
                }
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) => info
                        .split_whitespace()
                        .next()
                        .map(ToOwned::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#)?,
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => self.output.push_str("<li>"),
            Tag::FootnoteDefinition(label) => {
                let number = self.footnote_number(&label);
                B::footnote_definition_start(&label, number, &mut self.output)?;
            }
            Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.output.push_str("<dl>"),
            Tag::DefinitionListTitle => self.output.push_str("<dt>"),
            Tag::DefinitionListDefinition => self.output.push_str("<dd>"),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>")?;
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<del>"),
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => match link_type {
                LinkType::Autolink | LinkType::Email => {
                    let href = if link_type == LinkType::Email {
                        format!("mailto:{dest_url}")
                    } else {
                        dest_url.into_string()
                    };
                    self.direct_links += 1;
                    let tag = format!(r#"<a href="{}">"#, escape_html(&href));
                    self.push_inline(&tag);
                }
                _ if self.link_renderer.is_some() => {
                    self.link_capture = Some(LinkCapture::new(dest_url, title));
                }
                _ => {
                    self.direct_links += 1;
                    let tag = format!(r#"<a href="{}">"#, escape_html(&dest_url));
                    self.push_inline(&tag);
                }
            },
            Tag::Image {
                dest_url, title, ..
            } => {
                // Start collecting alt text; image will be rendered in end_tag
                self.image.start();
                self.pending_image = Some((dest_url.into_string(), title.into_string()));
            }
        }
        Ok(())
    }

    fn end_tag(&mut self, tag: TagEnd) -> Result<(), ConvertError> {
        match tag {
            TagEnd::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("</p>");
                }
            }
            TagEnd::Heading(_level) => {
                if let Some(heading) = self.heading.complete_heading() {
                    let level = heading.level;
                    let class_attr = if heading.classes.is_empty() {
                        String::new()
                    } else {
                        format!(r#" class="{}""#, escape_html(&heading.classes.join(" ")))
                    };
                    write!(
                        self.output,
                        r#"<h{level} id="{}"{class_attr}>{}</h{level}>"#,
                        escape_html(&heading.id),
                        heading.html.trim()
                    )?;
                }
            }
            TagEnd::BlockQuote(_) => match self.alert_stack.pop() {
                Some(Some(alert_kind)) => B::alert_end(alert_kind, &mut self.output),
                _ => B::blockquote_end(&mut self.output),
            },
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                B::code_block(lang.as_deref(), &content, &mut self.output)?;
            }
            TagEnd::List(ordered) => {
                self.output
                    .push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => self.output.push_str("</li>"),
            TagEnd::FootnoteDefinition => B::footnote_definition_end(&mut self.output),
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => {
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    let mut html = String::new();
                    B::image(&src, &alt, &title, &mut html)?;
                    self.push_inline(&html);
                }
            }
            TagEnd::DefinitionList => self.output.push_str("</dl>"),
            TagEnd::DefinitionListTitle => self.output.push_str("</dt>"),
            TagEnd::DefinitionListDefinition => self.output.push_str("</dd>"),
            TagEnd::Table => self.output.push_str("</tbody></table>"),
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => self.output.push_str("</tr>"),
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</del>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
            TagEnd::Link => {
                self.direct_links = self
                    .direct_links
                    .checked_sub(1)
                    .ok_or(ConvertError::UnbalancedLink)?;
                self.push_inline("</a>");
            }
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<(), ConvertError> {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else {
            if self.heading.is_active() {
                self.heading.push_text(text);
            }
            let mut html = String::with_capacity(text.len());
            if self.linkify && self.direct_links == 0 && !self.replaying_link {
                linkify(text, &mut html)?;
            } else {
                html.push_str(&escape_html(text));
            }
            self.push_inline(&html);
        }
        Ok(())
    }

    fn inline_code(&mut self, code: &str) -> Result<(), ConvertError> {
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        let html = format!("<code>{}</code>", escape_html(code));
        self.push_inline(&html);
        Ok(())
    }

    fn raw_html(&mut self, html: &str) {
        self.push_inline(html);
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else if self.hard_wraps {
            let mut html = String::new();
            B::hard_break(&mut html);
            self.push_inline(&html);
        } else {
            self.push_inline("\n");
        }
    }

    fn hard_break(&mut self) {
        let mut html = String::new();
        B::hard_break(&mut html);
        self.push_inline(&html);
    }
}

impl<B: RenderBackend> Default for MarkdownRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtmlBackend;
    use crate::link::PdfLinkRenderer;
    use pretty_assertions::assert_eq;

    fn render_html(markdown: &str) -> String {
        MarkdownRenderer::<HtmlBackend>::new()
            .render_markdown(markdown)
            .unwrap()
    }

    fn render_with_hook(markdown: &str) -> String {
        MarkdownRenderer::<HtmlBackend>::new()
            .with_link_renderer(Arc::new(PdfLinkRenderer))
            .render_markdown(markdown)
            .unwrap()
    }

    #[test]
    fn test_html_basic_paragraph() {
        assert_eq!(render_html("Hello, world!"), "<p>Hello, world!</p>");
    }

    #[test]
    fn test_html_heading_with_id() {
        assert_eq!(
            render_html("## Section Title"),
            r#"<h2 id="section-title">Section Title</h2>"#
        );
    }

    #[test]
    fn test_heading_attributes() {
        assert_eq!(
            render_html("## Setup {#install .wide}"),
            r#"<h2 id="install" class="wide">Setup</h2>"#
        );
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let html = render_html("## FAQ\n\n## FAQ\n\n## FAQ");
        assert!(html.contains(r#"<h2 id="faq">"#));
        assert!(html.contains(r#"<h2 id="faq-1">"#));
        assert!(html.contains(r#"<h2 id="faq-2">"#));
    }

    #[test]
    fn test_heading_with_inline_code() {
        assert_eq!(
            render_html("## Install `npm`"),
            r#"<h2 id="install-npm">Install <code>npm</code></h2>"#
        );
    }

    #[test]
    fn test_heading_slug_includes_link_text() {
        assert_eq!(
            render_with_hook("## See [docs](https://example.com)"),
            r#"<h2 id="see-docs">See <a href="https://example.com" target="_blank">docs</a></h2>"#
        );
    }

    #[test]
    fn test_html_code_block() {
        let html = render_html("```rust\nfn main() {}\n```");
        assert_eq!(
            html,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"
        );
    }

    #[test]
    fn test_code_block_with_fence_attributes_uses_first_word() {
        let html = render_html("```python title=x\npass\n```");
        assert!(html.contains(r#"class="language-python""#));
    }

    #[test]
    fn test_note_alert() {
        let html = render_html("> [!NOTE]\n> This is a **note**.");
        assert!(html.contains("alert-note"));
        assert!(html.contains("<strong>note</strong>"));
    }

    #[test]
    fn test_regular_blockquote_unchanged() {
        let html = render_html("> Just a regular quote");
        assert!(html.contains("<blockquote>"));
        assert!(!html.contains("alert"));
    }

    #[test]
    fn test_html_image() {
        assert_eq!(
            render_html("![Alt text](image.png)"),
            r#"<p><img src="image.png" alt="Alt text"></p>"#
        );
    }

    #[test]
    fn test_html_table() {
        let html = render_html("| A | B |\n|:--|--:|\n| 1 | 2 |");
        assert_eq!(
            html,
            concat!(
                "<table><thead><tr>",
                r#"<th style="text-align:left">A</th><th style="text-align:right">B</th>"#,
                "</tr></thead><tbody><tr>",
                r#"<td style="text-align:left">1</td><td style="text-align:right">2</td>"#,
                "</tr></tbody></table>"
            )
        );
    }

    #[test]
    fn test_strikethrough() {
        assert_eq!(render_html("~~deleted~~"), "<p><del>deleted</del></p>");
    }

    #[test]
    fn test_definition_list() {
        let html = render_html("Term\n: Definition");
        assert!(html.contains("<dl><dt>Term</dt><dd>Definition"));
        assert!(html.ends_with("</dd></dl>"));
    }

    #[test]
    fn test_footnotes() {
        let html = render_html("Text[^a].\n\n[^a]: The note.");
        assert!(html.contains(
            r##"<sup class="footnote-ref"><a href="#fn-a" id="fnref-a">1</a></sup>"##
        ));
        assert!(html.contains(r#"<div class="footnote-definition" id="fn-a">"#));
        assert!(html.contains("The note."));
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            render_html("- Item 1\n- Item 2"),
            "<ul><li>Item 1</li><li>Item 2</li></ul>"
        );
        assert_eq!(
            render_html("3. Third\n4. Fourth"),
            r#"<ol start="3"><li>Third</li><li>Fourth</li></ol>"#
        );
    }

    #[test]
    fn test_task_list_syntax_is_plain_text() {
        assert_eq!(render_html("- [ ] todo"), "<ul><li>[ ] todo</li></ul>");
    }

    #[test]
    fn test_soft_break_without_hard_wraps() {
        assert_eq!(render_html("one\ntwo"), "<p>one\ntwo</p>");
    }

    #[test]
    fn test_hard_wraps() {
        let html = MarkdownRenderer::<HtmlBackend>::new()
            .with_hard_wraps(true)
            .render_markdown("one\ntwo")
            .unwrap();
        assert_eq!(html, "<p>one<br>\ntwo</p>");
    }

    #[test]
    fn test_raw_html_passthrough() {
        assert_eq!(
            render_html("<div class=\"x\">raw</div>\n\nText <span>inline</span>"),
            "<div class=\"x\">raw</div>\n<p>Text <span>inline</span></p>"
        );
    }

    #[test]
    fn test_links_without_hook_are_plain_anchors() {
        assert_eq!(
            render_html("[x](/api/files/a/b.pdf)"),
            r#"<p><a href="/api/files/a/b.pdf">x</a></p>"#
        );
    }

    #[test]
    fn test_hook_rewrites_pdf_link() {
        assert_eq!(
            render_with_hook("[x](/api/files/foo/bar.PDF)"),
            r#"<p><a href="/foo?mode=pdf&file=bar.PDF">x</a></p>"#
        );
    }

    #[test]
    fn test_hook_standard_link_targets_new_tab() {
        assert_eq!(
            render_with_hook("[x](https://example.com/doc.pdf)"),
            r#"<p><a href="https://example.com/doc.pdf" target="_blank">x</a></p>"#
        );
    }

    #[test]
    fn test_hook_suppresses_children_markup() {
        // Children are replaced by the captured plain text.
        assert_eq!(
            render_with_hook("[**bold** `code`](https://example.com)"),
            r#"<p><a href="https://example.com" target="_blank">bold code</a></p>"#
        );
    }

    #[test]
    fn test_reference_links_use_hook() {
        assert_eq!(
            render_with_hook("[Manual][m]\n\n[m]: /api/files/docs/manual.pdf"),
            r#"<p><a href="/docs?mode=pdf&file=manual.pdf">Manual</a></p>"#
        );
    }

    #[test]
    fn test_autolink_bypasses_hook() {
        assert_eq!(
            render_with_hook("<https://example.com/a.pdf>"),
            r#"<p><a href="https://example.com/a.pdf">https://example.com/a.pdf</a></p>"#
        );
    }

    #[test]
    fn test_email_autolink() {
        assert_eq!(
            render_with_hook("<team@example.com>"),
            r#"<p><a href="mailto:team@example.com">team@example.com</a></p>"#
        );
    }

    struct DecoratingHook;

    impl LinkRenderer for DecoratingHook {
        fn enter(
            &self,
            link: &LinkNode<'_>,
            out: &mut String,
        ) -> Result<WalkStatus, std::fmt::Error> {
            write!(out, r#"<a class="wiki" href="{}">"#, escape_html(link.dest_url))?;
            Ok(WalkStatus::Continue)
        }

        fn leave(&self, _link: &LinkNode<'_>, out: &mut String) -> std::fmt::Result {
            out.push_str("</a>");
            Ok(())
        }
    }

    #[test]
    fn test_hook_continue_replays_children() {
        let html = MarkdownRenderer::<HtmlBackend>::new()
            .with_link_renderer(Arc::new(DecoratingHook))
            .render_markdown("[*em* text](/page)")
            .unwrap();
        assert_eq!(
            html,
            r#"<p><a class="wiki" href="/page"><em>em</em> text</a></p>"#
        );
    }

    #[test]
    fn test_hook_continue_does_not_nest_linkified_anchors() {
        let html = MarkdownRenderer::<HtmlBackend>::new()
            .with_link_renderer(Arc::new(DecoratingHook))
            .with_linkify(true)
            .render_markdown("[see https://example.com](/page)")
            .unwrap();
        assert_eq!(
            html,
            r#"<p><a class="wiki" href="/page">see https://example.com</a></p>"#
        );
    }

    #[test]
    fn test_linkify_bare_urls() {
        let html = MarkdownRenderer::<HtmlBackend>::new()
            .with_linkify(true)
            .render_markdown("Go to https://example.com now")
            .unwrap();
        assert_eq!(
            html,
            r#"<p>Go to <a href="https://example.com">https://example.com</a> now</p>"#
        );
    }

    #[test]
    fn test_linkify_sees_whole_text_runs() {
        let linkified = |markdown: &str| {
            MarkdownRenderer::<HtmlBackend>::new()
                .with_linkify(true)
                .render_markdown(markdown)
                .unwrap()
        };
        assert_eq!(
            linkified("https://en.wikipedia.org/wiki/Rust_(programming_language)"),
            concat!(
                r#"<p><a href="https://en.wikipedia.org/wiki/Rust_(programming_language)">"#,
                "https://en.wikipedia.org/wiki/Rust_(programming_language)</a></p>"
            )
        );
        assert_eq!(
            linkified("https://e.com/q?x=1&amp;y=2"),
            r#"<p><a href="https://e.com/q?x=1&amp;y=2">https://e.com/q?x=1&amp;y=2</a></p>"#
        );
        assert_eq!(
            linkified(r"https://e.com/path\_x"),
            r#"<p><a href="https://e.com/path_x">https://e.com/path_x</a></p>"#
        );
    }

    #[test]
    fn test_linkify_skips_code() {
        let html = MarkdownRenderer::<HtmlBackend>::new()
            .with_linkify(true)
            .render_markdown("`https://example.com`")
            .unwrap();
        assert_eq!(html, "<p><code>https://example.com</code></p>");
    }

    #[test]
    fn test_unbalanced_link_end_is_an_error() {
        let events = vec![
            Event::Start(Tag::Paragraph),
            Event::End(TagEnd::Link),
            Event::End(TagEnd::Paragraph),
        ];
        let result = MarkdownRenderer::<HtmlBackend>::new().render(events.into_iter());
        assert!(matches!(result, Err(ConvertError::UnbalancedLink)));
    }

    #[test]
    fn test_unclosed_captured_link_is_an_error() {
        let events = vec![
            Event::Start(Tag::Link {
                link_type: LinkType::Inline,
                dest_url: "/a".into(),
                title: "".into(),
                id: "".into(),
            }),
            Event::Text("a".into()),
        ];
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_link_renderer(Arc::new(PdfLinkRenderer))
            .render(events.into_iter());
        assert!(matches!(result, Err(ConvertError::UnbalancedLink)));
    }
}
