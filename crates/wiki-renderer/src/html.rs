//! HTML backend for markdown rendering.
//!
//! Produces semantic HTML5 output suitable for web display.

use std::fmt::Write;

use crate::backend::{AlertKind, RenderBackend};
use crate::state::escape_html;

/// HTML render backend.
///
/// Produces semantic HTML5 with:
/// - `<pre><code>` for code blocks
/// - `<blockquote>` for blockquotes, `<div class="alert">` for GitHub alerts
/// - `<img>` for images
/// - `<sup>` references and `<div>` definitions for footnotes
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) -> std::fmt::Result {
        if let Some(lang) = lang {
            write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
        } else {
            write!(out, "<pre><code>{}</code></pre>", escape_html(content))
        }
    }

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    fn alert_start(kind: AlertKind, out: &mut String) -> std::fmt::Result {
        let (class, title) = match kind {
            AlertKind::Note => ("note", "Note"),
            AlertKind::Tip => ("tip", "Tip"),
            AlertKind::Important => ("important", "Important"),
            AlertKind::Warning => ("warning", "Warning"),
            AlertKind::Caution => ("caution", "Caution"),
        };
        write!(
            out,
            r#"<div class="alert alert-{class}"><div class="alert-title">{title}</div><div class="alert-content">"#
        )
    }

    fn alert_end(_kind: AlertKind, out: &mut String) {
        out.push_str("</div></div>");
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) -> std::fmt::Result {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        write!(
            out,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        )
    }

    fn footnote_reference(label: &str, number: usize, out: &mut String) -> std::fmt::Result {
        let label = escape_html(label);
        write!(
            out,
            r##"<sup class="footnote-ref"><a href="#fn-{label}" id="fnref-{label}">{number}</a></sup>"##
        )
    }

    fn footnote_definition_start(
        label: &str,
        number: usize,
        out: &mut String,
    ) -> std::fmt::Result {
        write!(
            out,
            r#"<div class="footnote-definition" id="fn-{}"><sup class="footnote-definition-label">{number}</sup>"#,
            escape_html(label)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("rust"), "fn main() {}", &mut out).unwrap();
        assert_eq!(
            out,
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let mut out = String::new();
        HtmlBackend::code_block(None, "a < b", &mut out).unwrap();
        assert_eq!(out, "<pre><code>a &lt; b</code></pre>");
    }

    #[test]
    fn test_blockquote() {
        let mut out = String::new();
        HtmlBackend::blockquote_start(&mut out);
        out.push_str("content");
        HtmlBackend::blockquote_end(&mut out);
        assert_eq!(out, "<blockquote>content</blockquote>");
    }

    #[test]
    fn test_image_with_title() {
        let mut out = String::new();
        HtmlBackend::image("image.png", "Alt text", "Image title", &mut out).unwrap();
        assert_eq!(
            out,
            r#"<img src="image.png" title="Image title" alt="Alt text">"#
        );
    }

    #[test]
    fn test_alert_warning() {
        let mut out = String::new();
        HtmlBackend::alert_start(AlertKind::Warning, &mut out).unwrap();
        out.push_str("<p>careful</p>");
        HtmlBackend::alert_end(AlertKind::Warning, &mut out);
        assert!(out.starts_with(r#"<div class="alert alert-warning">"#));
        assert!(out.contains(r#"<div class="alert-title">Warning</div>"#));
        assert!(out.ends_with("<p>careful</p></div></div>"));
    }

    #[test]
    fn test_footnote_markup() {
        let mut out = String::new();
        HtmlBackend::footnote_reference("note", 1, &mut out).unwrap();
        assert_eq!(
            out,
            r##"<sup class="footnote-ref"><a href="#fn-note" id="fnref-note">1</a></sup>"##
        );

        let mut out = String::new();
        HtmlBackend::footnote_definition_start("note", 1, &mut out).unwrap();
        HtmlBackend::footnote_definition_end(&mut out);
        assert_eq!(
            out,
            r#"<div class="footnote-definition" id="fn-note"><sup class="footnote-definition-label">1</sup></div>"#
        );
    }
}
