//! HTML rendering of the document.
//!
//! Hosts that display a read-only mirror of the document (or copy it as
//! rich text) ask for the current content as HTML. Markdown goes through
//! comrak with the GFM extensions; HTML content is passed through.

use crate::config::ContentMode;
use comrak::{markdown_to_html, Options};

/// Render `content` according to `mode`.
pub fn render_html(content: &str, mode: ContentMode) -> String {
    match mode {
        ContentMode::Plain => markdown_to_html_body(content),
        ContentMode::Html => content.to_string(),
    }
}

fn markdown_to_html_body(markdown: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    // `<u>` from toggleUnderline must survive
    options.render.unsafe_ = true;

    markdown_to_html(markdown, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_markdown_blocks() {
        let html = render_html("# Hello\n\n- item\n\n> quote", ContentMode::Plain);
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<li>item</li>"));
        assert!(html.contains("<blockquote>"));
    }

    #[test]
    fn test_render_inline_formats() {
        let html = render_html("**b** *i* ~~s~~ <u>u</u>", ContentMode::Plain);
        assert!(html.contains("<strong>b</strong>"));
        assert!(html.contains("<em>i</em>"));
        assert!(html.contains("<del>s</del>"));
        assert!(html.contains("<u>u</u>"));
    }

    #[test]
    fn test_render_link_and_image() {
        let html = render_html(
            "[docs](https://docs.rs) ![](pic.png)",
            ContentMode::Plain,
        );
        assert!(html.contains(r#"<a href="https://docs.rs">docs</a>"#));
        assert!(html.contains(r#"<img src="pic.png""#));
    }

    #[test]
    fn test_html_mode_passes_through() {
        let html = render_html("<p># not a heading</p>", ContentMode::Html);
        assert_eq!(html, "<p># not a heading</p>");
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render_html("", ContentMode::Plain), "");
    }
}
