//! Fenced code block highlighting.
//!
//! Classes only (`ClassStyle::Spaced`), so the host theme's stylesheet owns
//! the colours. Blocks without a language tag, or with one syntect does not
//! know, render exactly as the markdown engine would have.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use pulldown_cmark_escape::{FmtWriter, escape_html};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::error::EditorError;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Highlight `code` as `lang`.
///
/// Returns the complete `<pre><code>` element, or None when `lang` is not a
/// known syntax.
pub fn highlight_block(lang: &str, code: &str) -> Result<Option<String>, EditorError> {
    let Some(syntax) = SYNTAX_SET.find_syntax_by_token(lang) else {
        return Ok(None);
    };

    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, ClassStyle::Spaced);
    for line in LinesWithEndings::from(code) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    let body = generator.finalize();

    let mut html = String::with_capacity(body.len() + 48);
    html.push_str("<pre><code class=\"language-");
    escape_html(FmtWriter(&mut html), lang)
        .map_err(|e| EditorError::Highlight(e.to_string()))?;
    html.push_str("\">");
    html.push_str(&body);
    html.push_str("</code></pre>\n");
    Ok(Some(html))
}

/// Event adapter that replaces fenced code blocks with highlighted HTML.
pub struct CodeHighlighter<'a, I> {
    inner: I,
    enabled: bool,
    pending: std::vec::IntoIter<Event<'a>>,
}

impl<'a, I> CodeHighlighter<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    pub fn new(inner: I, enabled: bool) -> Self {
        Self {
            inner,
            enabled,
            pending: Vec::new().into_iter(),
        }
    }

    /// Collect the block body up to and including its end tag.
    fn buffer_block(&mut self, start: Event<'a>) -> (Vec<Event<'a>>, String) {
        let mut events = vec![start];
        let mut code = String::new();
        for event in self.inner.by_ref() {
            if let Event::Text(text) = &event {
                code.push_str(text);
            }
            let done = matches!(event, Event::End(TagEnd::CodeBlock));
            events.push(event);
            if done {
                break;
            }
        }
        (events, code)
    }
}

impl<'a, I> Iterator for CodeHighlighter<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        if let Some(event) = self.pending.next() {
            return Some(event);
        }

        let event = self.inner.next()?;
        if !self.enabled {
            return Some(event);
        }

        let lang = match &event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                info.split_whitespace().next().map(str::to_string)
            }
            _ => None,
        };
        let Some(lang) = lang else {
            return Some(event);
        };

        let (events, code) = self.buffer_block(event);
        match highlight_block(&lang, &code) {
            Ok(Some(html)) => return Some(Event::Html(CowStr::from(html))),
            Ok(None) => {}
            Err(e) => tracing::warn!(%lang, error = %e, "highlighting failed, rendering plain"),
        }

        self.pending = events.into_iter();
        self.pending.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_language() {
        let html = highlight_block("rust", "let x = 1;\n").unwrap().unwrap();
        assert!(html.starts_with("<pre><code class=\"language-rust\">"));
        assert!(html.contains("<span class=\""));
        assert!(html.ends_with("</code></pre>\n"));
    }

    #[test]
    fn test_unknown_language() {
        assert!(highlight_block("definitely-not-a-language", "x").unwrap().is_none());
    }

    #[test]
    fn test_code_is_escaped() {
        let html = highlight_block("html", "<b>&</b>\n").unwrap().unwrap();
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;"));
        assert!(html.contains("&amp;"));
    }

    #[test]
    fn test_indented_and_untagged_blocks_pass_through() {
        let input = vec![
            Event::Start(Tag::CodeBlock(CodeBlockKind::Indented)),
            Event::Text(CowStr::Borrowed("x\n")),
            Event::End(TagEnd::CodeBlock),
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(CowStr::Borrowed("")))),
            Event::Text(CowStr::Borrowed("y\n")),
            Event::End(TagEnd::CodeBlock),
        ];
        let output: Vec<_> = CodeHighlighter::new(input.clone().into_iter(), true).collect();
        assert_eq!(output, input);
    }

    #[test]
    fn test_block_collapses_to_one_html_event() {
        let input = vec![
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(CowStr::Borrowed(
                "python extra",
            )))),
            Event::Text(CowStr::Borrowed("print(1)\n")),
            Event::End(TagEnd::CodeBlock),
            Event::Text(CowStr::Borrowed("after")),
        ];
        let output: Vec<_> = CodeHighlighter::new(input.into_iter(), true).collect();
        assert_eq!(output.len(), 2);
        assert!(
            matches!(&output[0], Event::Html(html) if html.contains("language-python"))
        );
        assert_eq!(output[1], Event::Text(CowStr::Borrowed("after")));
    }

    #[test]
    fn test_disabled_passes_everything() {
        let input = vec![
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(CowStr::Borrowed("rust")))),
            Event::Text(CowStr::Borrowed("fn f() {}\n")),
            Event::End(TagEnd::CodeBlock),
        ];
        let output: Vec<_> = CodeHighlighter::new(input.clone().into_iter(), false).collect();
        assert_eq!(output, input);
    }
}
