//! Markdown to HTML for the preview pane.
//!
//! The pipeline is a chain of event adapters over `pulldown_cmark`:
//!
//! 1. `TextMergeStream` so each run of text arrives as one event
//! 2. `Autolink` turns bare URLs in prose into links
//! 3. `CodeHighlighter` swaps fenced code blocks for syntect-classed HTML
//! 4. `pulldown_cmark::html::push_html` writes the HTML
//! 5. every `HtmlPostProcessor` hook rewrites the result, in order
//!
//! The hooks are owned by the renderer and fixed at construction, so
//! rendering is a pure function of the input text.

mod autolink;
mod highlight;
mod link_target;

pub use autolink::{Autolink, find_links};
pub use highlight::{CodeHighlighter, highlight_block};
pub use link_target::{LinkTarget, set_anchor_target};

use pulldown_cmark::{Options, Parser, TextMergeStream};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::EditorError;

/// Rewrites rendered HTML after the markdown engine is done.
///
/// Implementations must be deterministic.
pub trait HtmlPostProcessor {
    fn process(&self, html: String) -> String;
}

impl<F: Fn(String) -> String> HtmlPostProcessor for F {
    fn process(&self, html: String) -> String {
        self(html)
    }
}

/// Which markdown extensions are on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    /// Turn bare URLs into links.
    pub linkify: bool,
    pub footnotes: bool,
    pub task_lists: bool,
    pub tables: bool,
    pub strikethrough: bool,
    /// Syntax-highlight fenced code blocks with a language tag.
    pub highlight_code: bool,
    /// Value forced onto every anchor's `target`.
    pub link_target: SmolStr,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            linkify: true,
            footnotes: true,
            task_lists: true,
            tables: true,
            strikethrough: true,
            highlight_code: true,
            link_target: SmolStr::new_static("_blank"),
        }
    }
}

impl RenderConfig {
    /// Engine options for the enabled extensions.
    pub fn options(&self) -> Options {
        let mut options = Options::empty();
        if self.footnotes {
            options.insert(Options::ENABLE_FOOTNOTES);
        }
        if self.task_lists {
            options.insert(Options::ENABLE_TASKLISTS);
        }
        if self.tables {
            options.insert(Options::ENABLE_TABLES);
        }
        if self.strikethrough {
            options.insert(Options::ENABLE_STRIKETHROUGH);
        }
        options
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        let target = self.link_target.as_str();
        if target.is_empty()
            || target
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '&'))
        {
            return Err(EditorError::Config(format!(
                "linkTarget must be a bare browsing context name, got {target:?}"
            )));
        }
        Ok(())
    }
}

/// The preview renderer.
pub struct MarkdownRenderer {
    config: RenderConfig,
    post_processors: Vec<Box<dyn HtmlPostProcessor>>,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl std::fmt::Debug for MarkdownRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownRenderer")
            .field("config", &self.config)
            .field("post_processors", &self.post_processors.len())
            .finish()
    }
}

impl MarkdownRenderer {
    /// Renderer with the standard hook list: links open in `config.link_target`.
    pub fn new(config: RenderConfig) -> Self {
        let link_target = LinkTarget::new(&config.link_target);
        Self::bare(config).with_post_processor(link_target)
    }

    /// Renderer with no post-processing hooks at all.
    pub fn bare(config: RenderConfig) -> Self {
        Self {
            config,
            post_processors: Vec::new(),
        }
    }

    /// Append a hook. Hooks run in the order they were added.
    pub fn with_post_processor(mut self, hook: impl HtmlPostProcessor + 'static) -> Self {
        self.post_processors.push(Box::new(hook));
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render markdown source to HTML.
    pub fn render(&self, text: &str) -> String {
        let parser = Parser::new_ext(text, self.config.options());
        let events = TextMergeStream::new(parser);
        let events = Autolink::new(events, self.config.linkify);
        let events = CodeHighlighter::new(events, self.config.highlight_code);

        let mut html = String::with_capacity(text.len() + text.len() / 2);
        pulldown_cmark::html::push_html(&mut html, events);

        self.post_processors
            .iter()
            .fold(html, |html, hook| hook.process(html))
    }
}
