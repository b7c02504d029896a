//! Bare URL detection.
//!
//! CommonMark only links `<https://...>`. Notes are full of pasted URLs, so
//! plain text runs are scanned and URLs become `LinkType::Autolink` links.
//! Text already inside a link, image, code span or code block is left alone,
//! as is text between a raw `<a ...>` and its `</a>`.

use std::collections::VecDeque;
use std::sync::LazyLock;

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;

static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(?:https?|ftp)://|mailto:|www\.)[^\s<>]+").expect("valid URL regex")
});

const PREFIXES: [&str; 5] = ["https://", "http://", "ftp://", "mailto:", "www."];

/// Find linkable URLs in a run of plain text.
///
/// Returns byte ranges into `text` paired with the link destination.
pub fn find_links(text: &str) -> Vec<(std::ops::Range<usize>, String)> {
    URL.find_iter(text)
        .filter_map(|m| {
            let candidate = trim_trailing(m.as_str());
            if !has_host(candidate) {
                return None;
            }
            let dest = if candidate
                .get(..4)
                .is_some_and(|p| p.eq_ignore_ascii_case("www."))
            {
                format!("http://{candidate}")
            } else {
                candidate.to_string()
            };
            Some((m.start()..m.start() + candidate.len(), dest))
        })
        .collect()
}

/// Drop sentence punctuation and unbalanced closing parens from the end.
fn trim_trailing(candidate: &str) -> &str {
    let mut s = candidate;
    while let Some(last) = s.chars().next_back() {
        let strip = match last {
            '.' | ',' | ':' | ';' | '!' | '?' | '\'' | '"' | '*' | '_' | '~' => true,
            ')' => s.matches(')').count() > s.matches('(').count(),
            ']' => s.matches(']').count() > s.matches('[').count(),
            _ => false,
        };
        if !strip {
            break;
        }
        s = &s[..s.len() - last.len_utf8()];
    }
    s
}

/// Something has to follow the scheme.
fn has_host(candidate: &str) -> bool {
    let lower = candidate.to_ascii_lowercase();
    let rest = PREFIXES
        .iter()
        .find_map(|p| lower.strip_prefix(p))
        .unwrap_or(&lower);
    rest.chars().any(|c| c.is_alphanumeric())
}

fn split_links<'a>(text: &str) -> Option<Vec<Event<'a>>> {
    let links = find_links(text);
    if links.is_empty() {
        return None;
    }

    let mut events = Vec::with_capacity(links.len() * 4 + 1);
    let mut last = 0;
    for (range, dest) in links {
        if range.start > last {
            events.push(Event::Text(CowStr::from(text[last..range.start].to_string())));
        }
        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(dest),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(Event::Text(CowStr::from(text[range.clone()].to_string())));
        events.push(Event::End(TagEnd::Link));
        last = range.end;
    }
    if last < text.len() {
        events.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
    Some(events)
}

/// Apply every raw `<a …>` and `</a>` tag in `html`, in order, to the
/// anchor nesting `depth`. An HTML block arrives one line per event, so a
/// single fragment can both open and close an anchor.
fn track_raw_anchors(mut depth: usize, html: &str) -> usize {
    let is_anchor = |rest: &[u8]| {
        rest.first().is_some_and(|b| b.eq_ignore_ascii_case(&b'a'))
            && rest
                .get(1)
                .is_none_or(|b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/')
    };
    let bytes = html.as_bytes();
    for (i, _) in html.match_indices('<') {
        match &bytes[i + 1..] {
            [b'/', rest @ ..] if is_anchor(rest) => depth = depth.saturating_sub(1),
            rest if is_anchor(rest) => depth += 1,
            _ => {}
        }
    }
    depth
}

/// Event adapter that links bare URLs.
pub struct Autolink<'a, I> {
    inner: I,
    enabled: bool,
    /// Depth of links, images and code blocks we are inside.
    suppress: usize,
    /// Depth of raw `<a>` elements we are inside.
    raw_anchors: usize,
    pending: VecDeque<Event<'a>>,
}

impl<'a, I> Autolink<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    pub fn new(inner: I, enabled: bool) -> Self {
        Self {
            inner,
            enabled,
            suppress: 0,
            raw_anchors: 0,
            pending: VecDeque::new(),
        }
    }
}

impl<'a, I> Iterator for Autolink<'a, I>
where
    I: Iterator<Item = Event<'a>>,
{
    type Item = Event<'a>;

    fn next(&mut self) -> Option<Event<'a>> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let event = self.inner.next()?;
        if !self.enabled {
            return Some(event);
        }

        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                self.suppress += 1;
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                self.suppress = self.suppress.saturating_sub(1);
            }
            Event::InlineHtml(html) | Event::Html(html) => {
                self.raw_anchors = track_raw_anchors(self.raw_anchors, html);
            }
            Event::Text(text) if self.suppress == 0 && self.raw_anchors == 0 => {
                if let Some(events) = split_links(text) {
                    self.pending.extend(events);
                    return self.pending.pop_front();
                }
            }
            _ => {}
        }

        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(text: &str) -> Vec<String> {
        find_links(text).into_iter().map(|(_, dest)| dest).collect()
    }

    #[test]
    fn test_schemes() {
        assert_eq!(urls("a https://x.io b"), vec!["https://x.io"]);
        assert_eq!(urls("HTTP://X.IO"), vec!["HTTP://X.IO"]);
        assert_eq!(urls("ftp://files.example/a.txt"), vec!["ftp://files.example/a.txt"]);
        assert_eq!(urls("mail mailto:me@example.com"), vec!["mailto:me@example.com"]);
        assert_eq!(urls("www.example.com/path"), vec!["http://www.example.com/path"]);
    }

    #[test]
    fn test_trailing_punctuation() {
        assert_eq!(urls("see https://x.io."), vec!["https://x.io"]);
        assert_eq!(urls("(https://x.io)"), vec!["https://x.io"]);
        assert_eq!(
            urls("https://en.wikipedia.org/wiki/Rust_(programming_language)"),
            vec!["https://en.wikipedia.org/wiki/Rust_(programming_language)"]
        );
        assert_eq!(urls("really? https://x.io/?q=1!"), vec!["https://x.io/?q=1"]);
    }

    #[test]
    fn test_needs_something_after_scheme() {
        assert!(urls("http:// and www. alone").is_empty());
        assert!(urls("nothing here").is_empty());
    }

    #[test]
    fn test_ranges_cover_visible_text() {
        let text = "go to www.x.org, now";
        let links = find_links(text);
        assert_eq!(links.len(), 1);
        assert_eq!(&text[links[0].0.clone()], "www.x.org");
    }

    #[test]
    fn test_track_raw_anchors() {
        assert_eq!(track_raw_anchors(0, "<a href=\"x\">"), 1);
        assert_eq!(track_raw_anchors(0, "<A>"), 1);
        assert_eq!(track_raw_anchors(1, "</a>"), 0);
        assert_eq!(track_raw_anchors(0, "</a>"), 0);
        assert_eq!(track_raw_anchors(0, "<abbr>"), 0);
        assert_eq!(track_raw_anchors(0, "<br/>"), 0);
        // One HTML block line holding a whole anchor.
        assert_eq!(track_raw_anchors(0, "<a href=\"https://x.example\">z</a>\n"), 0);
        assert_eq!(track_raw_anchors(0, "<p><a>x</a> <a name=y>"), 1);
        assert_eq!(track_raw_anchors(0, "<a"), 1);
    }

    #[test]
    fn test_adapter_splits_text() {
        let events: Vec<_> = Autolink::new(
            vec![Event::Text(CowStr::Borrowed("hi https://x.io bye"))].into_iter(),
            true,
        )
        .collect();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0], Event::Text(CowStr::Borrowed("hi ")));
        assert!(matches!(
            &events[1],
            Event::Start(Tag::Link { link_type: LinkType::Autolink, dest_url, .. })
                if dest_url.as_ref() == "https://x.io"
        ));
        assert_eq!(events[3], Event::End(TagEnd::Link));
        assert_eq!(events[4], Event::Text(CowStr::Borrowed(" bye")));
    }

    #[test]
    fn test_adapter_skips_inside_raw_anchor() {
        let input = vec![
            Event::InlineHtml(CowStr::Borrowed("<a href=\"y\">")),
            Event::Text(CowStr::Borrowed("https://x.io")),
            Event::InlineHtml(CowStr::Borrowed("</a>")),
            Event::Text(CowStr::Borrowed("https://z.io")),
        ];
        let events: Vec<_> = Autolink::new(input.into_iter(), true).collect();
        assert_eq!(events.len(), 6);
        assert_eq!(events[1], Event::Text(CowStr::Borrowed("https://x.io")));
        assert!(matches!(events[3], Event::Start(Tag::Link { .. })));
    }

    #[test]
    fn test_adapter_resumes_after_html_block_anchor() {
        let input = vec![
            Event::Html(CowStr::Borrowed("<div>\n")),
            Event::Html(CowStr::Borrowed("<a href=\"https://x.example\">z</a>\n")),
            Event::Html(CowStr::Borrowed("</div>\n")),
            Event::Start(Tag::Paragraph),
            Event::Text(CowStr::Borrowed("Visit https://after.example now")),
            Event::End(TagEnd::Paragraph),
        ];
        let events: Vec<_> = Autolink::new(input.into_iter(), true).collect();
        assert!(events.iter().any(|e| matches!(
            e,
            Event::Start(Tag::Link { dest_url, .. }) if dest_url.as_ref() == "https://after.example"
        )));
    }
}
