//! Force a browsing context onto every anchor.
//!
//! The preview lives inside the host's iframe; a link that navigates in place
//! replaces the editor. Anchors from every source (inline links, autolinks,
//! footnote references, raw HTML in the note) pass through the final HTML,
//! so this works on the HTML rather than on markdown events.

use smol_str::SmolStr;

use super::HtmlPostProcessor;

/// Post-processing hook that sets `target` on every `<a>` start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    target: SmolStr,
}

impl LinkTarget {
    pub fn new(target: &str) -> Self {
        Self {
            target: SmolStr::new(target),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for LinkTarget {
    fn default() -> Self {
        Self::new("_blank")
    }
}

impl HtmlPostProcessor for LinkTarget {
    fn process(&self, html: String) -> String {
        set_anchor_target(&html, &self.target)
    }
}

/// Rewrite every anchor start tag in `html` so it carries exactly one
/// `target="{target}"`. Existing targets are dropped; other attributes are
/// kept verbatim and in order. Attribute names are read as a browser reads
/// them, so stray quotes or `=` become part of a name. Only a tag that never
/// reaches its closing `>` is left untouched.
pub fn set_anchor_target(html: &str, target: &str) -> String {
    let bytes = html.as_bytes();
    let mut out = String::with_capacity(html.len() + 32);
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' && is_anchor_start(&bytes[i + 1..]) {
            if let Some(tag) = parse_anchor(html, i) {
                out.push_str(&html[copied..i]);
                tag.write(&mut out, target);
                i = tag.end;
                copied = i;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&html[copied..]);
    out
}

fn is_anchor_start(rest: &[u8]) -> bool {
    matches!(rest.first(), Some(b'a' | b'A'))
        && matches!(rest.get(1), Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/')
}

struct AnchorTag<'h> {
    attrs: Vec<Attr<'h>>,
    self_closing: bool,
    /// Byte offset just past the closing `>`.
    end: usize,
}

struct Attr<'h> {
    name: &'h str,
    /// The attribute as written, name and value.
    raw: &'h str,
}

impl AnchorTag<'_> {
    fn write(&self, out: &mut String, target: &str) {
        out.push_str("<a");
        for attr in &self.attrs {
            if attr.name.eq_ignore_ascii_case("target") {
                continue;
            }
            out.push(' ');
            out.push_str(attr.raw);
        }
        out.push_str(" target=\"");
        out.push_str(target);
        out.push('"');
        out.push_str(if self.self_closing { "/>" } else { ">" });
    }
}

/// Parse the anchor start tag at `start` (which points at `<`).
fn parse_anchor(html: &str, start: usize) -> Option<AnchorTag<'_>> {
    let bytes = html.as_bytes();
    let mut i = start + 2;
    let mut attrs = Vec::new();

    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => {
                return Some(AnchorTag {
                    attrs,
                    self_closing: false,
                    end: i + 1,
                });
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') => {
                return Some(AnchorTag {
                    attrs,
                    self_closing: true,
                    end: i + 2,
                });
            }
            b'/' => {
                i += 1;
                continue;
            }
            _ => {}
        }

        // The first byte always belongs to the name, even `=` or a quote.
        let attr_start = i;
        i += 1;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let name = &html[attr_start..i];

        let mut j = i;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if bytes.get(j) == Some(&b'=') {
            j += 1;
            while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            match bytes.get(j)? {
                quote @ (b'"' | b'\'') => {
                    let close = html[j + 1..].find(*quote as char)?;
                    j = j + 1 + close + 1;
                }
                _ => {
                    while j < bytes.len() && !bytes[j].is_ascii_whitespace() && bytes[j] != b'>' {
                        j += 1;
                    }
                }
            }
            i = j;
        }

        attrs.push(Attr {
            name,
            raw: &html[attr_start..i],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(html: &str) -> String {
        set_anchor_target(html, "_blank")
    }

    #[test]
    fn test_adds_target() {
        assert_eq!(
            blank(r#"<p><a href="x">y</a></p>"#),
            r#"<p><a href="x" target="_blank">y</a></p>"#
        );
    }

    #[test]
    fn test_replaces_any_existing_target() {
        assert_eq!(
            blank(r#"<A HREF=x TARGET=foo>y</A>"#),
            r#"<a HREF=x target="_blank">y</A>"#
        );
        assert_eq!(
            blank(r#"<a target='_self' href="x" target="_top">"#),
            r#"<a href="x" target="_blank">"#
        );
    }

    #[test]
    fn test_attribute_values_with_gt_and_spaces() {
        assert_eq!(
            blank(r#"<a title="a > b" href = "x" download>"#),
            r#"<a title="a > b" href = "x" download target="_blank">"#
        );
    }

    #[test]
    fn test_self_closing() {
        assert_eq!(blank(r#"<a name="top"/>"#), r#"<a name="top" target="_blank"/>"#);
    }

    #[test]
    fn test_other_tags_untouched() {
        let html = "<abbr title=\"a\">x</abbr></a><area href=\"y\"><b>a</b>";
        assert_eq!(blank(html), html);
    }

    #[test]
    fn test_malformed_tag_left_alone() {
        assert_eq!(blank(r#"<a href="x"#), r#"<a href="x"#);
        assert_eq!(blank("text <a "), "text <a ");
    }

    #[test]
    fn test_junk_attribute_names_still_rewritten() {
        assert_eq!(
            blank(r#"<a href="x" 'odd'>z</a>"#),
            r#"<a href="x" 'odd' target="_blank">z</a>"#
        );
        assert_eq!(
            blank(r#"<a ="y" href=x "q>z</a>"#),
            r#"<a ="y" href=x "q target="_blank">z</a>"#
        );
        assert_eq!(blank(r#"<a <b target=t>"#), r#"<a <b target="_blank">"#);
    }

    #[test]
    fn test_non_ascii_text_survives() {
        assert_eq!(
            blank("ü <a href=\"é\">ß</a> ✓"),
            "ü <a href=\"é\" target=\"_blank\">ß</a> ✓"
        );
    }

    #[test]
    fn test_hook_uses_configured_target() {
        let hook = LinkTarget::new("notes");
        assert_eq!(hook.target(), "notes");
        assert_eq!(hook.process("<a>".to_string()), r#"<a target="notes">"#);
    }
}
