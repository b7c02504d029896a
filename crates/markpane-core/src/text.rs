//! Document buffer for the note text.
//!
//! The buffer is the only copy of record for the note; the preview is always
//! derived from it. Offsets are in Unicode scalar values (chars) unless a
//! method says UTF-16, which is what `<textarea>` selection offsets use.

use std::ops::Range;

/// Ropey-backed note text.
///
/// Provides O(log n) splicing and char / UTF-16 offset conversion.
#[derive(Clone, Default, Debug)]
pub struct DocumentBuffer {
    rope: ropey::Rope,
    /// Becomes true on the first `set_text`. An empty buffer that the host
    /// has never filled is different from an empty note.
    loaded: bool,
}

impl DocumentBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
            loaded: true,
        }
    }

    /// Replace the whole text.
    pub fn set_text(&mut self, text: &str) {
        self.rope = ropey::Rope::from_str(text);
        self.loaded = true;
    }

    /// Whether any text has ever been set.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Length in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        self.rope.len_utf16_cu()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Replace a char range with text. The range is clamped to the buffer.
    ///
    /// Returns the char offset just past the inserted text.
    pub fn replace(&mut self, char_range: Range<usize>, text: &str) -> usize {
        let len = self.rope.len_chars();
        let start = char_range.start.min(len);
        let end = char_range.end.clamp(start, len);

        if start < end {
            self.rope.remove(start..end);
        }
        self.rope.insert(start, text);
        self.loaded = true;

        start + text.chars().count()
    }

    /// Get a slice as an owned string. Returns None if the range is invalid.
    pub fn slice(&self, char_range: Range<usize>) -> Option<String> {
        if char_range.start > char_range.end || char_range.end > self.rope.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_string())
    }

    /// Convert a UTF-16 offset to a char offset, clamping past-the-end offsets.
    pub fn utf16_to_char(&self, utf16_offset: usize) -> usize {
        let clamped = utf16_offset.min(self.rope.len_utf16_cu());
        self.rope.utf16_cu_to_char(clamped)
    }

    /// Convert a char offset to a UTF-16 offset, clamping past-the-end offsets.
    pub fn char_to_utf16(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.rope.len_chars());
        self.rope.char_to_utf16_cu(clamped)
    }

    /// Get a reference to the underlying rope.
    pub fn rope(&self) -> &ropey::Rope {
        &self.rope
    }
}

impl std::fmt::Display for DocumentBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}

impl From<&str> for DocumentBuffer {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}
