// WHY: Type-safe offsets prevent byte/char confusion between regex output and match ranges

use serde::Serialize;

/// 0-based byte position in source text
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct BytePos(pub usize);

/// 0-based character (Unicode scalar value) position in source text
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct CharPos(pub usize);

impl From<BytePos> for usize {
    fn from(pos: BytePos) -> Self {
        pos.0
    }
}

impl From<CharPos> for usize {
    fn from(pos: CharPos) -> Self {
        pos.0
    }
}

impl BytePos {
    pub fn new(pos: usize) -> Self {
        BytePos(pos)
    }

    pub fn advance(&self, offset: usize) -> Self {
        BytePos(self.0 + offset)
    }
}

impl CharPos {
    pub fn new(pos: usize) -> Self {
        CharPos(pos)
    }

    /// Saturates so an unchecked match near `usize::MAX` can't wrap its end
    pub fn advance(&self, offset: usize) -> Self {
        CharPos(self.0.saturating_add(offset))
    }
}

/// Number of characters in `text`, the upper bound for every match range
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Incremental byte -> char conversion for ascending byte positions
/// WHY: regex matches arrive in ascending order, so a forward-only scan keeps detection O(n)
#[derive(Debug)]
pub struct PositionTracker<'a> {
    text_bytes: &'a [u8],
    current_byte_pos: usize,
    current_char_pos: usize,
}

impl<'a> PositionTracker<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text_bytes: text.as_bytes(),
            current_byte_pos: 0,
            current_char_pos: 0,
        }
    }

    /// Advance to `target` and return its character position
    pub fn advance_to_byte(&mut self, target: BytePos) -> Result<CharPos, String> {
        if target.0 < self.current_byte_pos {
            return Err(format!(
                "Cannot seek backwards: current {} > target {}",
                self.current_byte_pos, target.0
            ));
        }

        if target.0 > self.text_bytes.len() {
            return Err(format!(
                "Target byte position {} exceeds text length {}",
                target.0,
                self.text_bytes.len()
            ));
        }

        while self.current_byte_pos < target.0 {
            let byte = self.text_bytes[self.current_byte_pos];

            // ASCII (0xxxxxxx) or start of multi-byte (11xxxxxx); continuation bytes don't count
            if (byte & 0x80) == 0 || (byte & 0xC0) == 0xC0 {
                self.current_char_pos += 1;
            }

            self.current_byte_pos += 1;
        }

        Ok(CharPos::new(self.current_char_pos))
    }
}

/// Char -> byte lookup table for slicing a text on character offsets
#[derive(Debug, Clone)]
pub struct CharIndex {
    /// Byte offset of every char, plus the text length as a sentinel
    boundaries: Vec<usize>,
}

impl CharIndex {
    pub fn new(text: &str) -> Self {
        let mut boundaries: Vec<usize> = text.char_indices().map(|(byte, _)| byte).collect();
        boundaries.push(text.len());
        Self { boundaries }
    }

    /// Number of characters in the indexed text
    pub fn char_len(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// Byte position of a character offset; `char_len()` maps to the end of text
    pub fn byte_pos(&self, pos: CharPos) -> Option<BytePos> {
        self.boundaries.get(pos.0).copied().map(BytePos::new)
    }

    /// Slice `text[start..end)` in character offsets
    pub fn slice<'t>(&self, text: &'t str, start: CharPos, end: CharPos) -> Option<&'t str> {
        if start > end {
            return None;
        }
        let start_byte = self.byte_pos(start)?;
        let end_byte = self.byte_pos(end)?;
        text.get(start_byte.0..end_byte.0)
    }
}
