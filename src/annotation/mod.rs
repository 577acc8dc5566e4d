// WHY: Core data model shared by the segment builder and the hit router
// Both halves are pure functions over (text, MatchSet) and share nothing else

use std::fmt;
use std::ops::Range;

use serde::Serialize;

pub mod positions;
pub mod segment_builder;
pub mod hit_router;

pub use positions::{char_len, BytePos, CharIndex, CharPos, PositionTracker};
pub use segment_builder::{build, build_match_set, build_with};
pub use hit_router::{resolve, resolve_in};

/// Kind of a detected span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Link,
    PhoneNumber,
}

/// Kind-specific payload of a match
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MatchTarget {
    /// URL to open, already normalized by the detector
    Link { url: String },
    /// Dialable phone string, without any dial-scheme prefix
    PhoneNumber { dial: String },
}

/// A detected span over the half-open character range `[start, start + length)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Match {
    pub start: CharPos,
    pub length: usize,
    pub target: MatchTarget,
}

impl Match {
    pub fn link(start: usize, length: usize, url: impl Into<String>) -> Self {
        Self {
            start: CharPos::new(start),
            length,
            target: MatchTarget::Link { url: url.into() },
        }
    }

    pub fn phone_number(start: usize, length: usize, dial: impl Into<String>) -> Self {
        Self {
            start: CharPos::new(start),
            length,
            target: MatchTarget::PhoneNumber { dial: dial.into() },
        }
    }

    pub fn kind(&self) -> MatchKind {
        match self.target {
            MatchTarget::Link { .. } => MatchKind::Link,
            MatchTarget::PhoneNumber { .. } => MatchKind::PhoneNumber,
        }
    }

    /// Exclusive end offset
    pub fn end(&self) -> CharPos {
        self.start.advance(self.length)
    }

    pub fn range(&self) -> Range<usize> {
        self.start.0..self.end().0
    }

    /// Half-open containment: `start <= offset < start + length`
    pub fn contains(&self, offset: CharPos) -> bool {
        self.start <= offset && offset < self.end()
    }

    pub fn overlaps(&self, other: &Match) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// URL for links, dial string for phone numbers
    pub fn payload(&self) -> &str {
        match &self.target {
            MatchTarget::Link { url } => url,
            MatchTarget::PhoneNumber { dial } => dial,
        }
    }

    /// Fail fast on empty or out-of-bounds ranges; never clamp
    pub fn check_bounds(&self, text_len: usize) -> Result<(), AnnotateError> {
        let in_bounds = self
            .start
            .0
            .checked_add(self.length)
            .is_some_and(|end| end <= text_len);

        if self.length == 0 || !in_bounds {
            return Err(AnnotateError::InvalidRange {
                kind: self.kind(),
                start: self.start.0,
                length: self.length,
                text_len,
            });
        }
        Ok(())
    }
}

/// Link and phone-number matches detected in one text value
///
/// Immutable once produced; recompute it whenever the text changes instead of
/// mixing sets from different text versions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    pub links: Vec<Match>,
    pub phone_numbers: Vec<Match>,
}

impl MatchSet {
    pub fn new(links: Vec<Match>, phone_numbers: Vec<Match>) -> Self {
        Self {
            links,
            phone_numbers,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.phone_numbers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.links.len() + self.phone_numbers.len()
    }

    /// All matches in detection order: links first, then phone numbers
    pub fn all(&self) -> impl Iterator<Item = &Match> {
        self.links.iter().chain(self.phone_numbers.iter())
    }

    /// Check every range against a text of `text_len` characters
    pub fn validate(&self, text_len: usize) -> Result<(), AnnotateError> {
        self.all().try_for_each(|m| m.check_bounds(text_len))
    }
}

/// What the builder does with matches whose ranges overlap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Fail with `AnnotateError::Overlap`
    #[default]
    Reject,
    /// Keep the earlier-starting match (detection order on exact ties), drop the other
    FirstWins,
}

/// Typed role of a segment, borrowing its payload from the originating match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind<'a> {
    PlainText,
    Link { url: &'a str },
    PhoneNumber { dial: &'a str },
}

/// A contiguous slice of the source text covering `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind<'a>,
    pub text: &'a str,
    pub start: CharPos,
    pub end: CharPos,
}

impl<'a> Segment<'a> {
    pub fn plain(text: &'a str, start: usize) -> Self {
        Self::new(SegmentKind::PlainText, text, start)
    }

    pub fn link(text: &'a str, start: usize, url: &'a str) -> Self {
        Self::new(SegmentKind::Link { url }, text, start)
    }

    pub fn phone_number(text: &'a str, start: usize, dial: &'a str) -> Self {
        Self::new(SegmentKind::PhoneNumber { dial }, text, start)
    }

    fn new(kind: SegmentKind<'a>, text: &'a str, start: usize) -> Self {
        Self {
            kind,
            text,
            start: CharPos::new(start),
            end: CharPos::new(start + char_len(text)),
        }
    }

    pub fn is_plain(&self) -> bool {
        matches!(self.kind, SegmentKind::PlainText)
    }

    /// URL or dial string for typed segments
    pub fn target(&self) -> Option<&'a str> {
        match self.kind {
            SegmentKind::PlainText => None,
            SegmentKind::Link { url } => Some(url),
            SegmentKind::PhoneNumber { dial } => Some(dial),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            SegmentKind::PlainText => "plain_text",
            SegmentKind::Link { .. } => "link",
            SegmentKind::PhoneNumber { .. } => "phone_number",
        }
    }
}

/// Precondition violations raised by the segment builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotateError {
    /// Empty range, or one reaching past the end of the text
    InvalidRange {
        kind: MatchKind,
        start: usize,
        length: usize,
        text_len: usize,
    },
    /// Two matches cover the same characters under `OverlapPolicy::Reject`
    Overlap {
        first: Range<usize>,
        second: Range<usize>,
    },
}

impl fmt::Display for AnnotateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotateError::InvalidRange {
                kind,
                start,
                length,
                text_len,
            } => write!(
                f,
                "invalid {kind:?} range: start {start}, length {length} in text of {text_len} characters"
            ),
            AnnotateError::Overlap { first, second } => write!(
                f,
                "overlapping matches: {}..{} and {}..{}",
                first.start, first.end, second.start, second.end
            ),
        }
    }
}

impl std::error::Error for AnnotateError {}
