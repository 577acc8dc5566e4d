// WHY: Host-side glue tying one text value to its matches, renderers and tap routing
// Matches are detected once per text value; segments are rebuilt on every render pass

use anyhow::Result;
use tracing::{debug, warn};

use crate::actions::{dispatch, Action, ActionHandler, DEFAULT_DIAL_PREFIX};
use crate::annotation::{
    self, char_len, AnnotateError, CharPos, Match, MatchKind, MatchSet, OverlapPolicy, Segment, SegmentKind,
};
use crate::detection::Detector;
use crate::layout::{Layout, Point};
use crate::render::Renderer;

/// Text with detected links and phone numbers, ready to render and tap
#[derive(Debug, Clone)]
pub struct LinkedText {
    text: String,
    matches: MatchSet,
    overlap_policy: OverlapPolicy,
    dial_prefix: String,
}

impl LinkedText {
    /// Detect matches in `text`; a failing detector yields plain text
    pub fn new(text: impl Into<String>, detector: &dyn Detector) -> Self {
        let text = text.into();
        let matches = detect_or_empty(&text, detector);
        Self::with_matches(text, matches)
    }

    /// Use a match set produced elsewhere for this exact text; a set that doesn't fit is dropped
    pub fn with_matches(text: impl Into<String>, matches: MatchSet) -> Self {
        let text = text.into();
        let matches = fitted(&text, matches);
        Self {
            text,
            matches,
            overlap_policy: OverlapPolicy::default(),
            dial_prefix: DEFAULT_DIAL_PREFIX.to_string(),
        }
    }

    pub fn with_overlap_policy(mut self, policy: OverlapPolicy) -> Self {
        self.overlap_policy = policy;
        self
    }

    pub fn with_dial_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dial_prefix = prefix.into();
        self
    }

    /// Replace the text and discard the stale match set
    pub fn set_text(&mut self, text: impl Into<String>, detector: &dyn Detector) {
        self.text = text.into();
        self.matches = detect_or_empty(&self.text, detector);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn matches(&self) -> &MatchSet {
        &self.matches
    }

    pub fn dial_prefix(&self) -> &str {
        &self.dial_prefix
    }

    /// Segments, or the precondition error from the builder
    pub fn try_segments(&self) -> Result<Vec<Segment<'_>>, AnnotateError> {
        annotation::build_match_set(&self.text, &self.matches, self.overlap_policy)
    }

    /// Segments, falling back to one plain segment when the match set is malformed
    pub fn segments(&self) -> Vec<Segment<'_>> {
        match self.try_segments() {
            Ok(segments) => segments,
            Err(e) => {
                warn!("Rendering text as plain after segment build failure: {}", e);
                if self.text.is_empty() {
                    Vec::new()
                } else {
                    vec![Segment::plain(&self.text, 0)]
                }
            }
        }
    }

    pub fn render(&self, renderer: &dyn Renderer) -> Result<String> {
        renderer.render(&self.segments())
    }

    /// Match rendered as a typed segment under `offset`
    ///
    /// Matches the builder dropped, or all of them when the text fell back to plain,
    /// are not tappable.
    pub fn match_at_offset(&self, offset: CharPos) -> Option<&Match> {
        let segments = self.try_segments().ok()?;
        let segment = segments
            .iter()
            .find(|s| !s.is_plain() && s.start <= offset && offset < s.end)?;

        // Links are listed first, so they win if both lists hold this exact range
        self.matches.all().find(|m| rendered_as(m, segment))
    }

    pub fn action_at_offset(&self, offset: CharPos) -> Option<Action> {
        self.match_at_offset(offset)
            .map(|m| Action::for_match(m, &self.dial_prefix))
    }

    pub fn action_at_point(&self, layout: &dyn Layout, point: Point) -> Option<Action> {
        if self.matches.is_empty() {
            return None;
        }
        let offset = layout.offset_at(&self.text, point)?;
        debug!("Point ({}, {}) resolved to character {}", point.x, point.y, offset.0);
        self.action_at_offset(offset)
    }

    /// Whether a tap at `point` would trigger an action; lets taps on plain text pass through
    pub fn accepts_tap(&self, layout: &dyn Layout, point: Point) -> bool {
        self.action_at_point(layout, point).is_some()
    }

    /// Resolve a tap and hand the action to `handler`; returns whether anything was dispatched
    pub fn tap(&self, layout: &dyn Layout, point: Point, handler: &mut dyn ActionHandler) -> bool {
        match self.action_at_point(layout, point) {
            Some(action) => {
                dispatch(&action, handler);
                true
            }
            None => false,
        }
    }
}

fn detect_or_empty(text: &str, detector: &dyn Detector) -> MatchSet {
    match detector.detect(text) {
        Ok(matches) => fitted(text, matches),
        Err(e) => {
            warn!("Detection failed, treating text as having no matches: {:#}", e);
            MatchSet::default()
        }
    }
}

/// A set that doesn't fit `text` is discarded whole rather than partially used
fn fitted(text: &str, matches: MatchSet) -> MatchSet {
    if let Err(e) = matches.validate(char_len(text)) {
        warn!("Out-of-bounds match, discarding match set: {}", e);
        return MatchSet::default();
    }
    matches
}

fn rendered_as(m: &Match, segment: &Segment<'_>) -> bool {
    let same_kind = matches!(
        (segment.kind, m.kind()),
        (SegmentKind::Link { .. }, MatchKind::Link) | (SegmentKind::PhoneNumber { .. }, MatchKind::PhoneNumber)
    );
    same_kind && m.start == segment.start && m.end() == segment.end
}
