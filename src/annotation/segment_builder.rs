// WHY: Turns (text, matches) into ordered, disjoint, exhaustive typed segments
// Single linear walk after a stable sort on start offset

use tracing::debug;

use super::{AnnotateError, CharIndex, CharPos, Match, MatchSet, MatchTarget, OverlapPolicy, Segment, SegmentKind};

/// Build segments with the default `OverlapPolicy::Reject`
pub fn build<'a>(text: &'a str, matches: &'a [Match]) -> Result<Vec<Segment<'a>>, AnnotateError> {
    build_with(text, matches, OverlapPolicy::default())
}

/// Build segments from a single match slice under an explicit overlap policy
pub fn build_with<'a>(
    text: &'a str,
    matches: &'a [Match],
    policy: OverlapPolicy,
) -> Result<Vec<Segment<'a>>, AnnotateError> {
    build_sorted(text, matches.iter().collect(), policy)
}

/// Build segments from both detector lists, links concatenated before phone numbers
pub fn build_match_set<'a>(
    text: &'a str,
    matches: &'a MatchSet,
    policy: OverlapPolicy,
) -> Result<Vec<Segment<'a>>, AnnotateError> {
    build_sorted(text, matches.all().collect(), policy)
}

fn build_sorted<'a>(
    text: &'a str,
    mut matches: Vec<&'a Match>,
    policy: OverlapPolicy,
) -> Result<Vec<Segment<'a>>, AnnotateError> {
    let index = CharIndex::new(text);
    let text_len = index.char_len();

    for m in &matches {
        m.check_bounds(text_len)?;
    }

    // Stable: on equal starts the concatenation order decides, so links precede
    // phone numbers only because they were appended first.
    matches.sort_by_key(|m| m.start);

    let mut segments = Vec::with_capacity(matches.len() * 2 + 1);
    let mut cursor = CharPos::new(0);
    let mut previous: Option<&Match> = None;

    for m in matches {
        if let Some(kept) = previous.filter(|kept| kept.overlaps(m)) {
            if policy == OverlapPolicy::Reject {
                return Err(AnnotateError::Overlap {
                    first: kept.range(),
                    second: m.range(),
                });
            }
            debug!(
                "Dropping {:?} match {:?} overlapping previous match ending at {}",
                m.kind(),
                m.range(),
                cursor.0
            );
            continue;
        }

        if m.start > cursor {
            segments.push(slice_segment(text, &index, SegmentKind::PlainText, cursor, m.start, m)?);
        }

        let kind = match &m.target {
            MatchTarget::Link { url } => SegmentKind::Link { url: url.as_str() },
            MatchTarget::PhoneNumber { dial } => SegmentKind::PhoneNumber { dial: dial.as_str() },
        };
        segments.push(slice_segment(text, &index, kind, m.start, m.end(), m)?);

        cursor = m.end();
        previous = Some(m);
    }

    if cursor.0 < text_len {
        let end = CharPos::new(text_len);
        let text_tail = index.slice(text, cursor, end).unwrap_or_default();
        segments.push(Segment {
            kind: SegmentKind::PlainText,
            text: text_tail,
            start: cursor,
            end,
        });
    }

    debug!("Built {} segments over {} characters", segments.len(), text_len);
    Ok(segments)
}

fn slice_segment<'a>(
    text: &'a str,
    index: &CharIndex,
    kind: SegmentKind<'a>,
    start: CharPos,
    end: CharPos,
    origin: &Match,
) -> Result<Segment<'a>, AnnotateError> {
    let slice = index
        .slice(text, start, end)
        .ok_or_else(|| AnnotateError::InvalidRange {
            kind: origin.kind(),
            start: origin.start.0,
            length: origin.length,
            text_len: index.char_len(),
        })?;

    Ok(Segment {
        kind,
        text: slice,
        start,
        end,
    })
}
