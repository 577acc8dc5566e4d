// WHY: Maps a character offset (from the layout collaborator) to the match under it
// Links are searched before phone numbers; that priority is a rule, not a side effect of ordering

use super::{CharPos, Match, MatchSet};

/// Match whose half-open range contains `offset`, links first, then phone numbers
///
/// `None` means the offset falls on plain text or outside the text entirely.
pub fn resolve(matches: &MatchSet, offset: CharPos) -> Option<&Match> {
    resolve_in(&matches.links, offset).or_else(|| resolve_in(&matches.phone_numbers, offset))
}

/// First match in `matches` containing `offset`
pub fn resolve_in(matches: &[Match], offset: CharPos) -> Option<&Match> {
    matches.iter().find(|m| m.contains(offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::MatchKind;

    fn sample() -> MatchSet {
        MatchSet::new(
            vec![Match::link(27, 19, "https://example.com")],
            vec![Match::phone_number(5, 12, "+15551234567")],
        )
    }

    #[test]
    fn test_offset_inside_phone() {
        let set = sample();
        let hit = resolve(&set, CharPos(10)).unwrap();
        assert_eq!(hit.kind(), MatchKind::PhoneNumber);
        assert_eq!(hit.payload(), "+15551234567");
    }

    #[test]
    fn test_offset_on_plain_text() {
        let set = sample();
        assert!(resolve(&set, CharPos(3)).is_none());
        assert!(resolve(&set, CharPos(17)).is_none());
        assert!(resolve(&set, CharPos(1000)).is_none());
    }

    #[test]
    fn test_range_boundaries() {
        let set = sample();
        assert!(resolve(&set, CharPos(27)).is_some());
        assert!(resolve(&set, CharPos(45)).is_some());
        assert!(resolve(&set, CharPos(46)).is_none());
    }

    #[test]
    fn test_link_wins_on_shared_offset() {
        // Phone list is searched second even when its match starts earlier
        let set = MatchSet::new(
            vec![Match::link(4, 6, "https://x.y")],
            vec![Match::phone_number(2, 6, "5551234")],
        );
        assert_eq!(resolve(&set, CharPos(5)).unwrap().kind(), MatchKind::Link);
        assert_eq!(resolve(&set, CharPos(3)).unwrap().kind(), MatchKind::PhoneNumber);
    }

    #[test]
    fn test_empty_set() {
        assert!(resolve(&MatchSet::default(), CharPos(0)).is_none());
        assert!(resolve_in(&[], CharPos(0)).is_none());
    }
}
