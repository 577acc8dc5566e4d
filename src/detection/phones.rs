// WHY: Phone number detection tolerant of international punctuation, e.g. "+7(982)709-77-77"
// Candidates inside a detected link are dropped so the two lists never overlap

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::debug;

use super::links::DetectedLink;
use super::normalization::{count_digits, normalize_dial_string};
use super::DetectionRules;
use crate::annotation::BytePos;

/// Optional '+', then digits or parenthesized digit groups joined by at most one separator
const PHONE_PATTERN: &str = r"\+?(?:\([0-9]+\)|[0-9])(?:[ .\-]?(?:\([0-9]+\)|[0-9]))*";

/// ISO-style dates share the shape of dotted or dashed numbers
const DATE_PATTERN: &str = r"^[0-9]{4}[\-./][0-9]{1,2}[\-./][0-9]{1,2}$";

/// A phone number found in text, before conversion to a `Match`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedPhone {
    pub start: BytePos,
    pub end: BytePos,
    pub dial: String,
}

pub struct PhoneDetector {
    pattern: Regex,
    date_pattern: Regex,
    min_digits: usize,
    max_digits: usize,
}

impl PhoneDetector {
    pub fn new(rules: &DetectionRules) -> Result<Self> {
        if rules.min_phone_digits == 0 || rules.min_phone_digits > rules.max_phone_digits {
            anyhow::bail!(
                "Invalid phone digit bounds: min {} max {}",
                rules.min_phone_digits,
                rules.max_phone_digits
            );
        }

        let pattern = Regex::new(PHONE_PATTERN)?;
        let date_pattern = Regex::new(DATE_PATTERN)?;

        debug!(
            "Compiled phone pattern with {}..={} digits",
            rules.min_phone_digits, rules.max_phone_digits
        );

        Ok(Self {
            pattern,
            date_pattern,
            min_digits: rules.min_phone_digits,
            max_digits: rules.max_phone_digits,
        })
    }

    /// Non-overlapping phone numbers in ascending order, skipping any that touch `links`
    pub fn detect(&self, text: &str, links: &[DetectedLink]) -> Vec<DetectedPhone> {
        let mut phones = Vec::new();

        for mat in self.pattern.find_iter(text) {
            let (start, end) = (mat.start(), mat.end());
            let candidate = &text[start..end];

            if !self.is_standalone(text, start, end) {
                continue;
            }

            let digits = count_digits(candidate);
            if digits < self.min_digits || digits > self.max_digits {
                continue;
            }

            if self.date_pattern.is_match(candidate) {
                continue;
            }

            if links.iter().any(|link| start < link.end.0 && link.start.0 < end) {
                debug!("Skipping phone candidate {:?} inside a link", candidate);
                continue;
            }

            phones.push(DetectedPhone {
                start: BytePos::new(start),
                end: BytePos::new(end),
                dial: normalize_dial_string(candidate),
            });
        }

        phones
    }

    /// Not part of a longer word or number on either side
    fn is_standalone(&self, text: &str, start: usize, end: usize) -> bool {
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();

        let glued_before = before.is_some_and(|c| c.is_alphanumeric() || c == '+');
        let glued_after = after.is_some_and(char::is_alphanumeric);

        !glued_before && !glued_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> PhoneDetector {
        PhoneDetector::new(&DetectionRules::default()).unwrap()
    }

    fn dials(text: &str) -> Vec<String> {
        detector().detect(text, &[]).into_iter().map(|p| p.dial).collect()
    }

    #[test]
    fn test_international_format() {
        let text = "Hello! Go to https://github.com/kalashnikovaYla +7(982)709-77-77";
        let phones = detector().detect(text, &[]);

        assert_eq!(phones.len(), 1);
        assert_eq!(phones[0].dial, "+79827097777");
        assert_eq!(&text[phones[0].start.0..phones[0].end.0], "+7(982)709-77-77");
    }

    #[test]
    fn test_common_formats() {
        assert_eq!(dials("call (555) 123-4567"), vec!["5551234567"]);
        assert_eq!(dials("call 555.123.4567 now"), vec!["5551234567"]);
        assert_eq!(dials("call +1 555 123 4567."), vec!["+15551234567"]);
        assert_eq!(dials("Call +15551234567 or"), vec!["+15551234567"]);
    }

    #[test]
    fn test_trailing_separator_not_included() {
        let text = "ring 555-0100-22- please";
        let phones = detector().detect(text, &[]);
        assert_eq!(&text[phones[0].start.0..phones[0].end.0], "555-0100-22");
    }

    #[test]
    fn test_too_few_or_too_many_digits() {
        assert!(dials("room 12-34").is_empty());
        assert!(dials("id 1234567890123456789").is_empty());
    }

    #[test]
    fn test_glued_to_word_is_skipped() {
        assert!(dials("order A5551234567").is_empty());
        assert!(dials("5551234567b").is_empty());
    }

    #[test]
    fn test_dates_are_not_phone_numbers() {
        assert!(dials("on 2023.07.09 we met").is_empty());
        assert!(dials("on 2023-7-9 we met").is_empty());
    }

    #[test]
    fn test_skips_candidates_inside_links() {
        let text = "https://example.com/5551234567 and 555 123 4567";
        let links = vec![DetectedLink {
            start: BytePos(0),
            end: BytePos(30),
            url: "https://example.com/5551234567".to_string(),
        }];
        let phones = detector().detect(text, &links);

        assert_eq!(phones.len(), 1);
        assert_eq!(phones[0].dial, "5551234567");
    }

    #[test]
    fn test_invalid_digit_bounds() {
        let rules = DetectionRules {
            min_phone_digits: 12,
            max_phone_digits: 8,
            ..DetectionRules::default()
        };
        assert!(PhoneDetector::new(&rules).is_err());
    }
}
