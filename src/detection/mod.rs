// WHY: Detection collaborator interface plus the crate's default data detector
// Hosts with a platform detector implement `Detector` and skip this module's regexes entirely

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub mod links;
pub mod normalization;
pub mod phones;

pub use links::{DetectedLink, LinkDetector};
pub use normalization::{normalize_dial_string, normalize_dial_string_into};
pub use phones::{DetectedPhone, PhoneDetector};

use crate::annotation::{BytePos, Match, MatchSet, PositionTracker};

/// Scans a text value and returns its link and phone-number matches
///
/// Each returned list must be internally non-overlapping. Errors are handled by
/// the caller as "zero matches", never as a partial set.
pub trait Detector {
    fn detect(&self, text: &str) -> Result<MatchSet>;
}

impl<F> Detector for F
where
    F: Fn(&str) -> Result<MatchSet>,
{
    fn detect(&self, text: &str) -> Result<MatchSet> {
        self(text)
    }
}

/// Configuration for the default detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectionRules {
    pub detect_links: bool,
    pub detect_phone_numbers: bool,
    /// Schemes written as `scheme://...`
    pub url_schemes: Vec<String>,
    /// Schemes written as `scheme:...`
    pub opaque_schemes: Vec<String>,
    /// Treat bare `www.` hosts as https links
    pub detect_www: bool,
    /// Characters stripped from the end of a link
    pub trailing_punctuation: String,
    pub min_phone_digits: usize,
    pub max_phone_digits: usize,
}

impl Default for DetectionRules {
    fn default() -> Self {
        Self {
            detect_links: true,
            detect_phone_numbers: true,
            url_schemes: vec!["http".to_string(), "https".to_string(), "ftp".to_string()],
            opaque_schemes: vec!["mailto".to_string()],
            detect_www: true,
            trailing_punctuation: ".,;:!?'\"".to_string(),
            // E.164 caps numbers at 15 digits; 7 keeps short counters out
            min_phone_digits: 7,
            max_phone_digits: 15,
        }
    }
}

impl DetectionRules {
    /// Load rules from a JSON file; missing fields keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read detection rules from {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid detection rules in {}", path.display()))
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Regex-based link and phone-number detector
pub struct DataDetector {
    rules: DetectionRules,
    links: Option<LinkDetector>,
    phones: Option<PhoneDetector>,
}

impl DataDetector {
    /// Compile detection rules once; reuse the detector for every text value
    pub fn new(rules: DetectionRules) -> Result<Self> {
        info!("Compiling data detector");

        let links = if rules.detect_links {
            Some(LinkDetector::new(&rules).context("Failed to compile link detector")?)
        } else {
            None
        };

        let phones = if rules.detect_phone_numbers {
            Some(PhoneDetector::new(&rules).context("Failed to compile phone number detector")?)
        } else {
            None
        };

        Ok(Self { rules, links, phones })
    }

    pub fn with_default_rules() -> Result<Self> {
        Self::new(DetectionRules::default())
    }

    pub fn rules(&self) -> &DetectionRules {
        &self.rules
    }
}

impl Detector for DataDetector {
    fn detect(&self, text: &str) -> Result<MatchSet> {
        debug!("Starting detection on {} bytes", text.len());

        let detected_links = match &self.links {
            Some(detector) => detector.detect(text),
            None => Vec::new(),
        };

        let detected_phones = match &self.phones {
            Some(detector) => detector.detect(text, &detected_links),
            None => Vec::new(),
        };

        // Both lists are ascending, so each gets its own forward-only tracker
        let mut tracker = PositionTracker::new(text);
        let mut links = Vec::with_capacity(detected_links.len());
        for link in detected_links {
            let (start, length) = char_range(&mut tracker, link.start, link.end)?;
            links.push(Match::link(start, length, link.url));
        }

        let mut tracker = PositionTracker::new(text);
        let mut phone_numbers = Vec::with_capacity(detected_phones.len());
        for phone in detected_phones {
            let (start, length) = char_range(&mut tracker, phone.start, phone.end)?;
            phone_numbers.push(Match::phone_number(start, length, phone.dial));
        }

        info!(
            "Detected {} links and {} phone numbers",
            links.len(),
            phone_numbers.len()
        );
        Ok(MatchSet::new(links, phone_numbers))
    }
}

fn char_range(tracker: &mut PositionTracker<'_>, start: BytePos, end: BytePos) -> Result<(usize, usize)> {
    let start_char = tracker
        .advance_to_byte(start)
        .map_err(|e| anyhow::anyhow!("Position tracking error: {}", e))?;
    let end_char = tracker
        .advance_to_byte(end)
        .map_err(|e| anyhow::anyhow!("Position tracking error: {}", e))?;
    Ok((start_char.0, end_char.0 - start_char.0))
}
