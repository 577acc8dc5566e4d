// WHY: URL detection over a single compiled meta regex, trimmed like natural-language linkifiers
// Returns byte ranges; the caller converts them to character offsets

use anyhow::{bail, Result};
use regex_automata::meta::Regex;
use tracing::debug;

use super::normalization::trim_link_end;
use super::DetectionRules;
use crate::annotation::BytePos;

/// A link found in text, before conversion to a `Match`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedLink {
    pub start: BytePos,
    pub end: BytePos,
    pub url: String,
}

pub struct LinkDetector {
    pattern: Regex,
    trailing_punctuation: String,
}

impl LinkDetector {
    pub fn new(rules: &DetectionRules) -> Result<Self> {
        let pattern_text = link_pattern(rules)?;
        let pattern = Regex::new(&pattern_text)?;

        debug!("Compiled link pattern: {}", pattern_text);

        Ok(Self {
            pattern,
            trailing_punctuation: rules.trailing_punctuation.clone(),
        })
    }

    /// Non-overlapping links in ascending order
    pub fn detect(&self, text: &str) -> Vec<DetectedLink> {
        let mut links = Vec::new();

        for mat in self.pattern.find_iter(text) {
            let start = mat.start();

            // Skip hits glued to a preceding word, e.g. "xhttp://" or "awww."
            if text[..start].chars().next_back().is_some_and(char::is_alphanumeric) {
                continue;
            }

            let candidate = &text[start..mat.end()];
            let body_start = start + prefix_len(candidate);
            let end = start + trim_link_end(candidate, &self.trailing_punctuation);

            // Trimming may eat the whole body and then the prefix itself, e.g. "www.."
            if end <= body_start {
                continue;
            }
            let matched = &text[start..end];

            links.push(DetectedLink {
                start: BytePos::new(start),
                end: BytePos::new(end),
                url: link_url(matched),
            });
        }

        links
    }
}

/// Build `(?i)(?:(?:https|http)://|(?:mailto):|www\.)[^\s<>"]+` from the configured schemes
fn link_pattern(rules: &DetectionRules) -> Result<String> {
    let mut prefixes = Vec::new();

    let hierarchical = escaped_schemes(&rules.url_schemes)?;
    if !hierarchical.is_empty() {
        prefixes.push(format!("(?:{hierarchical})://"));
    }

    let opaque = escaped_schemes(&rules.opaque_schemes)?;
    if !opaque.is_empty() {
        prefixes.push(format!("(?:{opaque}):"));
    }

    if rules.detect_www {
        prefixes.push(r"www\.".to_string());
    }

    if prefixes.is_empty() {
        bail!("Link detection enabled but no URL schemes configured");
    }

    Ok(format!(r#"(?i)(?:{})[^\s<>"]+"#, prefixes.join("|")))
}

/// Escape and join schemes, longest first so "https" is tried before "http"
fn escaped_schemes(schemes: &[String]) -> Result<String> {
    let mut sorted: Vec<&String> = schemes.iter().collect();
    sorted.sort_by_key(|scheme| std::cmp::Reverse(scheme.len()));

    let mut escaped = Vec::with_capacity(sorted.len());
    for scheme in sorted {
        // RFC 3986: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
        let valid = scheme.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
            && scheme.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid {
            bail!("Invalid URL scheme in detection rules: {:?}", scheme);
        }

        let mut out = String::with_capacity(scheme.len() * 2);
        for c in scheme.chars() {
            if !c.is_ascii_alphanumeric() {
                out.push('\\');
            }
            out.push(c);
        }
        escaped.push(out);
    }

    Ok(escaped.join("|"))
}

/// Byte length of the "scheme:", "scheme://" or "www." prefix the pattern matched
fn prefix_len(candidate: &str) -> usize {
    if candidate.get(..4).is_some_and(|prefix| prefix.eq_ignore_ascii_case("www.")) {
        return 4;
    }
    match candidate.find(':') {
        Some(idx) if candidate[idx + 1..].starts_with("//") => idx + 3,
        Some(idx) => idx + 1,
        None => 0,
    }
}

/// Bare "www." hosts open over https
fn link_url(matched: &str) -> String {
    if matched.get(..4).is_some_and(|prefix| prefix.eq_ignore_ascii_case("www.")) {
        format!("https://{matched}")
    } else {
        matched.to_string()
    }
}
