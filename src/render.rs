// WHY: Rendering adapters turn a segment sequence into styled output for a concrete surface
// Links and phone numbers share one style: blue and underlined

use anyhow::Result;
use serde::Serialize;

use crate::annotation::{CharPos, Segment, SegmentKind};

const SGR_LINK: &str = "\x1b[34;4m";
const SGR_RESET: &str = "\x1b[0m";

/// Renders segments for one output surface
pub trait Renderer {
    fn render(&self, segments: &[Segment<'_>]) -> Result<String>;
}

/// Concatenated segment text, identical to the source text
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, segments: &[Segment<'_>]) -> Result<String> {
        Ok(segments.iter().map(|s| s.text).collect())
    }
}

/// Terminal output with SGR styling and optional OSC 8 hyperlinks
#[derive(Debug, Default, Clone)]
pub struct AnsiRenderer {
    /// Wrap typed segments in OSC 8 so terminals can open them directly
    pub hyperlinks: bool,
    /// Prefix for phone hyperlinks; only used when `hyperlinks` is set
    pub dial_prefix: String,
}

impl AnsiRenderer {
    pub fn new(hyperlinks: bool, dial_prefix: impl Into<String>) -> Self {
        Self {
            hyperlinks,
            dial_prefix: dial_prefix.into(),
        }
    }
}

impl Renderer for AnsiRenderer {
    fn render(&self, segments: &[Segment<'_>]) -> Result<String> {
        let mut out = String::new();

        for segment in segments {
            let target = match segment.kind {
                SegmentKind::PlainText => {
                    out.push_str(segment.text);
                    continue;
                }
                SegmentKind::Link { url } => url.to_string(),
                SegmentKind::PhoneNumber { dial } => format!("{}{}", self.dial_prefix, dial),
            };

            if self.hyperlinks {
                out.push_str(&format!("\x1b]8;;{target}\x1b\\"));
            }
            out.push_str(SGR_LINK);
            out.push_str(segment.text);
            out.push_str(SGR_RESET);
            if self.hyperlinks {
                out.push_str("\x1b]8;;\x1b\\");
            }
        }

        Ok(out)
    }
}

/// One JSON record per segment
#[derive(Debug, Serialize)]
struct SegmentRecord<'a> {
    kind: &'static str,
    text: &'a str,
    start: CharPos,
    end: CharPos,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<&'a str>,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, segments: &[Segment<'_>]) -> Result<String> {
        let records: Vec<SegmentRecord<'_>> = segments
            .iter()
            .map(|s| SegmentRecord {
                kind: s.kind_name(),
                text: s.text,
                start: s.start,
                end: s.end,
                target: s.target(),
            })
            .collect();

        let json = if self.pretty {
            serde_json::to_string_pretty(&records)?
        } else {
            serde_json::to_string(&records)?
        };
        Ok(json)
    }
}
