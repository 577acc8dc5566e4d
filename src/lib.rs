pub mod actions;
pub mod annotation;
pub mod detection;
pub mod layout;
pub mod linked_text;
pub mod reader;
pub mod render;

// Re-export core types for convenient access
pub use annotation::{
    build, build_match_set, build_with, resolve, resolve_in,
    AnnotateError, CharPos, Match, MatchKind, MatchSet, MatchTarget,
    OverlapPolicy, Segment, SegmentKind
};

// Re-export collaborator interfaces and their default implementations
pub use actions::{dispatch, Action, ActionHandler, LoggingHandler, RecordingHandler, DEFAULT_DIAL_PREFIX};
pub use detection::{DataDetector, DetectionRules, Detector};
pub use layout::{GridLayout, Layout, Point};
pub use linked_text::LinkedText;
pub use render::{AnsiRenderer, JsonRenderer, PlainRenderer, Renderer};
