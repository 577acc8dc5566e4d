// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use linked_text::{Match, Segment, SegmentKind};

/// Demo sentence with one link and one international phone number
pub const DEMO_TEXT: &str = "Hello! Go to https://github.com/kalashnikovaYla +7(982)709-77-77";

/// Mixed-script text so byte and character offsets diverge
pub const UNICODE_TEXT: &str = "Привет! Звоните +7 982 709 77 77 или пишите на www.example.ru 🙂";

/// Test fixture helper for creating temporary directories with input files
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self { temp_dir, root_path }
    }

    /// Create a text file with given content
    pub fn create_text_file<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write text file");
        file_path
    }
}

/// Character offset of `needle` in `text`
pub fn char_offset(text: &str, needle: &str) -> usize {
    let byte = text.find(needle).unwrap_or_else(|| panic!("{needle:?} not found in {text:?}"));
    text[..byte].chars().count()
}

/// Link match covering the first occurrence of `needle`
pub fn link_at(text: &str, needle: &str, url: &str) -> Match {
    Match::link(char_offset(text, needle), needle.chars().count(), url)
}

/// Phone match covering the first occurrence of `needle`
pub fn phone_at(text: &str, needle: &str, dial: &str) -> Match {
    Match::phone_number(char_offset(text, needle), needle.chars().count(), dial)
}

/// Compact description of a segment list for readable assertions
pub fn describe(segments: &[Segment<'_>]) -> Vec<(&'static str, String)> {
    segments
        .iter()
        .map(|s| {
            let label = match s.kind {
                SegmentKind::PlainText => "plain",
                SegmentKind::Link { .. } => "link",
                SegmentKind::PhoneNumber { .. } => "phone",
            };
            (label, s.text.to_string())
        })
        .collect()
}
