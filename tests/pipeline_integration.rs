// End-to-end tests: detection -> segments -> rendering -> tap routing
// WHY: Each stage is unit tested alone; these tests pin down how the stages fit together

use linked_text::reader;
use linked_text::{
    build, resolve, Action, AnsiRenderer, CharPos, DataDetector, GridLayout, JsonRenderer, LinkedText, Match,
    MatchSet, PlainRenderer, Point, RecordingHandler, Renderer,
};

#[path = "integration/mod.rs"]
mod test_utils;
use test_utils::*;

const CALL_TEXT: &str = "Call +15551234567 or visit https://example.com now";

fn call_matches() -> MatchSet {
    MatchSet::new(
        vec![link_at(CALL_TEXT, "https://example.com", "https://example.com")],
        vec![phone_at(CALL_TEXT, "+15551234567", "+15551234567")],
    )
}

#[test]
fn test_build_splits_call_text() {
    let set = call_matches();
    let matches: Vec<Match> = set.all().cloned().collect();
    let segments = build(CALL_TEXT, &matches).expect("Segments should build");

    assert_eq!(
        describe(&segments),
        vec![
            ("plain", "Call ".to_string()),
            ("phone", "+15551234567".to_string()),
            ("plain", " or visit ".to_string()),
            ("link", "https://example.com".to_string()),
            ("plain", " now".to_string()),
        ]
    );
}

#[test]
fn test_resolve_call_text() {
    let set = call_matches();

    let hit = resolve(&set, CharPos(10)).expect("Offset 10 is inside the phone number");
    assert_eq!(hit.payload(), "+15551234567");
    assert!(resolve(&set, CharPos(3)).is_none());
}

#[test]
fn test_detector_finds_demo_matches() {
    let detector = DataDetector::with_default_rules().expect("Default rules should compile");
    let linked = LinkedText::new(DEMO_TEXT, &detector);

    assert_eq!(
        describe(&linked.segments()),
        vec![
            ("plain", "Hello! Go to ".to_string()),
            ("link", "https://github.com/kalashnikovaYla".to_string()),
            ("plain", " ".to_string()),
            ("phone", "+7(982)709-77-77".to_string()),
        ]
    );

    let phone_start = char_offset(DEMO_TEXT, "+7(982)");
    assert_eq!(
        linked.action_at_offset(CharPos(phone_start + 3)),
        Some(Action::Dial {
            url: "tel://+79827097777".to_string()
        })
    );
}

#[test]
fn test_unicode_text_uses_char_offsets() {
    let detector = DataDetector::with_default_rules().expect("Default rules should compile");
    let linked = LinkedText::new(UNICODE_TEXT, &detector);

    let matches = linked.matches();
    assert_eq!(matches.links.len(), 1);
    assert_eq!(matches.phone_numbers.len(), 1);

    let link = &matches.links[0];
    assert_eq!(link.start, CharPos(char_offset(UNICODE_TEXT, "www.example.ru")));
    assert_eq!(link.length, "www.example.ru".len());
    assert_eq!(link.payload(), "https://www.example.ru");

    let phone = &matches.phone_numbers[0];
    assert_eq!(phone.start, CharPos(char_offset(UNICODE_TEXT, "+7 982")));
    assert_eq!(phone.payload(), "+79827097777");

    // Plain rendering must give back the text untouched
    assert_eq!(linked.render(&PlainRenderer).unwrap(), UNICODE_TEXT);
}

#[test]
fn test_tap_through_wrapped_layout() {
    let detector = DataDetector::with_default_rules().expect("Default rules should compile");
    let linked = LinkedText::new(CALL_TEXT, &detector);

    // Width 20 wraps as "Call +15551234567 or " / "visit " / "https://example.com " / "now"
    let layout = GridLayout::new(1.0, 1.0, Some(20));
    let mut handler = RecordingHandler::default();

    assert!(linked.tap(&layout, Point::new(7.0, 0.0), &mut handler));
    assert!(linked.tap(&layout, Point::new(3.0, 2.0), &mut handler));
    assert!(!linked.tap(&layout, Point::new(1.0, 1.0), &mut handler));
    assert!(!linked.tap(&layout, Point::new(0.0, 9.0), &mut handler));

    assert_eq!(
        handler.actions,
        vec![
            Action::Dial {
                url: "tel://+15551234567".to_string()
            },
            Action::OpenLink {
                url: "https://example.com".to_string()
            },
        ]
    );
}

#[test]
fn test_text_without_matches_ignores_taps() {
    let detector = DataDetector::with_default_rules().expect("Default rules should compile");
    let linked = LinkedText::new("Nothing to see here.", &detector);

    assert!(linked.matches().is_empty());
    assert!(!linked.accepts_tap(&GridLayout::default(), Point::new(2.0, 0.0)));
    assert_eq!(linked.segments().len(), 1);
}

#[test]
fn test_renderers_agree_on_segment_text() {
    let linked = LinkedText::with_matches(CALL_TEXT, call_matches());

    let ansi = AnsiRenderer::new(false, "tel://").render(&linked.segments()).unwrap();
    let stripped = ansi.replace("\x1b[34;4m", "").replace("\x1b[0m", "");
    assert_eq!(stripped, CALL_TEXT);

    let json = linked.render(&JsonRenderer::default()).unwrap();
    let records: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(records.len(), 5);
    assert_eq!(records[1]["kind"], "phone_number");
    assert_eq!(records[1]["target"], "+15551234567");
    assert_eq!(records[3]["start"], 27);
    assert_eq!(records[3]["end"], 46);
}

#[tokio::test]
async fn test_file_to_segments() {
    let fixture = TestFixture::new();
    let path = fixture.create_text_file("notes/contact.txt", "Reach us at 555-123-4567.\nDocs: http://docs.example.org/start.\n");

    let content = reader::read_file_async(&path).await.expect("File reading should succeed");
    let detector = DataDetector::with_default_rules().expect("Default rules should compile");
    let linked = LinkedText::new(content, &detector);

    assert_eq!(linked.matches().phone_numbers[0].payload(), "5551234567");
    assert_eq!(linked.matches().links[0].payload(), "http://docs.example.org/start");

    let segments = linked.segments();
    let rebuilt: String = segments.iter().map(|s| s.text).collect();
    assert_eq!(rebuilt, linked.text());
}
