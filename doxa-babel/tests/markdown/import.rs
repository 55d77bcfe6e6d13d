use super::{body, paragraph};
use doxa_babel::formats::markdown::parser::parse_from_markdown;
use doxa_babel::sink::{Attributes, Event, Numbering, SectionLevel};
use pretty_assertions::assert_eq;

fn parse_body(md: &str) -> Vec<Event> {
    let events = parse_from_markdown(md).expect("Failed to parse markdown");
    let start = events
        .iter()
        .position(|event| matches!(event, Event::StartBody(_)))
        .expect("Should have a body");
    events[start..].to_vec()
}

#[test]
fn test_sessions_from_headings() {
    let events = parse_body("# One\n\ntext\n\n## Two\n\n# Three\n");
    let one = SectionLevel::One;
    let two = SectionLevel::Two;
    let mut expected = vec![
        Event::start_section(one),
        Event::start_section_title(one),
        Event::text("One"),
        Event::EndSectionTitle(one),
    ];
    expected.extend(paragraph("text"));
    expected.extend([
        Event::start_section(two),
        Event::start_section_title(two),
        Event::text("Two"),
        Event::EndSectionTitle(two),
        Event::EndSection(two),
        Event::EndSection(one),
        Event::start_section(one),
        Event::start_section_title(one),
        Event::text("Three"),
        Event::EndSectionTitle(one),
        Event::EndSection(one),
    ]);
    assert_eq!(events, body(expected));
}

#[test]
fn test_skipped_heading_level() {
    let events = parse_body("### Deep\n\n# Top\n");
    let names: Vec<_> = events.iter().map(|e| e.name().into_owned()).collect();
    assert_eq!(names[1], "section3");
    assert!(names.contains(&"section3_".to_string()));
    assert_eq!(names[names.len() - 2], "section1_");
}

#[test]
fn test_ordered_list() {
    let events = parse_body("1. a\n2. b\n");
    assert_eq!(events[1], Event::start_numbered_list(Numbering::Decimal));
    assert_eq!(events[2], Event::StartNumberedListItem(Attributes::new()));
    assert_eq!(
        events.iter().filter(|e| **e == Event::EndNumberedListItem).count(),
        2
    );
}

#[test]
fn test_blockquote_and_code() {
    let events = parse_body("> quoted\n\n    indented code\n");
    let mut expected = vec![Event::StartBlockquote(Attributes::new())];
    expected.extend(paragraph("quoted"));
    expected.extend([
        Event::EndBlockquote,
        Event::StartVerbatim(Attributes::new()),
        Event::text("indented code"),
        Event::EndVerbatim,
    ]);
    assert_eq!(events, body(expected));
}

#[test]
fn test_image_and_hard_break() {
    let events = parse_body("![An *image*](pic.png)  \nnext\n");
    assert_eq!(
        events[2],
        Event::figure_graphics("pic.png", Attributes::new().with("alt", "An image"))
    );
    assert_eq!(events[3], Event::LineBreak);
    assert_eq!(events[4], Event::text("next"));
}

#[test]
fn test_unknown_html_is_raw() {
    let events = parse_body("<div>\nhello\n</div>\n");
    match &events[1] {
        Event::RawText(html) => assert_eq!(html.trim_end(), "<div>\nhello\n</div>"),
        other => panic!("Expected raw text, got {other:?}"),
    }
}
