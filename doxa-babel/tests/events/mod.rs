//! Debug event formats

use doxa_babel::format::Format;
use doxa_babel::formats::events::{EventsFormat, EventsJsonFormat};
use doxa_babel::registry::FormatRegistry;
use doxa_babel::sink::{Attributes, Event, Justification, Numbering, SectionLevel};

#[test]
fn test_markdown_listing_snapshot() {
    let registry = FormatRegistry::with_defaults();
    let events = registry.parse("# Title\n\nSome *text*.\n", "markdown").unwrap();
    let listing = EventsFormat.serialize(&events).unwrap();
    insta::assert_snapshot!(listing, @r###"
    head
    head_
    body
      section1
        sectionTitle1
          text "Title"
        sectionTitle1_
        paragraph
          text "Some "
          italic
            text "text"
          italic_
          text "."
        paragraph_
      section1_
    body_
    "###);
}

#[test]
fn test_json_wire_shape() {
    let events = vec![
        Event::start_section(SectionLevel::Two),
        Event::start_numbered_list(Numbering::UpperRoman),
        Event::start_table_rows(vec![Justification::Center]),
        Event::LineBreak,
    ];
    let json: serde_json::Value =
        serde_json::from_str(&EventsJsonFormat.serialize(&events).unwrap()).unwrap();
    assert_eq!(json[0]["startSection"]["level"], 2);
    assert_eq!(json[1]["startNumberedList"]["numbering"], "upper-roman");
    assert_eq!(json[2]["startTableRows"]["justification"][0], "center");
    assert_eq!(json[3], "lineBreak");
}

#[test]
fn test_json_roundtrip_keeps_attributes() {
    let events = vec![
        Event::StartVerbatim(Attributes::new().with("language", "rust")),
        Event::text("fn main() {}"),
        Event::EndVerbatim,
    ];
    let format = EventsJsonFormat;
    let parsed = format.parse(&format.serialize(&events).unwrap()).unwrap();
    assert_eq!(parsed, events);
}

#[test]
fn test_invalid_section_level_is_rejected() {
    let result = EventsJsonFormat.parse(r#"[{"endSection":7}]"#);
    assert!(result.is_err());
}
