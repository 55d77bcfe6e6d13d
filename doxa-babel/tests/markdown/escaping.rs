use super::paragraph;
use doxa_babel::formats::markdown::serializer::serialize_to_markdown;
use doxa_babel::sink::{Attributes, Event, SectionLevel};
use pretty_assertions::assert_eq;

fn render(events: &[Event]) -> String {
    serialize_to_markdown(events).unwrap()
}

#[test]
fn test_escaping_table_at_paragraph_start() {
    assert_eq!(
        render(&paragraph("~_=_-_+_*_[_]_<_>_{_}_\\")),
        "~\\_=\\_\\-\\_\\+\\_\\*\\_\\[\\_\\]\\_&lt;\\_&gt;\\_\\{\\_\\}\\_\\\\\n\n"
    );
}

#[test]
fn test_list_markers_only_escaped_at_line_start() {
    assert_eq!(render(&paragraph("- not a list")), "\\- not a list\n\n");
    assert_eq!(render(&paragraph("a - b + c")), "a - b + c\n\n");
}

#[test]
fn test_period_after_digit() {
    assert_eq!(render(&paragraph("1. not a list")), "1\\. not a list\n\n");

    // the digit was written by an earlier text event
    let events = vec![
        Event::StartParagraph(Attributes::new()),
        Event::text("item1"),
        Event::text(".5"),
        Event::EndParagraph,
    ];
    assert_eq!(render(&events), "item1\\.5\n\n");
}

#[test]
fn test_hash_in_heading() {
    let events = vec![
        Event::start_section_title(SectionLevel::Two),
        Event::text("C# notes"),
        Event::EndSectionTitle(SectionLevel::Two),
    ];
    assert_eq!(render(&events), "## C\\# notes\n\n");
    assert_eq!(render(&paragraph("C# notes")), "C# notes\n\n");
}

#[test]
fn test_code_is_verbatim() {
    let events = vec![
        Event::StartVerbatim(Attributes::new().with("language", "md")),
        Event::text("# _not_ *escaped* <b>"),
        Event::EndVerbatim,
    ];
    assert_eq!(render(&events), "```md\n# _not_ *escaped* <b>\n```\n\n");
}

#[test]
fn test_inner_lines_get_container_prefix() {
    let mut events = vec![
        Event::StartList(Attributes::new()),
        Event::StartListItem(Attributes::new()),
    ];
    events.extend(paragraph("first\nsecond"));
    events.extend([Event::EndListItem, Event::EndList]);
    assert_eq!(render(&events), "- first\n    second\n\n");
}
