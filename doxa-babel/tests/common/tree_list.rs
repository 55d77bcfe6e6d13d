use doxa_babel::common::tree_list::{list_events_from_lines, ListStyle, TreeListBuilder};
use doxa_babel::formats::markdown::parser::parse_from_markdown;
use doxa_babel::formats::markdown::serializer::serialize_to_markdown;
use doxa_babel::sink::{Attributes, Event, Numbering};
use pretty_assertions::assert_eq;

#[test]
fn test_wiki_list_renders_as_nested_markdown() {
    let lines = ["* fruit", "  * apple", "  * pear", "* vegetables", "  1. leek"];
    let events = list_events_from_lines(lines, 2).unwrap();
    let markdown = serialize_to_markdown(&events).unwrap();
    assert_eq!(
        markdown,
        "- fruit\n\n    - apple\n    - pear\n\n- vegetables\n\n    1. leek\n\n"
    );
}

#[test]
fn test_tree_matches_parsed_markdown_structure() {
    let mut builder = TreeListBuilder::new();
    builder.feed(0, ListStyle::Unordered, "a").unwrap();
    builder.feed(1, ListStyle::Unordered, "b").unwrap();
    builder.feed(0, ListStyle::Unordered, "c").unwrap();
    let built = builder.build().to_events();

    let markdown = serialize_to_markdown(&built).unwrap();
    let parsed = parse_from_markdown(&markdown).unwrap();
    let list_shape = |events: &[Event]| -> Vec<String> {
        events
            .iter()
            .filter(|e| e.name().starts_with("list"))
            .map(|e| e.name().into_owned())
            .collect()
    };
    assert_eq!(list_shape(&parsed), list_shape(&built));
}

#[test]
fn test_numbering_style_is_kept_in_events() {
    let events = list_events_from_lines(["a. first", "b. second"], 2).unwrap();
    assert_eq!(events[0], Event::start_numbered_list(Numbering::LowerAlpha));
    assert_eq!(events[1], Event::StartNumberedListItem(Attributes::new()));
    assert_eq!(events.len(), 8);
}
