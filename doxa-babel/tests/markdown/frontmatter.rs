use doxa_babel::format::Format;
use doxa_babel::formats::markdown::MarkdownFormat;
use doxa_babel::sink::{Attributes, Event};
use pretty_assertions::assert_eq;

#[test]
fn test_front_matter_import() {
    let md = "---\ntitle: 'Quoted Title'\nauthor: Solo\ntags: [a, b]\n---\n\n# Heading\n";
    let events = MarkdownFormat::default().parse(md).unwrap();
    assert_eq!(
        &events[..8],
        &[
            Event::StartHead(Attributes::new()),
            Event::StartTitle(Attributes::new()),
            Event::text("Quoted Title"),
            Event::EndTitle,
            Event::StartAuthor(Attributes::new()),
            Event::text("Solo"),
            Event::EndAuthor,
            Event::EndHead,
        ]
    );
}

#[test]
fn test_front_matter_round_trip() {
    let md = "---\ntitle: Doc\nauthor:\n  - Ann\n  - Bo\ndate: 2024-01-01\n---\n\nBody text\n";
    let format = MarkdownFormat::default();
    let output = format.serialize(&format.parse(md).unwrap()).unwrap();
    assert_eq!(output, format!("{md}\n"));
}

#[test]
fn test_empty_head_writes_nothing() {
    let events = vec![
        Event::StartHead(Attributes::new()),
        Event::EndHead,
        Event::StartBody(Attributes::new()),
        Event::StartParagraph(Attributes::new()),
        Event::text("x"),
        Event::EndParagraph,
        Event::EndBody,
    ];
    assert_eq!(MarkdownFormat::default().serialize(&events).unwrap(), "x\n\n");
}
