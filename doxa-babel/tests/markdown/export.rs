use super::{body, paragraph};
use doxa_babel::error::{FormatError, SinkError};
use doxa_babel::format::Format;
use doxa_babel::formats::markdown::MarkdownFormat;
use doxa_babel::sink::{Attributes, Event, Numbering, SectionLevel};
use pretty_assertions::assert_eq;

fn render(events: &[Event]) -> String {
    MarkdownFormat::default()
        .serialize(events)
        .expect("Failed to serialize markdown")
}

fn in_paragraph(inner: Vec<Event>) -> Vec<Event> {
    let mut events = vec![Event::StartParagraph(Attributes::new())];
    events.extend(inner);
    events.push(Event::EndParagraph);
    events
}

#[test]
fn test_section_heading_and_paragraph() {
    let mut events = vec![
        Event::start_section(SectionLevel::One),
        Event::start_section_title(SectionLevel::One),
        Event::text("Title"),
        Event::EndSectionTitle(SectionLevel::One),
    ];
    events.extend(paragraph("Hello"));
    events.push(Event::EndSection(SectionLevel::One));
    assert_eq!(render(&body(events)), "# Title\n\nHello\n\n");
}

#[test]
fn test_inline_styles() {
    let events = in_paragraph(vec![
        Event::text("a "),
        Event::StartBold,
        Event::text("b"),
        Event::EndBold,
        Event::text(" "),
        Event::StartItalic,
        Event::text("c"),
        Event::EndItalic,
        Event::text(" "),
        Event::StartMonospaced,
        Event::text("d_e"),
        Event::EndMonospaced,
        Event::text(" "),
        Event::StartInline(Attributes::semantics("delete")),
        Event::text("f"),
        Event::EndInline,
    ]);
    assert_eq!(render(&events), "a **b** _c_ `d_e` ~~f~~\n\n");
}

#[test]
fn test_link_with_spaces_in_target() {
    let events = in_paragraph(vec![
        Event::start_link("docs/a b.md"),
        Event::text("t"),
        Event::EndLink,
    ]);
    assert_eq!(render(&events), "[t](<docs/a b.md>)\n\n");
}

#[test]
fn test_image_alt_is_escaped() {
    let events = in_paragraph(vec![Event::figure_graphics(
        "img.png",
        Attributes::new().with("alt", "A [b]"),
    )]);
    assert_eq!(render(&events), "![A \\[b\\]](img.png)\n\n");
}

#[test]
fn test_figure_caption_becomes_alt_text() {
    let events = vec![
        Event::StartFigure(Attributes::new()),
        Event::figure_graphics("img.png", Attributes::new()),
        Event::StartFigureCaption(Attributes::new()),
        Event::text("cap"),
        Event::EndFigureCaption,
        Event::EndFigure,
    ];
    assert_eq!(render(&events), "![cap](img.png)");
}

#[test]
fn test_numbered_list_counts_items() {
    let list = |numbering| {
        vec![
            Event::start_numbered_list(numbering),
            Event::StartNumberedListItem(Attributes::new()),
            Event::text("one"),
            Event::EndNumberedListItem,
            Event::StartNumberedListItem(Attributes::new()),
            Event::text("two"),
            Event::EndNumberedListItem,
            Event::EndNumberedList,
        ]
    };
    assert_eq!(render(&list(Numbering::Decimal)), "1. one\n2. two\n\n");
    // other styles degrade to decimal
    assert_eq!(render(&list(Numbering::UpperRoman)), "1. one\n2. two\n\n");
}

#[test]
fn test_horizontal_rule_between_paragraphs() {
    let mut events = paragraph("a");
    events.push(Event::HorizontalRule);
    events.extend(paragraph("b"));
    assert_eq!(render(&events), "a\n\n========\n\nb\n\n");
}

#[test]
fn test_hard_line_break() {
    let events = in_paragraph(vec![Event::text("a"), Event::LineBreak, Event::text("b")]);
    assert_eq!(render(&events), "a\\\nb\n\n");
}

#[test]
fn test_comment_anchor_and_nbsp() {
    let events = in_paragraph(vec![
        Event::start_anchor("my id"),
        Event::EndAnchor,
        Event::text("a"),
        Event::NonBreakingSpace,
        Event::text("b"),
        Event::Comment("x--y".to_string()),
    ]);
    assert_eq!(
        render(&events),
        "<a id=\"my_id\"></a>a&nbsp;b<!--x- -y-->\n\n"
    );
}

#[test]
fn test_link_inside_code_block_is_dropped() {
    let events = vec![
        Event::StartVerbatim(Attributes::new()),
        Event::start_link("http://x"),
        Event::text("x"),
        Event::EndLink,
        Event::EndVerbatim,
    ];
    assert_eq!(render(&events), "```\nx\n```\n\n");
}

#[test]
fn test_unsupported_events_are_skipped() {
    let mut events = paragraph("a");
    events.push(Event::PageBreak);
    events.push(Event::Unknown {
        name: "footnote".to_string(),
        params: vec![],
        attributes: Attributes::new(),
    });
    events.extend(paragraph("b"));
    assert_eq!(render(&events), "a\n\nb\n\n");
}

#[test]
fn test_context_mismatch_is_fatal() {
    let events = vec![Event::StartBlockquote(Attributes::new()), Event::EndListItem];
    let error = MarkdownFormat::default().serialize(&events).unwrap_err();
    match error {
        FormatError::Sink(SinkError::ContextMismatch { expected, found }) => {
            assert_eq!(expected, "list item");
            assert_eq!(found, "blockquote");
        }
        other => panic!("Expected context mismatch, got {other:?}"),
    }
}
