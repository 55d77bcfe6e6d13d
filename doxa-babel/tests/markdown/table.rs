use doxa_babel::format::Format;
use doxa_babel::formats::markdown::MarkdownFormat;
use doxa_babel::sink::{Attributes, Event, Justification};
use pretty_assertions::assert_eq;

fn row(header: bool, cells: &[&str]) -> Vec<Event> {
    let mut events = vec![Event::StartTableRow(Attributes::new())];
    for cell in cells {
        if header {
            events.push(Event::StartTableHeaderCell(Attributes::new()));
            events.push(Event::text(*cell));
            events.push(Event::EndTableHeaderCell);
        } else {
            events.push(Event::StartTableCell(Attributes::new()));
            events.push(Event::text(*cell));
            events.push(Event::EndTableCell);
        }
    }
    events.push(Event::EndTableRow);
    events
}

fn table(justification: Vec<Justification>, rows: Vec<Vec<Event>>) -> Vec<Event> {
    let mut events = vec![
        Event::StartTable(Attributes::new()),
        Event::start_table_rows(justification),
    ];
    events.extend(rows.into_iter().flatten());
    events.extend([Event::EndTableRows, Event::EndTable]);
    events
}

#[test]
fn test_header_row_is_synthesized() {
    let events = table(vec![], vec![row(false, &["a", "b"])]);
    let output = MarkdownFormat::default().serialize(&events).unwrap();
    assert_eq!(output, "|   |   |\n|---|---|\n|a|b|\n\n");
}

#[test]
fn test_alignment_import() {
    let md = "| Left | Center | Right | None |\n| :--- | :----: | ----: | --- |\n| L | C | R | N |\n";
    let events = MarkdownFormat::default().parse(md).unwrap();
    let justification = events
        .iter()
        .find_map(|event| match event {
            Event::StartTableRows { justification, .. } => Some(justification.clone()),
            _ => None,
        })
        .expect("Should have table rows");
    assert_eq!(
        justification,
        vec![
            Justification::Left,
            Justification::Center,
            Justification::Right,
            Justification::Default,
        ]
    );
}

#[test]
fn test_table_round_trip() {
    let md = "| Header 1 | Header 2 |\n| :--- | :---: |\n| Cell 1 | a\\|b |\n";
    let format = MarkdownFormat::default();
    let events = format.parse(md).unwrap();
    let output = format.serialize(&events).unwrap();
    assert_eq!(
        output,
        "|Header 1|Header 2|\n|:---|:---:|\n|Cell 1|a\\|b|\n\n"
    );
}

#[test]
fn test_cells_are_escaped() {
    let events = table(
        vec![Justification::Right],
        vec![row(true, &["n"]), row(false, &["1.5"]), row(false, &["a_b"])],
    );
    let output = MarkdownFormat::default().serialize(&events).unwrap();
    assert_eq!(output, "|n|\n|---:|\n|1\\.5|\n|a\\_b|\n\n");
}
