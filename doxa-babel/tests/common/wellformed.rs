use doxa_babel::formats::markdown::parser::parse_from_markdown;
use doxa_babel::sink::wellformed::{check, WellformednessChecker};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["list", "listItem", "paragraph", "bold"];

/// Replays push/pop choices as a balanced open/close sequence.
fn balanced(ops: &[(bool, usize)]) -> Vec<(bool, &'static str)> {
    let mut stack = Vec::new();
    let mut sequence = Vec::new();
    for (push, index) in ops {
        if *push || stack.is_empty() {
            let name = NAMES[index % NAMES.len()];
            stack.push(name);
            sequence.push((true, name));
        } else if let Some(name) = stack.pop() {
            sequence.push((false, name));
        }
    }
    while let Some(name) = stack.pop() {
        sequence.push((false, name));
    }
    sequence
}

fn run(sequence: &[(bool, &str)]) -> WellformednessChecker {
    let mut checker = WellformednessChecker::new();
    for (open, name) in sequence {
        if *open {
            checker.open(*name);
        } else {
            checker.close(name);
        }
    }
    checker
}

proptest! {
    #[test]
    fn balanced_sequences_are_complete(ops in prop::collection::vec((any::<bool>(), 0usize..4), 0..64)) {
        let checker = run(&balanced(&ops));
        prop_assert!(checker.is_complete());
        prop_assert!(checker.unclosed().is_empty());
    }

    #[test]
    fn dropping_a_closer_is_detected(
        ops in prop::collection::vec((any::<bool>(), 0usize..4), 1..64),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut sequence = balanced(&ops);
        let closers: Vec<usize> = sequence
            .iter()
            .enumerate()
            .filter(|(_, (open, _))| !open)
            .map(|(index, _)| index)
            .collect();
        let removed = closers[pick.index(closers.len())];
        sequence.remove(removed);
        prop_assert!(!run(&sequence).is_complete());
    }
}

#[test]
fn swapped_closers_report_the_offending_pair() {
    let checker = run(&[
        (true, "list"),
        (true, "listItem"),
        (false, "list"),
        (false, "listItem"),
    ]);
    assert!(!checker.is_wellformed());
    let first = &checker.errors()[0];
    assert_eq!(first.closing, "list");
    assert_eq!(first.innermost.as_deref(), Some("listItem"));
}

#[test]
fn parser_output_is_complete() {
    let documents = [
        "# A\n\n## B\n\ntext\n\n### C\n\n# D\n",
        "- a\n    - b\n        1. c\n",
        "> # quoted heading\n>\n> - item\n",
        "| a | b |\n|---|---|\n| *x* | [y](z) |\n",
        "<a id=\"x\">unclosed anchor\n",
        "---\ntitle: T\n---\n\ntext\n",
    ];
    for document in documents {
        let events = parse_from_markdown(document).unwrap();
        let checker = check(&events);
        assert!(
            checker.is_complete(),
            "{document:?}: {:?} / {:?}",
            checker.errors(),
            checker.unclosed()
        );
    }
}
