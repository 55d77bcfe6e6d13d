//! Rendering then re-parsing reproduces the parsed event stream.

use doxa_babel::common::normalize::normalize;
use doxa_babel::formats::markdown::parser::parse_from_markdown;
use doxa_babel::formats::markdown::serializer::serialize_to_markdown;
use doxa_babel::sink::wellformed::check;
use pretty_assertions::assert_eq;

fn assert_round_trip(md: &str) {
    let first = parse_from_markdown(md).unwrap();
    assert!(check(&first).is_complete());

    let rendered = serialize_to_markdown(&first).unwrap();
    let second = parse_from_markdown(&rendered).unwrap();

    assert_eq!(
        normalize(&first),
        normalize(&second),
        "rendered markdown:\n{rendered}"
    );
}

#[test]
fn test_headings_and_inlines() {
    assert_round_trip(
        "# Title\n\nHello *world* and **bold** with `code_x`.\n\n\
         ## C# and 1.5\n\nPrices 3.5 and a_b [y] <tag> done!\n",
    );
}

#[test]
fn test_lists() {
    assert_round_trip("- one\n- two\n    - nested\n\n1. first\n2. second\n");
}

#[test]
fn test_blocks() {
    assert_round_trip("> quoted text\n\n---\n\n```rust\nfn main() {}\n```\n\nafter\n");
}

#[test]
fn test_table() {
    assert_round_trip(
        "| Name | Value |\n| :--- | ---: |\n| a_b | 1.5 |\n| [l](http://x) | `c` |\n",
    );
}

#[test]
fn test_front_matter() {
    assert_round_trip(
        "---\ntitle: Doc\nauthor:\n  - Ann\n  - Bo\ndate: 2024-01-01\n---\n\nBody text\n",
    );
}

#[test]
fn test_links_images_comments() {
    assert_round_trip(
        "See [the docs](http://example.com/a_b) and ![logo](img/logo.png).\n\n\
         <a id=\"top\"></a>Intro <!-- note -->\n",
    );
}

#[test]
fn test_line_breaks() {
    assert_round_trip("line one\\\nline two\nline three\n");
}

#[test]
fn test_strikethrough() {
    assert_round_trip("some ~~old~~ text\n");
}

#[test]
fn test_blockquote_with_several_blocks() {
    assert_round_trip("> one\n>\n> two\n\nafter\n");
    assert_round_trip("> # quoted\n>\n> - item\n>\n> ```\n> code\n> ```\n");
}

#[test]
fn test_block_as_first_list_item_child() {
    assert_round_trip("- > a\n  >\n  > b\n");
    assert_round_trip("- ```\n  x\n  ```\n- y\n");
}

#[test]
fn test_code_containing_its_delimiters() {
    assert_round_trip("use ``a`b`` here\n");
    assert_round_trip("````\n```\n````\n");
    assert_round_trip("| a | b |\n|---|---|\n| `x\\|y` | z |\n");
}
