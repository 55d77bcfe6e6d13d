//! Markdown escaping helpers
//!
//! All functions here are pure. Position-dependent escaping takes an explicit [`LinePosition`]
//! snapshot instead of consulting a writer, so every rule can be tested in isolation.

/// Where the cursor was when a piece of text started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinePosition {
    /// Nothing has been written on the current output line yet.
    pub at_line_start: bool,
    /// The last character on the current output line is a digit.
    pub after_digit: bool,
    /// The text belongs to a heading.
    pub in_heading: bool,
}

impl LinePosition {
    pub fn line_start() -> Self {
        Self {
            at_line_start: true,
            ..Self::default()
        }
    }
}

/// Replaces the mandatory XML entities (`&`, `<`, `>`, `"`).
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escapes text for a Markdown inline context.
///
/// Entities first, then backslashes:
/// - `` \ _ ` [ ] ( ) ! { } `` always
/// - `* + -` when the text starts at the beginning of a line
/// - `#` in headings or when the text starts at the beginning of a line
/// - `.` right after a digit (including a digit already on the output line)
pub fn escape_markdown(text: &str, position: LinePosition) -> String {
    let text = escape_html(text);
    let mut escaped = String::with_capacity(text.len() + text.len() / 4);
    let mut previous_is_digit = position.after_digit;

    for ch in text.chars() {
        let needs_escape = match ch {
            '\\' | '_' | '`' | '[' | ']' | '(' | ')' | '!' | '{' | '}' => true,
            '*' | '+' | '-' => position.at_line_start,
            '#' => position.in_heading || position.at_line_start,
            '.' => previous_is_digit,
            _ => false,
        };
        if needs_escape {
            escaped.push('\\');
        }
        escaped.push(ch);
        previous_is_digit = ch.is_ascii_digit();
    }
    escaped
}

/// [`escape_markdown`] plus the GFM table cell separator.
pub fn escape_table_cell(text: &str, position: LinePosition) -> String {
    escape_markdown(text, position).replace('|', "\\|")
}

/// Escapes a link or image destination.
///
/// Destinations containing whitespace are wrapped in angle brackets.
pub fn escape_link_destination(value: &str) -> String {
    let bracketed = value.chars().any(char::is_whitespace);
    let mut escaped = String::with_capacity(value.len() + 2);
    if bracketed {
        escaped.push('<');
    }
    for ch in value.chars() {
        match ch {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            '<' | '>' if bracketed => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    if bracketed {
        escaped.push('>');
    }
    escaped
}

/// Wraps `comment` in `<!--` `-->`, rewriting sequences an HTML comment may not contain.
///
/// Returns the encoded comment and whether the content had to be modified.
pub fn encode_html_comment(comment: &str) -> (String, bool) {
    let mut content = comment.to_string();
    while content.contains("--") {
        content = content.replace("--", "- -");
    }
    if content.ends_with('-') {
        content.push(' ');
    }
    let modified = content != comment;
    (format!("<!--{content}-->"), modified)
}

/// Whether `id` can be used verbatim as an HTML identifier.
///
/// The first character must be an ASCII letter or `_`; the rest may also be digits, `-` or `.`.
pub fn is_valid_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Turns arbitrary text into a valid identifier.
///
/// Leading and trailing whitespace is dropped, inner spaces become `_`, and any other
/// disallowed character is written as `.XX` per UTF-8 byte. An `a` is prepended when the
/// first character is not a letter or `_`. Returns `None` for blank input.
pub fn encode_id(text: &str) -> Option<String> {
    let text = text.trim();
    let first = text.chars().next()?;

    let mut encoded = String::with_capacity(text.len() + 1);
    if !(first.is_ascii_alphabetic() || first == '_') {
        encoded.push('a');
    }
    for ch in text.chars() {
        match ch {
            ' ' => encoded.push('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') => encoded.push(c),
            c => {
                let mut bytes = [0u8; 4];
                for byte in c.encode_utf8(&mut bytes).bytes() {
                    encoded.push_str(&format!(".{byte:02X}"));
                }
            }
        }
    }
    Some(encoded)
}

/// Wraps `content` in a code span whose backtick run does not occur in the content.
///
/// A space is added inside the delimiters when the content starts or ends with a backtick, or
/// when it both starts and ends with a space (readers strip one space from each side).
pub fn code_span(content: &str) -> String {
    let fence = "`".repeat(longest_backtick_run(content.chars()) + 1);
    let all_spaces = content.chars().all(|c| c == ' ');
    let pad = content.starts_with('`')
        || content.ends_with('`')
        || (!all_spaces && content.starts_with(' ') && content.ends_with(' '));
    let padding = if pad { " " } else { "" };
    format!("{fence}{padding}{content}{padding}{fence}")
}

/// Backtick fence for a code block, longer than any backtick fence line inside `content`.
pub fn code_fence(content: &str) -> String {
    let longest = content
        .lines()
        .map(|line| longest_backtick_run(line.trim_start().chars().take_while(|&c| c == '`')))
        .max()
        .unwrap_or(0);
    "`".repeat((longest + 1).max(3))
}

fn longest_backtick_run(chars: impl Iterator<Item = char>) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for c in chars {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a\"b<c>d&e'"), "a&quot;b&lt;c&gt;d&amp;e'");
    }

    #[test]
    fn test_always_escaped() {
        assert_eq!(
            escape_markdown("a_b `c` [d](e)! {f} \\", LinePosition::default()),
            "a\\_b \\`c\\` \\[d\\]\\(e\\)\\! \\{f\\} \\\\"
        );
    }

    #[test]
    fn test_list_markers_only_at_line_start() {
        assert_eq!(escape_markdown("- a * b + c", LinePosition::default()), "- a * b + c");
        assert_eq!(
            escape_markdown("- a * b + c", LinePosition::line_start()),
            "\\- a \\* b \\+ c"
        );
    }

    #[test]
    fn test_hash() {
        assert_eq!(escape_markdown("C#", LinePosition::default()), "C#");
        assert_eq!(escape_markdown("# x", LinePosition::line_start()), "\\# x");
        let heading = LinePosition {
            in_heading: true,
            ..LinePosition::default()
        };
        assert_eq!(escape_markdown("C#", heading), "C\\#");
    }

    #[test]
    fn test_period_after_digit() {
        assert_eq!(escape_markdown("item1.5", LinePosition::line_start()), "item1\\.5");
        assert_eq!(escape_markdown("end. 3.5", LinePosition::default()), "end. 3\\.5");
        let after_digit = LinePosition {
            after_digit: true,
            ..LinePosition::default()
        };
        assert_eq!(escape_markdown(". x", after_digit), "\\. x");
    }

    #[test]
    fn test_table_cell_pipes() {
        assert_eq!(escape_table_cell("a|b", LinePosition::default()), "a\\|b");
    }

    #[test]
    fn test_link_destination() {
        assert_eq!(escape_link_destination("http://x/(y)"), "http://x/\\(y\\)");
        assert_eq!(escape_link_destination("a b.md"), "<a b.md>");
    }

    #[test]
    fn test_comment_encoding() {
        assert_eq!(encode_html_comment(" ok "), ("<!-- ok -->".to_string(), false));
        assert_eq!(
            encode_html_comment("a--b-"),
            ("<!--a- -b- -->".to_string(), true)
        );
    }

    #[test]
    fn test_ids() {
        assert!(is_valid_id("a-b.c_1"));
        assert!(is_valid_id("_x"));
        assert!(!is_valid_id("1a"));
        assert!(!is_valid_id("a b"));
        assert!(!is_valid_id(""));

        assert_eq!(encode_id("1").as_deref(), Some("a1"));
        assert_eq!(encode_id("a b-c123 ").as_deref(), Some("a_b-c123"));
        assert_eq!(encode_id(" _ ").as_deref(), Some("_"));
        assert_eq!(encode_id("née").as_deref(), Some("n.C3.A9e"));
        assert_eq!(encode_id("   "), None);
    }

    #[test]
    fn test_code_span_delimiters() {
        assert_eq!(code_span("a_b"), "`a_b`");
        assert_eq!(code_span("a`b"), "``a`b``");
        assert_eq!(code_span("x``y`"), "``` x``y` ```");
        assert_eq!(code_span("`"), "`` ` ``");
        assert_eq!(code_span(" a "), "`  a  `");
        assert_eq!(code_span("  "), "`  `");
    }

    #[test]
    fn test_code_fence_outgrows_content() {
        assert_eq!(code_fence("let x = 1;"), "```");
        assert_eq!(code_fence("inline `tick` only"), "```");
        assert_eq!(code_fence("```\nnested\n```"), "````");
        assert_eq!(code_fence("  `````rust"), "``````");
    }
}
