//! Leading-whitespace helpers for splicing.

/// `s` without its first `n` characters; empty if `s` is shorter.
pub(crate) fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[i..],
        None => "",
    }
}

/// Number of leading whitespace characters.
pub(crate) fn leading_width(s: &str) -> usize {
    s.chars().take_while(|c| c.is_whitespace()).count()
}

fn is_indent(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let n = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..n]
}

/// Remove the leading spaces/tabs common to every non-blank line.
///
/// Lines holding only spaces/tabs become empty and do not constrain the
/// margin. Mixed tabs and spaces only share the literally equal prefix.
pub(crate) fn dedent_block(text: &str) -> String {
    let mut margin: Option<&str> = None;
    for line in text.split('\n') {
        let content = line.trim_start_matches(is_indent);
        if content.is_empty() {
            continue;
        }
        let indent = &line[..line.len() - content.len()];
        margin = Some(match margin {
            None => indent,
            Some(m) => common_prefix(m, indent),
        });
    }
    let margin = margin.unwrap_or("");

    text.split('\n')
        .map(|line| {
            if line.trim_start_matches(is_indent).is_empty() {
                ""
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
