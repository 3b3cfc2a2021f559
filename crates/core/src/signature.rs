//! Signature normalization.
//!
//! Produces a canonical string for a function's parameter list and trailing
//! qualifiers. Parameter names, default values and incidental whitespace are
//! erased; parameter types, cv-qualification of the function itself and
//! ref-qualifiers are preserved, so overloads never share a signature.

/// Tokens that are always part of a type, never a parameter name.
const TYPE_KEYWORDS: &[&str] = &[
    "void", "bool", "char", "short", "int", "long", "signed", "unsigned", "float", "double",
    "auto", "const", "size_t", "wchar_t", "char8_t", "char16_t", "char32_t",
];

/// Elaborated-type keywords: the identifier after them is the type name.
const ELABORATED_KEYWORDS: &[&str] = &["struct", "class", "enum", "union"];

pub(crate) fn normalize_signature(raw_params: &str, raw_tail: &str) -> String {
    let params = collapse_whitespace(raw_params);
    let mut normalized = Vec::new();
    if !params.is_empty() {
        for entry in split_top_level(&params) {
            let entry = truncate_default_value(entry);
            let entry = strip_parameter_name(entry.trim());
            let entry = drop_noise_qualifiers(&entry);
            normalized.push(tighten_punctuation(&entry));
        }
    }
    let args = normalized.join(",");

    let tail = tighten_punctuation(&collapse_whitespace(raw_tail));
    if tail.is_empty() { args } else { format!("{args}|{tail}") }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split on commas that are not nested inside template angle brackets.
fn split_top_level(params: &str) -> Vec<&str> {
    let mut entries = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, b) in params.bytes().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                entries.push(&params[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    entries.push(&params[start..]);
    entries
}

/// Cut a trailing `= default-value` at the first top-level `=`.
fn truncate_default_value(entry: &str) -> &str {
    let mut depth = 0usize;
    for (i, b) in entry.bytes().enumerate() {
        match b {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b'=' if depth == 0 => return &entry[..i],
            _ => {}
        }
    }
    entry
}

/// Remove a trailing parameter name while keeping the type, including
/// pointer/reference markers and array brackets. A lone token, a builtin type
/// keyword, the segment after `::`, or the identifier after an elaborated-type
/// keyword is part of the type and stays.
fn strip_parameter_name(entry: &str) -> String {
    let mut rest = entry.trim_end();
    let mut brackets = String::new();
    while rest.ends_with(']') {
        let Some(open) = rest.rfind('[') else { break };
        brackets.insert_str(0, &rest[open..]);
        rest = rest[..open].trim_end();
    }

    let bytes = rest.as_bytes();
    let mut start = rest.len();
    while start > 0 && (bytes[start - 1].is_ascii_alphanumeric() || bytes[start - 1] == b'_') {
        start -= 1;
    }
    let ident = &rest[start..];
    let before = rest[..start].trim_end();

    let keep_ident = ident.is_empty()
        || ident.as_bytes()[0].is_ascii_digit()
        || TYPE_KEYWORDS.contains(&ident)
        || before.is_empty()
        || before.ends_with(':')
        || ends_with_elaborated_keyword(before);

    let base = if keep_ident { rest } else { before };
    if brackets.is_empty() { base.to_string() } else { format!("{base}{brackets}") }
}

fn ends_with_elaborated_keyword(before: &str) -> bool {
    let last = before.rsplit([' ', '*', '&']).next().unwrap_or("");
    ELABORATED_KEYWORDS.contains(&last)
}

fn drop_noise_qualifiers(entry: &str) -> String {
    entry
        .split(' ')
        .filter(|tok| *tok != "register" && *tok != "volatile" && !tok.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove spaces next to `*`, `&`, `,`, `<`, `>` so spelling variants like
/// `int *` / `int*` and `map<int, T>` / `map<int,T>` compare equal.
fn tighten_punctuation(entry: &str) -> String {
    const MARKERS: [char; 5] = ['*', '&', ',', '<', '>'];
    let chars: Vec<char> = entry.chars().collect();
    let mut out = String::with_capacity(entry.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev_marker = out.chars().next_back().is_some_and(|p| MARKERS.contains(&p));
            let next_marker = chars[i + 1..]
                .iter()
                .find(|&&n| n != ' ')
                .is_some_and(|n| MARKERS.contains(n));
            if prev_marker || next_marker {
                continue;
            }
        }
        out.push(c);
    }
    out
}
