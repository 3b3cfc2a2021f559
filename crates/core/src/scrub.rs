//! Comment and literal scrubbing.
//!
//! Replaces comment text and string/char literal contents with spaces so the
//! structural scanner never mistakes them for code. Output has the same byte
//! length as the input and every newline stays at its original offset, which
//! keeps all downstream byte offsets and line numbers valid.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    LineComment,
    BlockComment,
    Literal(u8),
}

/// Never fails: unterminated comments and literals extend to end of input.
pub(crate) fn scrub_comments_and_strings(src: &[u8]) -> Vec<u8> {
    let n = src.len();
    let mut out = Vec::with_capacity(n);
    let mut state = State::Normal;
    let mut i = 0;

    while i < n {
        let b = src[i];
        match state {
            State::Normal => {
                if b == b'/' && i + 1 < n && src[i + 1] == b'/' {
                    out.push(b' ');
                    out.push(b' ');
                    i += 2;
                    state = State::LineComment;
                } else if b == b'/' && i + 1 < n && src[i + 1] == b'*' {
                    out.push(b' ');
                    out.push(b' ');
                    i += 2;
                    state = State::BlockComment;
                } else if b == b'"' || b == b'\'' {
                    out.push(b);
                    i += 1;
                    state = State::Literal(b);
                } else {
                    // A lone '/' (division) falls through here verbatim.
                    out.push(b);
                    i += 1;
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    out.push(b'\n');
                    state = State::Normal;
                } else {
                    out.push(b' ');
                }
                i += 1;
            }
            State::BlockComment => {
                if b == b'*' && i + 1 < n && src[i + 1] == b'/' {
                    out.push(b' ');
                    out.push(b' ');
                    i += 2;
                    state = State::Normal;
                } else {
                    out.push(if b == b'\n' { b'\n' } else { b' ' });
                    i += 1;
                }
            }
            State::Literal(quote) => {
                if b == b'\\' {
                    // Escape consumes two bytes; both are literal content.
                    out.push(b' ');
                    i += 1;
                    if i < n {
                        out.push(if src[i] == b'\n' { b'\n' } else { b' ' });
                        i += 1;
                    }
                } else if b == quote {
                    out.push(quote);
                    i += 1;
                    state = State::Normal;
                } else {
                    out.push(if b == b'\n' { b'\n' } else { b' ' });
                    i += 1;
                }
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrub_str(src: &str) -> String {
        String::from_utf8(scrub_comments_and_strings(src.as_bytes())).expect("scrub output is utf-8")
    }

    fn newline_offsets(text: &str) -> Vec<usize> {
        text.bytes()
            .enumerate()
            .filter_map(|(i, b)| (b == b'\n').then_some(i))
            .collect()
    }

    #[test]
    fn preserves_length_and_newlines() {
        let inputs = [
            "int a; // trailing comment\nint b;\n",
            "/* block\nspanning\nlines */ int c;\n",
            "const char* s = \"with // fake\\n comment\";\n",
            "char c = '\\'';\nint after = 0;\n",
            "a /= b; a / b;\n",
            "/* unterminated\ncomment",
            "\"unterminated string\nint real = 1;",
        ];
        for input in inputs {
            let scrubbed = scrub_str(input);
            assert_eq!(scrubbed.len(), input.len(), "length changed for {input:?}");
            assert_eq!(
                newline_offsets(&scrubbed),
                newline_offsets(input),
                "newline offsets moved for {input:?}"
            );
        }
    }

    #[test]
    fn blanks_line_comment_contents() {
        let scrubbed = scrub_str("x; // int fake() { return 1; }\ny;");
        assert!(!scrubbed.contains("fake"));
        assert!(!scrubbed.contains('{'));
        assert!(scrubbed.starts_with("x; "));
        assert!(scrubbed.ends_with("\ny;"));
    }

    #[test]
    fn blanks_block_comment_but_keeps_newlines() {
        let scrubbed = scrub_str("a/* {}; */b\nc/* x\ny */d");
        assert_eq!(&scrubbed[..1], "a");
        assert!(!scrubbed.contains('{'));
        assert_eq!(scrubbed.matches('\n').count(), 2);
    }

    #[test]
    fn keeps_quote_delimiters_but_blanks_contents() {
        let scrubbed = scrub_str("s = \"a{b}c\";");
        assert_eq!(scrubbed, "s = \"     \";");
    }

    #[test]
    fn escaped_quote_does_not_end_literal() {
        let scrubbed = scrub_str("s = \"a\\\"}{\"; int x;");
        assert!(!scrubbed.contains('}'));
        assert!(scrubbed.ends_with("int x;"));
    }

    #[test]
    fn division_slash_is_left_alone() {
        assert_eq!(scrub_str("a = b / c;"), "a = b / c;");
        assert_eq!(scrub_str("a/"), "a/");
    }
}
