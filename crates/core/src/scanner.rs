//! Structural scanner.
//!
//! Walks scrubbed source once, tracking a namespace/class scope stack, and
//! emits type-definition and function-definition records. This is a
//! best-effort lexical scan, not a parser: it must never panic on malformed
//! input, and it trades false negatives around exotic macros for robustness.

use crate::scrub::scrub_comments_and_strings;
use crate::signature::normalize_signature;
use crate::types::{FuncDef, TypeDef};
use crate::util::{LineIndex, fnv1a64};

const CONTROL_KEYWORDS: &[&str] = &["if", "for", "while", "switch", "catch", "return"];

/// Lookback used to spot `inline` / `template <...>` before a definition.
const PREFIX_WINDOW: usize = 200;
/// Lookahead used to decide type definition vs. declaration.
const TYPE_LOOKAHEAD: usize = 512;
/// Body bytes hashed when a definition never closes its brace.
const UNTERMINATED_BODY_SPAN: usize = 200;

/// A namespace or class scope. The depth tag is what keeps popping exact: a
/// closing brace only pops the frame whose opening brace it matches, so
/// braces inside function bodies never disturb the stack.
#[derive(Debug)]
struct ScopeFrame {
    /// None for an anonymous namespace, which scopes but contributes no segment.
    name: Option<String>,
    /// Brace depth just before this scope's opening `{`.
    brace_depth: usize,
}

#[derive(Debug, Default)]
pub(crate) struct FileDefs {
    pub(crate) type_defs: Vec<TypeDef>,
    pub(crate) func_defs: Vec<FuncDef>,
}

pub(crate) fn scan_definitions(source: &[u8], file: &str) -> FileDefs {
    let scrubbed = scrub_comments_and_strings(source);
    let lines = LineIndex::new(&scrubbed);
    let mut scanner = Scanner {
        text: &scrubbed,
        file,
        lines,
        pos: 0,
        depth: 0,
        scopes: Vec::new(),
        defs: FileDefs::default(),
    };
    scanner.run();
    scanner.defs
}

struct Scanner<'a> {
    text: &'a [u8],
    file: &'a str,
    lines: LineIndex,
    pos: usize,
    depth: usize,
    scopes: Vec<ScopeFrame>,
    defs: FileDefs,
}

impl Scanner<'_> {
    fn run(&mut self) {
        while self.pos < self.text.len() {
            let b = self.text[self.pos];
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else if is_ident_start(b) {
                self.identifier();
            } else if b == b'(' {
                if !self.function_candidate(self.pos) {
                    self.pos += 1;
                }
            } else if b == b'{' {
                self.depth += 1;
                self.pos += 1;
            } else if b == b'}' {
                self.depth = self.depth.saturating_sub(1);
                if self
                    .scopes
                    .last()
                    .is_some_and(|frame| frame.brace_depth == self.depth)
                {
                    self.scopes.pop();
                }
                self.pos += 1;
            } else {
                self.pos += 1;
            }
        }
    }

    fn identifier(&mut self) {
        let start = self.pos;
        let end = self.ident_end(start);
        let handled = match &self.text[start..end] {
            b"namespace" => self.namespace_block(end),
            b"class" | b"struct" | b"union" | b"enum" => self.type_definition(start, end),
            _ => false,
        };
        if !handled {
            self.pos = end;
        }
    }

    /// `namespace [a[::b...]] {` opens a namespace scope. Anything else after
    /// the keyword (an alias, a using-directive target) is left to the walk.
    fn namespace_block(&mut self, after_kw: usize) -> bool {
        let mut k = self.skip_ws(after_kw);
        let mut segments: Vec<String> = Vec::new();
        loop {
            let end = self.ident_end(k);
            if end == k {
                break;
            }
            segments.push(String::from_utf8_lossy(&self.text[k..end]).into_owned());
            let next = self.skip_ws(end);
            if next + 1 < self.text.len() && self.text[next] == b':' && self.text[next + 1] == b':'
            {
                k = self.skip_ws(next + 2);
            } else {
                k = next;
                break;
            }
        }
        if self.text.get(k) != Some(&b'{') {
            return false;
        }
        let name = if segments.is_empty() {
            None
        } else {
            Some(segments.join("::"))
        };
        self.scopes.push(ScopeFrame {
            name,
            brace_depth: self.depth,
        });
        self.depth += 1;
        self.pos = k + 1;
        true
    }

    /// `class|struct|union|enum [class|struct] Name ... {` is a definition;
    /// a `;`, `=`, `(`, `)` or `}` before the `{` means declaration, variable,
    /// cast or return type, which produce no record.
    fn type_definition(&mut self, start: usize, after_kw: usize) -> bool {
        // `class T` inside `template <...>` introduces a parameter, not a type.
        if matches!(self.prev_non_ws(start), Some(b'<') | Some(b',')) {
            return false;
        }
        let is_enum = &self.text[start..after_kw] == b"enum";
        let mut k = self.skip_ws(after_kw);
        if is_enum {
            let end = self.ident_end(k);
            if matches!(&self.text[k..end], b"class" | b"struct") {
                k = self.skip_ws(end);
            }
        }
        let name_end = self.ident_end(k);
        if name_end == k {
            return false;
        }
        let name = String::from_utf8_lossy(&self.text[k..name_end]).into_owned();

        let limit = (name_end + TYPE_LOOKAHEAD).min(self.text.len());
        let mut brace = None;
        for i in name_end..limit {
            match self.text[i] {
                b'{' => {
                    brace = Some(i);
                    break;
                }
                b';' | b'=' | b'(' | b')' | b'}' => break,
                _ => {}
            }
        }
        let Some(brace) = brace else {
            return false;
        };

        self.defs.type_defs.push(TypeDef {
            qualified_name: self.qualified_in_scope(&name),
            file: self.file.to_string(),
            line: self.lines.line_of(start),
        });
        self.scopes.push(ScopeFrame {
            name: Some(name),
            brace_depth: self.depth,
        });
        self.depth += 1;
        self.pos = brace + 1;
        true
    }

    /// At `(`: backtrack a candidate name, take the balanced group as the raw
    /// parameter list, then scan forward over tail qualifiers. `;` first means
    /// declaration (no record); `{` first means definition.
    fn function_candidate(&mut self, open_pos: usize) -> bool {
        let Some(name) = self.backtrack_name(open_pos) else {
            return false;
        };
        if is_control_keyword(&name) {
            return false;
        }
        let Some(close) = self.matching_paren(open_pos) else {
            return false;
        };

        let mut k = close + 1;
        while k < self.text.len() && self.text[k] != b'{' && self.text[k] != b';' {
            k += 1;
        }
        if k >= self.text.len() || self.text[k] == b';' {
            return false;
        }
        let body_open = k;

        let params_raw = String::from_utf8_lossy(&self.text[open_pos + 1..close]);
        let tail_raw = String::from_utf8_lossy(&self.text[close + 1..body_open]);
        let signature = normalize_signature(&params_raw, tail_raw.trim());

        let body = match self.matching_brace(body_open) {
            Some(end) => &self.text[body_open..end],
            None => {
                let cap = (body_open + UNTERMINATED_BODY_SPAN).min(self.text.len());
                &self.text[body_open..cap]
            }
        };
        let body_fingerprint = fnv1a64(body);

        // Bound the lookback at the previous statement or block boundary so a
        // neighbouring definition's `inline`/`template` is not picked up.
        let mut window_start = open_pos.saturating_sub(PREFIX_WINDOW);
        for i in (window_start..open_pos).rev() {
            if matches!(self.text[i], b';' | b'{' | b'}') {
                window_start = i + 1;
                break;
            }
        }
        let window = &self.text[window_start..open_pos];
        let inline_or_template = contains_word(window, b"inline") || has_template_prefix(window);

        let qualified_name = if name.contains("::") {
            name
        } else {
            self.qualified_in_scope(&name)
        };

        self.defs.func_defs.push(FuncDef {
            qualified_name,
            signature,
            file: self.file.to_string(),
            line: self.lines.line_of(open_pos),
            body_fingerprint,
            inline_or_template,
        });

        // Walk into the body; its braces are depth-counted like any others.
        self.depth += 1;
        self.pos = body_open + 1;
        true
    }

    /// Backtrack from an opening paren to assemble `A::B<T>::name`. Returns
    /// None when the preceding tokens cannot be a callable name.
    fn backtrack_name(&self, open_pos: usize) -> Option<String> {
        let text = self.text;
        let mut j = open_pos;
        let mut segments: Vec<String> = Vec::new();
        loop {
            while j > 0 && text[j - 1].is_ascii_whitespace() {
                j -= 1;
            }
            let seg_end = j;
            if j > 0 && text[j - 1] == b'>' {
                let mut depth = 0i32;
                let mut k = j;
                let mut balanced = false;
                while k > 0 {
                    k -= 1;
                    match text[k] {
                        b'>' => depth += 1,
                        b'<' => {
                            depth -= 1;
                            if depth == 0 {
                                balanced = true;
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                if !balanced {
                    return None;
                }
                j = k;
            }
            let mut start = j;
            while start > 0 {
                let c = text[start - 1];
                if c.is_ascii_alphanumeric() || c == b'_' || c == b'~' {
                    start -= 1;
                } else {
                    break;
                }
            }
            if start == j {
                return None;
            }
            let segment = String::from_utf8_lossy(&text[start..seg_end]).into_owned();
            if segment.as_bytes()[0].is_ascii_digit() {
                return None;
            }
            segments.push(segment);
            j = start;
            while j > 0 && text[j - 1].is_ascii_whitespace() {
                j -= 1;
            }
            if j >= 2 && text[j - 1] == b':' && text[j - 2] == b':' {
                j -= 2;
            } else {
                break;
            }
        }
        segments.reverse();
        Some(segments.join("::"))
    }

    /// Active scope prefix: named namespace frames and class frames, joined
    /// with `::`. Anonymous namespaces scope-isolate but add no segment.
    fn qualified_in_scope(&self, name: &str) -> String {
        let mut parts: Vec<&str> = Vec::new();
        for frame in &self.scopes {
            if let Some(frame_name) = &frame.name {
                parts.push(frame_name);
            }
        }
        parts.push(name);
        parts.join("::")
    }

    fn matching_paren(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for i in open..self.text.len() {
            match self.text[i] {
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn matching_brace(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for i in open..self.text.len() {
            match self.text[i] {
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Some(i + 1);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn skip_ws(&self, mut k: usize) -> usize {
        while k < self.text.len() && self.text[k].is_ascii_whitespace() {
            k += 1;
        }
        k
    }

    fn ident_end(&self, start: usize) -> usize {
        let mut end = start;
        if end < self.text.len() && is_ident_start(self.text[end]) {
            end += 1;
            while end < self.text.len() && is_ident_continue(self.text[end]) {
                end += 1;
            }
        }
        end
    }

    fn prev_non_ws(&self, pos: usize) -> Option<u8> {
        self.text[..pos]
            .iter()
            .rev()
            .copied()
            .find(|b| !b.is_ascii_whitespace())
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_control_keyword(name: &str) -> bool {
    let last = name.rsplit("::").next().unwrap_or(name);
    CONTROL_KEYWORDS.contains(&last)
}

fn contains_word(window: &[u8], word: &[u8]) -> bool {
    let mut from = 0;
    while from + word.len() <= window.len() {
        let Some(at) = find(&window[from..], word) else {
            return false;
        };
        let at = from + at;
        let before_ok = at == 0 || !is_ident_continue(window[at - 1]);
        let after = at + word.len();
        let after_ok = after >= window.len() || !is_ident_continue(window[after]);
        if before_ok && after_ok {
            return true;
        }
        from = at + 1;
    }
    false
}

fn has_template_prefix(window: &[u8]) -> bool {
    let mut from = 0;
    while from + b"template".len() <= window.len() {
        let Some(at) = find(&window[from..], b"template") else {
            return false;
        };
        let at = from + at;
        let before_ok = at == 0 || !is_ident_continue(window[at - 1]);
        let mut after = at + b"template".len();
        while after < window.len() && window[after].is_ascii_whitespace() {
            after += 1;
        }
        if before_ok && window.get(after) == Some(&b'<') {
            return true;
        }
        from = at + 1;
    }
    false
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> FileDefs {
        scan_definitions(source.as_bytes(), "test.cpp")
    }

    #[test]
    fn declaration_produces_no_function_record() {
        let defs = scan("void f(int x);\nint g(double);\n");
        assert!(defs.func_defs.is_empty());
    }

    #[test]
    fn definition_produces_one_function_record() {
        let defs = scan("int add(int a, int b) { return a + b; }\n");
        assert_eq!(defs.func_defs.len(), 1);
        let def = &defs.func_defs[0];
        assert_eq!(def.qualified_name, "add");
        assert_eq!(def.signature, "int,int");
        assert_eq!(def.line, 1);
        assert!(!def.inline_or_template);
    }

    #[test]
    fn namespace_prefix_applies_to_unqualified_names() {
        let defs = scan("namespace app {\nnamespace net {\nvoid send() {}\n}\n}\n");
        assert_eq!(defs.func_defs.len(), 1);
        assert_eq!(defs.func_defs[0].qualified_name, "app::net::send");
        assert_eq!(defs.func_defs[0].line, 3);
    }

    #[test]
    fn nested_namespace_definition_is_one_scope() {
        let defs = scan("namespace app::net {\nvoid send() {}\n}\nvoid after() {}\n");
        assert_eq!(defs.func_defs.len(), 2);
        assert_eq!(defs.func_defs[0].qualified_name, "app::net::send");
        assert_eq!(defs.func_defs[1].qualified_name, "after");
    }

    #[test]
    fn qualified_method_name_is_used_as_is() {
        let defs = scan("int Counter::next(int step) { return total_ += step; }\n");
        assert_eq!(defs.func_defs.len(), 1);
        assert_eq!(defs.func_defs[0].qualified_name, "Counter::next");
    }

    #[test]
    fn in_class_method_gets_class_prefix() {
        let defs = scan("class Counter {\npublic:\n  int next() { return ++total_; }\n};\n");
        assert_eq!(defs.func_defs.len(), 1);
        assert_eq!(defs.func_defs[0].qualified_name, "Counter::next");
    }

    #[test]
    fn namespace_frame_survives_braces_inside_function_bodies() {
        let src = "namespace app {\nvoid first() { if (1) { } }\nvoid second() {}\n}\n";
        let defs = scan(src);
        let names: Vec<&str> = defs
            .func_defs
            .iter()
            .map(|d| d.qualified_name.as_str())
            .collect();
        assert_eq!(names, ["app::first", "app::second"]);
    }

    #[test]
    fn control_flow_keywords_are_not_functions() {
        let src = "void run() {\n  if (x) { y(); }\n  while (x) { }\n  for (;;) { }\n  switch (x) { }\n}\n";
        let defs = scan(src);
        assert_eq!(defs.func_defs.len(), 1);
        assert_eq!(defs.func_defs[0].qualified_name, "run");
    }

    #[test]
    fn type_definition_vs_forward_declaration() {
        let defs = scan("struct Point { int x; int y; };\nstruct Other;\nclass Fwd;\n");
        assert_eq!(defs.type_defs.len(), 1);
        assert_eq!(defs.type_defs[0].qualified_name, "Point");
        assert_eq!(defs.type_defs[0].line, 1);
    }

    #[test]
    fn nested_type_gets_enclosing_scopes() {
        let src = "namespace geo {\nclass Shape {\n  struct Cache { int hits; };\n};\n}\n";
        let defs = scan(src);
        let names: Vec<&str> = defs
            .type_defs
            .iter()
            .map(|d| d.qualified_name.as_str())
            .collect();
        assert_eq!(names, ["geo::Shape", "geo::Shape::Cache"]);
    }

    #[test]
    fn enum_variants_are_recognized() {
        let defs = scan("enum Color { Red };\nenum class Mode { On, Off };\n");
        let names: Vec<&str> = defs
            .type_defs
            .iter()
            .map(|d| d.qualified_name.as_str())
            .collect();
        assert_eq!(names, ["Color", "Mode"]);
    }

    #[test]
    fn template_parameter_is_not_a_type_definition() {
        let defs = scan("template <class T, class U>\nstruct Pair { T a; U b; };\n");
        let names: Vec<&str> = defs
            .type_defs
            .iter()
            .map(|d| d.qualified_name.as_str())
            .collect();
        assert_eq!(names, ["Pair"]);
    }

    #[test]
    fn struct_variable_is_not_a_type_definition() {
        let defs = scan("struct Point p = {1, 2};\n");
        assert!(defs.type_defs.is_empty());
    }

    #[test]
    fn anonymous_namespace_scopes_without_a_segment() {
        let defs = scan("namespace {\nvoid helper() {}\n}\nnamespace app {\nvoid used() {}\n}\n");
        let names: Vec<&str> = defs
            .func_defs
            .iter()
            .map(|d| d.qualified_name.as_str())
            .collect();
        assert_eq!(names, ["helper", "app::used"]);
    }

    #[test]
    fn inline_and_template_are_detected() {
        let defs = scan(
            "inline int one() { return 1; }\ntemplate <typename T>\nT identity(T v) { return v; }\nint plain() { return 0; }\n",
        );
        assert_eq!(defs.func_defs.len(), 3);
        assert!(defs.func_defs[0].inline_or_template);
        assert!(defs.func_defs[1].inline_or_template);
        assert!(!defs.func_defs[2].inline_or_template);
    }

    #[test]
    fn body_fingerprints_track_body_text() {
        let a = scan("int f() { return 1; }\n");
        let b = scan("int f() { return 1; }\n");
        let c = scan("int f() { return 2; }\n");
        assert_eq!(a.func_defs[0].body_fingerprint, b.func_defs[0].body_fingerprint);
        assert_ne!(a.func_defs[0].body_fingerprint, c.func_defs[0].body_fingerprint);
    }

    #[test]
    fn comment_and_string_contents_never_produce_records() {
        let src = "// int fake() { return 1; }\n/* struct Bogus { }; */\nconst char* s = \"void nope() {}\";\nint real() { return 0; }\n";
        let defs = scan(src);
        assert!(defs.type_defs.is_empty());
        assert_eq!(defs.func_defs.len(), 1);
        assert_eq!(defs.func_defs[0].qualified_name, "real");
        assert_eq!(defs.func_defs[0].line, 4);
    }

    #[test]
    fn overloads_get_distinct_signatures() {
        let defs = scan("void f(int) { }\nvoid f(double) { }\n");
        assert_eq!(defs.func_defs.len(), 2);
        assert_ne!(defs.func_defs[0].signature, defs.func_defs[1].signature);
    }

    #[test]
    fn const_qualifier_lands_in_the_signature() {
        let defs = scan("int Box::get() const { return v_; }\n");
        assert_eq!(defs.func_defs.len(), 1);
        assert_eq!(defs.func_defs[0].signature, "|const");
    }

    #[test]
    fn destructor_and_templated_scope_names() {
        let defs = scan("Widget::~Widget() { release(); }\nvoid Grid<int>::fill(int v) { }\n");
        let names: Vec<&str> = defs
            .func_defs
            .iter()
            .map(|d| d.qualified_name.as_str())
            .collect();
        assert_eq!(names, ["Widget::~Widget", "Grid<int>::fill"]);
    }

    #[test]
    fn unterminated_body_does_not_panic() {
        let defs = scan("int f() { return 1;\n");
        assert_eq!(defs.func_defs.len(), 1);
    }
}
