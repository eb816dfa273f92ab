//! Include directive scanning.
//!
//! An include is `{prefix}include("path"[, {inline vars}]){suffix}`. The
//! scanner locates the first well-formed directive and reports its exact
//! byte span so the resolver can splice by offset. Text that merely looks
//! like a directive but is not well-formed is skipped, not an error — it
//! simply stays in the output.

use std::ops::Range;

use splice_core::types::Markers;

/// One matched include directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    /// Quoted target path, exactly as written.
    pub path: String,
    /// Raw text of the inline object literal, when present. Parsing (and
    /// rejecting malformed JSON) is the resolver's job.
    pub vars: Option<String>,
    /// Byte span of the full directive in the scanned document.
    pub span: Range<usize>,
}

impl IncludeDirective {
    /// The exact directive text, for error reporting.
    pub fn text<'a>(&self, content: &'a str) -> &'a str {
        &content[self.span.clone()]
    }
}

/// Find the first include directive in `content`.
pub fn find_directive(content: &str, markers: &Markers) -> Option<IncludeDirective> {
    let needle = format!("{}include(", markers.prefix);
    let mut from = 0;
    while let Some(found) = content[from..].find(&needle) {
        let start = from + found;
        if let Some(directive) = parse_at(content, start, needle.len(), &markers.suffix) {
            return Some(directive);
        }
        from = start + needle.len();
    }
    None
}

/// Try to parse a directive whose `{prefix}include(` begins at `start`.
fn parse_at(
    content: &str,
    start: usize,
    needle_len: usize,
    suffix: &str,
) -> Option<IncludeDirective> {
    let bytes = content.as_bytes();
    let mut cursor = skip_whitespace(content, start + needle_len);

    // Quoted target path. The path may not span lines.
    let quote = *bytes.get(cursor)?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    cursor += 1;
    let path_end = find_on_line(content, cursor, quote)?;
    let path = content[cursor..path_end].to_owned();
    cursor = path_end + 1;

    // Optional `, {…}` — the comma must directly follow the closing quote.
    let vars = if bytes.get(cursor) == Some(&b',') {
        cursor = skip_whitespace(content, cursor + 1);
        if bytes.get(cursor) != Some(&b'{') {
            return None;
        }
        let object_len = scan_object(&content[cursor..])?;
        let raw = content[cursor..cursor + object_len].to_owned();
        cursor += object_len;
        Some(raw)
    } else {
        None
    };

    cursor = skip_whitespace(content, cursor);
    if bytes.get(cursor) != Some(&b')') {
        return None;
    }
    cursor += 1;

    if !content[cursor..].starts_with(suffix) {
        return None;
    }

    Some(IncludeDirective {
        path,
        vars,
        span: start..cursor + suffix.len(),
    })
}

fn skip_whitespace(content: &str, mut cursor: usize) -> usize {
    let bytes = content.as_bytes();
    while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }
    cursor
}

/// Position of `target` at or after `from`, unless a newline comes first.
fn find_on_line(content: &str, from: usize, target: u8) -> Option<usize> {
    for (i, &b) in content.as_bytes()[from..].iter().enumerate() {
        if b == b'\n' {
            return None;
        }
        if b == target {
            return Some(from + i);
        }
    }
    None
}

/// Length of the brace-balanced object literal starting at `s[0] == '{'`,
/// including both braces. Double-quoted strings are honored so a `}` inside
/// a value does not close the object. Returns `None` when unbalanced.
fn scan_object(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &b) in s.as_bytes().iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Markers {
        Markers {
            suffix: "@@".to_owned(),
            ..Markers::default()
        }
    }

    #[test]
    fn plain_include_matched_with_span() {
        let doc = "head @@include(\"nav.tpl\")@@ tail";
        let d = find_directive(doc, &markers()).expect("directive");
        assert_eq!(d.path, "nav.tpl");
        assert_eq!(d.vars, None);
        assert_eq!(d.text(doc), "@@include(\"nav.tpl\")@@");
        assert_eq!(&doc[d.span], "@@include(\"nav.tpl\")@@");
    }

    #[test]
    fn single_quoted_path_accepted() {
        let doc = "@@include('nav.tpl')@@";
        let d = find_directive(doc, &markers()).expect("directive");
        assert_eq!(d.path, "nav.tpl");
    }

    #[test]
    fn inline_vars_captured_raw() {
        let doc = r#"@@include("card.tpl", {"title": "Hi"})@@"#;
        let d = find_directive(doc, &markers()).expect("directive");
        assert_eq!(d.vars.as_deref(), Some(r#"{"title": "Hi"}"#));
    }

    #[test]
    fn nested_object_braces_balanced() {
        let doc = r#"@@include("card.tpl", {"meta": {"depth": 2}})@@"#;
        let d = find_directive(doc, &markers()).expect("directive");
        assert_eq!(d.vars.as_deref(), Some(r#"{"meta": {"depth": 2}}"#));
    }

    #[test]
    fn brace_inside_string_value_does_not_close_object() {
        let doc = r#"@@include("card.tpl", {"title": "a } b"})@@"#;
        let d = find_directive(doc, &markers()).expect("directive");
        assert_eq!(d.vars.as_deref(), Some(r#"{"title": "a } b"}"#));
    }

    #[test]
    fn whitespace_after_paren_and_before_close_accepted() {
        let doc = "@@include( \"nav.tpl\" )@@";
        let d = find_directive(doc, &markers()).expect("directive");
        assert_eq!(d.path, "nav.tpl");
    }

    #[test]
    fn multiline_vars_object_accepted() {
        let doc = "@@include(\"card.tpl\", {\n  \"title\": \"Hi\"\n})@@";
        let d = find_directive(doc, &markers()).expect("directive");
        assert_eq!(d.path, "card.tpl");
        assert!(d.vars.is_some());
    }

    #[test]
    fn first_of_multiple_directives_wins() {
        let doc = "@@include(\"a.tpl\")@@ @@include(\"b.tpl\")@@";
        let d = find_directive(doc, &markers()).expect("directive");
        assert_eq!(d.path, "a.tpl");
        assert_eq!(d.span.start, 0);
    }

    #[test]
    fn malformed_text_skipped_in_favor_of_later_directive() {
        let doc = "@@include(nav.tpl)@@ then @@include(\"real.tpl\")@@";
        let d = find_directive(doc, &markers()).expect("directive");
        assert_eq!(d.path, "real.tpl");
    }

    #[test]
    fn path_may_not_span_lines() {
        let doc = "@@include(\"nav\n.tpl\")@@";
        assert_eq!(find_directive(doc, &markers()), None);
    }

    #[test]
    fn missing_suffix_is_not_a_directive() {
        let doc = "@@include(\"nav.tpl\")";
        assert_eq!(find_directive(doc, &markers()), None);
    }

    #[test]
    fn unbalanced_object_is_not_a_directive() {
        let doc = r#"@@include("card.tpl", {"title": "Hi")@@"#;
        assert_eq!(find_directive(doc, &markers()), None);
    }

    #[test]
    fn empty_suffix_markers_work() {
        let doc = "x @@include(\"nav.tpl\") y";
        let d = find_directive(doc, &Markers::default()).expect("directive");
        assert_eq!(d.text(doc), "@@include(\"nav.tpl\")");
    }
}
