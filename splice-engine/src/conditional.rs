//! Conditional block stripping.
//!
//! A block is `{prefix}{start_if}{name}{suffix} … {prefix}{end_if}{suffix}`.
//! Truthy variable: the markers are removed and the body kept. Falsy: the
//! whole block is removed. Names bound in neither scope never match, so
//! their markers stay in the output untouched.

use splice_core::types::Markers;

use crate::scope::{is_truthy, GlobalScope, LocalScope};

/// Strip conditional blocks for every bound variable name.
///
/// The local pass always completes before the global pass. A name bound in
/// both scopes is processed twice, once under each binding's truthiness —
/// the global pass can remove content the local pass preserved, and vice
/// versa. This two-pass ordering is an observable contract.
pub fn strip_blocks(
    content: &str,
    markers: &Markers,
    local: &LocalScope,
    global: &GlobalScope,
) -> String {
    let end = markers.block_end();
    let mut content = content.to_owned();
    for (name, value) in local.iter() {
        content = strip_blocks_for(&content, &markers.block_start(name), &end, is_truthy(value));
    }
    for (name, value) in global.iter() {
        content = strip_blocks_for(&content, &markers.block_start(name), &end, is_truthy(value));
    }
    content
}

/// Process every block of one variable name, in document order.
///
/// Matching is leftmost and non-greedy: the first end marker after a start
/// marker terminates the block, even if another start marker lies between.
/// A kept body is not re-scanned in this pass; scanning resumes after the
/// block. A start marker with no end marker anywhere after it (and the text
/// following it) is left untouched.
fn strip_blocks_for(content: &str, start: &str, end: &str, truthy: bool) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;
    loop {
        let Some(start_at) = rest.find(start) else {
            out.push_str(rest);
            return out;
        };
        let after_start = &rest[start_at + start.len()..];
        let Some(end_at) = after_start.find(end) else {
            // unterminated block
            out.push_str(rest);
            return out;
        };
        out.push_str(&rest[..start_at]);
        if truthy {
            out.push_str(&after_start[..end_at]);
        }
        rest = &after_start[end_at + end.len()..];
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
