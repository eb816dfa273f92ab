//! Placeholder substitution.
//!
//! A placeholder is `{prefix}{name}{suffix}`. Substitution is exhaustive per
//! scope tier: locals first, then globals over whatever remains, so a local
//! binding shadows a global of the same name. Unresolvable placeholders are
//! left untouched.

use splice_core::types::Markers;

use crate::scope::{GlobalScope, LocalScope};

/// Replace placeholder tokens with their normalized variable text.
///
/// `source_dir` carries the reserved per-document variable `(name, value)`:
/// during the global pass it substitutes the per-document value in place of
/// any stored global binding of that name, and is substituted even when no
/// such global is configured.
pub fn substitute(
    content: &str,
    markers: &Markers,
    local: &LocalScope,
    global: &GlobalScope,
    source_dir: Option<(&str, &str)>,
) -> String {
    let mut content = content.to_owned();

    for (name, value) in local.iter() {
        content = content.replace(&markers.placeholder(name), value);
    }

    for (name, value) in global.iter() {
        let effective = match source_dir {
            Some((sd_name, sd_value)) if sd_name == name => sd_value,
            _ => value,
        };
        content = content.replace(&markers.placeholder(name), effective);
    }

    // Reserved name with no configured global backing it still substitutes,
    // unless a local binding already claimed the token above.
    if let Some((sd_name, sd_value)) = source_dir {
        if !global.contains(sd_name) && local.get(sd_name).is_none() {
            content = content.replace(&markers.placeholder(sd_name), sd_value);
        }
    }

    content
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::collections::BTreeMap;

    fn markers() -> Markers {
        Markers {
            suffix: "@@".to_owned(),
            ..Markers::default()
        }
    }

    fn global(pairs: &[(&str, Value)]) -> GlobalScope {
        let map: BTreeMap<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        GlobalScope::new(&map).expect("globals")
    }

    fn local(pairs: &[(&str, Value)], globals: &GlobalScope) -> LocalScope {
        let map: serde_json::Map<String, Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        LocalScope::new(&map, globals).expect("locals")
    }

    #[test]
    fn substitution_is_exhaustive_per_tier() {
        let globals = global(&[("name", json!("Ann"))]);
        let locals = local(&[], &globals);
        let doc = "@@name@@ and @@name@@ and @@name@@";
        assert_eq!(
            substitute(doc, &markers(), &locals, &globals, None),
            "Ann and Ann and Ann"
        );
    }

    #[test]
    fn local_shadows_global() {
        let globals = global(&[("name", json!("global"))]);
        let locals = local(&[("name", json!("local"))], &globals);
        assert_eq!(
            substitute("@@name@@", &markers(), &locals, &globals, None),
            "local"
        );
    }

    #[test]
    fn unresolvable_placeholder_left_untouched() {
        let globals = global(&[]);
        let locals = local(&[], &globals);
        assert_eq!(
            substitute("@@mystery@@", &markers(), &locals, &globals, None),
            "@@mystery@@"
        );
    }

    #[test]
    fn non_string_values_substitute_their_json_text() {
        let globals = global(&[("debug", json!(false)), ("tags", json!([1, 2]))]);
        let locals = local(&[], &globals);
        assert_eq!(
            substitute("@@debug@@/@@tags@@", &markers(), &locals, &globals, None),
            "false/[1,2]"
        );
    }

    #[test]
    fn source_dir_overrides_stored_global_value() {
        let globals = global(&[("dir", json!("stored"))]);
        let locals = local(&[], &globals);
        assert_eq!(
            substitute(
                "@@dir@@",
                &markers(),
                &locals,
                &globals,
                Some(("dir", "src/pages/index.html"))
            ),
            "src/pages/index.html"
        );
    }

    #[test]
    fn source_dir_substitutes_without_configured_global() {
        let globals = global(&[]);
        let locals = local(&[], &globals);
        assert_eq!(
            substitute("@@dir@@", &markers(), &locals, &globals, Some(("dir", "x"))),
            "x"
        );
    }
}
