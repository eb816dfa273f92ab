//! Variable scopes — normalization, shadowing, truthiness.
//!
//! Values are normalized exactly once: string values pass through one-off
//! Tera rendering (they may reference other variables with `{{ name }}`),
//! non-string values serialize to compact JSON. After construction a scope
//! is read-only, so every placeholder occurrence sees the same text.

use std::collections::BTreeMap;

use serde_json::Value;
use tera::Tera;

use crate::error::PreprocessError;

/// String values are re-rendered until stable so they can reference other
/// string variables that themselves contain expressions. The cap bounds
/// pathological reference chains; expressions come from configuration, not
/// from document content, so cycles cannot be fed in by processed files.
const MAX_EXPANSION_PASSES: usize = 8;

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn seed_values(
    raw: impl Iterator<Item = (String, Value)>,
) -> (BTreeMap<String, String>, Vec<String>) {
    let mut values = BTreeMap::new();
    let mut string_keys = Vec::new();
    for (name, value) in raw {
        match value {
            Value::String(s) => {
                string_keys.push(name.clone());
                values.insert(name, s);
            }
            // `Value`'s Display renders compact JSON; the substitutor emits
            // this text verbatim.
            other => {
                values.insert(name, other.to_string());
            }
        }
    }
    (values, string_keys)
}

fn render_stable(
    values: &mut BTreeMap<String, String>,
    string_keys: &[String],
    base: Option<&BTreeMap<String, String>>,
) -> Result<(), PreprocessError> {
    for _ in 0..MAX_EXPANSION_PASSES {
        let mut ctx = tera::Context::new();
        if let Some(base) = base {
            for (name, value) in base {
                ctx.insert(name, value);
            }
        }
        // Own entries shadow base entries of the same name.
        for (name, value) in values.iter() {
            ctx.insert(name, value);
        }

        let mut changed = false;
        for key in string_keys {
            let current = values[key].clone();
            let rendered = Tera::one_off(&current, &ctx, false)?;
            if rendered != current {
                values.insert(key.clone(), rendered);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// GlobalScope
// ---------------------------------------------------------------------------

/// Variables visible to every document, normalized once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalScope {
    values: BTreeMap<String, String>,
}

impl GlobalScope {
    /// Normalize the configured global mapping. Expression failures are
    /// fatal configuration errors.
    pub fn new(globals: &BTreeMap<String, Value>) -> Result<Self, PreprocessError> {
        let (mut values, string_keys) =
            seed_values(globals.iter().map(|(k, v)| (k.clone(), v.clone())));
        render_stable(&mut values, &string_keys, None)?;
        Ok(GlobalScope { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Bound names and their normalized text, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

// ---------------------------------------------------------------------------
// LocalScope
// ---------------------------------------------------------------------------

/// Variables supplied at a single include site (plus the implicit `docroot`
/// binding), visible only to that included document's processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalScope {
    values: BTreeMap<String, String>,
}

impl LocalScope {
    /// Normalize an include site's inline data. Globals are visible to
    /// expressions; locals shadow a global of the same name.
    pub fn new(
        locals: &serde_json::Map<String, Value>,
        globals: &GlobalScope,
    ) -> Result<Self, PreprocessError> {
        let (mut values, string_keys) =
            seed_values(locals.iter().map(|(k, v)| (k.clone(), v.clone())));
        render_stable(&mut values, &string_keys, Some(globals.values()))?;
        Ok(LocalScope { values })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Bound names and their normalized text, in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Two-tier lookup
// ---------------------------------------------------------------------------

/// Ordered lookup over one document's scopes: local bindings first, then the
/// per-document source-dir override, then globals.
#[derive(Debug, Clone, Copy)]
pub struct VariableScope<'a> {
    pub local: &'a LocalScope,
    pub global: &'a GlobalScope,
    /// Reserved source-dir variable for the document at the top of the
    /// processing stack: `(name, per-document value)`.
    pub source_dir: Option<(&'a str, &'a str)>,
}

impl<'a> VariableScope<'a> {
    pub fn resolve(&self, name: &str) -> Option<&'a str> {
        if let Some(value) = self.local.get(name) {
            return Some(value);
        }
        if let Some((sd_name, sd_value)) = self.source_dir {
            if sd_name == name {
                return Some(sd_value);
            }
        }
        self.global.get(name)
    }
}

/// A value is truthy unless it is the empty string, the boolean `false`
/// (normalized to `"false"`), or the literal text `"false"`.
pub fn is_truthy(value: &str) -> bool {
    !(value.is_empty() || value == "false")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
