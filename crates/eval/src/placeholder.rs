//! Placeholder tokens: single-pass substitution, nested resolution and
//! unresolved-marker scanning.
//!
//! A placeholder is `[[NAME]]` where NAME is letters, digits and
//! underscores. Loop markers (`[[#NAME]]`, `[[/NAME]]`) never match the
//! placeholder pattern. Unknown tokens are always left as literal text;
//! surviving markers are the caller-visible signal of missing data.

use std::sync::LazyLock;

use convenant_core::{keys_equal, Replacements};
use regex::{Captures, Regex};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([A-Za-z0-9_]+)\]\]").expect("valid placeholder regex"));

static ANY_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\[[#/]?([A-Za-z0-9_]+)\]\]").expect("valid marker regex")
});

/// Names of every placeholder token in `text`, in order of appearance.
pub fn placeholder_names(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
}

/// Whether `text` contains `[[name]]` (case-insensitive).
pub fn contains_placeholder(text: &str, name: &str) -> bool {
    placeholder_names(text).any(|n| keys_equal(n, name))
}

/// Replace every known `[[KEY]]` once. Unknown tokens stay literal.
pub fn substitute(text: &str, replacements: &Replacements) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| match replacements.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Substitute, then re-scan the result for placeholders introduced by the
/// substituted values, up to `max_depth` passes.
///
/// A token whose replacement contains the token itself is left literal, and
/// any chain still unresolved after `max_depth` passes (for example
/// `A -> [[B]]`, `B -> [[A]]`) stops there with the remaining token intact.
pub fn resolve_nested(text: &str, replacements: &Replacements, max_depth: usize) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut current = text.to_string();
    for _ in 0..max_depth {
        let next = substitute_guarded(&current, replacements);
        if next == current {
            return next;
        }
        current = next;
    }

    if PLACEHOLDER.is_match(&current) {
        tracing::warn!(
            max_depth,
            "placeholder resolution stopped with unresolved tokens remaining"
        );
    }
    current
}

fn substitute_guarded(text: &str, replacements: &Replacements) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| {
            let key = &caps[1];
            match replacements.get(key) {
                Some(value) if !contains_placeholder(value, key) => value.clone(),
                Some(_) => {
                    tracing::debug!(token = key, "self-referencing placeholder left literal");
                    caps[0].to_string()
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Distinct placeholder and loop-marker names still present in `text`,
/// in order of first appearance. Empty means the text is fully resolved.
pub fn unresolved_markers(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in ANY_MARKER.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| keys_equal(n, name)) {
            names.push(name.to_string());
        }
    }
    names
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
