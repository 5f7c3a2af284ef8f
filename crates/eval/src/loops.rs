//! Loop Section Expander.
//!
//! A loop block is `[[#NAME]] body [[/NAME]]`. Each block is resolved to a
//! structural or registry collection and then:
//!
//! - removed when the collection is empty or unknown,
//! - rendered once per item when the body references item variables,
//! - rendered once (trimmed) otherwise, as conditional display.
//!
//! Expansion is a single-pass transform applied repeatedly until the text
//! stops changing, capped at [`MAX_LOOP_PASSES`]. Inner blocks of nested
//! loops are handled by a later pass.

use std::sync::LazyLock;

use convenant_core::{fold_key, CaseData, Replacements};
use regex::Regex;

use crate::options::{EngineOptions, MAX_LOOP_PASSES};
use crate::placeholder::{placeholder_names, substitute};
use crate::registry::{CollectionDefinition, CollectionRegistry};
use crate::structural::{child_variables, is_child_variable, StructuralCollection};

static OPEN_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[#([A-Za-z0-9_]+)\]\]").expect("valid loop marker regex"));

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid blank-line regex"));

/// Expands loop blocks against one case.
#[derive(Debug, Clone, Copy)]
pub struct LoopExpander<'r> {
    registry: &'r CollectionRegistry,
    options: EngineOptions,
}

impl LoopExpander<'static> {
    /// Expander over the standard collection registry.
    pub fn standard(options: EngineOptions) -> Self {
        LoopExpander::new(CollectionRegistry::standard(), options)
    }
}

impl<'r> LoopExpander<'r> {
    pub fn new(registry: &'r CollectionRegistry, options: EngineOptions) -> Self {
        LoopExpander { registry, options }
    }

    /// Expand every loop block to a fixed point, then collapse runs of three
    /// or more newlines to a single blank line.
    ///
    /// Empty text, or no case data, returns the text unchanged.
    pub fn expand(&self, text: &str, case: Option<&CaseData>) -> String {
        let case = match case {
            Some(case) if !text.is_empty() => case,
            _ => return text.to_string(),
        };

        let mut current = text.to_string();
        let mut converged = false;
        for pass in 1..=MAX_LOOP_PASSES {
            let next = self.expand_once(&current, case);
            if next == current {
                tracing::debug!(passes = pass, "loop expansion converged");
                converged = true;
                break;
            }
            current = next;
        }
        if !converged {
            tracing::warn!(
                max_passes = MAX_LOOP_PASSES,
                "loop expansion stopped at the pass limit"
            );
        }

        BLANK_RUN.replace_all(&current, "\n\n").into_owned()
    }

    /// One left-to-right pass over `text`. Each open marker is paired with
    /// the first following close marker of the same name; an open marker
    /// without one is left as literal text.
    pub fn expand_once(&self, text: &str, case: &CaseData) -> String {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut search = 0;

        while let Some(caps) = OPEN_MARKER.captures_at(text, search) {
            let (Some(open), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            match find_close(text, open.end(), name.as_str()) {
                Some((close_start, close_end)) => {
                    out.push_str(&text[copied..open.start()]);
                    let body = &text[open.end()..close_start];
                    out.push_str(&self.expand_block(name.as_str(), body, case));
                    copied = close_end;
                    search = close_end;
                }
                None => search = open.end(),
            }
        }

        out.push_str(&text[copied..]);
        out
    }

    fn expand_block(&self, name: &str, body: &str, case: &CaseData) -> String {
        if let Some(structural) = StructuralCollection::from_name(name) {
            return self.expand_structural(name, structural, body, case);
        }
        if let Some(definition) = self.registry.get(name) {
            return expand_registry(definition, body, case);
        }
        tracing::debug!(collection = name, "unknown collection; block removed");
        String::new()
    }

    fn expand_structural(
        &self,
        name: &str,
        collection: StructuralCollection,
        body: &str,
        case: &CaseData,
    ) -> String {
        let today = self.options.today;
        let children = collection.select(case, today);
        if children.is_empty() {
            tracing::debug!(collection = name, "no matching children; block removed");
            return String::new();
        }

        if !placeholder_names(body).any(is_child_variable) {
            tracing::debug!(collection = name, "conditional display");
            return body.trim().to_string();
        }

        tracing::debug!(collection = name, items = children.len(), "expanding per child");
        let items: Vec<Replacements> = children
            .iter()
            .map(|child| child_variables(child, today))
            .collect();
        render_items(body, &items)
    }
}

fn expand_registry(definition: &CollectionDefinition, body: &str, case: &CaseData) -> String {
    let name = definition.name();
    let items = definition.items(case);
    let Some(sample) = items.first() else {
        tracing::debug!(collection = name, "empty collection; block removed");
        return String::new();
    };

    let prefix = fold_key(&format!("{}_", definition.variable_prefix()));
    let item_scoped = placeholder_names(body)
        .any(|token| fold_key(token).starts_with(&prefix) || sample.contains_key(token));
    if !item_scoped {
        tracing::debug!(collection = name, "conditional display");
        return body.trim().to_string();
    }

    tracing::debug!(collection = name, items = items.len(), "expanding per item");
    render_items(body, &items)
}

fn render_items(body: &str, items: &[Replacements]) -> String {
    items
        .iter()
        .map(|vars| substitute(body, vars).trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Byte range of the first `[[/NAME]]` at or after `from`, name compared
/// ASCII case-insensitively.
fn find_close(text: &str, from: usize, name: &str) -> Option<(usize, usize)> {
    let needle = format!("[[/{}]]", name);
    let needle = needle.as_bytes();
    text.as_bytes()
        .get(from..)?
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|offset| (from + offset, from + offset + needle.len()))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use convenant_core::{Child, ConvenantInfo};
    use time::macros::date;

    fn expander() -> LoopExpander<'static> {
        LoopExpander::standard(EngineOptions::for_date(date!(2026 - 01 - 01)))
    }

    fn case_with(accounts: &str, children: &[&str]) -> CaseData {
        CaseData {
            kinderen: children
                .iter()
                .enumerate()
                .map(|(i, name)| Child {
                    id: i as i64 + 1,
                    voornamen: name.to_string(),
                    geboortedatum: Some("2015-05-05".to_string()),
                    ..Child::default()
                })
                .collect(),
            convenant: Some(ConvenantInfo {
                bankrekeningen: Some(accounts.to_string()),
                ..ConvenantInfo::default()
            }),
            ..CaseData::default()
        }
    }

    #[test]
    fn find_close_is_case_insensitive() {
        let text = "[[#a]]x[[/A]]";
        assert_eq!(find_close(text, 6, "a"), Some((7, 13)));
        assert_eq!(find_close(text, 6, "B"), None);
        assert_eq!(find_close(text, 100, "a"), None);
    }

    #[test]
    fn mismatched_close_marker_stays_literal() {
        let case = case_with("[]", &["Anna"]);
        let text = "[[#KINDEREN]][[KIND_ROEPNAAM]][[/BANKREKENINGEN]]";
        assert_eq!(expander().expand(text, Some(&case)), text);
    }

    #[test]
    fn per_child_expansion_joins_with_newline() {
        let case = case_with("[]", &["Anna", "Bram"]);
        let out = expander().expand(
            "Kinderen:\n[[#KINDEREN]]\n- [[KIND_ROEPNAAM]] ([[KIND_LEEFTIJD]])\n[[/KINDEREN]]",
            Some(&case),
        );
        assert_eq!(out, "Kinderen:\n- Anna (10 jaar)\n- Bram (10 jaar)");
    }

    #[test]
    fn conditional_display_renders_once() {
        let case = case_with("[]", &["Anna", "Bram"]);
        let out = expander().expand(
            "[[#MINDERJARIGE_KINDEREN]] Er zijn minderjarige kinderen. [[/MINDERJARIGE_KINDEREN]]",
            Some(&case),
        );
        assert_eq!(out, "Er zijn minderjarige kinderen.");
    }

    #[test]
    fn unknown_and_empty_blocks_are_removed() {
        let case = case_with("[]", &[]);
        let e = expander();
        assert_eq!(e.expand("a[[#ONBEKEND]]x[[/ONBEKEND]]b", Some(&case)), "ab");
        assert_eq!(e.expand("a[[#KINDEREN]]x[[/KINDEREN]]b", Some(&case)), "ab");
        assert_eq!(
            e.expand("a[[#BANKREKENINGEN]]x[[/BANKREKENINGEN]]b", Some(&case)),
            "ab"
        );
    }

    #[test]
    fn missing_case_returns_text_unchanged() {
        let text = "[[#KINDEREN]]x[[/KINDEREN]]\n\n\n\ny";
        assert_eq!(expander().expand(text, None), text);
        assert_eq!(expander().expand("", Some(&CaseData::default())), "");
    }

    #[test]
    fn blank_line_runs_collapse() {
        let case = case_with("[]", &[]);
        let out = expander().expand(
            "Artikel 1\n\n[[#SCHULDEN]]x[[/SCHULDEN]]\n\nArtikel 2",
            Some(&case),
        );
        assert_eq!(out, "Artikel 1\n\nArtikel 2");
    }

    #[test]
    fn nested_loops_resolve_over_passes() {
        let case = case_with(r#"[{"iban":"NL01"}]"#, &["Anna"]);
        let out = expander().expand(
            "[[#KINDEREN]][[KIND_ROEPNAAM]]: [[#BANKREKENINGEN]][[BANKREKENING_IBAN]][[/BANKREKENINGEN]][[/KINDEREN]]",
            Some(&case),
        );
        assert_eq!(out, "Anna: NL01");
    }

    #[test]
    fn unresolved_item_variables_stay_literal() {
        let case = case_with(r#"[{"iban":"NL01"}]"#, &[]);
        let out = expander().expand(
            "[[#BANKREKENINGEN]][[BANKREKENING_IBAN]] [[BANKREKENING_ONBEKEND]][[/BANKREKENINGEN]]",
            Some(&case),
        );
        assert_eq!(out, "NL01 [[BANKREKENING_ONBEKEND]]");
    }

    #[test]
    fn alias_alone_marks_block_item_scoped() {
        let case = case_with(r#"[{"iban":"NL01"},{"iban":"NL02"}]"#, &[]);
        let out = expander().expand(
            "[[#BANKREKENINGEN]]- [[REKENINGNUMMER]][[/BANKREKENINGEN]]",
            Some(&case),
        );
        assert_eq!(out, "- NL01\n- NL02");
    }
}
