//! convenant template resolution engine -- expands loop blocks over case
//! collections, evaluates conditional-text rules and resolves nested
//! placeholders.
//!
//! The engine is synchronous and stateless across calls. Every operation
//! is total: bad data degrades to removed blocks or literal markers, never
//! to an error. Only loading (case data, rule sets) can fail, in
//! `convenant-core`.

pub mod compare;
pub mod context;
pub mod loops;
pub mod mappers;
pub mod options;
pub mod placeholder;
pub mod predicate;
pub mod primitives;
pub mod registry;
pub mod rules;
pub mod structural;

pub use context::{case_context, case_replacements};
pub use loops::LoopExpander;
pub use options::{parse_today, EngineOptions, DEFAULT_MAX_DEPTH, MAX_LOOP_PASSES};
pub use placeholder::{resolve_nested, substitute, unresolved_markers};
pub use predicate::eval_condition;
pub use registry::{CollectionDefinition, CollectionRegistry, RegistryError};
pub use rules::{evaluate_resolved, evaluate_rules, RuleEvaluation};
pub use structural::StructuralCollection;

use convenant_core::CaseData;

/// Expand every loop block in `text` using the standard registry.
///
/// Empty text, or no case data, returns the text unchanged.
pub fn expand_loops(text: &str, case: Option<&CaseData>, options: &EngineOptions) -> String {
    LoopExpander::standard(*options).expand(text, case)
}

/// Full document pipeline: expand loops, then resolve document-level
/// placeholders (nested up to `options.max_placeholder_depth`).
///
/// Unknown tokens stay literal; see [`unresolved_markers`].
pub fn render(template: &str, case: &CaseData, options: &EngineOptions) -> String {
    let expanded = expand_loops(template, Some(case), options);
    let replacements = case_replacements(case, options);
    resolve_nested(&expanded, &replacements, options.max_placeholder_depth)
}
