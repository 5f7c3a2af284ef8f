//! convenant-core: data model and Dutch text utilities for convenant
//! (divorce settlement) templates.
//!
//! This crate holds everything the resolution engine reads but does not
//! compute itself:
//!
//! - [`CaseData`] -- parties, children and raw financial collections
//! - [`Condition`] / [`RuleSet`] -- conditional-text rule trees
//! - [`EvaluationContext`] / [`Value`] -- flat scalar context for rules
//! - [`CaseInsensitiveMap`] -- the single key-comparison policy
//! - [`format`] -- field formatter (dates, money, IBAN, codes)
//! - [`grammar`] -- list conjunction, pluralization, pronouns, articles

pub mod case;
pub mod ci_map;
pub mod condition;
pub mod error;
pub mod format;
pub mod grammar;
pub mod value;

// ── Convenience re-exports ───────────────────────────────────────────

pub use case::{Alimentatie, CaseData, Child, ConvenantInfo, Party};
pub use ci_map::{fold_key, keys_equal, CaseInsensitiveMap, Replacements};
pub use condition::{Condition, LeafCondition, LogicalOperator, Operand, Operator, Rule, RuleSet};
pub use error::ModelError;
pub use grammar::Gender;
pub use value::{replacements_from_json, EvaluationContext, Value};
