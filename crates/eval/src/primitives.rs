//! Value-resolution rules shared by the collection mappers.
//!
//! Items arrive as loosely-typed JSON objects written by the intake forms.
//! Every accessor here is total: a missing or mistyped field yields an
//! empty string.

use convenant_core::format::{self, humanize_code};
use convenant_core::grammar::join_dutch;
use convenant_core::{keys_equal, CaseData, Replacements};

/// Primary-field values that mean "see the free-text companion field".
const OTHER_SENTINELS: [&str; 2] = ["anders", "other"];

/// Party codes that mean "see the free-text companion field".
const DEVIATION_SENTINELS: [&str; 2] = ["anders", "afwijken"];

const JOINT_PHRASE: &str = "partijen gezamenlijk";
const GENERIC_CHILD: &str = "het kind";
const GENERIC_CHILDREN: &str = "de kinderen";

// ──────────────────────────────────────────────
// Field access
// ──────────────────────────────────────────────

/// Look up a field by exact name, then case-insensitively.
pub fn field<'a>(item: &'a serde_json::Value, name: &str) -> Option<&'a serde_json::Value> {
    let obj = item.as_object()?;
    obj.get(name).or_else(|| {
        obj.iter()
            .find(|(k, _)| keys_equal(k, name))
            .map(|(_, v)| v)
    })
}

/// A field rendered as trimmed text. Numbers and booleans are stringified;
/// null, arrays, objects and missing fields are empty.
pub fn text(item: &serde_json::Value, name: &str) -> String {
    match field(item, name) {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Monetary field formatted as "€ 1.234,56", empty when absent.
pub fn money(item: &serde_json::Value, name: &str) -> String {
    field(item, name)
        .map(format::format_amount_json)
        .unwrap_or_default()
}

/// Date field formatted as "15 januari 2020", empty when absent.
pub fn date(item: &serde_json::Value, name: &str) -> String {
    let raw = text(item, name);
    if raw.is_empty() {
        return raw;
    }
    format::format_date(&raw)
}

// ──────────────────────────────────────────────
// Effective values
// ──────────────────────────────────────────────

/// Resolve a coded field: the sentinel "anders"/"other" substitutes the
/// free-text companion field, anything else is humanized from snake_case.
pub fn effective_value(item: &serde_json::Value, primary: &str, other: &str) -> String {
    let code = text(item, primary);
    if is_one_of(&code, &OTHER_SENTINELS) {
        text(item, other)
    } else {
        humanize_code(&code)
    }
}

/// Resolve a party/beneficiary field. Arrays are read as lists of child ids
/// (an empty array is empty text); the sentinels "anders"/"afwijken"
/// substitute the free-text companion field.
pub fn party_value(item: &serde_json::Value, primary: &str, other: &str, case: &CaseData) -> String {
    match field(item, primary) {
        Some(serde_json::Value::Array(ids)) if ids.is_empty() => String::new(),
        Some(serde_json::Value::Array(ids)) => {
            let ids: Vec<String> = ids.iter().map(json_scalar_text).collect();
            translate_children(&ids, case)
        }
        _ => {
            let code = text(item, primary);
            if is_one_of(&code, &DEVIATION_SENTINELS) {
                text(item, other)
            } else {
                translate_party(&code, case)
            }
        }
    }
}

/// Translate a party code to display text.
///
/// - `partij1` / `partij2` -- the party's name ("partij 1" when unknown)
/// - `gezamenlijk` / `beiden` -- joint phrase
/// - `kind_<id>` -- that child's call name, or a generic term
/// - `kinderen` -- all children's names as a Dutch list
/// - a comma-separated list of child codes -- those children as a Dutch list
/// - anything else -- humanized snake_case
pub fn translate_party(code: &str, case: &CaseData) -> String {
    let normalized = code.trim().to_lowercase();
    match normalized.as_str() {
        "" => String::new(),
        "partij1" | "partij_1" => party_name(case, 1),
        "partij2" | "partij_2" => party_name(case, 2),
        "gezamenlijk" | "beiden" | "beide" | "partijen" => JOINT_PHRASE.to_string(),
        "kinderen" | "alle_kinderen" => {
            let names: Vec<String> = case.kinderen.iter().map(|c| c.call_name()).collect();
            if names.is_empty() {
                GENERIC_CHILDREN.to_string()
            } else {
                join_dutch(&names)
            }
        }
        s if s.contains(',') && s.split(',').all(is_child_code) => {
            let ids: Vec<String> = s.split(',').map(|p| p.trim().to_string()).collect();
            translate_children(&ids, case)
        }
        s if s.starts_with("kind_") => child_name(s, case).unwrap_or_else(|| GENERIC_CHILD.to_string()),
        _ => humanize_code(code),
    }
}

/// Child codes (`kind_3` or bare `3`) to a Dutch list of call names.
/// Unknown ids are skipped; nothing known gives the generic plural.
pub fn translate_children(ids: &[String], case: &CaseData) -> String {
    let names: Vec<String> = ids.iter().filter_map(|id| child_name(id, case)).collect();
    if names.is_empty() {
        GENERIC_CHILDREN.to_string()
    } else {
        join_dutch(&names)
    }
}

/// `kind_3` or a bare `3`.
fn is_child_code(code: &str) -> bool {
    let code = code.trim();
    let id = code.strip_prefix("kind_").unwrap_or(code);
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

fn child_name(code: &str, case: &CaseData) -> Option<String> {
    let lowered = code.trim().to_lowercase();
    let id_part = lowered.strip_prefix("kind_").unwrap_or(&lowered);
    let id: i64 = id_part.parse().ok()?;
    case.child_by_id(id).map(|c| c.call_name())
}

fn party_name(case: &CaseData, number: u8) -> String {
    case.party(number)
        .map(|p| p.display_name())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| format!("partij {}", number))
}

fn json_scalar_text(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn is_one_of(code: &str, sentinels: &[&str]) -> bool {
    sentinels.iter().any(|s| code.eq_ignore_ascii_case(s))
}

// ──────────────────────────────────────────────
// Item variable builder
// ──────────────────────────────────────────────

/// Collects one item's variables under `<PREFIX>_<FIELD>` plus aliases.
pub struct ItemVars {
    prefix: &'static str,
    vars: Replacements,
}

impl ItemVars {
    pub fn new(prefix: &'static str) -> Self {
        ItemVars {
            prefix,
            vars: Replacements::new(),
        }
    }

    /// Set `<PREFIX>_<field>`.
    pub fn set(&mut self, field: &str, value: String) -> &mut Self {
        self.vars.insert(format!("{}_{}", self.prefix, field), value);
        self
    }

    /// Expose the value of `<PREFIX>_<field>` under an extra name.
    pub fn alias(&mut self, alias: &str, field: &str) -> &mut Self {
        let value = self
            .vars
            .get(&format!("{}_{}", self.prefix, field))
            .cloned()
            .unwrap_or_default();
        self.vars.insert(alias, value);
        self
    }

    pub fn finish(self) -> Replacements {
        self.vars
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
