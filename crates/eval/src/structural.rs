//! Structural collections: child records selected by fixed filter rules.
//!
//! Structural names are resolved before registry names, so a registry
//! entry can never shadow them.

use convenant_core::format::format_date;
use convenant_core::grammar::format_age;
use convenant_core::{keys_equal, CaseData, Child, Replacements};
use time::Date;

/// A child-record collection and its filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralCollection {
    /// Every child, in declared order.
    All,
    /// Children younger than 18 on the evaluation date.
    Minors,
    /// Children born before the marriage date.
    BornBeforeMarriage,
    /// Children born on or after the marriage date.
    BornAfterMarriage,
}

const NAMES: [(&str, StructuralCollection); 5] = [
    ("KINDEREN", StructuralCollection::All),
    ("ALLE_KINDEREN", StructuralCollection::All),
    ("MINDERJARIGE_KINDEREN", StructuralCollection::Minors),
    ("KINDEREN_VOOR_HUWELIJK", StructuralCollection::BornBeforeMarriage),
    ("KINDEREN_NA_HUWELIJK", StructuralCollection::BornAfterMarriage),
];

/// The closed per-child variable vocabulary.
pub const CHILD_VARIABLES: [&str; 12] = [
    "KIND_ROEPNAAM",
    "KIND_VOORNAMEN",
    "KIND_TUSSENVOEGSEL",
    "KIND_ACHTERNAAM",
    "KIND_VOLLEDIGE_NAAM",
    "KIND_GEBOORTEDATUM",
    "KIND_GEBOORTEPLAATS",
    "KIND_LEEFTIJD",
    "KIND_ERKENNINGSDATUM",
    "KIND_HIJ_ZIJ",
    "KIND_HEM_HAAR",
    "KIND_ZIJN_HAAR",
];

impl StructuralCollection {
    pub fn from_name(name: &str) -> Option<Self> {
        NAMES
            .iter()
            .find(|(n, _)| keys_equal(n, name))
            .map(|(_, c)| *c)
    }

    /// Every accepted structural name, aliases included.
    pub fn names() -> impl Iterator<Item = &'static str> {
        NAMES.iter().map(|(n, _)| *n)
    }

    /// Children matching this collection's filter, in declared order.
    ///
    /// Without a marriage date every child counts as born before it and none
    /// as born after. A child without a birth date counts as a minor but is
    /// in neither marriage-relative collection when the marriage date is known.
    pub fn select<'a>(self, case: &'a CaseData, today: Date) -> Vec<&'a Child> {
        let marriage = case.marriage_date();
        case.kinderen
            .iter()
            .filter(|child| match self {
                StructuralCollection::All => true,
                StructuralCollection::Minors => child.is_minor_on(today),
                StructuralCollection::BornBeforeMarriage => match (child.birth_date(), marriage) {
                    (_, None) => true,
                    (Some(birth), Some(m)) => birth < m,
                    (None, Some(_)) => false,
                },
                StructuralCollection::BornAfterMarriage => match (child.birth_date(), marriage) {
                    (_, None) => false,
                    (Some(birth), Some(m)) => birth >= m,
                    (None, Some(_)) => false,
                },
            })
            .collect()
    }
}

pub fn is_child_variable(name: &str) -> bool {
    CHILD_VARIABLES.iter().any(|v| keys_equal(v, name))
}

/// One child's variables, keyed by the closed vocabulary.
pub fn child_variables(child: &Child, today: Date) -> Replacements {
    let gender = child.gender();
    let optional = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").to_string();
    let optional_date = |v: &Option<String>| v.as_deref().map(format_date).unwrap_or_default();

    let mut vars = Replacements::new();
    vars.insert("KIND_ROEPNAAM", child.call_name());
    vars.insert("KIND_VOORNAMEN", child.voornamen.trim().to_string());
    vars.insert("KIND_TUSSENVOEGSEL", optional(&child.tussenvoegsel));
    vars.insert("KIND_ACHTERNAAM", child.surname());
    vars.insert("KIND_VOLLEDIGE_NAAM", child.full_name());
    vars.insert("KIND_GEBOORTEDATUM", optional_date(&child.geboortedatum));
    vars.insert("KIND_GEBOORTEPLAATS", optional(&child.geboorteplaats));
    vars.insert(
        "KIND_LEEFTIJD",
        child.age_on(today).map(format_age).unwrap_or_default(),
    );
    vars.insert("KIND_ERKENNINGSDATUM", optional_date(&child.erkenningsdatum));
    vars.insert("KIND_HIJ_ZIJ", gender.subject().to_string());
    vars.insert("KIND_HEM_HAAR", gender.object().to_string());
    vars.insert("KIND_ZIJN_HAAR", gender.possessive().to_string());
    vars
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
