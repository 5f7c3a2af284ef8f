//! Case data: the read-only root context a document is generated from.
//!
//! Financial arrangements are stored the way the intake application saves
//! them: each collection is a raw JSON array held in a string field. The
//! engine parses those lazily through the collection registry, so nothing
//! here interprets their contents.

use serde::{Deserialize, Deserializer, Serialize};
use time::Date;

use crate::error::ModelError;
use crate::format;
use crate::grammar::{self, Gender};

/// Root aggregate for one document-generation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseData {
    pub partij1: Option<Party>,
    pub partij2: Option<Party>,
    pub kinderen: Vec<Child>,
    /// Marriage (or partnership registration) date, ISO `YYYY-MM-DD`.
    pub huwelijksdatum: Option<String>,
    pub convenant: Option<ConvenantInfo>,
    pub alimentatie: Option<Alimentatie>,
}

impl CaseData {
    /// Parse case data from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse case data from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ModelError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn marriage_date(&self) -> Option<Date> {
        self.huwelijksdatum.as_deref().and_then(format::parse_date)
    }

    /// Look up a child by its numeric id.
    pub fn child_by_id(&self, id: i64) -> Option<&Child> {
        self.kinderen.iter().find(|c| c.id == id)
    }

    pub fn party(&self, number: u8) -> Option<&Party> {
        match number {
            1 => self.partij1.as_ref(),
            2 => self.partij2.as_ref(),
            _ => None,
        }
    }
}

/// One of the two parties to the settlement.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Party {
    pub voornamen: String,
    pub roepnaam: Option<String>,
    pub tussenvoegsel: Option<String>,
    pub achternaam: String,
    pub geslacht: Option<String>,
}

impl Party {
    /// Surname including the name prefix, e.g. "de Vries".
    pub fn surname(&self) -> String {
        join_name(&[self.tussenvoegsel.as_deref().unwrap_or(""), &self.achternaam])
    }

    /// Call name, falling back to the first given name.
    pub fn call_name(&self) -> String {
        call_name(self.roepnaam.as_deref(), &self.voornamen)
    }

    /// Name as used in running text: call name plus surname.
    pub fn display_name(&self) -> String {
        join_name(&[&self.call_name(), &self.surname()])
    }

    /// Full legal name: all given names plus surname.
    pub fn full_name(&self) -> String {
        join_name(&[&self.voornamen, &self.surname()])
    }

    pub fn gender(&self) -> Gender {
        Gender::from_code(self.geslacht.as_deref())
    }
}

/// A minor or adult child of the parties.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Child {
    pub id: i64,
    pub voornamen: String,
    pub roepnaam: Option<String>,
    pub tussenvoegsel: Option<String>,
    pub achternaam: String,
    /// ISO `YYYY-MM-DD`.
    pub geboortedatum: Option<String>,
    pub geboorteplaats: Option<String>,
    pub geslacht: Option<String>,
    /// Date of recognition for children born outside the marriage.
    pub erkenningsdatum: Option<String>,
}

impl Child {
    pub fn surname(&self) -> String {
        join_name(&[self.tussenvoegsel.as_deref().unwrap_or(""), &self.achternaam])
    }

    pub fn call_name(&self) -> String {
        call_name(self.roepnaam.as_deref(), &self.voornamen)
    }

    pub fn display_name(&self) -> String {
        join_name(&[&self.call_name(), &self.surname()])
    }

    pub fn full_name(&self) -> String {
        join_name(&[&self.voornamen, &self.surname()])
    }

    pub fn birth_date(&self) -> Option<Date> {
        self.geboortedatum.as_deref().and_then(format::parse_date)
    }

    /// Age in completed years on `today`. Never stored, always derived.
    pub fn age_on(&self, today: Date) -> Option<i32> {
        self.birth_date().map(|birth| grammar::age_on(birth, today))
    }

    /// A child without a known birth date counts as a minor.
    pub fn is_minor_on(&self, today: Date) -> bool {
        self.age_on(today).map_or(true, |age| age < 18)
    }

    pub fn gender(&self) -> Gender {
        Gender::from_code(self.geslacht.as_deref())
    }
}

/// Property and debt arrangements, each a raw JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvenantInfo {
    #[serde(deserialize_with = "raw_collection")]
    pub bankrekeningen: Option<String>,
    #[serde(deserialize_with = "raw_collection")]
    pub beleggingen: Option<String>,
    #[serde(deserialize_with = "raw_collection")]
    pub voertuigen: Option<String>,
    #[serde(deserialize_with = "raw_collection")]
    pub verzekeringen: Option<String>,
    #[serde(deserialize_with = "raw_collection")]
    pub schulden: Option<String>,
    #[serde(deserialize_with = "raw_collection")]
    pub vorderingen: Option<String>,
    #[serde(deserialize_with = "raw_collection")]
    pub pensioenen: Option<String>,
}

/// Child-support arrangements.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Alimentatie {
    #[serde(deserialize_with = "raw_collection")]
    pub bankrekeningen_kinderen: Option<String>,
}

/// Accept either the stored string form or an inline JSON array, keeping
/// the latter as its serialized text.
fn raw_collection<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn call_name(roepnaam: Option<&str>, voornamen: &str) -> String {
    match roepnaam.map(str::trim) {
        Some(r) if !r.is_empty() => r.to_string(),
        _ => voornamen
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

fn join_name(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
