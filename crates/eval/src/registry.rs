//! Collection registry: JSON-array-backed collections declared as data.
//!
//! Each entry pairs an accessor (where the raw array lives in the case data)
//! with an item mapper (one raw item to its variables). The loop expander
//! never knows about individual collections; adding one means adding an
//! entry here.

use std::sync::LazyLock;

use convenant_core::{keys_equal, CaseData, Replacements};

use crate::mappers;
use crate::structural::StructuralCollection;

/// Retrieves a collection's raw serialized JSON array, if present.
pub type Accessor = fn(&CaseData) -> Option<&str>;

/// Maps one raw item to its flat variable map.
pub type ItemMapper = fn(&serde_json::Value, &CaseData) -> Replacements;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("collection name must not be empty")]
    EmptyName,
    #[error("collection '{name}' is already registered")]
    DuplicateCollection { name: String },
    #[error("collection '{name}' is a structural collection name")]
    ReservedName { name: String },
}

/// An immutable registry entry.
#[derive(Debug, Clone)]
pub struct CollectionDefinition {
    name: String,
    variable_prefix: String,
    accessor: Accessor,
    item_mapper: ItemMapper,
}

impl CollectionDefinition {
    pub fn new(
        name: impl Into<String>,
        variable_prefix: impl Into<String>,
        accessor: Accessor,
        item_mapper: ItemMapper,
    ) -> Self {
        CollectionDefinition {
            name: name.into(),
            variable_prefix: variable_prefix.into(),
            accessor,
            item_mapper,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variable_prefix(&self) -> &str {
        &self.variable_prefix
    }

    /// Parse the backing array and map every item.
    ///
    /// Absent, blank, malformed or non-array data all yield an empty list.
    pub fn items(&self, case: &CaseData) -> Vec<Replacements> {
        let raw = match (self.accessor)(case).map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return Vec::new(),
        };
        match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Array(items)) => items
                .iter()
                .map(|item| (self.item_mapper)(item, case))
                .collect(),
            Ok(other) => {
                tracing::warn!(
                    collection = %self.name,
                    found = json_kind(&other),
                    "collection data is not a JSON array; treating as empty"
                );
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(
                    collection = %self.name,
                    error = %err,
                    "malformed collection JSON; treating as empty"
                );
                Vec::new()
            }
        }
    }
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Name-unique (case-insensitive) set of collection definitions.
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    definitions: Vec<CollectionDefinition>,
}

static STANDARD: LazyLock<CollectionRegistry> = LazyLock::new(CollectionRegistry::build_standard);

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared registry of every known convenant collection.
    pub fn standard() -> &'static CollectionRegistry {
        &STANDARD
    }

    fn build_standard() -> Self {
        let definitions = vec![
            CollectionDefinition::new(
                "BANKREKENINGEN",
                "BANKREKENING",
                bank_accounts,
                mappers::bank_account,
            ),
            CollectionDefinition::new(
                "BANKREKENINGEN_KINDEREN",
                "KINDREKENING",
                child_bank_accounts,
                mappers::child_bank_account,
            ),
            CollectionDefinition::new("BELEGGINGEN", "BELEGGING", investments, mappers::investment),
            CollectionDefinition::new("VOERTUIGEN", "VOERTUIG", vehicles, mappers::vehicle),
            CollectionDefinition::new(
                "VERZEKERINGEN",
                "VERZEKERING",
                insurances,
                mappers::insurance,
            ),
            CollectionDefinition::new("SCHULDEN", "SCHULD", debts, mappers::debt),
            CollectionDefinition::new("VORDERINGEN", "VORDERING", claims, mappers::claim),
            CollectionDefinition::new("PENSIOENEN", "PENSIOEN", pensions, mappers::pension),
        ];
        CollectionRegistry { definitions }
    }

    /// Add a definition. Names are unique case-insensitively and may not
    /// collide with structural collection names.
    pub fn register(&mut self, definition: CollectionDefinition) -> Result<(), RegistryError> {
        let name = definition.name.trim();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if StructuralCollection::from_name(name).is_some() {
            return Err(RegistryError::ReservedName {
                name: name.to_string(),
            });
        }
        if self.get(name).is_some() {
            return Err(RegistryError::DuplicateCollection {
                name: name.to_string(),
            });
        }
        self.definitions.push(definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CollectionDefinition> {
        self.definitions.iter().find(|d| keys_equal(&d.name, name))
    }

    /// `(name, variable prefix)` for every entry, in registration order.
    pub fn names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.definitions
            .iter()
            .map(|d| (d.name.as_str(), d.variable_prefix.as_str()))
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

// ──────────────────────────────────────────────
// Accessors
// ──────────────────────────────────────────────

fn bank_accounts(case: &CaseData) -> Option<&str> {
    case.convenant.as_ref()?.bankrekeningen.as_deref()
}

fn child_bank_accounts(case: &CaseData) -> Option<&str> {
    case.alimentatie.as_ref()?.bankrekeningen_kinderen.as_deref()
}

fn investments(case: &CaseData) -> Option<&str> {
    case.convenant.as_ref()?.beleggingen.as_deref()
}

fn vehicles(case: &CaseData) -> Option<&str> {
    case.convenant.as_ref()?.voertuigen.as_deref()
}

fn insurances(case: &CaseData) -> Option<&str> {
    case.convenant.as_ref()?.verzekeringen.as_deref()
}

fn debts(case: &CaseData) -> Option<&str> {
    case.convenant.as_ref()?.schulden.as_deref()
}

fn claims(case: &CaseData) -> Option<&str> {
    case.convenant.as_ref()?.vorderingen.as_deref()
}

fn pensions(case: &CaseData) -> Option<&str> {
    case.convenant.as_ref()?.pensioenen.as_deref()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use convenant_core::ConvenantInfo;

    fn case_with_accounts(raw: Option<&str>) -> CaseData {
        CaseData {
            convenant: Some(ConvenantInfo {
                bankrekeningen: raw.map(str::to_string),
                ..ConvenantInfo::default()
            }),
            ..CaseData::default()
        }
    }

    fn no_items(_: &CaseData) -> Option<&str> {
        None
    }

    fn empty_mapper(_: &serde_json::Value, _: &CaseData) -> Replacements {
        Replacements::new()
    }

    #[test]
    fn standard_registry_lookup_is_case_insensitive() {
        let registry = CollectionRegistry::standard();
        assert_eq!(registry.len(), 8);
        let def = registry.get("bankrekeningen").unwrap();
        assert_eq!(def.name(), "BANKREKENINGEN");
        assert_eq!(def.variable_prefix(), "BANKREKENING");
        assert!(registry.get("KINDEREN").is_none());
    }

    #[test]
    fn items_are_mapped_in_order() {
        let case = case_with_accounts(Some(r#"[{"iban":"NL01"},{"iban":"NL02"}]"#));
        let items = CollectionRegistry::standard()
            .get("BANKREKENINGEN")
            .unwrap()
            .items(&case);
        let ibans: Vec<&str> = items
            .iter()
            .map(|i| i.get("BANKREKENING_IBAN").unwrap().as_str())
            .collect();
        assert_eq!(ibans, vec!["NL01", "NL02"]);
    }

    #[test]
    fn bad_data_is_an_empty_collection() {
        let def = CollectionRegistry::standard().get("BANKREKENINGEN").unwrap();
        for raw in [None, Some(""), Some("   "), Some("[{"), Some(r#"{"iban":"x"}"#)] {
            assert!(def.items(&case_with_accounts(raw)).is_empty(), "{raw:?}");
        }
        assert!(def.items(&CaseData::default()).is_empty());
    }

    #[test]
    fn register_rejects_duplicates_and_reserved_names() {
        let mut registry = CollectionRegistry::standard().clone();
        let dup = CollectionDefinition::new("Schulden", "X", no_items, empty_mapper);
        assert_eq!(
            registry.register(dup),
            Err(RegistryError::DuplicateCollection {
                name: "Schulden".to_string()
            })
        );
        let reserved = CollectionDefinition::new("kinderen", "X", no_items, empty_mapper);
        assert!(matches!(
            registry.register(reserved),
            Err(RegistryError::ReservedName { .. })
        ));
        let blank = CollectionDefinition::new(" ", "X", no_items, empty_mapper);
        assert_eq!(registry.register(blank), Err(RegistryError::EmptyName));

        let fresh = CollectionDefinition::new("WONINGEN", "WONING", no_items, empty_mapper);
        assert!(registry.register(fresh).is_ok());
        assert!(registry.get("woningen").is_some());
        assert_eq!(registry.len(), 9);
    }

    #[test]
    fn names_list_prefixes() {
        let names: Vec<(&str, &str)> = CollectionRegistry::standard().names().collect();
        assert!(names.contains(&("PENSIOENEN", "PENSIOEN")));
        assert!(names.contains(&("BANKREKENINGEN_KINDEREN", "KINDREKENING")));
    }
}
