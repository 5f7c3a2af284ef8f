//! Document-level facts derived from case data: scalar placeholders for
//! rendering and a typed context for rule evaluation.

use convenant_core::format::{capitalize_first, format_date};
use convenant_core::grammar::{join_dutch, noun_for_count, object_for, possessive_for, subject_for};
use convenant_core::{CaseData, EvaluationContext, Gender, Party, Replacements};

use crate::options::EngineOptions;
use crate::registry::CollectionRegistry;

/// Scalar placeholders available anywhere in a document.
pub fn case_replacements(case: &CaseData, options: &EngineOptions) -> Replacements {
    let children = &case.kinderen;
    let genders: Vec<Gender> = children.iter().map(|c| c.gender()).collect();
    let names: Vec<String> = children.iter().map(|c| c.call_name()).collect();
    let minors = minor_count(case, options);

    let mut map = Replacements::new();
    for (n, party) in [(1, &case.partij1), (2, &case.partij2)] {
        map.insert(format!("PARTIJ{}_NAAM", n), party_field(party, Party::display_name));
        map.insert(format!("PARTIJ{}_ROEPNAAM", n), party_field(party, Party::call_name));
        map.insert(
            format!("PARTIJ{}_VOLLEDIGE_NAAM", n),
            party_field(party, Party::full_name),
        );
    }
    map.insert(
        "HUWELIJKSDATUM",
        case.huwelijksdatum
            .as_deref()
            .map(format_date)
            .unwrap_or_default(),
    );
    map.insert("AANTAL_KINDEREN", children.len().to_string());
    map.insert("AANTAL_MINDERJARIGE_KINDEREN", minors.to_string());
    map.insert("KINDEREN_NAMEN", join_dutch(&names));
    map.insert(
        "KIND_OF_KINDEREN",
        noun_for_count(children.len(), "kind", "kinderen").to_string(),
    );
    map.insert("HIJ_ZIJ_KINDEREN", subject_for(&genders).to_string());
    map.insert("HEM_HAAR_KINDEREN", object_for(&genders).to_string());
    map.insert("ZIJN_HAAR_KINDEREN", possessive_for(&genders).to_string());
    map
}

/// Typed facts for the rule evaluator, one `Heeft<Collection>` flag per
/// registry collection.
pub fn case_context(case: &CaseData, options: &EngineOptions) -> EvaluationContext {
    let mut ctx = EvaluationContext::new()
        .with("AantalKinderen", case.kinderen.len())
        .with("AantalMinderjarigeKinderen", minor_count(case, options))
        .with("Gehuwd", case.marriage_date().is_some());

    let registry = CollectionRegistry::standard();
    for (name, _) in registry.names() {
        let present = registry
            .get(name)
            .is_some_and(|def| !def.items(case).is_empty());
        ctx.insert(format!("Heeft{}", pascal_case(name)), present);
    }
    ctx
}

fn minor_count(case: &CaseData, options: &EngineOptions) -> usize {
    case.kinderen
        .iter()
        .filter(|c| c.is_minor_on(options.today))
        .count()
}

fn party_field(party: &Option<Party>, field: fn(&Party) -> String) -> String {
    party.as_ref().map(field).unwrap_or_default()
}

/// "BANKREKENINGEN_KINDEREN" -> "BankrekeningenKinderen".
fn pascal_case(name: &str) -> String {
    name.split('_')
        .map(|part| capitalize_first(&part.to_lowercase()))
        .collect()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
