//! Item mappers: one raw collection item to its flat variable map.
//!
//! Every mapper is pure and total. Item JSON uses the intake form's
//! camelCase field names; free-text companions of coded fields are named
//! `<field>Anders`.

use convenant_core::format::{format_iban, format_identifier};
use convenant_core::grammar::with_article;
use convenant_core::{CaseData, Replacements};

use crate::primitives::{date, effective_value, money, party_value, text, ItemVars};

pub fn bank_account(item: &serde_json::Value, case: &CaseData) -> Replacements {
    let mut vars = ItemVars::new("BANKREKENING");
    vars.set("IBAN", format_iban(&text(item, "iban")))
        .set("BANKNAAM", with_article(&text(item, "bankNaam")))
        .set(
            "TENAAMSTELLING",
            party_value(item, "tenaamstelling", "tenaamstellingAnders", case),
        )
        .set("SALDO", money(item, "saldo"))
        .set("TOEDELING", party_value(item, "toedeling", "toedelingAnders", case))
        .alias("REKENINGNUMMER", "IBAN")
        .alias("BANK", "BANKNAAM");
    vars.finish()
}

/// Savings accounts held for the children; `tenaamstelling` is usually a
/// list of child ids.
pub fn child_bank_account(item: &serde_json::Value, case: &CaseData) -> Replacements {
    let mut vars = ItemVars::new("KINDREKENING");
    vars.set("IBAN", format_iban(&text(item, "iban")))
        .set("BANKNAAM", with_article(&text(item, "bankNaam")))
        .set(
            "TENAAMSTELLING",
            party_value(item, "tenaamstelling", "tenaamstellingAnders", case),
        )
        .set("SALDO", money(item, "saldo"))
        .alias("KINDREKENING_NUMMER", "IBAN")
        .alias("KINDREKENING_KINDEREN", "TENAAMSTELLING");
    vars.finish()
}

pub fn investment(item: &serde_json::Value, case: &CaseData) -> Replacements {
    let mut vars = ItemVars::new("BELEGGING");
    vars.set("SOORT", effective_value(item, "soort", "soortAnders"))
        .set("INSTELLING", with_article(&text(item, "instelling")))
        .set("REKENINGNUMMER", format_identifier(&text(item, "rekeningnummer")))
        .set("WAARDE", money(item, "waarde"))
        .set("PEILDATUM", date(item, "peildatum"))
        .set("EIGENAAR", party_value(item, "eigenaar", "eigenaarAnders", case))
        .set("TOEDELING", party_value(item, "toedeling", "toedelingAnders", case))
        .alias("BELEGGING_OMSCHRIJVING", "SOORT");
    vars.finish()
}

pub fn vehicle(item: &serde_json::Value, case: &CaseData) -> Replacements {
    let merk = text(item, "merk");
    let model = text(item, "model");
    let kenteken = format_identifier(&text(item, "kenteken"));

    let mut vars = ItemVars::new("VOERTUIG");
    vars.set("SOORT", effective_value(item, "soort", "soortAnders"))
        .set("MERK", merk.clone())
        .set("MODEL", model.clone())
        .set("KENTEKEN", kenteken.clone())
        .set("BOUWJAAR", text(item, "bouwjaar"))
        .set("WAARDE", money(item, "waarde"))
        .set("EIGENAAR", party_value(item, "eigenaar", "eigenaarAnders", case))
        .set("TOEDELING", party_value(item, "toedeling", "toedelingAnders", case))
        .set("OMSCHRIJVING", vehicle_description(&merk, &model, &kenteken))
        .alias("KENTEKEN", "KENTEKEN");
    vars.finish()
}

/// "Volkswagen Golf met kenteken AB-123-C".
fn vehicle_description(merk: &str, model: &str, kenteken: &str) -> String {
    let name = [merk, model]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    match (name.is_empty(), kenteken.is_empty()) {
        (_, true) => name,
        (true, false) => format!("kenteken {}", kenteken),
        (false, false) => format!("{} met kenteken {}", name, kenteken),
    }
}

pub fn insurance(item: &serde_json::Value, case: &CaseData) -> Replacements {
    let mut vars = ItemVars::new("VERZEKERING");
    vars.set("SOORT", effective_value(item, "soort", "soortAnders"))
        .set("MAATSCHAPPIJ", with_article(&text(item, "maatschappij")))
        .set("POLISNUMMER", format_identifier(&text(item, "polisnummer")))
        .set(
            "VERZEKERINGNEMER",
            party_value(item, "verzekeringnemer", "verzekeringnemerAnders", case),
        )
        .set("TOEDELING", party_value(item, "toedeling", "toedelingAnders", case))
        .alias("POLISNUMMER", "POLISNUMMER");
    vars.finish()
}

pub fn debt(item: &serde_json::Value, case: &CaseData) -> Replacements {
    let mut vars = ItemVars::new("SCHULD");
    vars.set("SOORT", effective_value(item, "soort", "soortAnders"))
        .set("SCHULDEISER", with_article(&text(item, "schuldeiser")))
        .set("OMSCHRIJVING", text(item, "omschrijving"))
        .set("BEDRAG", money(item, "bedrag"))
        .set(
            "DRAAGPLICHTIGE",
            party_value(item, "draagplichtige", "draagplichtigeAnders", case),
        )
        .alias("SCHULD_BETALER", "DRAAGPLICHTIGE");
    vars.finish()
}

pub fn claim(item: &serde_json::Value, case: &CaseData) -> Replacements {
    let mut vars = ItemVars::new("VORDERING");
    vars.set("SOORT", effective_value(item, "soort", "soortAnders"))
        .set("DEBITEUR", text(item, "debiteur"))
        .set("OMSCHRIJVING", text(item, "omschrijving"))
        .set("BEDRAG", money(item, "bedrag"))
        .set("TOEDELING", party_value(item, "toedeling", "toedelingAnders", case))
        .alias("VORDERING_ONTVANGER", "TOEDELING");
    vars.finish()
}

pub fn pension(item: &serde_json::Value, case: &CaseData) -> Replacements {
    let mut vars = ItemVars::new("PENSIOEN");
    vars.set("UITVOERDER", with_article(&text(item, "uitvoerder")))
        .set("SOORT", effective_value(item, "soort", "soortAnders"))
        .set("POLISNUMMER", format_identifier(&text(item, "polisnummer")))
        .set("DEELNEMER", party_value(item, "deelnemer", "deelnemerAnders", case))
        .set("VERDELING", effective_value(item, "verdeling", "verdelingAnders"))
        .alias("PENSIOEN_VERDELING_TEKST", "VERDELING");
    vars.finish()
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
