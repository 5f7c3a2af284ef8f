//! Dutch grammar helpers: list conjunction, number agreement, pronouns and
//! articles.

use time::Date;

/// Grammatical gender used for pronoun selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

impl Gender {
    /// Interpret the free-form gender codes the intake forms store.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_lowercase()).as_deref() {
            Some("m" | "man" | "mannelijk" | "jongen" | "zoon" | "male") => Gender::Male,
            Some("v" | "vrouw" | "vrouwelijk" | "meisje" | "dochter" | "f" | "female") => {
                Gender::Female
            }
            _ => Gender::Unknown,
        }
    }

    /// Subject pronoun: hij / zij.
    pub fn subject(self) -> &'static str {
        match self {
            Gender::Male => "hij",
            Gender::Female => "zij",
            Gender::Unknown => "hij/zij",
        }
    }

    /// Object pronoun: hem / haar.
    pub fn object(self) -> &'static str {
        match self {
            Gender::Male => "hem",
            Gender::Female => "haar",
            Gender::Unknown => "hem/haar",
        }
    }

    /// Possessive pronoun: zijn / haar.
    pub fn possessive(self) -> &'static str {
        match self {
            Gender::Male => "zijn",
            Gender::Female => "haar",
            Gender::Unknown => "zijn/haar",
        }
    }
}

/// Subject pronoun for a group of children: the single child's own pronoun,
/// or "zij" for more than one.
pub fn subject_for(genders: &[Gender]) -> &'static str {
    match genders {
        [single] => single.subject(),
        _ => "zij",
    }
}

/// Object pronoun for a group of children.
pub fn object_for(genders: &[Gender]) -> &'static str {
    match genders {
        [single] => single.object(),
        _ => "hen",
    }
}

/// Possessive pronoun for a group of children.
pub fn possessive_for(genders: &[Gender]) -> &'static str {
    match genders {
        [single] => single.possessive(),
        _ => "hun",
    }
}

/// Join names the Dutch way: "A", "A en B", "A, B en C".
pub fn join_dutch<S: AsRef<str>>(items: &[S]) -> String {
    let parts: Vec<&str> = items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();
    match parts.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} en {}", init.join(", "), last),
    }
}

/// Pick the singular or plural noun for a count: 1 kind, 2 kinderen.
pub fn noun_for_count<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 {
        singular
    } else {
        plural
    }
}

/// Prefix an institution name with the definite article "de", unless it
/// already starts with "de" or "het".
pub fn with_article(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with("de ") || lower.starts_with("het ") {
        trimmed.to_string()
    } else {
        format!("de {}", trimmed)
    }
}

/// Age in completed years on `today`.
pub fn age_on(birth: Date, today: Date) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month() as u8, today.day()) < (birth.month() as u8, birth.day()) {
        age -= 1;
    }
    age
}

/// "1 jaar" / "12 jaar". Dutch uses the singular after numerals here.
pub fn format_age(age: i32) -> String {
    format!("{} jaar", age)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn joins_lists_with_en() {
        assert_eq!(join_dutch::<&str>(&[]), "");
        assert_eq!(join_dutch(&["Anna"]), "Anna");
        assert_eq!(join_dutch(&["Anna", "Bram"]), "Anna en Bram");
        assert_eq!(join_dutch(&["Anna", "Bram", "Cas"]), "Anna, Bram en Cas");
        assert_eq!(join_dutch(&["Anna", "", "Cas"]), "Anna en Cas");
    }

    #[test]
    fn noun_agrees_with_count() {
        assert_eq!(noun_for_count(1, "kind", "kinderen"), "kind");
        assert_eq!(noun_for_count(0, "kind", "kinderen"), "kinderen");
        assert_eq!(noun_for_count(3, "kind", "kinderen"), "kinderen");
    }

    #[test]
    fn article_is_not_doubled() {
        assert_eq!(with_article("ABN AMRO"), "de ABN AMRO");
        assert_eq!(with_article("De Volksbank"), "De Volksbank");
        assert_eq!(with_article("het Pensioenfonds"), "het Pensioenfonds");
        assert_eq!(with_article("Delta Lloyd"), "de Delta Lloyd");
        assert_eq!(with_article("  "), "");
    }

    #[test]
    fn pronouns_follow_gender_and_number() {
        assert_eq!(Gender::from_code(Some("V")).subject(), "zij");
        assert_eq!(Gender::from_code(Some("jongen")).possessive(), "zijn");
        assert_eq!(Gender::from_code(None).object(), "hem/haar");
        assert_eq!(subject_for(&[Gender::Male]), "hij");
        assert_eq!(subject_for(&[Gender::Male, Gender::Female]), "zij");
        assert_eq!(possessive_for(&[Gender::Male, Gender::Female]), "hun");
        assert_eq!(object_for(&[Gender::Female, Gender::Female]), "hen");
    }

    #[test]
    fn age_counts_completed_years() {
        let birth = date!(2012 - 02 - 29);
        assert_eq!(age_on(birth, date!(2024 - 02 - 28)), 11);
        assert_eq!(age_on(birth, date!(2024 - 02 - 29)), 12);
        assert_eq!(age_on(birth, date!(2025 - 03 - 01)), 13);
        assert_eq!(format_age(12), "12 jaar");
    }
}
