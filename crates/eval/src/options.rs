//! Engine options and fixed resolution limits.

use convenant_core::{format, ModelError};
use time::{Date, OffsetDateTime};

/// Upper bound on outer loop-expansion passes. Nested loops need one pass
/// per nesting level; anything beyond this is treated as malformed.
pub const MAX_LOOP_PASSES: usize = 10;

/// Default number of nested placeholder substitution passes.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Per-call settings. There is no hidden global state: the evaluation date
/// used for ages and the minors filter travels with the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Evaluation date for derived ages.
    pub today: Date,
    /// Passes allowed when resolving placeholders nested in replacement values.
    pub max_placeholder_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self::for_date(OffsetDateTime::now_utc().date())
    }
}

impl EngineOptions {
    pub fn for_date(today: Date) -> Self {
        EngineOptions {
            today,
            max_placeholder_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_placeholder_depth = depth;
        self
    }
}

/// Parse an evaluation date (`YYYY-MM-DD` or `DD-MM-YYYY`).
pub fn parse_today(raw: &str) -> Result<Date, ModelError> {
    format::parse_date(raw).ok_or_else(|| ModelError::InvalidDate {
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn options_for_fixed_date() {
        let opts = EngineOptions::for_date(date!(2026 - 01 - 01)).with_max_depth(2);
        assert_eq!(opts.today, date!(2026 - 01 - 01));
        assert_eq!(opts.max_placeholder_depth, 2);
    }

    #[test]
    fn parse_today_rejects_garbage() {
        assert_eq!(parse_today("2026-03-01").unwrap(), date!(2026 - 03 - 01));
        assert!(matches!(
            parse_today("morgen"),
            Err(ModelError::InvalidDate { value }) if value == "morgen"
        ));
    }
}
