/// Errors raised while loading case data, rule sets or evaluation contexts.
///
/// Template resolution itself never fails; these only surface when input
/// documents are turned into model values.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The input was not valid JSON or did not match the expected shape.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A leaf condition named an operator outside the supported set.
    #[error("unknown condition operator '{op}'")]
    UnknownOperator { op: String },

    /// A group condition named something other than AND/OR.
    #[error("unknown logical operator '{op}' (expected AND or OR)")]
    UnknownLogicalOperator { op: String },

    /// A condition node was neither a well-formed leaf nor a well-formed group.
    #[error("invalid condition: {message}")]
    InvalidCondition { message: String },

    /// A rule set document was missing its rules or default.
    #[error("invalid rule set: {message}")]
    InvalidRuleSet { message: String },

    /// A date string could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// An evaluation context or replacement map held a non-scalar value.
    #[error("field '{field}' must be a string, number, boolean or null")]
    NonScalarValue { field: String },
}
