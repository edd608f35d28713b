//! # Employer Eligibility Rules
//!
//! Employers store their eligibility rules as a JSON document. The only
//! part this service reads is the `behaviors` array.

use serde_json::Value;

/// Behavior marker for employers that identify users by EID downstream.
pub const EID_IDENTIFIER_BEHAVIOR: &str = "useEidAsBrazeIdentifier";

/// Whether an employer's rules enable the EID identifier behavior.
///
/// `rules` is the raw column value: either a JSON string (text column) or
/// an already-decoded document (native JSON column). `NULL` rules, rules
/// without a `behaviors` array, and non-object documents all yield `false`.
///
/// # Errors
///
/// Returns the parse error when a text column does not hold valid JSON.
pub fn employer_uses_eid(rules: &Value) -> Result<bool, serde_json::Error> {
    let parsed;
    let document = match rules {
        Value::String(text) => {
            parsed = serde_json::from_str::<Value>(text)?;
            &parsed
        }
        other => other,
    };

    Ok(document
        .get("behaviors")
        .and_then(Value::as_array)
        .is_some_and(|behaviors| {
            behaviors
                .iter()
                .any(|b| b.as_str() == Some(EID_IDENTIFIER_BEHAVIOR))
        }))
}
