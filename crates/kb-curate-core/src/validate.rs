//! Schema validation of a single entry.
//!
//! Validation runs in two stages. First the header block must be located;
//! if it cannot be, the result carries only that parse failure. Otherwise
//! every rule runs and all errors are collected in a fixed order:
//!
//! 1. required fields present and non-empty
//! 2. `type` within the type vocabulary
//! 3. `domain` within the domain vocabulary
//! 4. `confidence` within the confidence vocabulary
//! 5. `tags` list-typed
//! 6. required `##` sections for the entry's profile (quick or standard)

use std::collections::BTreeSet;

use crate::header::{parse_header, Header};
use crate::schema::Schema;
use crate::sections::sections;

/// Verdict plus the ordered list of human-readable reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub passed: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            passed: errors.is_empty(),
            errors,
        }
    }

    /// A failing result carrying a single reason.
    pub fn failure(reason: impl Into<String>) -> Self {
        Self::from_errors(vec![reason.into()])
    }
}

/// Validate the full text of an entry against `schema`.
pub fn validate(text: &str, schema: &Schema) -> ValidationResult {
    match parse_header(text) {
        Ok(header) => ValidationResult::from_errors(check(&header, &sections(text), schema)),
        Err(e) => ValidationResult::failure(e.to_string()),
    }
}

fn check(header: &Header, present: &BTreeSet<String>, schema: &Schema) -> Vec<String> {
    let mut errors = Vec::new();

    for field in &schema.required_fields {
        if header.get(field).map_or(true, |v| v.is_empty()) {
            errors.push(format!("Missing required header field: {}", field));
        }
    }

    check_enum(header, "type", &schema.types, &mut errors);
    check_enum(header, "domain", &schema.domains, &mut errors);
    check_enum(header, "confidence", &schema.confidence, &mut errors);

    if header.get("tags").is_some_and(|v| v.as_list().is_none()) {
        errors.push("'tags' must be a list (e.g., [tag1, tag2])".to_string());
    }

    let profile = schema.profile(header.scalar("type"), header.scalar("complexity"));
    for section in schema.required_sections(profile) {
        if !present.contains(section) {
            errors.push(format!(
                "Missing required section for {} entry: ## {}",
                profile.label(),
                section
            ));
        }
    }

    errors
}

/// Empty or absent values are left to the required-field rule.
fn check_enum(header: &Header, field: &str, allowed: &BTreeSet<String>, errors: &mut Vec<String>) {
    let Some(value) = header.get(field).filter(|v| !v.is_empty()) else {
        return;
    };
    if value.as_scalar().is_some_and(|s| allowed.contains(s)) {
        return;
    }
    let valid: Vec<&str> = allowed.iter().map(String::as_str).collect();
    errors.push(format!(
        "Invalid {}: '{}'. Must be one of: {}",
        field,
        value,
        valid.join(", ")
    ));
}
