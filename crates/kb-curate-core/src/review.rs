//! Diagnostic block prepended to entries routed to review.

use chrono::NaiveDate;

/// Render the review comment for `errors`, dated `on`.
///
/// ```text
/// <!-- REVIEW NEEDED
///    Validation failed on 2026-10-17.
///    Errors:
///    - Missing required header field: tags
/// -->
/// ```
pub fn review_note(on: NaiveDate, errors: &[String]) -> String {
    let mut lines = vec![
        "<!-- REVIEW NEEDED".to_string(),
        format!("   Validation failed on {}.", on.format("%Y-%m-%d")),
        "   Errors:".to_string(),
    ];
    lines.extend(errors.iter().map(|e| format!("   - {}", e)));
    lines.push("-->".to_string());
    lines.push(String::new());
    lines.join("\n")
}

/// `original` with the review note in front of it.
pub fn annotate(original: &str, on: NaiveDate, errors: &[String]) -> String {
    let mut out = review_note(on, errors);
    out.push_str(original);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotates_with_dated_bullets() {
        let on = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let out = annotate(
            "---\ntitle: x\n---\n",
            on,
            &["first".to_string(), "second".to_string()],
        );
        assert_eq!(
            out,
            "<!-- REVIEW NEEDED\n   Validation failed on 2026-10-17.\n   Errors:\n   - first\n   - second\n-->\n---\ntitle: x\n---\n"
        );
    }
}
