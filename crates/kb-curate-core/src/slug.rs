//! Filesystem-safe slugs derived from entry titles.

/// Normalize `title` into a snake_case slug.
///
/// Lowercases, turns runs of whitespace and hyphens into `_`, drops every
/// character outside `[a-z0-9_]`, collapses repeated `_`, and trims `_`
/// from both ends. May return an empty string.
pub fn slugify(title: &str) -> String {
    let mut spaced = String::with_capacity(title.len());
    let mut in_gap = false;
    for c in title.trim().to_lowercase().chars() {
        if c.is_whitespace() || c == '-' {
            if !in_gap {
                spaced.push('_');
            }
            in_gap = true;
        } else {
            spaced.push(c);
            in_gap = false;
        }
    }

    let mut slug = String::with_capacity(spaced.len());
    for c in spaced.chars() {
        let keep = c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_';
        if !keep || (c == '_' && slug.ends_with('_')) {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('_').to_string()
}

/// Slug from the title, falling back to the source file stem.
/// `None` if both normalize to nothing.
pub fn slug_for(title: &str, file_stem: &str) -> Option<String> {
    [title, file_stem]
        .into_iter()
        .map(slugify)
        .find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_is_dropped() {
        assert_eq!(slugify("Retry Logic: gRPC Calls!"), "retry_logic_grpc_calls");
    }

    #[test]
    fn hyphens_and_whitespace_become_single_underscore() {
        assert_eq!(slugify("  Zero-copy \t - parsing  "), "zero_copy_parsing");
        assert_eq!(slugify("a__b"), "a_b");
        assert_eq!(slugify("_leading and trailing_"), "leading_and_trailing");
    }

    #[test]
    fn non_ascii_letters_are_removed() {
        assert_eq!(slugify("Café résumé"), "caf_rsum");
    }

    #[test]
    fn removed_characters_can_leave_adjacent_underscores() {
        assert_eq!(slugify("C++ / Rust"), "c_rust");
    }

    #[test]
    fn empty_when_nothing_survives() {
        assert_eq!(slugify("!!! ???"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn slug_for_falls_back_to_stem() {
        assert_eq!(slug_for("Real Title", "draft-1"), Some("real_title".to_string()));
        assert_eq!(slug_for("???", "draft-1"), Some("draft_1".to_string()));
        assert_eq!(slug_for("", "!!"), None);
    }
}
