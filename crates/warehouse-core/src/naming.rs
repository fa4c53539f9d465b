//! # Unique Name Resolution
//!
//! Derives a free product name from a candidate that may already be taken,
//! the way a file manager names copies.
//!
//! ## Resolution Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  existing = { "Widget", "Widget(1)" }     candidate = "  Widget "       │
//! │                                                                         │
//! │  trim ──► "Widget"        taken? yes ── no "(n)" suffix ──► "Widget(1)" │
//! │           "Widget(1)"     taken? yes ── suffix n = 1    ──► "Widget(2)" │
//! │           "Widget(2)"     taken? no  ──► done                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every produced name is checked against the full set again, so runs of
//! numbered copies are skipped over rather than collided with.

use std::collections::HashSet;

/// Returns a trimmed name that is not in `existing`.
///
/// The candidate must already have passed
/// [`validate_product_name`](crate::validation::validate_product_name); a
/// blank candidate is returned as an empty string.
///
/// ## Example
/// ```rust
/// use std::collections::HashSet;
/// use warehouse_core::naming::resolve_unique_name;
///
/// let existing: HashSet<&str> = ["Widget", "Widget(1)"].into_iter().collect();
/// assert_eq!(resolve_unique_name("Widget", &existing), "Widget(2)");
/// assert_eq!(resolve_unique_name("  Gadget  ", &existing), "Gadget");
/// ```
pub fn resolve_unique_name(candidate: &str, existing: &HashSet<&str>) -> String {
    let mut name = candidate.trim().to_string();

    while existing.contains(name.as_str()) {
        name = next_name(&name);
    }

    name
}

/// Same as [`resolve_unique_name`] for callers holding owned names.
pub fn resolve_unique_name_in<I, S>(candidate: &str, existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let owned: Vec<S> = existing.into_iter().collect();
    let taken: HashSet<&str> = owned.iter().map(|s| AsRef::<str>::as_ref(s)).collect();
    resolve_unique_name(candidate, &taken)
}

/// The name that follows a taken one: `X(n)` becomes `X(n+1)`, anything
/// else gets `(1)` appended.
pub fn next_name(taken: &str) -> String {
    match split_numbered_suffix(taken) {
        Some((base, n)) => match n.checked_add(1) {
            Some(next) => format!("{base}({next})"),
            None => format!("{taken}(1)"),
        },
        None => format!("{taken}(1)"),
    }
}

/// Splits `"Widget(12)"` into `("Widget", 12)`.
///
/// Only a trailing parenthesized run of ASCII digits counts; `"Bolt (M6)"`,
/// `"Pipe()"` and `"Tube(1) long"` have no numbered suffix.
pub fn split_numbered_suffix(name: &str) -> Option<(&str, u64)> {
    let inner_end = name.strip_suffix(')')?;
    let open = inner_end.rfind('(')?;
    let digits = &inner_end[open + 1..];

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let n = digits.parse().ok()?;
    Some((&name[..open], n))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(list: &[&'a str]) -> HashSet<&'a str> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_free_name_is_returned_unchanged() {
        assert_eq!(resolve_unique_name("Widget", &names(&[])), "Widget");
        assert_eq!(resolve_unique_name("Widget", &names(&["Gadget"])), "Widget");
    }

    #[test]
    fn test_candidate_is_trimmed() {
        assert_eq!(resolve_unique_name("  Gadget  ", &names(&[])), "Gadget");
        assert_eq!(
            resolve_unique_name("  Gadget  ", &names(&["Gadget"])),
            "Gadget(1)"
        );
    }

    #[test]
    fn test_first_collision_appends_one() {
        assert_eq!(resolve_unique_name("Widget", &names(&["Widget"])), "Widget(1)");
    }

    #[test]
    fn test_repeated_collisions_keep_counting() {
        let existing = names(&["Widget", "Widget(1)"]);
        assert_eq!(resolve_unique_name("Widget", &existing), "Widget(2)");

        let existing = names(&["Widget", "Widget(1)", "Widget(2)", "Widget(3)"]);
        assert_eq!(resolve_unique_name("Widget", &existing), "Widget(4)");
    }

    #[test]
    fn test_gaps_are_not_filled_past_the_first_free_name() {
        let existing = names(&["Widget", "Widget(2)"]);
        assert_eq!(resolve_unique_name("Widget", &existing), "Widget(1)");
    }

    #[test]
    fn test_numbered_candidate_increments() {
        let existing = names(&["Widget(1)"]);
        assert_eq!(resolve_unique_name("Widget(1)", &existing), "Widget(2)");

        let existing = names(&["Widget(9)", "Widget(10)"]);
        assert_eq!(resolve_unique_name("Widget(9)", &existing), "Widget(11)");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(resolve_unique_name("widget", &names(&["Widget"])), "widget");
    }

    #[test]
    fn test_split_numbered_suffix() {
        assert_eq!(split_numbered_suffix("Widget(12)"), Some(("Widget", 12)));
        assert_eq!(split_numbered_suffix("Bolt M6 (3)"), Some(("Bolt M6 ", 3)));
        assert_eq!(split_numbered_suffix("(7)"), Some(("", 7)));

        assert_eq!(split_numbered_suffix("Widget"), None);
        assert_eq!(split_numbered_suffix("Bolt (M6)"), None);
        assert_eq!(split_numbered_suffix("Pipe()"), None);
        assert_eq!(split_numbered_suffix("Tube(1) long"), None);
        assert_eq!(split_numbered_suffix("Widget(-1)"), None);
    }

    #[test]
    fn test_non_numeric_parentheses_get_a_fresh_counter() {
        let existing = names(&["Bolt (M6)"]);
        assert_eq!(resolve_unique_name("Bolt (M6)", &existing), "Bolt (M6)(1)");
    }

    #[test]
    fn test_oversized_counter_does_not_overflow() {
        let huge = format!("Widget({})", u64::MAX);
        let existing: HashSet<&str> = [huge.as_str()].into_iter().collect();
        assert_eq!(
            resolve_unique_name(&huge, &existing),
            format!("Widget({})(1)", u64::MAX)
        );
    }

    #[test]
    fn test_resolve_with_owned_names() {
        let existing = vec!["Widget".to_string(), "Widget(1)".to_string()];
        assert_eq!(resolve_unique_name_in("Widget", &existing), "Widget(2)");
    }
}
