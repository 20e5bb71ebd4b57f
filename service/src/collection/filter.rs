//! Searching [`Record`]s by free text.

use common::text;

use super::{Record, SearchScope};

/// Retains the `records` matching the `search` text within the given
/// [`SearchScope`], preserving their order.
///
/// Blank `search` text retains every record.
#[must_use]
pub fn filter<'r, R>(
    records: &'r [R],
    search: &str,
    scope: SearchScope,
) -> Vec<&'r R>
where
    R: Record,
{
    if search.trim().is_empty() {
        return records.iter().collect();
    }

    let needle = text::fold(search);
    records
        .iter()
        .filter(|r| matches(*r, &needle, scope))
        .collect()
}

/// Checks whether the `record` contains the already [`text::fold`]ed
/// `needle` as a substring of its folded name or (if the [`SearchScope`]
/// allows) its folded email.
#[must_use]
pub fn matches<R>(record: &R, needle: &str, scope: SearchScope) -> bool
where
    R: Record + ?Sized,
{
    if text::fold(&record.display_name()).contains(needle) {
        return true;
    }
    match scope {
        SearchScope::Name => false,
        SearchScope::NameAndEmail => record
            .email()
            .is_some_and(|email| text::fold(email).contains(needle)),
    }
}
