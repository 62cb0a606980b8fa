//! Place name normalization.
//!
//! Stop and destination names differ between the live feed and the static
//! catalogs in accents, punctuation and decorations such as a trailing mode
//! tag ("Gare de Lyon (RER)"). Comparing normalized forms by substring
//! containment absorbs those differences.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::line::StopOnLine;

/// Characters that separate words in a place name and collapse to one space.
fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '-' | '\u{2010}' | '\u{2013}' | '\u{2014}' | '\'' | '\u{2019}' | '(' | ')' | '<'
                | '>' | '[' | ']'
        )
}

/// Canonicalize a place name for comparison.
///
/// Strips diacritics, collapses runs of dashes, apostrophes, brackets and
/// whitespace into a single space, then trims and lowercases.
///
/// # Examples
///
/// ```
/// use departure_server::domain::normalize;
///
/// assert_eq!(normalize("Saint-Germain-en-Laye"), "saint germain en laye");
/// assert_eq!(normalize("  Gare d'Évry (RER) "), "gare d evry rer");
/// ```
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        if is_separator(c) {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.extend(c.to_lowercase());
    }

    out
}

/// Whether two normalized names refer to the same place.
///
/// True iff one is a substring of the other. Empty names never match.
/// Short names match generously: a stop called "paris" is the same place as
/// any destination containing "paris".
pub fn is_same_place(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}

/// Keep stops whose normalized name contains the normalized query.
///
/// An empty (or all-separator) query keeps every stop.
pub fn filter_stops<'a>(stops: &'a [StopOnLine], query: &str) -> Vec<&'a StopOnLine> {
    let query = normalize(query);
    if query.is_empty() {
        return stops.iter().collect();
    }
    stops
        .iter()
        .filter(|s| normalize(&s.stop_name).contains(&query))
        .collect()
}
