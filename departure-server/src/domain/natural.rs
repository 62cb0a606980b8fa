//! Natural ordering for line labels.

use std::cmp::Ordering;

/// One run of a label: either text (lowercased) or a digit run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum Part {
    Text(String),
    Number(Digits),
}

/// A digit run compared by numeric value without overflow.
///
/// Leading zeros are dropped, so a longer run is always the larger number.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        Digits(run.trim_start_matches('0').to_string())
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key ordering labels the way people read line numbers.
///
/// The label is split on digit runs. The key always starts with a text part
/// (possibly empty) and alternates text/number, so element-wise comparison
/// only ever compares like with like.
///
/// # Examples
///
/// ```
/// use departure_server::domain::NaturalKey;
///
/// let mut labels = vec!["10", "2", "1", "T1", "T3a"];
/// labels.sort_by_key(|l| NaturalKey::new(l));
/// assert_eq!(labels, vec!["1", "2", "10", "T1", "T3a"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Part>);

impl NaturalKey {
    pub fn new(label: &str) -> Self {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut digits = String::new();

        for c in label.chars() {
            if c.is_ascii_digit() {
                digits.push(c);
            } else {
                if !digits.is_empty() {
                    parts.push(Part::Text(std::mem::take(&mut text).to_lowercase()));
                    parts.push(Part::Number(Digits::new(&digits)));
                    digits.clear();
                }
                text.push(c);
            }
        }

        if !digits.is_empty() {
            parts.push(Part::Text(std::mem::take(&mut text).to_lowercase()));
            parts.push(Part::Number(Digits::new(&digits)));
        }
        parts.push(Part::Text(text.to_lowercase()));

        NaturalKey(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sorted(labels: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
        v.sort_by_key(|l| NaturalKey::new(l));
        v
    }

    #[test]
    fn numbers_before_prefixed_labels() {
        assert_eq!(
            sorted(&["10", "2", "1", "T1", "T3a"]),
            vec!["1", "2", "10", "T1", "T3a"]
        );
    }

    #[test]
    fn numeric_runs_compare_by_value() {
        assert_eq!(sorted(&["259", "38", "N140", "N14"]), vec!["38", "259", "N14", "N140"]);
        assert_eq!(sorted(&["T10", "T2", "T3b", "T3a"]), vec!["T2", "T3a", "T3b", "T10"]);
    }

    #[test]
    fn text_is_case_insensitive() {
        assert_eq!(NaturalKey::new("t3a"), NaturalKey::new("T3A"));
        assert!(NaturalKey::new("a") < NaturalKey::new("B"));
    }

    #[test]
    fn leading_zeros_are_ignored() {
        assert_eq!(NaturalKey::new("007"), NaturalKey::new("7"));
        assert!(NaturalKey::new("09") < NaturalKey::new("10"));
    }

    #[test]
    fn long_digit_runs_do_not_overflow() {
        let big = "123456789012345678901234567890";
        assert!(NaturalKey::new("99") < NaturalKey::new(big));
    }

    #[test]
    fn letter_labels_sort_alphabetically() {
        assert_eq!(sorted(&["C", "A", "B"]), vec!["A", "B", "C"]);
    }

    proptest! {
        #[test]
        fn integers_sort_numerically(a in 0u32..100_000, b in 0u32..100_000) {
            let ka = NaturalKey::new(&a.to_string());
            let kb = NaturalKey::new(&b.to_string());
            prop_assert_eq!(ka.cmp(&kb), a.cmp(&b));
        }
    }
}
