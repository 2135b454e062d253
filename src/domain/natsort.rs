//! Natural (numeric-aware) name ordering.
//!
//! Children and root listings sort names so embedded numbers compare by
//! value: `Item2` before `Item10`. Letters compare case-insensitively, with
//! a full case-sensitive comparison as the final tie-break so the order is
//! total.

use std::{cmp::Ordering, iter::Peekable, str::Chars};

/// Sort direction for name-ordered listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameOrdering {
    /// Natural sort, smallest first.
    #[default]
    Ascending,
    /// Natural sort, largest first.
    Descending,
}

impl NameOrdering {
    /// Applies the direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Compares two names naturally: digit runs by numeric value, letters
/// case-insensitively.
///
/// Digit runs of arbitrary length are compared without parsing to an
/// integer, so names cannot overflow the comparison.
#[must_use]
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut chars_a = a.chars().peekable();
    let mut chars_b = b.chars().peekable();

    loop {
        match (chars_a.peek().copied(), chars_b.peek().copied()) {
            (None, None) => break,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x.is_ascii_digit() && y.is_ascii_digit() {
                    let run_a = take_digit_run(&mut chars_a);
                    let run_b = take_digit_run(&mut chars_b);
                    let ordering = cmp_digit_runs(&run_a, &run_b);
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                } else {
                    let ordering = x.to_lowercase().cmp(y.to_lowercase());
                    if ordering != Ordering::Equal {
                        return ordering;
                    }
                    chars_a.next();
                    chars_b.next();
                }
            }
        }
    }

    // Equal under folding ("ITEM1" vs "item01"). Fall back to plain string
    // order so the comparison stays total and deterministic.
    a.cmp(b)
}

fn take_digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let stripped_a = a.trim_start_matches('0');
    let stripped_b = b.trim_start_matches('0');
    // Longer stripped run = larger value; equal lengths compare digit-wise.
    stripped_a
        .len()
        .cmp(&stripped_b.len())
        .then_with(|| stripped_a.cmp(stripped_b))
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("Item1", "Item2", Ordering::Less; "single digit")]
    #[test_case("Item2", "Item10", Ordering::Less; "numeric not lexicographic")]
    #[test_case("Item10", "Item10", Ordering::Equal; "identical")]
    #[test_case("0402", "0603", Ordering::Less; "leading zero footprints")]
    #[test_case("0402", "402", Ordering::Less; "equal value more zeros first")]
    #[test_case("a9", "a10", Ordering::Less; "digit run length")]
    #[test_case("a123456789012345678901", "a123456789012345678902", Ordering::Less; "runs longer than u64")]
    #[test_case("abc", "ABD", Ordering::Less; "case insensitive letters")]
    #[test_case("Shelf A2", "Shelf A10", Ordering::Less; "embedded space then digits")]
    #[test_case("10", "9a", Ordering::Greater; "number vs number prefix")]
    #[test_case("alpha", "alpha1", Ordering::Less; "prefix shorter first")]
    fn comparisons(a: &str, b: &str, expected: Ordering) {
        assert_eq!(natural_cmp(a, b), expected);
        assert_eq!(natural_cmp(b, a), expected.reverse());
    }

    #[test]
    fn sorts_numbered_names_ascending() {
        let mut names = vec!["Item2", "Item10", "Item1"];
        names.sort_by(|a, b| natural_cmp(a, b));
        assert_eq!(names, vec!["Item1", "Item2", "Item10"]);
    }

    #[test]
    fn descending_reverses() {
        let mut names = vec!["Item2", "Item10", "Item1"];
        names.sort_by(|a, b| NameOrdering::Descending.apply(natural_cmp(a, b)));
        assert_eq!(names, vec!["Item10", "Item2", "Item1"]);
    }

    #[test]
    fn case_only_difference_stays_deterministic() {
        assert_eq!(natural_cmp("ITEM1", "item1"), Ordering::Less);
        assert_eq!(natural_cmp("item1", "ITEM1"), Ordering::Greater);
    }
}
