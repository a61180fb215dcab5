//! Character-level Levenshtein distance.
//!
//! Word alignment itself only uses exact token equality; these helpers judge
//! *how close* a substituted word was to the expected one.

/// Levenshtein distance between `a` and `b`, counted in Unicode scalar values
/// with unit cost for insert, delete and substitute.
pub fn edit_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// [`edit_distance`] divided by the longer word's length, in `[0, 1]`.
///
/// Two empty strings are identical (`0.0`).
pub fn normalized_edit_distance(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let longest = a.chars().count().max(b.chars().count()).max(1);
    edit_distance(a, b) as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_examples() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("coffee", "cofee"), 1);
    }

    #[test]
    fn equal_strings_are_zero() {
        assert_eq!(edit_distance("same", "same"), 0);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn empty_side_costs_the_other_length() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abcd", ""), 4);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(edit_distance("café", "cafe"), 1);
        assert!((normalized_edit_distance("café", "cafe") - 0.25).abs() < 1e-12);
    }

    #[test]
    fn is_symmetric() {
        let words = ["", "a", "coffee", "cofee", "toffee", "kitten", "sitting", "ça"];
        for a in words {
            for b in words {
                assert_eq!(edit_distance(a, b), edit_distance(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn bounded_by_combined_length() {
        let words = ["", "x", "hello", "yellow", "abcdef", "fedcba"];
        for a in words {
            for b in words {
                assert!(edit_distance(a, b) <= a.len() + b.len());
            }
        }
    }

    #[test]
    fn normalized_distance_in_unit_range() {
        assert_eq!(normalized_edit_distance("", ""), 0.0);
        assert_eq!(normalized_edit_distance("", "abc"), 1.0);
        assert_eq!(normalized_edit_distance("abc", "xyz"), 1.0);
        assert!((normalized_edit_distance("coffee", "cofee") - 1.0 / 6.0).abs() < 1e-12);
    }
}
