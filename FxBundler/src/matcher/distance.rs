//! Edit distance and fuzzy relatedness

/// Levenshtein distance between two strings.
///
/// Runs in O(len(a)·len(b)) time and keeps only two rows of the table, each
/// as long as the shorter input.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };

    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0; short.len() + 1];

    for (i, lc) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, sc) in short.iter().enumerate() {
            let substitution = prev[j] + usize::from(lc != sc);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Whether two names are "probably related": one contains the other, or
/// they are within `max_distance` edits. Empty names are never related.
pub fn is_related(a: &str, b: &str, max_distance: usize) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a.contains(b) || b.contains(a) {
        return true;
    }
    // Distance is at least the length difference
    if a.chars().count().abs_diff(b.chars().count()) > max_distance {
        return false;
    }
    edit_distance(a, b) <= max_distance
}
