use std::hash::Hash;

use indexmap::IndexMap;

/// Counts occurrences of each value.
///
/// Entries are ordered by descending count; equal counts keep the order in
/// which the values were first seen.
pub fn value_counts<T, I>(values: I) -> IndexMap<T, usize>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
{
    let mut counts: IndexMap<T, usize> = IndexMap::new();
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    // stable sort keeps first-seen order among ties
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts
}

/// Most frequent value; ties go to the value seen first. `None` for empty
/// input.
pub fn mode<T, I>(values: I) -> Option<T>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
{
    value_counts(values).into_iter().next().map(|(v, _)| v)
}
