//! Permutation of parallel arrays.

/// Returns `items` permuted so that `result[i] == items[ordering[i]]`.
///
/// Parallel arrays stay paired by applying the identical ordering to each of
/// them: elements that shared an index before the call share one after it.
///
/// # Panics
/// Panics if `ordering` is not a permutation of `0..items.len()`.
pub fn reordered<T: Clone>(items: &[T], ordering: &[usize]) -> Vec<T> {
    assert_eq!(items.len(), ordering.len());
    ordering.iter().map(|&i| items[i].clone()).collect()
}
