use crate::models::ListRecord;
use std::collections::BTreeMap;

/// Counts records per category. Records the categorizer maps to `None` are
/// not counted.
///
/// Callers pass the full source collection so badge counts do not move while
/// filters or the current page change.
pub fn counts<R, K, F>(records: &[R], categorizer: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: FnMut(&R) -> Option<K>,
{
    tally(BTreeMap::new(), records, categorizer)
}

/// Like [`counts`], with `categories` present at zero even when empty.
pub fn counts_with<R, K, F>(
    records: &[R],
    categories: impl IntoIterator<Item = K>,
    categorizer: F,
) -> BTreeMap<K, usize>
where
    K: Ord,
    F: FnMut(&R) -> Option<K>,
{
    let seeded = categories.into_iter().map(|category| (category, 0)).collect();
    tally(seeded, records, categorizer)
}

/// Counts by [`ListRecord::category`].
pub fn counts_by_category<R: ListRecord>(records: &[R]) -> BTreeMap<String, usize> {
    counts(records, |record| record.category().map(str::to_string))
}

/// Counts by status, so a "Done" and a "done" row land in one bucket keyed by
/// the first spelling seen.
pub fn counts_by_status<R: ListRecord>(records: &[R]) -> BTreeMap<String, usize> {
    let mut spellings: BTreeMap<String, String> = BTreeMap::new();
    counts(records, |record| {
        let status = record.status()?.trim();
        let folded = status.to_lowercase();
        Some(
            spellings
                .entry(folded)
                .or_insert_with(|| status.to_string())
                .clone(),
        )
    })
}

fn tally<R, K, F>(mut buckets: BTreeMap<K, usize>, records: &[R], mut categorizer: F) -> BTreeMap<K, usize>
where
    K: Ord,
    F: FnMut(&R) -> Option<K>,
{
    for record in records {
        if let Some(category) = categorizer(record) {
            *buckets.entry(category).or_insert(0) += 1;
        }
    }
    buckets
}
