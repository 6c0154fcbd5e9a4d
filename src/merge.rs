//! Cross-document deduplication and merge.
//!
//! Merging is a join point: it needs the whole batch's results before
//! running, because key collisions are resolved globally by highest
//! confidence. Conditions, lots, timepoints and attributes collapse by
//! natural key; results and studies accumulate uncollapsed — results are
//! the finest-grained data and a false merge would silently drop real
//! measurements, and studies are cheap keyword hits a reviewer triages.

use std::collections::HashMap;
use std::hash::Hash;

use crate::entities::ExtractionResult;

/// Collapse `items` by key, keeping per key the instance with the
/// strictly greatest confidence. Equal confidence keeps the first-seen
/// instance, and output preserves first-seen order, so merging is
/// deterministic for any input order of equal candidates.
pub(crate) fn dedup_by_key<T, K, FK, FC>(items: Vec<T>, key_fn: FK, confidence_fn: FC) -> Vec<T>
where
    K: Eq + Hash,
    FK: Fn(&T) -> K,
    FC: Fn(&T) -> f32,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut kept: Vec<T> = Vec::new();

    for item in items {
        match slots.get(&key_fn(&item)) {
            Some(&idx) => {
                if confidence_fn(&item) > confidence_fn(&kept[idx]) {
                    kept[idx] = item;
                }
            }
            None => {
                slots.insert(key_fn(&item), kept.len());
                kept.push(item);
            }
        }
    }
    kept
}

/// Merge per-document extraction results into one, deduplicating keyed
/// entities and sorting timepoints chronologically. The merged result
/// carries the synthetic document id `"merged"`.
pub fn merge_results(results: Vec<ExtractionResult>) -> ExtractionResult {
    let mut merged = ExtractionResult::new("merged");

    for r in results {
        merged.studies.extend(r.studies);
        merged.lots.extend(r.lots);
        merged.conditions.extend(r.conditions);
        merged.timepoints.extend(r.timepoints);
        merged.attributes.extend(r.attributes);
        merged.results.extend(r.results);
        merged.errors.extend(r.errors);
    }

    merged.conditions = dedup_by_key(
        std::mem::take(&mut merged.conditions),
        |c| c.label.clone(),
        |c| c.confidence,
    );
    merged.lots = dedup_by_key(
        std::mem::take(&mut merged.lots),
        |l| l.lot_number.clone(),
        |l| l.confidence,
    );
    merged.timepoints = dedup_by_key(
        std::mem::take(&mut merged.timepoints),
        |t| t.natural_key(),
        |t| t.confidence,
    );
    merged.attributes = dedup_by_key(
        std::mem::take(&mut merged.attributes),
        |a| a.name.clone(),
        |a| a.confidence,
    );

    merged.timepoints.sort_by_key(|t| t.sort_order);

    tracing::info!(
        documents_merged = true,
        lots = merged.lots.len(),
        conditions = merged.conditions.len(),
        timepoints = merged.timepoints.len(),
        attributes = merged.attributes.len(),
        results = merged.results.len(),
        "Merged extraction results"
    );

    merged
}
