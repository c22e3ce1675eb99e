// src/serving.rs
// Serving Query: which unlabeled items to show next. Ordering is score
// descending with unscored items last, tie-broken by ascending id so
// pagination is deterministic across calls with no intervening writes.
// Being served costs an item one unit of exposure budget; an item that
// keeps being shown without ever getting feedback eventually drops out
// regardless of its score.

use std::cmp::Ordering;

use crate::item::Item;
use crate::store::ItemStore;

/// Comparator for the serving order.
pub fn rank_order(a: &Item, b: &Item) -> Ordering {
    match (a.score, b.score) {
        (Some(x), Some(y)) => y
            .partial_cmp(&x)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    }
}

/// Next batch of unresolved items, ordered for presentation.
///
/// The exposure increment is a side effect of actually serving the items,
/// not of computing the ranking; the returned copies reflect the bumped
/// counts.
pub async fn next_batch(store: &dyn ItemStore, exposure_limit: u32) -> Vec<Item> {
    let mut items = store.list_unresolved(exposure_limit).await;
    items.sort_by(rank_order);

    let ids: Vec<i64> = items.iter().map(|it| it.id).collect();
    store.increment_exposure(&ids).await;
    for it in &mut items {
        it.exposure_count += 1;
    }
    items
}
