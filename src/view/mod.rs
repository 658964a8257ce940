//! Projection of a collection into the ordered item list a view shows
//!
//! The group filter decides which ids belong to the item-order scope; those
//! are reconciled against the ledger, then the case-insensitive name search
//! narrows the result. Searching never drops hidden items from the stored
//! order: a search shows a subsequence of the filter's order.

use crate::ledger::{OrderLedger, newest_first};
use crate::model::{GroupFilter, Item, ScopeKey};
use std::collections::HashMap;
use tracing::warn;

/// Computes the displayed item sequence for a view
pub struct ViewProjector<'a> {
    ledger: &'a OrderLedger,
}

impl<'a> ViewProjector<'a> {
    #[must_use]
    pub const fn new(ledger: &'a OrderLedger) -> Self {
        Self { ledger }
    }

    /// Filtered items in persisted order
    ///
    /// Items never ordered before are placed newest first, then by name.
    #[must_use]
    pub fn project(
        &self,
        items: &[Item],
        filter: &GroupFilter,
        search: &str,
        collection: &str,
    ) -> Vec<Item> {
        let in_scope: Vec<&Item> = items.iter().filter(|item| filter.matches(item)).collect();
        let scope = ScopeKey::items(collection, filter.clone());
        let order = self.reconcile(&scope, &in_scope);

        let position: HashMap<&str, usize> = order
            .iter()
            .enumerate()
            .map(|(index, id)| (id.as_str(), index))
            .collect();

        let needle = search.to_lowercase();
        let mut projected: Vec<(usize, &Item)> = in_scope
            .into_iter()
            .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
            .map(|item| {
                let index = position.get(item.id.as_str()).copied().unwrap_or_else(|| {
                    warn!(item = %item.id, %scope, "item missing from reconciled order");
                    usize::MAX
                });
                (index, item)
            })
            .collect();
        projected.sort_by_key(|(index, _)| *index);
        projected.into_iter().map(|(_, item)| item.clone()).collect()
    }

    /// Reconcile the item-order scope of `filter` without building the view
    pub fn sanitize(&self, items: &[Item], filter: &GroupFilter, collection: &str) -> Vec<String> {
        let in_scope: Vec<&Item> = items.iter().filter(|item| filter.matches(item)).collect();
        self.reconcile(&ScopeKey::items(collection, filter.clone()), &in_scope)
    }

    fn reconcile(&self, scope: &ScopeKey, in_scope: &[&Item]) -> Vec<String> {
        let by_id: HashMap<&str, &Item> = in_scope.iter().map(|item| (item.id.as_str(), *item)).collect();
        self.ledger.sanitize(scope, by_id.keys().copied(), |a, b| {
            match (by_id.get(a), by_id.get(b)) {
                (Some(a), Some(b)) => newest_first(a, b),
                _ => a.cmp(b),
            }
        })
    }
}
