//! Per-scope total orders
//!
//! Each scope's list is reconciled against the ids that currently belong to
//! it on every read:
//!
//! 1. keep stored ids that are still live, in stored order
//! 2. append live ids with no stored position, sorted by a default comparator
//! 3. persist only if the result differs from what was stored
//!
//! After [`OrderLedger::sanitize`] the list contains exactly the live ids.
//! When the store cannot be read nothing is written back, so the other
//! scopes sharing the namespace entry survive a transient failure.

use super::{load_entry, save_entry};
use crate::model::ScopeKey;
use crate::store::KvStore;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use tracing::debug;

/// Lists of one namespace entry, keyed by scope list key
type ScopeLists = BTreeMap<String, Vec<String>>;

/// Persisted ordered id lists, one per [`ScopeKey`]
#[derive(Clone)]
pub struct OrderLedger {
    store: Rc<dyn KvStore>,
}

impl OrderLedger {
    #[must_use]
    pub fn new(store: Rc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// The list currently stored for a scope, without reconciling it
    #[must_use]
    pub fn stored(&self, scope: &ScopeKey) -> Vec<String> {
        self.load(scope)
            .and_then(|mut lists| lists.remove(scope.list_key()))
            .unwrap_or_default()
    }

    /// Reconcile a scope's order with its live ids and return it
    ///
    /// Ids present before and after keep their relative order. Never fails:
    /// unreadable state is treated as empty for the returned order but is
    /// not overwritten.
    pub fn sanitize<'a, I, F>(&self, scope: &ScopeKey, live_ids: I, mut default_cmp: F) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
        F: FnMut(&str, &str) -> Ordering,
    {
        let live: HashSet<&str> = live_ids.into_iter().collect();
        let loaded = self.load(scope);
        let stored = loaded
            .as_ref()
            .and_then(|lists| lists.get(scope.list_key()))
            .cloned()
            .unwrap_or_default();

        let mut seen: HashSet<&str> = HashSet::with_capacity(live.len());
        let mut result: Vec<String> = Vec::with_capacity(live.len());
        for id in &stored {
            // Duplicates in stored data are dropped along with orphans
            if live.contains(id.as_str()) && seen.insert(id.as_str()) {
                result.push(id.clone());
            }
        }

        let mut missing: Vec<&str> = live
            .iter()
            .copied()
            .filter(|id| !seen.contains(id))
            .collect();
        missing.sort_by(|a, b| default_cmp(*a, *b));
        result.extend(missing.into_iter().map(str::to_string));

        if result == stored {
            return stored;
        }
        let Some(mut lists) = loaded else {
            return result;
        };

        debug!(%scope, before = stored.len(), after = result.len(), "order reconciled");
        lists.insert(scope.list_key().to_string(), result.clone());
        self.save(scope, &lists);
        result
    }

    /// Move `drag_id` to the position `target_id` occupies once `drag_id`
    /// has been taken out
    ///
    /// A no-op when the ids are equal or either is not in the stored list;
    /// callers sanitize the scope first.
    pub fn reorder(&self, scope: &ScopeKey, drag_id: &str, target_id: &str) {
        if drag_id == target_id {
            return;
        }
        let Some(mut lists) = self.load(scope) else {
            return;
        };
        let Some(list) = lists.get_mut(scope.list_key()) else {
            return;
        };
        let Some(from) = list.iter().position(|id| id == drag_id) else {
            return;
        };
        if !list.iter().any(|id| id == target_id) {
            return;
        }

        let dragged = list.remove(from);
        let Some(to) = list.iter().position(|id| id == target_id) else {
            return;
        };
        list.insert(to, dragged);

        debug!(%scope, drag_id, target_id, "reordered");
        self.save(scope, &lists);
    }

    /// Forget a scope's list entirely
    pub fn reset(&self, scope: &ScopeKey) {
        let Some(mut lists) = self.load(scope) else {
            return;
        };
        if lists.remove(scope.list_key()).is_some() {
            self.save(scope, &lists);
        }
    }

    fn load(&self, scope: &ScopeKey) -> Option<ScopeLists> {
        load_entry(self.store.as_ref(), scope.namespace(), scope.collection())
    }

    fn save(&self, scope: &ScopeKey, lists: &ScopeLists) {
        save_entry(self.store.as_ref(), scope.namespace(), scope.collection(), lists);
    }
}
