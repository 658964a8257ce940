//! Expanded tree nodes per collection
//!
//! Unlike item and group order, the expansion set is never grown on read:
//! groups that appear for the first time start collapsed.

use super::{load_entry, save_entry};
use crate::store::{KvStore, Namespace};
use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;
use tracing::debug;

/// Persisted set of expanded group ids
#[derive(Clone)]
pub struct ExpansionLedger {
    store: Rc<dyn KvStore>,
}

impl ExpansionLedger {
    #[must_use]
    pub fn new(store: Rc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Expanded groups of a collection, after dropping ids that are no
    /// longer live
    ///
    /// Persists only when something was dropped. An unreadable store yields
    /// an empty set and is left untouched.
    pub fn sanitize<'a, I>(&self, collection: &str, live_group_ids: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let live: HashSet<&str> = live_group_ids.into_iter().collect();
        let Some(stored) = self.load(collection) else {
            return BTreeSet::new();
        };
        let kept: BTreeSet<String> = stored
            .iter()
            .filter(|id| live.contains(id.as_str()))
            .cloned()
            .collect();

        if kept.len() != stored.len() {
            debug!(
                collection,
                dropped = stored.len() - kept.len(),
                "expansion state reconciled"
            );
            self.save(collection, &kept);
        }
        kept
    }

    /// Mark a group expanded or collapsed
    pub fn toggle(&self, collection: &str, group_id: &str, expanded: bool) {
        let Some(mut set) = self.load(collection) else {
            return;
        };
        if expanded {
            set.insert(group_id.to_string());
        } else {
            set.remove(group_id);
        }
        self.save(collection, &set);
    }

    /// Whether a group is currently stored as expanded
    #[must_use]
    pub fn is_expanded(&self, collection: &str, group_id: &str) -> bool {
        self.load(collection)
            .is_some_and(|set| set.contains(group_id))
    }

    fn load(&self, collection: &str) -> Option<BTreeSet<String>> {
        let ids: Vec<String> = load_entry(self.store.as_ref(), Namespace::Expansion, collection)?;
        Some(ids.into_iter().collect())
    }

    fn save(&self, collection: &str, set: &BTreeSet<String>) {
        let ids: Vec<&String> = set.iter().collect();
        save_entry(self.store.as_ref(), Namespace::Expansion, collection, &ids);
    }
}
