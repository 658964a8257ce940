//! Persisted ordering and expansion state
//!
//! [`OrderLedger`] keeps one ordered id list per [`ScopeKey`](crate::model::ScopeKey)
//! and reconciles it against the live ids on every read. [`ExpansionLedger`]
//! keeps the set of expanded tree nodes per collection. Both self-heal when
//! ids vanish and never surface persistence failures.

use crate::store::{KvStore, Namespace};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub mod compare;
pub mod expansion;
pub mod order;

pub use compare::{lexicographic, natural_cmp, newest_first};
pub use expansion::ExpansionLedger;
pub use order::OrderLedger;

/// Load a namespace entry, treating missing or corrupt data as empty
///
/// Returns `None` when the store cannot be read. The entry holds every
/// scope of the collection, so callers must not write it back in that case.
fn load_entry<T: DeserializeOwned + Default>(
    store: &dyn KvStore,
    namespace: Namespace,
    collection: &str,
) -> Option<T> {
    match store.get(namespace, collection) {
        Ok(Some(raw)) => Some(serde_json::from_slice(&raw).unwrap_or_else(|e| {
            warn!(%namespace, collection, error = %e, "discarding corrupt persisted state");
            T::default()
        })),
        Ok(None) => Some(T::default()),
        Err(e) => {
            warn!(%namespace, collection, error = %e, "failed to read persisted state");
            None
        }
    }
}

/// Persist a namespace entry; failures are logged and dropped
fn save_entry<T: Serialize>(
    store: &dyn KvStore,
    namespace: Namespace,
    collection: &str,
    value: &T,
) {
    let raw = match serde_json::to_vec(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(%namespace, collection, error = %e, "failed to encode state");
            return;
        }
    };
    match store.put(namespace, collection, &raw) {
        Ok(()) => debug!(%namespace, collection, "state saved"),
        Err(e) => warn!(%namespace, collection, error = %e, "failed to persist state"),
    }
}
