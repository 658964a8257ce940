//! One open collection and the user's view of it
//!
//! A [`Session`] owns the ledgers, the latest repository snapshot and the
//! drag controller. Everything the UI shows is recomputed from the snapshot
//! on request; re-sanitization happens as a side effect of those reads.
//!
//! Context switches are explicit calls. Changing the collection or the group
//! filter aborts a drag in progress, because the payload's origin scope
//! would be stale. Repository notifications only replace the snapshot and
//! never interrupt a drag.

use crate::drag::{
    CommitContext, DragAction, DragController, DragOutcome, DragPayload, DragSurface, HitTarget, Point,
    PointerButton, apply_drop, resolve_drop,
};
use crate::ledger::{ExpansionLedger, OrderLedger};
use crate::model::{GroupFilter, Item, ScopeKey};
use crate::repository::{ModRepository, RepoError, RepositoryEvent, ScanResult};
use crate::store::KvStore;
use crate::tree::{GroupNode, GroupTree, GroupTreeBuilder};
use crate::view::ViewProjector;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, TryRecvError};
use tracing::{debug, info, warn};

pub struct Session<R: ModRepository, S: DragSurface> {
    repository: R,
    order: OrderLedger,
    expansion: ExpansionLedger,
    events: Receiver<RepositoryEvent>,
    controller: DragController<S>,
    collection: String,
    filter: GroupFilter,
    search: String,
    snapshot: ScanResult,
    notice: Option<String>,
}

impl<R: ModRepository, S: DragSurface> Session<R, S> {
    /// Subscribe to the repository and load `collection`
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the initial scan fails.
    pub fn open(
        repository: R,
        store: Rc<dyn KvStore>,
        surface: S,
        collection: &str,
        drag_threshold: f64,
    ) -> Result<Self, RepoError> {
        let events = repository.subscribe();
        let snapshot = repository.scan(collection)?;
        info!(
            collection,
            items = snapshot.items.len(),
            groups = snapshot.groups.len(),
            "opened collection"
        );
        Ok(Self {
            repository,
            order: OrderLedger::new(store.clone()),
            expansion: ExpansionLedger::new(store),
            events,
            controller: DragController::new(surface, drag_threshold),
            collection: collection.to_string(),
            filter: GroupFilter::All,
            search: String::new(),
            snapshot,
            notice: None,
        })
    }

    pub const fn repository(&self) -> &R {
        &self.repository
    }

    pub const fn order(&self) -> &OrderLedger {
        &self.order
    }

    pub const fn expansion(&self) -> &ExpansionLedger {
        &self.expansion
    }

    pub const fn controller(&self) -> &DragController<S> {
        &self.controller
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    #[must_use]
    pub const fn group_filter(&self) -> &GroupFilter {
        &self.filter
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Latest repository snapshot
    #[must_use]
    pub const fn snapshot(&self) -> &ScanResult {
        &self.snapshot
    }

    /// Item-order scope of the current view
    #[must_use]
    pub fn view_scope(&self) -> ScopeKey {
        ScopeKey::items(self.collection.as_str(), self.filter.clone())
    }

    /// Re-read the collection from the repository
    ///
    /// A drag in progress is left alone. If the active filter names a group
    /// that no longer exists, the view falls back to all items.
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the scan fails; the previous snapshot is kept.
    pub fn refresh(&mut self) -> Result<(), RepoError> {
        self.snapshot = self.repository.scan(&self.collection)?;
        debug!(
            collection = %self.collection,
            items = self.snapshot.items.len(),
            groups = self.snapshot.groups.len(),
            "rescanned"
        );
        if !self.filter_is_live(&self.filter) {
            info!(filter = %self.filter, "filtered group disappeared, showing all items");
            self.controller.abort();
            self.filter = GroupFilter::All;
        }
        Ok(())
    }

    /// Drain pending change notifications without blocking
    ///
    /// Rescans at most once no matter how many notifications queued up.
    /// Returns whether a rescan happened.
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the rescan fails.
    pub fn process_events(&mut self) -> Result<bool, RepoError> {
        let mut stale = false;
        loop {
            match self.events.try_recv() {
                Ok(RepositoryEvent::Changed { collection }) => {
                    stale |= collection == self.collection;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("repository change feed closed");
                    break;
                }
            }
        }
        if stale {
            self.refresh()?;
        }
        Ok(stale)
    }

    /// Switch to another collection, showing all its items
    ///
    /// Selecting the current collection only rescans it.
    ///
    /// # Errors
    ///
    /// Returns `RepoError` if the new collection cannot be scanned; the
    /// session then stays on the old one and any drag continues.
    pub fn set_collection(&mut self, collection: &str) -> Result<(), RepoError> {
        if collection == self.collection {
            return self.refresh();
        }
        let snapshot = self.repository.scan(collection)?;
        self.controller.abort();
        info!(from = %self.collection, to = collection, "switched collection");
        self.collection = collection.to_string();
        self.snapshot = snapshot;
        self.filter = GroupFilter::All;
        Ok(())
    }

    /// Show only the items of one group
    ///
    /// A filter naming a group that does not exist selects all items.
    pub fn set_group_filter(&mut self, filter: GroupFilter) {
        let filter = if self.filter_is_live(&filter) {
            filter
        } else {
            warn!(%filter, "no such group, showing all items");
            GroupFilter::All
        };
        if filter == self.filter {
            return;
        }
        self.controller.abort();
        self.filter = filter;
    }

    /// Narrow the view by name; does not affect a drag in progress
    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_string();
    }

    fn filter_is_live(&self, filter: &GroupFilter) -> bool {
        match filter {
            GroupFilter::All | GroupFilter::Root => true,
            GroupFilter::Group(id) => self.snapshot.groups.iter().any(|group| group.id == *id),
        }
    }

    /// Items of the current view in display order
    #[must_use]
    pub fn view(&self) -> Vec<Item> {
        ViewProjector::new(&self.order).project(
            &self.snapshot.items,
            &self.filter,
            &self.search,
            &self.collection,
        )
    }

    #[must_use]
    pub fn group_tree(&self) -> GroupTree {
        GroupTreeBuilder::new(&self.order, &self.collection).build(&self.snapshot.groups, &self.snapshot.items)
    }

    /// Expanded groups, with vanished ones forgotten
    #[must_use]
    pub fn expanded_groups(&self) -> BTreeSet<String> {
        self.expansion.sanitize(
            &self.collection,
            self.snapshot.groups.iter().map(|group| group.id.as_str()),
        )
    }

    /// Sidebar rows: the tree, descending only into expanded groups
    #[must_use]
    pub fn visible_groups(&self) -> Vec<GroupNode> {
        let expanded = self.expanded_groups();
        self.group_tree()
            .visible(&expanded)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Selectable filters: all items, ungrouped items, then every group
    #[must_use]
    pub fn group_filters(&self) -> Vec<GroupFilter> {
        let tree = self.group_tree();
        [GroupFilter::All, GroupFilter::Root]
            .into_iter()
            .chain(
                tree.iter_depth_first()
                    .into_iter()
                    .map(|node| GroupFilter::Group(node.id.clone())),
            )
            .collect()
    }

    /// Expand or collapse a group; returns whether the group exists
    pub fn set_expanded(&self, group_id: &str, expanded: bool) -> bool {
        if !self.snapshot.groups.iter().any(|group| group.id == group_id) {
            warn!(group = group_id, "cannot expand unknown group");
            return false;
        }
        self.expansion.toggle(&self.collection, group_id, expanded);
        true
    }

    /// Flip a group's expansion; returns the new state
    pub fn toggle_expanded(&self, group_id: &str) -> bool {
        let expanded = !self.expansion.is_expanded(&self.collection, group_id);
        self.set_expanded(group_id, expanded) && expanded
    }

    /// Put `drag_id` where `target_id` is in the current view
    ///
    /// Same rule as dropping one item card on another. Returns whether the
    /// reorder was accepted.
    pub fn reorder_items(&self, drag_id: &str, target_id: &str) -> bool {
        ViewProjector::new(&self.order).sanitize(&self.snapshot.items, &self.filter, &self.collection);
        let scope = self.view_scope();
        let payload = DragPayload::item(drag_id, scope.clone());
        self.commit_local(&scope, &payload, &HitTarget::Item(target_id.to_string()))
    }

    /// Put group `drag_id` where sibling `target_id` is
    ///
    /// Groups under different parents are never reordered.
    pub fn reorder_groups(&self, drag_id: &str, target_id: &str) -> bool {
        GroupTreeBuilder::new(&self.order, &self.collection).sanitize_siblings(&self.snapshot.groups, drag_id);
        let scope = self.view_scope();
        let payload = DragPayload::group(&self.collection, drag_id);
        self.commit_local(&scope, &payload, &HitTarget::Group(target_id.to_string()))
    }

    fn commit_local(&self, view_scope: &ScopeKey, payload: &DragPayload, target: &HitTarget) -> bool {
        let ctx = CommitContext {
            collection: &self.collection,
            view_scope,
            items: &self.snapshot.items,
            groups: &self.snapshot.groups,
            order: &self.order,
            repository: &self.repository,
        };
        match resolve_drop(payload, Some(target), &ctx) {
            action @ (DragAction::ReorderItems { .. } | DragAction::ReorderGroups { .. }) => {
                apply_drop(&action, &ctx).is_ok()
            }
            _ => {
                debug!(id = %payload.id, %target, "reorder rejected");
                false
            }
        }
    }

    /// Ask the repository to put an item into another group
    ///
    /// No ledger is touched; the change feed triggers the rescan.
    ///
    /// # Errors
    ///
    /// Returns the repository's error.
    pub fn move_item(&self, item_id: &str, group_id: &str) -> Result<(), RepoError> {
        self.repository.move_item(&self.collection, item_id, group_id)
    }

    /// Press on a draggable element
    pub fn pointer_down(&mut self, point: Point, button: PointerButton, payload: DragPayload) -> bool {
        self.controller.press(point, button, payload)
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.controller.pointer_move(point);
    }

    /// Release the pointer, committing a drag if one is in progress
    ///
    /// A failed move is kept as a notice for [`Session::take_notice`].
    pub fn pointer_up(&mut self, point: Point) -> DragOutcome {
        let view_scope = ScopeKey::items(self.collection.as_str(), self.filter.clone());
        let ctx = CommitContext {
            collection: &self.collection,
            view_scope: &view_scope,
            items: &self.snapshot.items,
            groups: &self.snapshot.groups,
            order: &self.order,
            repository: &self.repository,
        };
        let outcome = self.controller.release(point, &ctx);
        if let DragOutcome::Dropped {
            action: DragAction::MoveItem { item_id, group_id },
            result: Err(e),
        } = &outcome
        {
            self.notice = Some(format!("Could not move {item_id} to {group_id}: {e}"));
        }
        outcome
    }

    /// Transient failure message, cleared once taken
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }
}
