//! Drop resolution
//!
//! A release over a target commits at most one action. The rules are tried
//! in a fixed priority order and the first that applies wins:
//!
//! 1. item dropped on a group: move the item into that group
//! 2. group dropped on a sibling group: reorder the siblings
//! 3. item dropped on an item of the same view: reorder the view
//! 4. anything else: nothing
//!
//! Resolution only reads the snapshot, so an id that vanished since the
//! press simply falls through to rule 4.

use super::{DragKind, DragPayload, HitTarget};
use crate::ledger::OrderLedger;
use crate::model::{ALL_GROUPS, Group, Item, ParentGroup, ROOT_GROUP, ScopeKey, is_reserved_group};
use crate::repository::{ModRepository, RepoError};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Everything a commit reads or writes
pub struct CommitContext<'a> {
    pub collection: &'a str,
    /// Item-order scope of the view currently shown
    pub view_scope: &'a ScopeKey,
    pub items: &'a [Item],
    pub groups: &'a [Group],
    pub order: &'a OrderLedger,
    pub repository: &'a dyn ModRepository,
}

impl CommitContext<'_> {
    fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    fn live_groups(&self) -> HashSet<&str> {
        self.groups.iter().map(|group| group.id.as_str()).collect()
    }

    /// Whether an item belongs to the view's scope
    fn in_view(&self, item: &Item) -> bool {
        match self.view_scope {
            ScopeKey::Items { filter, .. } => filter.matches(item),
            ScopeKey::Groups { .. } => false,
        }
    }
}

/// Action a drop resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragAction {
    /// Relabel the item's group through the repository
    MoveItem { item_id: String, group_id: String },
    /// Move `drag_id` to `target_id`'s position among its siblings
    ReorderGroups {
        scope: ScopeKey,
        drag_id: String,
        target_id: String,
    },
    /// Move `drag_id` to `target_id`'s position in the view
    ReorderItems {
        scope: ScopeKey,
        drag_id: String,
        target_id: String,
    },
    None,
}

/// Decide what dropping `payload` on `target` does
#[must_use]
pub fn resolve_drop(
    payload: &DragPayload,
    target: Option<&HitTarget>,
    ctx: &CommitContext<'_>,
) -> DragAction {
    if payload.origin.collection() != ctx.collection {
        debug!(
            origin = %payload.origin,
            collection = ctx.collection,
            "payload from another collection"
        );
        return DragAction::None;
    }

    match (target, payload.kind) {
        (Some(HitTarget::Group(group_id)), DragKind::Item) => move_into_group(payload, group_id, ctx),
        (Some(HitTarget::Group(group_id)), DragKind::Group) => reorder_siblings(payload, group_id, ctx),
        (Some(HitTarget::Item(target_id)), DragKind::Item) => reorder_view(payload, target_id, ctx),
        _ => DragAction::None,
    }
}

fn move_into_group(payload: &DragPayload, group_id: &str, ctx: &CommitContext<'_>) -> DragAction {
    if group_id == ALL_GROUPS {
        return DragAction::None;
    }
    if group_id != ROOT_GROUP && !ctx.groups.iter().any(|group| group.id == group_id) {
        return DragAction::None;
    }
    match ctx.item(&payload.id) {
        Some(item) if item.group_id != group_id => DragAction::MoveItem {
            item_id: item.id.clone(),
            group_id: group_id.to_string(),
        },
        _ => DragAction::None,
    }
}

fn reorder_siblings(payload: &DragPayload, target_id: &str, ctx: &CommitContext<'_>) -> DragAction {
    let drag_id = payload.id.as_str();
    if drag_id == target_id || is_reserved_group(drag_id) || is_reserved_group(target_id) {
        return DragAction::None;
    }

    let live = ctx.live_groups();
    if !live.contains(drag_id) || !live.contains(target_id) {
        return DragAction::None;
    }

    let parent = ParentGroup::resolve(drag_id, &live);
    if parent != ParentGroup::resolve(target_id, &live) {
        return DragAction::None;
    }

    DragAction::ReorderGroups {
        scope: ScopeKey::groups(ctx.collection, parent),
        drag_id: drag_id.to_string(),
        target_id: target_id.to_string(),
    }
}

fn reorder_view(payload: &DragPayload, target_id: &str, ctx: &CommitContext<'_>) -> DragAction {
    if payload.origin != *ctx.view_scope || payload.id == target_id {
        return DragAction::None;
    }
    match (ctx.item(&payload.id), ctx.item(target_id)) {
        (Some(dragged), Some(target)) if ctx.in_view(dragged) && ctx.in_view(target) => {
            DragAction::ReorderItems {
                scope: ctx.view_scope.clone(),
                drag_id: dragged.id.clone(),
                target_id: target.id.clone(),
            }
        }
        _ => DragAction::None,
    }
}

/// Carry out a resolved action
///
/// Reorders only touch the one scope they name. A move goes to the
/// repository and leaves every ledger alone; the destination scope picks
/// the item up on its next sanitize.
///
/// # Errors
///
/// Returns the repository's error if a move fails.
pub fn apply_drop(action: &DragAction, ctx: &CommitContext<'_>) -> Result<(), RepoError> {
    match action {
        DragAction::MoveItem { item_id, group_id } => {
            ctx.repository
                .move_item(ctx.collection, item_id, group_id)
                .inspect_err(|e| {
                    warn!(item = %item_id, group = %group_id, error = %e, "move failed");
                })
        }
        DragAction::ReorderGroups {
            scope,
            drag_id,
            target_id,
        }
        | DragAction::ReorderItems {
            scope,
            drag_id,
            target_id,
        } => {
            ctx.order.reorder(scope, drag_id, target_id);
            Ok(())
        }
        DragAction::None => Ok(()),
    }
}
