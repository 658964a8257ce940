//! Pointer-driven drag and drop
//!
//! Dragging is implemented by hand on top of pointer events rather than a
//! platform drag-and-drop API. The platform supplies a [`DragSurface`]: a
//! hit tester that classifies whatever sits under a point, a way to suppress
//! text selection for the duration of a drag, and a highlight hook. The
//! [`DragController`] is the state machine on top:
//!
//! ```text
//! Idle --press--> Pressed --move past threshold--> Dragging --release--> Idle
//!                    |                                 |
//!                    +--release (click)--> Idle        +--abort--> Idle
//! ```
//!
//! What a release commits is decided by [`resolve_drop`].

use crate::model::{ParentGroup, ScopeKey};
use std::fmt;

pub mod commit;
pub mod controller;

pub use commit::{CommitContext, DragAction, apply_drop, resolve_drop};
pub use controller::{DragController, DragOutcome, DragPhase};

/// Default distance in pixels a press must travel before it becomes a drag
pub const DEFAULT_DRAG_THRESHOLD: f64 = 4.0;

/// Pointer position in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Item,
    Group,
}

/// Data bound to a draggable element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub kind: DragKind,
    pub id: String,
    /// Scope the element was rendered in
    pub origin: ScopeKey,
}

impl DragPayload {
    /// Payload for an item card rendered in the given item-order scope
    #[must_use]
    pub fn item(id: impl Into<String>, origin: ScopeKey) -> Self {
        Self {
            kind: DragKind::Item,
            id: id.into(),
            origin,
        }
    }

    /// Payload for a sidebar group node
    #[must_use]
    pub fn group(collection: &str, group_id: impl Into<String>) -> Self {
        let id = group_id.into();
        Self {
            kind: DragKind::Group,
            origin: ScopeKey::groups(collection, ParentGroup::of(&id)),
            id,
        }
    }
}

/// Classification of the topmost element under the pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    /// A group node (or the Root bucket) that accepts drops
    Group(String),
    /// An item card that accepts drops
    Item(String),
}

impl fmt::Display for HitTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group(id) => write!(f, "group {id}"),
            Self::Item(id) => write!(f, "item {id}"),
        }
    }
}

/// Scoped "text selection suppressed" state; restores selection on drop
#[must_use = "selection is restored as soon as the guard is dropped"]
pub struct SelectionGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl SelectionGuard {
    pub fn new<F: FnOnce() + 'static>(release: F) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Guard for surfaces without text selection
    pub fn noop() -> Self {
        Self { release: None }
    }
}

impl Drop for SelectionGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for SelectionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionGuard")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Platform side of drag and drop
pub trait DragSurface {
    /// Classify the topmost interactive element at `point`
    fn hit_test(&self, point: Point) -> Option<HitTarget>;

    /// Suppress document text selection until the guard is dropped
    fn suppress_selection(&self) -> SelectionGuard;

    /// Show `target` as the current drop target, replacing any previous one;
    /// `None` clears the highlight
    fn highlight(&self, target: Option<&HitTarget>);
}

/// Surface for frontends without pointer input: nothing is ever hit
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSurface;

impl DragSurface for HeadlessSurface {
    fn hit_test(&self, _point: Point) -> Option<HitTarget> {
        None
    }

    fn suppress_selection(&self) -> SelectionGuard {
        SelectionGuard::noop()
    }

    fn highlight(&self, _target: Option<&HitTarget>) {}
}
