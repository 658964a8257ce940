//! Drag state machine

use super::commit::{CommitContext, DragAction, apply_drop, resolve_drop};
use super::{DragPayload, DragSurface, HitTarget, Point, PointerButton, SelectionGuard};
use crate::repository::RepoError;
use std::mem;
use tracing::{debug, trace};

/// Coarse state, as seen from outside
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Pressed,
    Dragging,
}

/// Result of releasing the pointer
#[derive(Debug)]
pub enum DragOutcome {
    /// No press was in progress
    Ignored,
    /// Released before the threshold; ordinary click handling applies
    Click(DragPayload),
    /// A drag ended; `action` may be [`DragAction::None`]
    Dropped {
        action: DragAction,
        result: Result<(), RepoError>,
    },
}

impl DragOutcome {
    /// The committed action, if any
    #[must_use]
    pub fn action(&self) -> Option<&DragAction> {
        match self {
            Self::Dropped { action, .. } if *action != DragAction::None => Some(action),
            _ => None,
        }
    }
}

enum DragState {
    Idle,
    Pressed {
        origin: Point,
        payload: DragPayload,
    },
    Dragging {
        payload: DragPayload,
        hover: Option<HitTarget>,
        selection: SelectionGuard,
    },
}

/// Turns raw pointer events into drag commits
pub struct DragController<S: DragSurface> {
    surface: S,
    threshold: f64,
    state: DragState,
}

impl<S: DragSurface> DragController<S> {
    /// Controller that starts dragging once the pointer has moved more than
    /// `threshold` pixels from the press point
    pub const fn new(surface: S, threshold: f64) -> Self {
        Self {
            surface,
            threshold,
            state: DragState::Idle,
        }
    }

    pub const fn surface(&self) -> &S {
        &self.surface
    }

    #[must_use]
    pub const fn phase(&self) -> DragPhase {
        match self.state {
            DragState::Idle => DragPhase::Idle,
            DragState::Pressed { .. } => DragPhase::Pressed,
            DragState::Dragging { .. } => DragPhase::Dragging,
        }
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Payload of the press or drag in progress
    #[must_use]
    pub const fn payload(&self) -> Option<&DragPayload> {
        match &self.state {
            DragState::Idle => None,
            DragState::Pressed { payload, .. } | DragState::Dragging { payload, .. } => Some(payload),
        }
    }

    /// Drop target currently highlighted
    #[must_use]
    pub const fn hover(&self) -> Option<&HitTarget> {
        match &self.state {
            DragState::Dragging { hover, .. } => hover.as_ref(),
            _ => None,
        }
    }

    /// Press on a draggable element
    ///
    /// Only a primary press from idle is accepted. Nothing visible happens
    /// until the pointer moves past the threshold. Returns whether the press
    /// was taken.
    pub fn press(&mut self, point: Point, button: PointerButton, payload: DragPayload) -> bool {
        if button != PointerButton::Primary || !matches!(self.state, DragState::Idle) {
            return false;
        }
        trace!(id = %payload.id, x = point.x, y = point.y, "pressed");
        self.state = DragState::Pressed {
            origin: point,
            payload,
        };
        true
    }

    /// Pointer moved
    pub fn pointer_move(&mut self, point: Point) {
        match self.state {
            DragState::Idle => {}
            DragState::Pressed { origin, .. } if origin.distance(point) <= self.threshold => {}
            DragState::Pressed { .. } => {
                let DragState::Pressed { payload, .. } = mem::replace(&mut self.state, DragState::Idle)
                else {
                    return;
                };
                debug!(id = %payload.id, kind = ?payload.kind, "drag started");
                let selection = self.surface.suppress_selection();
                self.state = DragState::Dragging {
                    payload,
                    hover: None,
                    selection,
                };
                self.update_hover(point);
            }
            DragState::Dragging { .. } => self.update_hover(point),
        }
    }

    fn update_hover(&mut self, point: Point) {
        let target = self.surface.hit_test(point);
        if let DragState::Dragging { hover, .. } = &mut self.state
            && *hover != target
        {
            self.surface.highlight(target.as_ref());
            *hover = target;
        }
    }

    /// Pointer released
    ///
    /// Ends a drag by committing whatever the release point resolves to.
    /// The highlight is cleared and text selection restored on every path,
    /// including drops that commit nothing.
    pub fn release(&mut self, point: Point, ctx: &CommitContext<'_>) -> DragOutcome {
        match mem::replace(&mut self.state, DragState::Idle) {
            DragState::Idle => DragOutcome::Ignored,
            DragState::Pressed { payload, .. } => DragOutcome::Click(payload),
            DragState::Dragging {
                payload,
                hover,
                selection,
            } => {
                let target = self.surface.hit_test(point);
                let action = resolve_drop(&payload, target.as_ref(), ctx);
                debug!(id = %payload.id, ?action, "drop");
                let result = apply_drop(&action, ctx);
                self.finish(hover.as_ref(), selection);
                DragOutcome::Dropped { action, result }
            }
        }
    }

    /// Abandon any press or drag without committing
    ///
    /// Returns whether a drag was in progress.
    pub fn abort(&mut self) -> bool {
        match mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging {
                payload,
                hover,
                selection,
            } => {
                debug!(id = %payload.id, "drag aborted");
                self.finish(hover.as_ref(), selection);
                true
            }
            _ => false,
        }
    }

    fn finish(&self, hover: Option<&HitTarget>, selection: SelectionGuard) {
        if hover.is_some() {
            self.surface.highlight(None);
        }
        drop(selection);
    }
}

impl<S: DragSurface> Drop for DragController<S> {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drag::DragKind;
    use crate::model::{GroupFilter, ScopeKey};
    use crate::repository::ScanResult;
    use crate::testing::{COLLECTION, FakeRepository, ScriptedSurface, TestLedgers, sample_scan};

    const P0: Point = Point::new(0.0, 0.0);
    const NEAR: Point = Point::new(2.0, 2.0);
    const OVER_RARE: Point = Point::new(10.0, 50.0);
    const OVER_BETA: Point = Point::new(10.0, 80.0);
    const OVER_GAMMA: Point = Point::new(10.0, 110.0);
    const OVER_X: Point = Point::new(200.0, 20.0);
    const EMPTY: Point = Point::new(500.0, 500.0);

    struct Fixture {
        ledgers: TestLedgers,
        repo: FakeRepository,
        scan: ScanResult,
        view: ScopeKey,
        controller: DragController<ScriptedSurface>,
    }

    impl Fixture {
        fn new() -> Self {
            let surface = ScriptedSurface::new()
                .with(OVER_RARE, HitTarget::Group("Weapons/Rare".into()))
                .with(OVER_BETA, HitTarget::Group("Characters/Beta".into()))
                .with(OVER_GAMMA, HitTarget::Group("Gamma".into()))
                .with(OVER_X, HitTarget::Item("x".into()));
            Self {
                ledgers: TestLedgers::new(),
                repo: FakeRepository::sample(),
                scan: sample_scan(),
                view: ScopeKey::items(COLLECTION, GroupFilter::Group("Weapons".into())),
                controller: DragController::new(surface, 4.0),
            }
        }

        fn item_payload(&self, id: &str) -> DragPayload {
            DragPayload::item(id, self.view.clone())
        }

        fn release(&mut self, point: Point) -> DragOutcome {
            let ctx = CommitContext {
                collection: COLLECTION,
                view_scope: &self.view,
                items: &self.scan.items,
                groups: &self.scan.groups,
                order: &self.ledgers.order,
                repository: &self.repo,
            };
            self.controller.release(point, &ctx)
        }

        fn surface(&self) -> &ScriptedSurface {
            self.controller.surface()
        }
    }

    #[test]
    fn test_item_dropped_on_nested_group_moves() {
        let mut fx = Fixture::new();
        let payload = fx.item_payload("x");
        assert!(fx.controller.press(P0, PointerButton::Primary, payload));
        fx.controller.pointer_move(OVER_RARE);
        assert_eq!(fx.controller.phase(), DragPhase::Dragging);

        let outcome = fx.release(OVER_RARE);
        assert_eq!(
            outcome.action(),
            Some(&DragAction::MoveItem {
                item_id: "x".into(),
                group_id: "Weapons/Rare".into()
            })
        );
        assert_eq!(fx.repo.moves().len(), 1);
        assert_eq!(fx.ledgers.store.write_count(), 0);
        assert_eq!(fx.controller.phase(), DragPhase::Idle);
        assert!(!fx.surface().selection_suppressed());
        assert_eq!(fx.surface().current_highlight(), None);
    }

    #[test]
    fn test_group_reorder_and_cross_level_noop() {
        let mut fx = Fixture::new();
        let parent = ScopeKey::groups(COLLECTION, crate::model::ParentGroup::Group("Characters".into()));
        fx.ledgers
            .order
            .sanitize(&parent, ["Characters/Alpha", "Characters/Beta"], |a, b| a.cmp(b));

        fx.controller.press(
            P0,
            PointerButton::Primary,
            DragPayload::group(COLLECTION, "Characters/Alpha"),
        );
        fx.controller.pointer_move(OVER_BETA);
        let outcome = fx.release(OVER_BETA);
        assert!(matches!(outcome.action(), Some(DragAction::ReorderGroups { .. })));
        assert_eq!(
            fx.ledgers.order.stored(&parent),
            vec!["Characters/Beta", "Characters/Alpha"]
        );

        let writes = fx.ledgers.store.write_count();
        fx.controller.press(
            P0,
            PointerButton::Primary,
            DragPayload::group(COLLECTION, "Characters/Alpha"),
        );
        fx.controller.pointer_move(OVER_GAMMA);
        let outcome = fx.release(OVER_GAMMA);
        assert!(matches!(
            outcome,
            DragOutcome::Dropped {
                action: DragAction::None,
                result: Ok(())
            }
        ));
        assert_eq!(fx.ledgers.store.write_count(), writes);
        assert_eq!(fx.surface().suppress_count(), 2);
        assert_eq!(fx.surface().release_count(), 2);
    }

    #[test]
    fn test_threshold_not_exceeded_is_click() {
        let mut fx = Fixture::new();
        let payload = fx.item_payload("x");
        fx.controller.press(P0, PointerButton::Primary, payload);
        fx.controller.pointer_move(NEAR);
        assert_eq!(fx.controller.phase(), DragPhase::Pressed);

        let outcome = fx.release(OVER_RARE);
        assert!(matches!(outcome, DragOutcome::Click(ref p) if p.id == "x"));
        assert!(fx.repo.moves().is_empty());
        assert_eq!(fx.surface().suppress_count(), 0);
        assert!(fx.surface().highlights().is_empty());
    }

    #[test]
    fn test_only_primary_press_from_idle() {
        let mut fx = Fixture::new();
        let payload = fx.item_payload("x");
        assert!(!fx.controller.press(P0, PointerButton::Secondary, payload.clone()));
        assert_eq!(fx.controller.phase(), DragPhase::Idle);

        assert!(fx.controller.press(P0, PointerButton::Primary, payload.clone()));
        let other = fx.item_payload("y");
        assert!(!fx.controller.press(P0, PointerButton::Primary, other));
        assert_eq!(fx.controller.payload(), Some(&payload));

        assert!(matches!(fx.release(EMPTY), DragOutcome::Click(_)));
        assert!(matches!(fx.release(EMPTY), DragOutcome::Ignored));
    }

    #[test]
    fn test_highlight_follows_single_target() {
        let mut fx = Fixture::new();
        let payload = fx.item_payload("y");
        fx.controller.press(P0, PointerButton::Primary, payload);
        fx.controller.pointer_move(OVER_RARE);
        fx.controller.pointer_move(OVER_RARE);
        fx.controller.pointer_move(OVER_X);
        fx.controller.pointer_move(EMPTY);
        assert_eq!(fx.controller.hover(), None);
        fx.controller.pointer_move(OVER_X);
        assert_eq!(fx.controller.hover(), Some(&HitTarget::Item("x".into())));

        assert_eq!(
            fx.surface().highlights(),
            vec![
                Some(HitTarget::Group("Weapons/Rare".into())),
                Some(HitTarget::Item("x".into())),
                None,
                Some(HitTarget::Item("x".into())),
            ]
        );

        let outcome = fx.release(OVER_X);
        assert!(matches!(outcome.action(), Some(DragAction::ReorderItems { .. })));
        assert_eq!(fx.surface().current_highlight(), None);
    }

    #[test]
    fn test_release_over_empty_space_is_noop() {
        let mut fx = Fixture::new();
        let payload = fx.item_payload("x");
        fx.controller.press(P0, PointerButton::Primary, payload);
        fx.controller.pointer_move(OVER_RARE);

        let outcome = fx.release(EMPTY);
        assert!(outcome.action().is_none());
        assert!(fx.repo.moves().is_empty());
        assert!(!fx.surface().selection_suppressed());
        assert_eq!(fx.surface().current_highlight(), None);
    }

    #[test]
    fn test_abort_releases_everything() {
        let mut fx = Fixture::new();
        let payload = fx.item_payload("x");
        fx.controller.press(P0, PointerButton::Primary, payload);
        fx.controller.pointer_move(OVER_RARE);
        assert!(fx.surface().selection_suppressed());

        assert!(fx.controller.abort());
        assert_eq!(fx.controller.phase(), DragPhase::Idle);
        assert!(!fx.surface().selection_suppressed());
        assert_eq!(fx.surface().current_highlight(), None);
        assert!(!fx.controller.abort());

        assert!(matches!(fx.release(OVER_RARE), DragOutcome::Ignored));
        assert!(fx.repo.moves().is_empty());
    }

    #[test]
    fn test_dragged_item_vanished_mid_drag() {
        let mut fx = Fixture::new();
        let payload = fx.item_payload("x");
        fx.controller.press(P0, PointerButton::Primary, payload);
        fx.controller.pointer_move(OVER_RARE);

        fx.scan.items.retain(|item| item.id != "x");
        let outcome = fx.release(OVER_RARE);
        assert!(outcome.action().is_none());
        assert!(fx.repo.moves().is_empty());
        assert_eq!(fx.surface().release_count(), 1);
    }

    #[test]
    fn test_failed_move_reported_and_cleaned_up() {
        let mut fx = Fixture::new();
        fx.repo.fail_moves(true);
        let payload = fx.item_payload("x");
        fx.controller.press(P0, PointerButton::Primary, payload);
        fx.controller.pointer_move(OVER_GAMMA);

        match fx.release(OVER_GAMMA) {
            DragOutcome::Dropped { action, result } => {
                assert!(matches!(action, DragAction::MoveItem { .. }));
                assert!(result.is_err());
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert_eq!(fx.ledgers.store.write_count(), 0);
        assert!(!fx.surface().selection_suppressed());
    }

    #[test]
    fn test_kind_is_carried_through() {
        let payload = DragPayload::group(COLLECTION, "Gamma");
        assert_eq!(payload.kind, DragKind::Group);
    }
}
