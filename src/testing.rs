//! Testing utilities for modshelf
//!
//! In-memory stand-ins for the collaborators of the ordering engine: ledgers
//! over a [`MemoryStore`], a [`FakeRepository`] that records moves, and a
//! [`ScriptedSurface`] whose hit-test results are placed by the test.
//!
//! Only available when compiled with `cfg(test)`.

use crate::drag::{DragSurface, HitTarget, Point, SelectionGuard};
use crate::ledger::{ExpansionLedger, OrderLedger};
use crate::model::{Group, Item, ROOT_GROUP};
use crate::repository::{ChangeFeed, ModRepository, RepoError, RepositoryEvent, ScanResult};
use crate::store::{KvStore, MemoryStore};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

/// Collection name used throughout the tests
pub const COLLECTION: &str = "game";

/// Ledgers sharing one in-memory store
pub struct TestLedgers {
    pub store: Rc<MemoryStore>,
    pub order: OrderLedger,
    pub expansion: ExpansionLedger,
}

impl TestLedgers {
    #[must_use]
    pub fn new() -> Self {
        let store = Rc::new(MemoryStore::new());
        let backend: Rc<dyn KvStore> = store.clone();
        Self {
            order: OrderLedger::new(backend.clone()),
            expansion: ExpansionLedger::new(backend),
            store,
        }
    }
}

/// Item with the given group and modification time
#[must_use]
pub fn item(id: &str, group_id: &str, last_modified: u64) -> Item {
    Item::new(id, id, group_id).modified_at(last_modified)
}

/// Groups from a list of ids
#[must_use]
pub fn groups(ids: &[&str]) -> Vec<Group> {
    ids.iter().map(|id| Group::new(*id)).collect()
}

/// Collection used by the drag and session tests
///
/// ```text
/// Characters/        Alpha, Beta
/// Weapons/           x, y
/// Weapons/Rare/      z
/// Gamma/
/// Root               loose
/// ```
#[must_use]
pub fn sample_scan() -> ScanResult {
    ScanResult {
        items: vec![
            item("x", "Weapons", 30),
            item("y", "Weapons", 20),
            item("z", "Weapons/Rare", 10),
            item("loose", ROOT_GROUP, 5),
        ],
        groups: groups(&[
            "Characters",
            "Characters/Alpha",
            "Characters/Beta",
            "Weapons",
            "Weapons/Rare",
            "Gamma",
        ]),
    }
}

/// One recorded `move_item` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCall {
    pub collection: String,
    pub item_id: String,
    pub group_id: String,
}

/// In-memory repository that records moves
#[derive(Default)]
pub struct FakeRepository {
    collections: RefCell<HashMap<String, ScanResult>>,
    moves: RefCell<Vec<MoveCall>>,
    fail_moves: Cell<bool>,
    scans: Cell<usize>,
    feed: ChangeFeed,
}

impl FakeRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository holding [`sample_scan`] as [`COLLECTION`]
    #[must_use]
    pub fn sample() -> Self {
        let repo = Self::new();
        repo.insert(COLLECTION, sample_scan());
        repo
    }

    /// Replace a collection's contents without notifying subscribers
    pub fn insert(&self, collection: &str, scan: ScanResult) {
        self.collections
            .borrow_mut()
            .insert(collection.to_string(), scan);
    }

    /// Mutate a collection behind the engine's back, then notify
    pub fn external_change<F: FnOnce(&mut ScanResult)>(&self, collection: &str, change: F) {
        if let Some(scan) = self.collections.borrow_mut().get_mut(collection) {
            change(scan);
        }
        self.feed.changed(collection);
    }

    /// Make every subsequent `move_item` fail
    pub fn fail_moves(&self, fail: bool) {
        self.fail_moves.set(fail);
    }

    #[must_use]
    pub fn moves(&self) -> Vec<MoveCall> {
        self.moves.borrow().clone()
    }

    #[must_use]
    pub fn scan_count(&self) -> usize {
        self.scans.get()
    }

    fn with_collection<T>(
        &self,
        collection: &str,
        f: impl FnOnce(&mut ScanResult) -> Result<T, RepoError>,
    ) -> Result<T, RepoError> {
        let result = {
            let mut collections = self.collections.borrow_mut();
            let scan = collections
                .get_mut(collection)
                .ok_or_else(|| RepoError::UnknownCollection(collection.to_string()))?;
            f(scan)?
        };
        self.feed.changed(collection);
        Ok(result)
    }
}

impl ModRepository for FakeRepository {
    fn scan(&self, collection: &str) -> Result<ScanResult, RepoError> {
        self.scans.set(self.scans.get() + 1);
        self.collections
            .borrow()
            .get(collection)
            .cloned()
            .ok_or_else(|| RepoError::UnknownCollection(collection.to_string()))
    }

    fn move_item(&self, collection: &str, item_id: &str, group_id: &str) -> Result<(), RepoError> {
        self.moves.borrow_mut().push(MoveCall {
            collection: collection.to_string(),
            item_id: item_id.to_string(),
            group_id: group_id.to_string(),
        });
        if self.fail_moves.get() {
            return Err(RepoError::GroupNotFound(group_id.to_string()));
        }
        self.with_collection(collection, |scan| {
            let item = scan
                .items
                .iter_mut()
                .find(|item| item.id == item_id)
                .ok_or_else(|| RepoError::ItemNotFound(item_id.to_string()))?;
            item.group_id = group_id.to_string();
            Ok(())
        })
    }

    fn set_enabled(&self, collection: &str, item_id: &str, enabled: bool) -> Result<(), RepoError> {
        self.with_collection(collection, |scan| {
            let item = scan
                .items
                .iter_mut()
                .find(|item| item.id == item_id)
                .ok_or_else(|| RepoError::ItemNotFound(item_id.to_string()))?;
            item.enabled = enabled;
            Ok(())
        })
    }

    fn create_group(&self, collection: &str, group_id: &str) -> Result<(), RepoError> {
        self.with_collection(collection, |scan| {
            if scan.groups.iter().any(|group| group.id == group_id) {
                return Err(RepoError::Conflict(group_id.to_string()));
            }
            scan.groups.push(Group::new(group_id));
            Ok(())
        })
    }

    fn rename_group(&self, collection: &str, old_id: &str, new_id: &str) -> Result<(), RepoError> {
        self.with_collection(collection, |scan| {
            let group = scan
                .groups
                .iter_mut()
                .find(|group| group.id == old_id)
                .ok_or_else(|| RepoError::GroupNotFound(old_id.to_string()))?;
            group.id = new_id.to_string();
            for item in scan.items.iter_mut().filter(|item| item.group_id == old_id) {
                item.group_id = new_id.to_string();
            }
            Ok(())
        })
    }

    fn delete_group(&self, collection: &str, group_id: &str) -> Result<(), RepoError> {
        self.with_collection(collection, |scan| {
            let before = scan.groups.len();
            scan.groups.retain(|group| group.id != group_id);
            if scan.groups.len() == before {
                return Err(RepoError::GroupNotFound(group_id.to_string()));
            }
            scan.items.retain(|item| item.group_id != group_id);
            Ok(())
        })
    }

    fn delete_item(&self, collection: &str, item_id: &str) -> Result<(), RepoError> {
        self.with_collection(collection, |scan| {
            let before = scan.items.len();
            scan.items.retain(|item| item.id != item_id);
            if scan.items.len() == before {
                return Err(RepoError::ItemNotFound(item_id.to_string()));
            }
            Ok(())
        })
    }

    fn install_from_archive(
        &self,
        _collection: &str,
        _archive: &Path,
        _name: &str,
        _group_id: &str,
        _password: Option<&str>,
    ) -> Result<(), RepoError> {
        Err(RepoError::Unsupported("archive install".to_string()))
    }

    fn subscribe(&self) -> Receiver<RepositoryEvent> {
        self.feed.subscribe()
    }
}

/// Drag surface whose hit-test results are placed by the test
///
/// Points not placed hit nothing. Counts selection suppressions and
/// releases, and records every highlight change.
#[derive(Default)]
pub struct ScriptedSurface {
    zones: RefCell<Vec<(Point, HitTarget)>>,
    suppressed: Cell<usize>,
    released: Rc<Cell<usize>>,
    highlights: RefCell<Vec<Option<HitTarget>>>,
}

impl ScriptedSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ScriptedSurface::place`]
    #[must_use]
    pub fn with(self, point: Point, target: HitTarget) -> Self {
        self.place(point, target);
        self
    }

    /// Make `point` hit `target`
    pub fn place(&self, point: Point, target: HitTarget) {
        self.zones.borrow_mut().push((point, target));
    }

    #[must_use]
    pub fn suppress_count(&self) -> usize {
        self.suppressed.get()
    }

    #[must_use]
    pub fn release_count(&self) -> usize {
        self.released.get()
    }

    /// Whether a selection guard is currently held
    #[must_use]
    pub fn selection_suppressed(&self) -> bool {
        self.suppressed.get() > self.released.get()
    }

    /// Every highlight call in order
    #[must_use]
    pub fn highlights(&self) -> Vec<Option<HitTarget>> {
        self.highlights.borrow().clone()
    }

    /// Target highlighted after the last call, if any
    #[must_use]
    pub fn current_highlight(&self) -> Option<HitTarget> {
        self.highlights.borrow().last().cloned().flatten()
    }
}

impl DragSurface for ScriptedSurface {
    fn hit_test(&self, point: Point) -> Option<HitTarget> {
        self.zones
            .borrow()
            .iter()
            .find(|(at, _)| *at == point)
            .map(|(_, target)| target.clone())
    }

    fn suppress_selection(&self) -> SelectionGuard {
        self.suppressed.set(self.suppressed.get() + 1);
        let released = self.released.clone();
        SelectionGuard::new(move || released.set(released.get() + 1))
    }

    fn highlight(&self, target: Option<&HitTarget>) {
        self.highlights.borrow_mut().push(target.cloned());
    }
}
