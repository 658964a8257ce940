//! Integration tests for modshelf
//!
//! These tests build real mod folders in temporary directories, keep ordering
//! state in a sled database, and drive a full session end to end.

use modshelf::drag::{DragOutcome, DragPayload, DragSurface, HitTarget, Point, PointerButton, SelectionGuard};
use modshelf::model::{GroupFilter, ParentGroup, ScopeKey};
use modshelf::repository::{FsRepository, ModRepository};
use modshelf::session::Session;
use modshelf::store::{KvStore, Namespace, SledStore};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

const COLLECTION: &str = "game";

/// Surface with a fixed hit map
#[derive(Default)]
struct FixedSurface {
    zones: Vec<(Point, HitTarget)>,
    highlighted: RefCell<Option<HitTarget>>,
}

impl FixedSurface {
    fn with(mut self, point: Point, target: HitTarget) -> Self {
        self.zones.push((point, target));
        self
    }
}

impl DragSurface for FixedSurface {
    fn hit_test(&self, point: Point) -> Option<HitTarget> {
        self.zones
            .iter()
            .find(|(at, _)| *at == point)
            .map(|(_, target)| target.clone())
    }

    fn suppress_selection(&self) -> SelectionGuard {
        SelectionGuard::noop()
    }

    fn highlight(&self, target: Option<&HitTarget>) {
        *self.highlighted.borrow_mut() = target.cloned();
    }
}

struct Fixture {
    dir: TempDir,
    mods: PathBuf,
    state: PathBuf,
}

impl Fixture {
    /// ```text
    /// Mods/
    /// ├── Blade/
    /// ├── Characters/Alpha/Hero/
    /// ├── Characters/Beta/
    /// ├── Weapons/Axe/
    /// ├── Weapons/Bow/
    /// ├── Weapons/DISABLED Club/
    /// └── Weapons/Rare/
    /// ```
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mods = dir.path().join("Mods");
        for item in [
            "Blade",
            "Characters/Alpha/Hero",
            "Weapons/Axe",
            "Weapons/Bow",
            "Weapons/DISABLED Club",
        ] {
            make_item(&mods.join(item));
        }
        fs::create_dir_all(mods.join("Characters/Beta")).unwrap();
        fs::create_dir_all(mods.join("Weapons/Rare")).unwrap();

        let state = dir.path().join("state");
        Self { dir, mods, state }
    }

    fn open_with(&self, surface: FixedSurface) -> Session<FsRepository, FixedSurface> {
        let store = SledStore::open(&self.state).unwrap();
        let repository = FsRepository::default().with_collection(COLLECTION, &self.mods);
        Session::open(repository, Rc::new(store), surface, COLLECTION, 4.0).unwrap()
    }

    fn open(&self) -> Session<FsRepository, FixedSurface> {
        self.open_with(FixedSurface::default())
    }
}

fn make_item(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join("mod.ini"), "[Mod]\n").unwrap();
}

fn ids<R: ModRepository, S: DragSurface>(session: &Session<R, S>) -> Vec<String> {
    session.view().into_iter().map(|item| item.id).collect()
}

#[test]
fn test_scan_sees_items_and_groups() {
    let fx = Fixture::new();
    let session = fx.open();

    let mut all = ids(&session);
    all.sort();
    assert_eq!(all, vec!["Axe", "Blade", "Bow", "Club", "Hero"]);

    let filters = session.group_filters();
    assert!(filters.contains(&GroupFilter::Group("Characters/Alpha".into())));
    assert!(filters.contains(&GroupFilter::Group("Weapons/Rare".into())));

    let club = session
        .snapshot()
        .items
        .iter()
        .find(|item| item.id == "Club")
        .cloned()
        .unwrap();
    assert!(!club.enabled);
    assert_eq!(club.group_id, "Weapons");
}

#[test]
fn test_manual_order_survives_restart() {
    let fx = Fixture::new();
    let before = {
        let mut session = fx.open();
        session.set_group_filter(GroupFilter::Group("Weapons".into()));
        let initial = ids(&session);
        let last = initial.last().cloned().unwrap();
        let first = initial.first().cloned().unwrap();
        assert!(session.reorder_items(&last, &first));

        let reordered = ids(&session);
        assert_eq!(reordered[0], last);
        reordered
    };

    let mut session = fx.open();
    session.set_group_filter(GroupFilter::Group("Weapons".into()));
    assert_eq!(ids(&session), before);
}

#[test]
fn test_external_delete_drops_from_order() {
    let fx = Fixture::new();
    let mut session = fx.open();
    session.set_group_filter(GroupFilter::Group("Weapons".into()));
    let before = ids(&session);

    fs::remove_dir_all(fx.mods.join("Weapons/Bow")).unwrap();
    session.refresh().unwrap();

    let expected: Vec<String> = before.into_iter().filter(|id| id != "Bow").collect();
    assert_eq!(ids(&session), expected);
    assert_eq!(
        session.order().stored(&session.view_scope()),
        expected
    );
}

#[test]
fn test_drag_item_onto_group_moves_folder() {
    let fx = Fixture::new();
    let start = Point::new(0.0, 0.0);
    let over_rare = Point::new(20.0, 40.0);
    let surface = FixedSurface::default().with(over_rare, HitTarget::Group("Weapons/Rare".into()));
    let mut session = fx.open_with(surface);

    let payload = DragPayload::item("Axe", session.view_scope());
    assert!(session.pointer_down(start, PointerButton::Primary, payload));
    session.pointer_move(over_rare);
    assert_eq!(
        *session.controller().surface().highlighted.borrow(),
        Some(HitTarget::Group("Weapons/Rare".into()))
    );

    let outcome = session.pointer_up(over_rare);
    assert!(matches!(outcome, DragOutcome::Dropped { result: Ok(()), .. }));
    assert!(outcome.action().is_some());
    assert!(session.controller().surface().highlighted.borrow().is_none());
    assert!(fx.mods.join("Weapons/Rare/Axe/mod.ini").exists());
    assert!(!fx.mods.join("Weapons/Axe").exists());

    assert!(session.process_events().unwrap());
    session.set_group_filter(GroupFilter::Group("Weapons/Rare".into()));
    assert_eq!(ids(&session), vec!["Axe"]);
}

#[test]
fn test_group_order_and_new_groups() {
    let fx = Fixture::new();
    let mut session = fx.open();
    let top = ScopeKey::groups(COLLECTION, ParentGroup::Top);

    let _ = session.group_tree();
    assert_eq!(session.order().stored(&top), vec!["Characters", "Weapons"]);
    assert!(session.reorder_groups("Weapons", "Characters"));
    assert!(!session.reorder_groups("Weapons", "Characters/Alpha"));

    session.repository().create_group(COLLECTION, "Armor").unwrap();
    assert!(session.process_events().unwrap());
    let _ = session.group_tree();
    assert_eq!(
        session.order().stored(&top),
        vec!["Weapons", "Characters", "Armor"]
    );
}

#[test]
fn test_expansion_persists_and_forgets_deleted_groups() {
    let fx = Fixture::new();
    {
        let session = fx.open();
        assert!(session.set_expanded("Characters", true));
        assert!(session.set_expanded("Weapons", true));
    }

    fs::remove_dir_all(fx.mods.join("Characters")).unwrap();
    let session = fx.open();
    let expanded: Vec<String> = session.expanded_groups().into_iter().collect();
    assert_eq!(expanded, vec!["Weapons"]);
}

#[test]
fn test_corrupt_state_is_ignored() {
    let fx = Fixture::new();
    {
        let store = SledStore::open(&fx.state).unwrap();
        store
            .put(Namespace::ItemOrder, COLLECTION, b"{definitely not json")
            .unwrap();
    }

    let session = fx.open();
    let mut all = ids(&session);
    all.sort();
    assert_eq!(all, vec!["Axe", "Blade", "Bow", "Club", "Hero"]);
}

#[test]
fn test_collections_are_independent() {
    let fx = Fixture::new();
    let other = fx.dir.path().join("Other");
    make_item(&other.join("Solo"));

    let store = SledStore::open(&fx.state).unwrap();
    let repository = FsRepository::default()
        .with_collection(COLLECTION, &fx.mods)
        .with_collection("other", &other);
    let mut session = Session::open(repository, Rc::new(store), FixedSurface::default(), COLLECTION, 4.0).unwrap();

    session.set_group_filter(GroupFilter::Group("Weapons".into()));
    session.set_collection("other").unwrap();
    assert_eq!(session.group_filter(), &GroupFilter::All);
    assert_eq!(ids(&session), vec!["Solo"]);
}
