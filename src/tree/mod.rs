//! Group hierarchy
//!
//! Group ids are flat slash-delimited paths. [`GroupTreeBuilder`] parses them
//! once into an arena-backed [`GroupTree`] with explicit parent/child links,
//! ordering each sibling list through the [`OrderLedger`].
//!
//! ```text
//! Characters            (count 0)
//! ├── Alpha             (count 2)
//! └── Beta              (count 1)
//! Weapons               (count 3)
//! ```
//!
//! Counts are flat: a node counts only items whose group is exactly that node.

use crate::ledger::{OrderLedger, lexicographic};
use crate::model::{Group, Item, ParentGroup, ScopeKey, group_name, is_reserved_group};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Index of a node in a [`GroupTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One group in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    /// Full group id
    pub id: String,
    /// Last path segment
    pub name: String,
    pub icon_ref: Option<String>,
    /// Items directly in this group
    pub count: usize,
    /// 0 for top-level groups
    pub depth: usize,
    pub parent: Option<NodeId>,
    /// Children in ledger order
    pub children: Vec<NodeId>,
}

/// Forest of groups stored in a flat arena
#[derive(Debug, Clone, Default)]
pub struct GroupTree {
    nodes: Vec<GroupNode>,
    roots: Vec<NodeId>,
    index: HashMap<String, NodeId>,
}

impl GroupTree {
    /// Top-level nodes in ledger order
    #[must_use]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> &GroupNode {
        &self.nodes[id.0]
    }

    /// Look up a node by group id
    #[must_use]
    pub fn find(&self, group_id: &str) -> Option<&GroupNode> {
        self.index.get(group_id).map(|id| self.node(*id))
    }

    #[must_use]
    pub fn node_id(&self, group_id: &str) -> Option<NodeId> {
        self.index.get(group_id).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Siblings under a parent, in ledger order
    #[must_use]
    pub fn children_of(&self, parent: &ParentGroup) -> &[NodeId] {
        match parent {
            ParentGroup::Top => &self.roots,
            ParentGroup::Group(id) => self
                .index
                .get(id)
                .map_or(&[][..], |node| self.node(*node).children.as_slice()),
        }
    }

    /// Parent of a node as a [`ParentGroup`]
    #[must_use]
    pub fn parent_of(&self, group_id: &str) -> Option<ParentGroup> {
        let node = self.find(group_id)?;
        Some(match node.parent {
            Some(parent) => ParentGroup::Group(self.node(parent).id.clone()),
            None => ParentGroup::Top,
        })
    }

    /// Every node in depth-first display order
    #[must_use]
    pub fn iter_depth_first(&self) -> Vec<&GroupNode> {
        self.flatten(|_| true)
    }

    /// Nodes a sidebar shows: descend only into expanded groups
    #[must_use]
    pub fn visible(&self, expanded: &BTreeSet<String>) -> Vec<&GroupNode> {
        self.flatten(|node| expanded.contains(&node.id))
    }

    fn flatten<F>(&self, descend: F) -> Vec<&GroupNode>
    where
        F: Fn(&GroupNode) -> bool,
    {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            out.push(node);
            if descend(node) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }
}

/// Builds a [`GroupTree`] for one collection
pub struct GroupTreeBuilder<'a> {
    ledger: &'a OrderLedger,
    collection: &'a str,
}

impl<'a> GroupTreeBuilder<'a> {
    #[must_use]
    pub const fn new(ledger: &'a OrderLedger, collection: &'a str) -> Self {
        Self { ledger, collection }
    }

    /// Build the forest, sanitizing every sibling scope on the way
    ///
    /// Reserved and empty ids are skipped, duplicates collapse to the first
    /// occurrence, and a group whose parent is not a live group is attached
    /// at the top level.
    #[must_use]
    pub fn build(&self, groups: &[Group], items: &[Item]) -> GroupTree {
        let (unique, live) = live_groups(groups);

        let mut buckets: HashMap<ParentGroup, Vec<&Group>> = HashMap::new();
        for group in unique.iter().copied() {
            buckets
                .entry(ParentGroup::resolve(&group.id, &live))
                .or_default()
                .push(group);
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for item in items {
            *counts.entry(item.group_id.as_str()).or_insert(0) += 1;
        }

        let mut ordered: HashMap<ParentGroup, Vec<&Group>> = HashMap::with_capacity(buckets.len());
        for (parent, bucket) in buckets {
            let scope = ScopeKey::groups(self.collection, parent.clone());
            let order = self.ledger.sanitize(
                &scope,
                bucket.iter().map(|group| group.id.as_str()),
                lexicographic,
            );
            let position: HashMap<&str, usize> = order
                .iter()
                .enumerate()
                .map(|(index, id)| (id.as_str(), index))
                .collect();
            let mut bucket = bucket;
            bucket.sort_by_key(|group| position.get(group.id.as_str()).copied().unwrap_or(usize::MAX));
            ordered.insert(parent, bucket);
        }

        let mut tree = GroupTree::default();
        let roots = attach(&mut tree, &ordered, &ParentGroup::Top, None, 0, &counts);
        tree.roots = roots;
        tree
    }

    /// Reconcile only the sibling scope `group_id` belongs to
    ///
    /// Returns `None` when `group_id` is not a live group.
    pub fn sanitize_siblings(&self, groups: &[Group], group_id: &str) -> Option<Vec<String>> {
        let (unique, live) = live_groups(groups);
        if !live.contains(group_id) {
            return None;
        }
        let parent = ParentGroup::resolve(group_id, &live);
        let siblings = unique
            .iter()
            .filter(|group| ParentGroup::resolve(&group.id, &live) == parent)
            .map(|group| group.id.as_str());
        Some(self.ledger.sanitize(
            &ScopeKey::groups(self.collection, parent.clone()),
            siblings,
            lexicographic,
        ))
    }
}

/// Usable groups in input order, first occurrence wins, plus their id set
fn live_groups(groups: &[Group]) -> (Vec<&Group>, HashSet<&str>) {
    let mut unique: Vec<&Group> = Vec::with_capacity(groups.len());
    let mut live: HashSet<&str> = HashSet::with_capacity(groups.len());
    for group in groups {
        if group.id.is_empty() || is_reserved_group(&group.id) {
            continue;
        }
        if live.insert(group.id.as_str()) {
            unique.push(group);
        }
    }
    (unique, live)
}

fn attach(
    tree: &mut GroupTree,
    ordered: &HashMap<ParentGroup, Vec<&Group>>,
    parent: &ParentGroup,
    parent_node: Option<NodeId>,
    depth: usize,
    counts: &HashMap<&str, usize>,
) -> Vec<NodeId> {
    let Some(bucket) = ordered.get(parent) else {
        return Vec::new();
    };

    let mut ids = Vec::with_capacity(bucket.len());
    for group in bucket {
        let id = NodeId(tree.nodes.len());
        tree.nodes.push(GroupNode {
            id: group.id.clone(),
            name: group_name(&group.id).to_string(),
            icon_ref: group.icon_ref.clone(),
            count: counts.get(group.id.as_str()).copied().unwrap_or(0),
            depth,
            parent: parent_node,
            children: Vec::new(),
        });
        tree.index.insert(group.id.clone(), id);

        let children = attach(
            tree,
            ordered,
            &ParentGroup::Group(group.id.clone()),
            Some(id),
            depth + 1,
            counts,
        );
        tree.nodes[id.0].children = children;
        ids.push(id);
    }
    ids
}
