use crate::component::{find_group, NodeGroup};
use crate::grid::Cell;
use crate::oracle::{self, Progress};
use crate::path::Path;
use fxhash::{FxBuildHasher, FxHashSet};
use indexmap::IndexMap;
use log::debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// For every source person cell, the shortest path to every other person cell it reaches, plus
/// the path to its nearest exit when one is reachable.
///
/// Rows keep insertion order so reports come out in discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReachabilityGraph {
    node2nodes: FxIndexMap<Cell, FxIndexMap<Cell, Path>>,
    node2exit: FxIndexMap<Cell, Path>,
}

impl ReachabilityGraph {
    pub fn new() -> ReachabilityGraph {
        ReachabilityGraph::default()
    }
    /// Makes sure `source` has a row, even if it never reaches anyone.
    pub fn add_source(&mut self, source: Cell) {
        self.node2nodes.entry(source).or_default();
    }
    pub fn insert_path(&mut self, from: Cell, to: Cell, path: Path) {
        self.node2nodes.entry(from).or_default().insert(to, path);
    }
    pub fn insert_exit(&mut self, from: Cell, path: Path) {
        self.node2exit.insert(from, path);
    }

    pub fn row(&self, source: Cell) -> Option<&FxIndexMap<Cell, Path>> {
        self.node2nodes.get(&source)
    }
    pub fn path(&self, from: Cell, to: Cell) -> Option<&Path> {
        self.row(from).and_then(|row| row.get(&to))
    }
    pub fn exit_path(&self, source: Cell) -> Option<&Path> {
        self.node2exit.get(&source)
    }
    /// The exit a source escapes through: the last cell of its exit path, or the source itself
    /// when it stands on an exit.
    pub fn nearest_exit(&self, source: Cell) -> Option<Cell> {
        self.exit_path(source)
            .map(|path| path.last().copied().unwrap_or(source))
    }
    pub fn has_exit(&self, source: Cell) -> bool {
        self.node2exit.contains_key(&source)
    }

    pub fn sources(&self) -> impl Iterator<Item = Cell> + '_ {
        self.node2nodes.keys().copied()
    }
    pub fn rows(&self) -> impl Iterator<Item = (Cell, &FxIndexMap<Cell, Path>)> + '_ {
        self.node2nodes.iter().map(|(&source, row)| (source, row))
    }
    pub fn exits(&self) -> impl Iterator<Item = (Cell, &Path)> + '_ {
        self.node2exit.iter().map(|(&source, path)| (source, path))
    }
    /// Every cell appearing as a source or a destination.
    pub fn cells(&self) -> FxHashSet<Cell> {
        self.rows()
            .flat_map(|(source, row)| std::iter::once(source).chain(row.keys().copied()))
            .collect()
    }
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.node2nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.node2nodes.is_empty()
    }
    /// Number of recorded `source -> destination` paths.
    pub fn path_count(&self) -> usize {
        self.node2nodes.values().map(|row| row.len()).sum()
    }

    /// The rows and exits of `members`.
    pub fn subgraph(&self, members: &[Cell]) -> ReachabilityGraph {
        let mut graph = ReachabilityGraph::new();
        for &member in members {
            if let Some(row) = self.row(member) {
                graph.node2nodes.insert(member, row.clone());
            }
            if let Some(path) = self.exit_path(member) {
                graph.node2exit.insert(member, path.clone());
            }
        }
        graph
    }
}

#[derive(Debug, Default)]
struct SharedState {
    graph: ReachabilityGraph,
    groups: Vec<NodeGroup>,
}

/// The state shared between traversals: the graph under construction and the finalized node
/// groups, behind one lock, plus a diagnostic count of dequeued cells.
#[derive(Debug)]
pub struct GraphAccumulator {
    state: Mutex<SharedState>,
    expansions: AtomicUsize,
    total_persons: usize,
}

impl GraphAccumulator {
    pub fn new(total_persons: usize) -> GraphAccumulator {
        GraphAccumulator {
            state: Mutex::new(SharedState::default()),
            expansions: AtomicUsize::new(0),
            total_persons,
        }
    }

    fn state(&self) -> MutexGuard<'_, SharedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_source(&self, source: Cell) {
        self.state().graph.add_source(source);
    }
    /// Inserts or overwrites the `from -> to` path.
    pub fn record(&self, from: Cell, to: Cell, path: Path) {
        self.state().graph.insert_path(from, to, path);
    }
    /// Records a route in both directions under a single lock.
    pub fn record_pair(&self, source: Cell, dest: Cell, forward: Path, backward: Path) {
        let mut state = self.state();
        state.graph.insert_path(source, dest, forward);
        state.graph.insert_path(dest, source, backward);
    }
    pub fn record_exit(&self, source: Cell, path: Path) {
        self.state().graph.insert_exit(source, path);
    }

    /// Asks the oracle whether the traversal described by `progress` can stop.
    pub fn is_done(&self, progress: Progress) -> bool {
        oracle::is_done(&self.state().groups, progress, self.total_persons)
    }

    /// Registers the group of `source` (itself plus its row) unless it already belongs to one.
    /// Returns [true] if a new group was added.
    pub fn complete(&self, source: Cell) -> bool {
        let mut state = self.state();
        if find_group(&state.groups, source).is_some() {
            debug!("{source} already completed");
            return false;
        }
        let mut members: FxHashSet<Cell> = state
            .graph
            .row(source)
            .map(|row| row.keys().copied().collect())
            .unwrap_or_default();
        members.insert(source);
        let has_exit = state.graph.has_exit(source);
        debug!(
            "completed {source}: group of {} persons, exit: {has_exit}",
            members.len()
        );
        state.groups.push(NodeGroup::new(members, has_exit));
        true
    }

    pub fn add_expansions(&self, count: usize) {
        self.expansions.fetch_add(count, Ordering::Relaxed);
    }
    pub fn expansions(&self) -> usize {
        self.expansions.load(Ordering::Relaxed)
    }
    pub fn total_persons(&self) -> usize {
        self.total_persons
    }
    /// Snapshot of the finalized groups.
    pub fn groups(&self) -> Vec<NodeGroup> {
        self.state().groups.clone()
    }
    /// Snapshot of the graph.
    pub fn graph(&self) -> ReachabilityGraph {
        self.state().graph.clone()
    }

    pub fn into_parts(self) -> (ReachabilityGraph, Vec<NodeGroup>, usize) {
        let expansions = self.expansions.into_inner();
        let state = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        (state.graph, state.groups, expansions)
    }
}
