use crate::accumulator::{FxIndexMap, ReachabilityGraph};
use crate::grid::{Cell, RescueGrid};
use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use itertools::Itertools;
use log::info;
use petgraph::unionfind::UnionFind;

/// Which components [partition] keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    /// Every component with at least one exit.
    WithExits,
    /// Only the exit-bearing component(s) with the most members.
    #[default]
    Largest,
}

/// Person cells that reach one another, and whether any of them has an exit path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    /// Sorted ascending.
    pub members: Vec<Cell>,
    pub has_exit: bool,
}

impl Component {
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    pub fn contains(&self, cell: Cell) -> bool {
        self.members.binary_search(&cell).is_ok()
    }
    /// The part of `graph` covering this component.
    pub fn subgraph(&self, graph: &ReachabilityGraph) -> ReachabilityGraph {
        graph.subgraph(&self.members)
    }
    pub fn describe(&self, grid: &RescueGrid) -> String {
        format!(
            "[{}]: {}",
            self.members.iter().map(|&c| grid.format_cell(c)).join(" "),
            self.has_exit
        )
    }
}

/// Splits the graph into disjoint components covering every cell it mentions. Every recorded pair
/// joins its two ends, so a row left partial by pruning still lands in the right component.
/// Components come out in order of first appearance in the graph.
pub fn split(graph: &ReachabilityGraph) -> Vec<Component> {
    let mut cells: IndexSet<Cell, FxBuildHasher> = IndexSet::default();
    let mut pairs = Vec::new();
    for (source, row) in graph.rows() {
        let (s, _) = cells.insert_full(source);
        for &dest in row.keys() {
            let (d, _) = cells.insert_full(dest);
            pairs.push((s, d));
        }
    }
    let mut components = UnionFind::new(cells.len());
    for (s, d) in pairs {
        components.union(s, d);
    }

    let mut groups: FxIndexMap<usize, Vec<Cell>> = FxIndexMap::default();
    for (ix, label) in components.into_labeling().into_iter().enumerate() {
        groups.entry(label).or_default().push(cells[ix]);
    }
    groups
        .into_values()
        .map(|mut members| {
            members.sort_unstable();
            let has_exit = members.iter().any(|&m| graph.has_exit(m));
            Component { members, has_exit }
        })
        .collect()
}

/// Keeps the components matching `selection`. Ties for the largest are all kept.
pub fn select(components: Vec<Component>, selection: Selection) -> Vec<Component> {
    let with_exits: Vec<Component> = components.into_iter().filter(|c| c.has_exit).collect();
    match selection {
        Selection::WithExits => with_exits,
        Selection::Largest => {
            let size = with_exits.iter().map(Component::len).max().unwrap_or(0);
            with_exits.into_iter().filter(|c| c.len() == size).collect()
        }
    }
}

/// [split] followed by [select].
pub fn partition(graph: &ReachabilityGraph, selection: Selection) -> Vec<Component> {
    let components = split(graph);
    let total = components.len();
    let kept = select(components, selection);
    info!(
        "Partitioned into {total} components, kept {} ({selection:?})",
        kept.len()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_from(pairs: &[(Cell, Cell)], exits: &[Cell]) -> ReachabilityGraph {
        let mut graph = ReachabilityGraph::new();
        for &(a, b) in pairs {
            graph.insert_path(a, b, vec![b]);
            graph.insert_path(b, a, vec![a]);
        }
        for &e in exits {
            graph.insert_exit(e, vec![]);
        }
        graph
    }

    #[test]
    fn split_is_a_partition() {
        let mut graph = graph_from(&[(0, 1), (1, 2), (5, 6), (9, 10)], &[6, 9]);
        graph.add_source(20);
        let components = split(&graph);
        assert_eq!(components.len(), 4);
        assert_eq!(components[0].members, vec![0, 1, 2]);
        assert!(!components[0].has_exit);
        assert_eq!(components[1].members, vec![5, 6]);
        assert!(components[1].has_exit);
        assert_eq!(components[3].members, vec![20]);
        let covered: usize = components.iter().map(|c| c.len()).sum();
        assert_eq!(covered, graph.cells().len());
    }

    /// 3 only reaches 0 directly and 4 only reaches 3, yet all end up together.
    #[test]
    fn partial_rows_are_joined() {
        let mut graph = ReachabilityGraph::new();
        graph.insert_path(0, 1, vec![1]);
        graph.insert_path(0, 3, vec![3]);
        graph.insert_path(4, 3, vec![3]);
        let components = split(&graph);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].members, vec![0, 1, 3, 4]);
    }

    #[test]
    fn selection_modes() {
        let graph = graph_from(&[(0, 1), (1, 2), (5, 6), (9, 10), (11, 12)], &[0, 6, 9, 11]);
        let with_exits = partition(&graph, Selection::WithExits);
        assert_eq!(with_exits.len(), 4);
        let largest = partition(&graph, Selection::Largest);
        assert_eq!(largest.len(), 1);
        assert_eq!(largest[0].members, vec![0, 1, 2]);
    }

    #[test]
    fn largest_keeps_ties() {
        let graph = graph_from(&[(0, 1), (5, 6), (8, 9)], &[1, 5]);
        let largest = partition(&graph, Selection::Largest);
        assert_eq!(largest.len(), 2);
        assert!(largest[1].contains(6));
    }

    #[test]
    fn nothing_kept_without_exits() {
        let graph = graph_from(&[(0, 1)], &[]);
        assert!(partition(&graph, Selection::Largest).is_empty());
        assert!(partition(&graph, Selection::WithExits).is_empty());
    }
}
