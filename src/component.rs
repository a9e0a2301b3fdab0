use crate::grid::{Cell, RescueGrid};
use fxhash::FxHashSet;
use itertools::Itertools;

/// A finalized set of person cells that reach one another, recorded when a traversal completes.
/// Never changed once registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeGroup {
    pub members: FxHashSet<Cell>,
    pub has_exit: bool,
}

impl NodeGroup {
    pub fn new(members: FxHashSet<Cell>, has_exit: bool) -> NodeGroup {
        NodeGroup { members, has_exit }
    }
    pub fn contains(&self, cell: Cell) -> bool {
        self.members.contains(&cell)
    }
    pub fn len(&self) -> usize {
        self.members.len()
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    /// Members in ascending order.
    pub fn sorted_members(&self) -> Vec<Cell> {
        self.members.iter().copied().sorted_unstable().collect()
    }
    /// `[(x,y), ...]: has_exit`
    pub fn describe(&self, grid: &RescueGrid) -> String {
        format!(
            "[{}]: {}",
            self.sorted_members()
                .into_iter()
                .map(|cell| grid.format_cell(cell))
                .join(" "),
            self.has_exit
        )
    }
}

/// The group `cell` belongs to, if any.
pub fn find_group(groups: &[NodeGroup], cell: Cell) -> Option<&NodeGroup> {
    groups.iter().find(|group| group.contains(cell))
}
