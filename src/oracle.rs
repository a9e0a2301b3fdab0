//! Early-exit decision for a running traversal, based on the node groups that have already been
//! finalized. Advisory only: a traversal that ignores it produces every row a pruned one does,
//! plus the rows between persons that cannot reach any exit.
use crate::component::NodeGroup;
use crate::grid::Cell;

/// What a traversal knows about its own progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub source: Cell,
    /// Distinct person cells reached so far, not counting the source.
    pub reached: usize,
    pub exit_found: bool,
}

/// Returns [true] once nothing useful is left to find from `progress.source`.
///
/// A source inside a finalized group without an exit is done immediately. Inside a group with an
/// exit it is done once it found an exit itself and reached every other member. Outside every group
/// the ceiling is the number of persons not claimed by any group.
pub fn is_done(groups: &[NodeGroup], progress: Progress, total_persons: usize) -> bool {
    let mut max = total_persons;
    for group in groups {
        if group.contains(progress.source) {
            if !group.has_exit {
                return true;
            }
            max = group.len();
            break;
        }
        max = max.saturating_sub(group.len());
    }
    progress.exit_found && progress.reached + 1 >= max
}
