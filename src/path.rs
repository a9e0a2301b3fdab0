use crate::grid::Cell;
use std::iter;

/// An ordered route between two cells that leaves out the cell it starts from and ends with the
/// cell it leads to. Its length is the number of moves.
pub type Path = Vec<Cell>;

/// Predecessor of the traversal source.
pub const NO_PARENT: Cell = Cell::MAX;

/// Follows predecessor links from `dest` back to the source of the traversal that filled `parents`
/// and returns the route in both directions.
///
/// `forward` runs from the source to `dest` and `backward` from `dest` to the source, each leaving
/// out its own starting cell: for a chain `source, a, b, dest` this yields `[a, b, dest]` and
/// `[b, a, source]`. Both are empty when `dest` is the source.
pub fn extract_paths(source: Cell, dest: Cell, parents: &[Cell]) -> (Path, Path) {
    let chain: Vec<Cell> = iter::successors(Some(dest), |&cell| {
        let parent = parents[cell];
        (parent != NO_PARENT).then_some(parent)
    })
    .collect();
    debug_assert_eq!(chain.last(), Some(&source), "{dest} was not reached from {source}");
    let backward = chain[1..].to_vec();
    let forward = chain[..chain.len() - 1].iter().rev().copied().collect();
    (forward, backward)
}

/// Checks that `backward` is the route `forward` walked in the other direction, given the cells the
/// two routes start from.
pub fn is_reverse_of(source: Cell, forward: &[Cell], backward: &[Cell]) -> bool {
    if forward.len() != backward.len() {
        return false;
    }
    iter::once(&source)
        .chain(forward)
        .rev()
        .skip(1)
        .eq(backward.iter())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Chain 0 -> 1 -> 5 -> 9 on a 4 wide strip.
    fn chain_parents() -> Vec<Cell> {
        let mut parents = vec![NO_PARENT; 12];
        parents[1] = 0;
        parents[5] = 1;
        parents[9] = 5;
        parents
    }

    #[test]
    fn forward_ends_at_destination() {
        let (forward, backward) = extract_paths(0, 9, &chain_parents());
        assert_eq!(forward, vec![1, 5, 9]);
        assert_eq!(backward, vec![5, 1, 0]);
    }

    #[test]
    fn adjacent_cells_give_single_step() {
        let (forward, backward) = extract_paths(0, 1, &chain_parents());
        assert_eq!(forward, vec![1]);
        assert_eq!(backward, vec![0]);
    }

    #[test]
    fn source_to_itself_is_empty() {
        let (forward, backward) = extract_paths(0, 0, &chain_parents());
        assert!(forward.is_empty());
        assert!(backward.is_empty());
    }

    #[test]
    fn reversal_check() {
        let (forward, backward) = extract_paths(0, 9, &chain_parents());
        assert!(is_reverse_of(0, &forward, &backward));
        assert!(is_reverse_of(9, &backward, &forward));
        assert!(!is_reverse_of(0, &forward, &[5, 1, 2]));
        assert!(!is_reverse_of(0, &forward, &[1, 0]));
        assert!(is_reverse_of(3, &[], &[]));
    }
}
