use crate::accumulator::GraphAccumulator;
use crate::grid::{Cell, RescueGrid};
use crate::oracle::Progress;
use crate::path::{extract_paths, NO_PARENT};
use crate::PRUNE_CHECK_INTERVAL;
use log::debug;
use std::time::Instant;

/// Outcome of one traversal, sent back to the scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraversalReport {
    pub source: Cell,
    /// Person cells reached, not counting the source.
    pub reached: usize,
    pub exit_found: bool,
    /// Cells dequeued.
    pub expansions: usize,
    /// Whether the oracle stopped the search before the queue ran dry.
    pub pruned: bool,
}

impl TraversalReport {
    fn new(source: Cell) -> TraversalReport {
        TraversalReport {
            source,
            reached: 0,
            exit_found: false,
            expansions: 0,
            pruned: false,
        }
    }
    fn progress(&self) -> Progress {
        Progress {
            source: self.source,
            reached: self.reached,
            exit_found: self.exit_found,
        }
    }
}

/// Queue, visited flags and predecessor table of a breadth-first search, sized to the grid.
/// A worker owns one and reuses it for every source it handles; only the cells touched by the
/// previous search are cleared.
#[derive(Clone, Debug)]
pub struct SearchContext {
    queue: Vec<Cell>,
    parents: Vec<Cell>,
    visited: Vec<bool>,
    /// Dequeues between two oracle checks that no discovery triggered.
    check_interval: usize,
}

impl Default for SearchContext {
    fn default() -> SearchContext {
        SearchContext::with_check_interval(PRUNE_CHECK_INTERVAL)
    }
}

impl SearchContext {
    pub fn new() -> SearchContext {
        SearchContext::default()
    }

    /// A context that consults the oracle every `interval` dequeues (at least 1) while pruning.
    pub fn with_check_interval(interval: usize) -> SearchContext {
        SearchContext {
            queue: Vec::new(),
            parents: Vec::new(),
            visited: Vec::new(),
            check_interval: interval.max(1),
        }
    }

    fn reset(&mut self, size: usize) {
        if self.visited.len() != size {
            self.visited = vec![false; size];
            self.parents = vec![NO_PARENT; size];
            self.queue = Vec::with_capacity(size);
            return;
        }
        // Every visited cell was queued.
        for &cell in &self.queue {
            self.visited[cell] = false;
        }
        self.queue.clear();
    }

    fn visit(&mut self, cell: Cell, parent: Cell) {
        self.visited[cell] = true;
        self.parents[cell] = parent;
        self.queue.push(cell);
    }

    /// Breadth-first search over the 8-connected free cells from the person at `source`.
    ///
    /// Each person dequeued gets its route recorded both ways in `acc`; the first exit dequeued
    /// becomes the source's nearest exit. With `pruning` the search asks the oracle after every
    /// discovery (and every [PRUNE_CHECK_INTERVAL] dequeues unless the context was built with
    /// another interval) whether it may stop. Either way the
    /// source is registered as completed at the end.
    pub fn traverse(
        &mut self,
        grid: &RescueGrid,
        source: Cell,
        acc: &GraphAccumulator,
        pruning: bool,
    ) -> TraversalReport {
        let start = Instant::now();
        let mut report = TraversalReport::new(source);
        acc.add_source(source);
        if pruning && acc.is_done(report.progress()) {
            debug!(
                "{} lies in a group without exit, skipping",
                grid.format_cell(source)
            );
            report.pruned = true;
            acc.complete(source);
            return report;
        }

        self.reset(grid.len());
        self.visit(source, NO_PARENT);
        // A person standing on an obstacle cannot leave it.
        let source_blocked = grid.flags(source).is_blocked();
        let mut head = 0;
        while head < self.queue.len() {
            let cell = self.queue[head];
            head += 1;
            report.expansions += 1;
            if pruning && head % self.check_interval == 0 && acc.is_done(report.progress()) {
                report.pruned = true;
                break;
            }

            let flags = grid.flags(cell);
            if flags.is_person() && cell != source {
                let (forward, backward) = extract_paths(source, cell, &self.parents);
                acc.record_pair(source, cell, forward, backward);
                report.reached += 1;
                if pruning && acc.is_done(report.progress()) {
                    report.pruned = true;
                    break;
                }
            }
            if !report.exit_found && flags.is_exit() {
                let (forward, _) = extract_paths(source, cell, &self.parents);
                acc.record_exit(source, forward);
                report.exit_found = true;
                if pruning && acc.is_done(report.progress()) {
                    report.pruned = true;
                    break;
                }
            }

            if cell == source && source_blocked {
                continue;
            }
            for nb in grid.neighbours(cell) {
                if !self.visited[nb] {
                    self.visit(nb, cell);
                }
            }
        }

        acc.add_expansions(report.expansions);
        acc.complete(source);
        debug!(
            "traversed from {} in {:.2?}: {} persons, exit: {}, {} expansions{}",
            grid.format_cell(source),
            start.elapsed(),
            report.reached,
            report.exit_found,
            report.expansions,
            if report.pruned { " (pruned)" } else { "" }
        );
        report
    }
}

/// Runs one traversal with a fresh [SearchContext].
pub fn traverse(
    grid: &RescueGrid,
    source: Cell,
    acc: &GraphAccumulator,
    pruning: bool,
) -> TraversalReport {
    SearchContext::new().traverse(grid, source, acc, pruning)
}
