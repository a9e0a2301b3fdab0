use crate::accumulator::GraphAccumulator;
use crate::grid::{Cell, RescueGrid};
use crate::traversal::{SearchContext, TraversalReport};
use crate::PRUNE_CHECK_INTERVAL;
use log::{debug, info};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Instant;

/// Totals over every traversal a [Scheduler] ran.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    pub sources: usize,
    pub pruned: usize,
    pub exits_found: usize,
    pub expansions: usize,
}

impl ScheduleSummary {
    fn add(&mut self, report: &TraversalReport) {
        self.sources += 1;
        self.pruned += report.pruned as usize;
        self.exits_found += report.exit_found as usize;
        self.expansions += report.expansions;
    }
}

/// Fixed pool of workers, each running one traversal at a time from a shared queue of sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scheduler {
    threads: usize,
    pruning: bool,
    check_interval: usize,
}

impl Scheduler {
    pub fn new(threads: usize, pruning: bool) -> Scheduler {
        Scheduler {
            threads: threads.max(1),
            pruning,
            check_interval: PRUNE_CHECK_INTERVAL,
        }
    }
    /// Dequeues between two periodic oracle checks in every worker.
    pub fn with_check_interval(self, interval: usize) -> Scheduler {
        Scheduler {
            check_interval: interval.max(1),
            ..self
        }
    }
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Traverses from every person of `grid` into `acc` and blocks until each source reported back.
    pub fn run(&self, grid: &RescueGrid, acc: &GraphAccumulator) -> ScheduleSummary {
        let start = Instant::now();
        let sources = grid.persons();
        let (work_tx, work_rx) = mpsc::channel::<Cell>();
        let (done_tx, done_rx) = mpsc::channel::<TraversalReport>();
        for &source in sources {
            work_tx.send(source).expect("work queue receiver alive");
        }
        // Workers stop once the queue is drained.
        drop(work_tx);
        let work_rx = Mutex::new(work_rx);
        info!(
            "Dispatching {} sources to {} workers",
            sources.len(),
            self.threads
        );

        let summary = thread::scope(|scope| {
            for id in 0..self.threads {
                let work_rx = &work_rx;
                let done_tx = done_tx.clone();
                let ctx = SearchContext::with_check_interval(self.check_interval);
                let pruning = self.pruning;
                scope.spawn(move || worker(id, ctx, grid, acc, work_rx, done_tx, pruning));
            }
            drop(done_tx);
            let mut summary = ScheduleSummary::default();
            for report in done_rx.iter().take(sources.len()) {
                summary.add(&report);
            }
            summary
        });
        info!(
            "Traversed {} sources in {:.2?} ({} pruned, {} expansions)",
            summary.sources,
            start.elapsed(),
            summary.pruned,
            summary.expansions
        );
        summary
    }
}

fn worker(
    id: usize,
    mut ctx: SearchContext,
    grid: &RescueGrid,
    acc: &GraphAccumulator,
    work_rx: &Mutex<Receiver<Cell>>,
    done_tx: Sender<TraversalReport>,
    pruning: bool,
) {
    let mut handled = 0;
    loop {
        let next = work_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();
        let Ok(source) = next else {
            break;
        };
        let report = ctx.traverse(grid, source, acc, pruning);
        handled += 1;
        if done_tx.send(report).is_err() {
            break;
        }
    }
    debug!("worker {id} finished after {handled} sources");
}

#[cfg(test)]
mod tests {
    use super::*;

    // |P.P#P|
    // |..#.E|
    // |P#..P|
    fn small_grid() -> RescueGrid {
        let mut grid = RescueGrid::new(3, 5);
        for (x, y) in [(0, 0), (0, 2), (0, 4), (2, 0), (2, 4)] {
            grid.set_person(x, y);
        }
        for (x, y) in [(0, 3), (1, 2), (2, 1)] {
            grid.set_blocked(x, y);
        }
        grid.set_exit(1, 4);
        grid
    }

    #[test]
    fn every_source_reports_once() {
        let grid = small_grid();
        for threads in [0, 1, 3, 8] {
            let acc = GraphAccumulator::new(grid.person_count());
            let summary = Scheduler::new(threads, false).run(&grid, &acc);
            assert_eq!(summary.sources, 5);
            assert_eq!(summary.pruned, 0);
            assert_eq!(summary.expansions, acc.expansions());
            assert_eq!(acc.graph().len(), 5);
        }
    }

    #[test]
    fn zero_threads_means_one_worker() {
        assert_eq!(Scheduler::new(0, true).threads(), 1);
        assert_eq!(Scheduler::new(2, true).with_check_interval(0).check_interval, 1);
    }

    #[test]
    fn empty_grid_returns_immediately() {
        let grid = RescueGrid::new(2, 2);
        let acc = GraphAccumulator::new(0);
        let summary = Scheduler::new(4, true).run(&grid, &acc);
        assert_eq!(summary, ScheduleSummary::default());
        assert!(acc.graph().is_empty());
    }

    #[test]
    fn sequential_and_parallel_agree_on_lengths() {
        let grid = small_grid();
        let sequential = GraphAccumulator::new(grid.person_count());
        Scheduler::new(1, false).run(&grid, &sequential);
        let parallel = GraphAccumulator::new(grid.person_count());
        Scheduler::new(4, false).run(&grid, &parallel);
        let (a, b) = (sequential.graph(), parallel.graph());
        for (source, row) in a.rows() {
            let other = b.row(source).unwrap();
            assert_eq!(row.len(), other.len());
            for (dest, path) in row {
                assert_eq!(path.len(), other[dest].len());
            }
            assert_eq!(
                a.exit_path(source).map(|p| p.len()),
                b.exit_path(source).map(|p| p.len())
            );
        }
    }
}
