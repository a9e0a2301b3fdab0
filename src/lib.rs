//! # rescue_graph
//!
//! Turns a grid of people, obstacles and exits into a compact reachability graph. A
//! [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search) is run from every
//! person over the 8-connected free cells, recording the shortest path to every other person it
//! reaches and to its nearest exit. Searches run on a fixed pool of worker threads and may stop
//! early once the groups of mutually reachable people found so far show nothing useful is left.
//! Afterwards the graph is split into
//! [connected components](https://en.wikipedia.org/wiki/Component_(graph_theory)) and only the
//! ones with a way out are kept.
pub mod accumulator;
pub mod component;
pub mod config;
pub mod grid;
pub mod loader;
pub mod oracle;
pub mod partition;
pub mod path;
pub mod report;
pub mod scheduler;
pub mod traversal;

pub use accumulator::{GraphAccumulator, ReachabilityGraph};
pub use component::NodeGroup;
pub use config::RescueConfig;
pub use grid::{Cell, CellFlags, RescueGrid};
pub use loader::{load_grid, parse_grid, LoadError};
pub use partition::{Component, Selection};
pub use path::Path;
pub use scheduler::{ScheduleSummary, Scheduler};

use log::info;
use std::time::Instant;

/// Worker threads used unless configured otherwise.
pub const DEFAULT_THREADS: usize = 1;
/// Dequeues between two oracle checks when nothing new was discovered.
pub const PRUNE_CHECK_INTERVAL: usize = 100_000;
pub const N_SMALLVEC_SIZE: usize = 8;

/// Everything a run produces.
#[derive(Clone, Debug)]
pub struct RescueOutcome {
    pub graph: ReachabilityGraph,
    /// Node groups in the order traversals finalized them.
    pub groups: Vec<NodeGroup>,
    /// Components kept by the configured [Selection].
    pub components: Vec<Component>,
    pub summary: ScheduleSummary,
    /// Cells dequeued over all traversals.
    pub expansions: usize,
}

impl RescueOutcome {
    /// The graph restricted to the kept components.
    pub fn selected_graph(&self) -> ReachabilityGraph {
        let members: Vec<Cell> = self
            .components
            .iter()
            .flat_map(|c| c.members.iter().copied())
            .collect();
        self.graph.subgraph(&members)
    }
}

/// Runs the traversals for a grid and partitions the result.
#[derive(Clone, Copy, Debug, Default)]
pub struct RescuePlanner {
    pub config: RescueConfig,
}

impl RescuePlanner {
    pub fn new(config: RescueConfig) -> RescuePlanner {
        RescuePlanner { config }
    }

    pub fn plan(&self, grid: &RescueGrid) -> RescueOutcome {
        let start = Instant::now();
        let acc = GraphAccumulator::new(grid.person_count());
        let summary = Scheduler::new(self.config.threads, self.config.pruning).run(grid, &acc);
        let (graph, groups, expansions) = acc.into_parts();
        let components = partition::partition(&graph, self.config.selection);
        info!(
            "Built graph with {} rows and {} paths in {:.2?}",
            graph.len(),
            graph.path_count(),
            start.elapsed()
        );
        RescueOutcome {
            graph,
            groups,
            components,
            summary,
            expansions,
        }
    }
}
