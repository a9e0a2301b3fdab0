use crate::accumulator::ReachabilityGraph;
use crate::grid::RescueGrid;
use crate::RescueOutcome;
use core::fmt;

/// Lists every row of a graph with path lengths, then every nearest exit.
pub struct GraphReport<'a> {
    grid: &'a RescueGrid,
    graph: &'a ReachabilityGraph,
}

impl<'a> GraphReport<'a> {
    pub fn new(grid: &'a RescueGrid, graph: &'a ReachabilityGraph) -> GraphReport<'a> {
        GraphReport { grid, graph }
    }
}

impl fmt::Display for GraphReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let cell = |c| self.grid.format_cell(c);
        writeln!(f, "graph nodes:")?;
        for (source, row) in self.graph.rows() {
            writeln!(f, "  {}", cell(source))?;
            for (&dest, path) in row {
                writeln!(f, "    {} : {}", cell(dest), path.len())?;
            }
        }
        writeln!(f, "nearest exits:")?;
        for (source, path) in self.graph.exits() {
            let exit = path.last().copied().unwrap_or(source);
            writeln!(f, "  {} -> {}: {}", cell(source), cell(exit), path.len())?;
        }
        Ok(())
    }
}

/// The full output of a run: graph, node groups, kept components and the expansion count.
pub struct OutcomeReport<'a> {
    grid: &'a RescueGrid,
    outcome: &'a RescueOutcome,
}

impl<'a> OutcomeReport<'a> {
    pub fn new(grid: &'a RescueGrid, outcome: &'a RescueOutcome) -> OutcomeReport<'a> {
        OutcomeReport { grid, outcome }
    }
}

impl fmt::Display for OutcomeReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", GraphReport::new(self.grid, &self.outcome.graph))?;
        writeln!(f, "node groups:")?;
        for group in &self.outcome.groups {
            writeln!(f, "  {}", group.describe(self.grid))?;
        }
        writeln!(f, "components:")?;
        for component in &self.outcome.components {
            writeln!(f, "  {}", component.describe(self.grid))?;
        }
        writeln!(f, "{} operations", self.outcome.expansions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RescuePlanner;

    #[test]
    fn graph_report_lists_lengths() {
        // |P.P|
        // |..E|
        let mut grid = RescueGrid::new(2, 3);
        grid.set_person(0, 0);
        grid.set_person(0, 2);
        grid.set_exit(1, 2);
        let mut graph = ReachabilityGraph::new();
        graph.insert_path(0, 2, vec![1, 2]);
        graph.insert_path(2, 0, vec![1, 0]);
        graph.insert_exit(0, vec![4, 5]);
        graph.insert_exit(2, vec![5]);
        let expected = "\
graph nodes:
  (0,0)
    (0,2) : 2
  (0,2)
    (0,0) : 2
nearest exits:
  (0,0) -> (1,2): 2
  (0,2) -> (1,2): 1
";
        assert_eq!(GraphReport::new(&grid, &graph).to_string(), expected);
    }

    #[test]
    fn outcome_report_sections() {
        let mut grid = RescueGrid::new(1, 2);
        grid.set_person(0, 0);
        grid.set_exit(0, 0);
        let outcome = RescuePlanner::default().plan(&grid);
        let expected = "\
graph nodes:
  (0,0)
nearest exits:
  (0,0) -> (0,0): 0
node groups:
  [(0,0)]: true
components:
  [(0,0)]: true
1 operations
";
        assert_eq!(OutcomeReport::new(&grid, &outcome).to_string(), expected);
    }
}
