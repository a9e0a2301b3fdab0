use rescue_graph::report::OutcomeReport;
use rescue_graph::{RescueGrid, RescuePlanner};

// Builds the graph for a 4x5 board with shape
//  _____
// |P.#.E|
// |..#..|
// |P.#P.|
// |.....|
//  _____
// where
// - # marks an obstacle
// - P marks a person
// - E marks an exit
//
// All three people reach one another around the wall and share the single exit.

fn main() {
    let mut grid = RescueGrid::new(4, 5);
    for x in 0..3 {
        grid.set_blocked(x, 2);
    }
    grid.set_person(0, 0);
    grid.set_person(2, 0);
    grid.set_person(2, 3);
    grid.set_exit(0, 4);
    println!("{}", grid);
    let outcome = RescuePlanner::default().plan(&grid);
    print!("{}", OutcomeReport::new(&grid, &outcome));
}
