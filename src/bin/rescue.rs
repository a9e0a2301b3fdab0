use clap::Parser;
use log::{error, info};
use rescue_graph::config::Options;
use rescue_graph::report::OutcomeReport;
use rescue_graph::{load_grid, RescuePlanner};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    env_logger::init();
    let options = Options::parse();
    let start = Instant::now();
    let grid = match load_grid(&options.input) {
        Ok(grid) => grid,
        Err(err) => {
            error!("{}: {err}", options.input.display());
            return ExitCode::FAILURE;
        }
    };
    if options.show_grid {
        println!("{grid}");
    }

    let outcome = RescuePlanner::new(options.config()).plan(&grid);
    print!("{}", OutcomeReport::new(&grid, &outcome));
    info!("Total time: {:.2?}", start.elapsed());
    ExitCode::SUCCESS
}
