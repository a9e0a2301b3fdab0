use crate::partition::Selection;
use crate::DEFAULT_THREADS;
use clap::Parser;
use std::path::PathBuf;

/// How a [RescuePlanner](crate::RescuePlanner) runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RescueConfig {
    /// Worker threads running traversals.
    pub threads: usize,
    /// Lets traversals stop early once the oracle says nothing useful is left.
    pub pruning: bool,
    /// Components kept after partitioning.
    pub selection: Selection,
}

impl Default for RescueConfig {
    fn default() -> RescueConfig {
        RescueConfig {
            threads: DEFAULT_THREADS,
            pruning: true,
            selection: Selection::Largest,
        }
    }
}

/// Command line of the `rescue` binary.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "rescue")]
#[command(about = "Builds the reachability graph between people and exits on a grid")]
pub struct Options {
    /// Board file to read
    pub input: PathBuf,

    /// Worker threads running traversals
    #[arg(short, long, default_value_t = DEFAULT_THREADS as u32,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,

    /// Search every source exhaustively
    #[arg(long)]
    pub no_pruning: bool,

    /// Keep every component with an exit instead of only the largest
    #[arg(long)]
    pub all: bool,

    /// Print the board before the report
    #[arg(long)]
    pub show_grid: bool,
}

impl Options {
    pub fn config(&self) -> RescueConfig {
        RescueConfig {
            threads: self.threads as usize,
            pruning: !self.no_pruning,
            selection: if self.all {
                Selection::WithExits
            } else {
                Selection::Largest
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn defaults() {
        let options = Options::try_parse_from(["rescue", "map.txt"]).unwrap();
        assert_eq!(options.input, PathBuf::from("map.txt"));
        assert_eq!(options.config(), RescueConfig::default());
        assert_eq!(options.config().threads, 1);
        assert!(!options.show_grid);
    }

    #[test]
    fn flags() {
        let options = Options::try_parse_from([
            "rescue",
            "--threads",
            "4",
            "--no-pruning",
            "map.txt",
            "--all",
            "--show-grid",
        ])
        .unwrap();
        let config = options.config();
        assert_eq!(config.threads, 4);
        assert!(!config.pruning);
        assert_eq!(config.selection, Selection::WithExits);
        assert!(options.show_grid);
        let short = Options::try_parse_from(["rescue", "-t", "3", "map.txt"]).unwrap();
        assert_eq!(short.config().threads, 3);
    }

    #[test]
    fn errors() {
        let kind = |args: &[&str]| Options::try_parse_from(args).unwrap_err().kind();
        assert_eq!(kind(&["rescue"]), ErrorKind::MissingRequiredArgument);
        assert!(Options::try_parse_from(["rescue", "a", "--threads"]).is_err());
        assert_eq!(kind(&["rescue", "a", "-t", "0"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["rescue", "a", "-t", "x"]), ErrorKind::ValueValidation);
        assert_eq!(kind(&["rescue", "--fast", "a"]), ErrorKind::UnknownArgument);
        assert_eq!(kind(&["rescue", "a", "b"]), ErrorKind::UnknownArgument);
    }
}
