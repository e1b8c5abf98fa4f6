// Command-line configuration (clap derive)
// All runtime options live here; nothing is read from config files.

use crate::error::ImportError;
use crate::group::DEFAULT_GROUP_SIZE;
use crate::parser::{load_names_from_file, parse_names};
use crate::participant::Participant;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "teamsync")]
#[command(about = "Lucky draws and random teams from a list of names")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(long, global = true, help = "Seed for reproducible draws and groups")]
    pub seed: Option<u64>,

    #[arg(short, long, global = true, help = "Verbose logging", default_value_t = false)]
    pub verbose: bool,

    #[arg(long, global = true, help = "Write logs to this file (interactive mode logs nowhere otherwise)")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive terminal UI (default)
    Ui {
        #[arg(long, help = "Load participants from a .csv or .txt file on start")]
        file: Option<PathBuf>,
    },

    /// Draw one or more winners
    Draw {
        #[command(flatten)]
        source: ListSource,

        #[arg(long, help = "Number of winners to draw", default_value_t = 1)]
        count: usize,

        #[arg(long, help = "Allow the same participant to win more than once", default_value_t = false)]
        allow_repeats: bool,

        #[arg(long, help = "Print JSON instead of text", default_value_t = false)]
        json: bool,
    },

    /// Split participants into random groups
    Group {
        #[command(flatten)]
        source: ListSource,

        #[arg(
            long,
            help = "Members per group (values below 1 are treated as 1)",
            default_value_t = DEFAULT_GROUP_SIZE as i64,
            allow_negative_numbers = true
        )]
        size: i64,

        #[arg(long, help = "Directory to write teams_export_<date>.csv into")]
        export: Option<PathBuf>,

        #[arg(long, help = "Print JSON instead of text", default_value_t = false)]
        json: bool,
    },

    /// List names that appear more than once
    Duplicates {
        #[command(flatten)]
        source: ListSource,
    },
}

/// Where a non-interactive command gets its names from
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct ListSource {
    #[arg(long, help = "Read names from a .csv or .txt file")]
    pub file: Option<PathBuf>,

    #[arg(long, help = "Names separated by commas or newlines")]
    pub names: Option<String>,
}

impl ListSource {
    pub fn load(&self) -> Result<Vec<Participant>, ImportError> {
        match (&self.file, &self.names) {
            (Some(path), _) => load_names_from_file(path),
            (None, Some(text)) => Ok(parse_names(text)),
            (None, None) => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupSize;

    #[test]
    fn test_no_subcommand_means_ui() {
        let cli = Cli::try_parse_from(["teamsync"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.seed.is_none());
    }

    #[test]
    fn test_group_defaults() {
        let cli = Cli::try_parse_from(["teamsync", "group", "--names", "a,b"]).unwrap();
        match cli.command {
            Some(Command::Group { size, export, json, .. }) => {
                assert_eq!(size, 3);
                assert!(export.is_none());
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_size_clamped() {
        let cli = Cli::try_parse_from(["teamsync", "group", "--names", "a", "--size", "-2"]).unwrap();
        match cli.command {
            Some(Command::Group { size, .. }) => assert_eq!(GroupSize::new(size).get(), 1),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_source_required_and_exclusive() {
        assert!(Cli::try_parse_from(["teamsync", "draw"]).is_err());
        assert!(Cli::try_parse_from([
            "teamsync", "draw", "--names", "a", "--file", "x.csv"
        ])
        .is_err());
    }

    #[test]
    fn test_global_seed_after_subcommand() {
        let cli = Cli::try_parse_from(["teamsync", "draw", "--names", "a,b", "--seed", "9"]).unwrap();
        assert_eq!(cli.seed, Some(9));
    }

    #[test]
    fn test_names_source_parses() {
        let source = ListSource {
            file: None,
            names: Some("A, B\nC".to_string()),
        };
        assert_eq!(source.load().unwrap().len(), 3);
    }
}
