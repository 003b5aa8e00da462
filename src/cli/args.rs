use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::RftConfig;

#[derive(Parser, Debug)]
#[command(name = "rft-metrics")]
#[command(about = "Right-First-Time quality metrics from spreadsheet exports", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to .rft-metrics.toml in this or a parent directory)
    #[arg(long, global = true, env = "RFT_METRICS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate the source workbooks into the metrics document (default)
    Aggregate(AggregateArgs),

    /// Initialize a new .rft-metrics.toml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Report which sources and artifacts exist and whether they parse
    Status(OutputArgs),

    /// Read the published document and print its overview
    Show {
        #[command(flatten)]
        output: OutputArgs,

        /// Print the full document as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Directory holding the published artifacts
    #[arg(short, long = "output-dir")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct AggregateArgs {
    /// Decoded internal RFT workbook (JSON)
    #[arg(long)]
    pub internal: Option<PathBuf>,

    /// Decoded external RFT workbook (JSON)
    #[arg(long)]
    pub external: Option<PathBuf>,

    /// Decoded commercial process workbook (JSON)
    #[arg(long)]
    pub process: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Seed for synthesized fallback values
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

impl OutputArgs {
    /// Pure function layering the flag over file configuration
    pub fn apply(&self, mut config: RftConfig) -> RftConfig {
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
        }
        config
    }
}

impl AggregateArgs {
    /// Pure function layering command-line flags over file configuration
    pub fn apply(&self, config: RftConfig) -> RftConfig {
        let mut config = self.output.apply(config);
        if let Some(path) = &self.internal {
            config.sources.internal = path.clone();
        }
        if let Some(path) = &self.external {
            config.sources.external = path.clone();
        }
        if let Some(path) = &self.process {
            config.sources.process = path.clone();
        }
        if self.seed.is_some() {
            config.analysis.seed = self.seed;
        }
        if self.compact {
            config.output.pretty = false;
        }
        config
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["rft-metrics", "-vv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.verbosity, 2);
    }

    #[test]
    fn test_aggregate_flags_override_config() {
        let cli = Cli::try_parse_from([
            "rft-metrics",
            "aggregate",
            "--internal",
            "in.json",
            "--output-dir",
            "site",
            "--seed",
            "4",
            "--compact",
        ])
        .unwrap();
        let Some(Commands::Aggregate(args)) = cli.command else {
            panic!("expected aggregate");
        };
        let config = args.apply(RftConfig::default());
        assert_eq!(config.sources.internal, PathBuf::from("in.json"));
        assert_eq!(config.sources.external, PathBuf::from("data/external.json"));
        assert_eq!(config.output.dir, PathBuf::from("site"));
        assert_eq!(config.analysis.seed, Some(4));
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_unset_seed_keeps_configured_seed() {
        let mut base = RftConfig::default();
        base.analysis.seed = Some(11);
        let config = AggregateArgs::default().apply(base);
        assert_eq!(config.analysis.seed, Some(11));
    }
}
