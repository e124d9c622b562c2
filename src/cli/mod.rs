use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use perseus_report::export::RunNaming;
use perseus_report::output::OutputFormat;
use perseus_report::pipeline::PipelineConfig;
use perseus_report::reconcile::UnmatchedSamplePolicy;

mod config;
mod inspect;
mod run;
mod validate;

pub use config::Config;

/// perseus-report - Perseus export to long-format report tables
#[derive(Parser)]
#[command(name = "perseus-report")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output table format
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    /// Tab-separated text only
    Tsv,
    /// Parquet only
    Parquet,
    /// Both TSV and Parquet
    All,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Tsv => OutputFormat::Tsv,
            FormatArg::Parquet => OutputFormat::Parquet,
            FormatArg::All => OutputFormat::All,
        }
    }
}

/// Handling of abundance samples without metadata
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum UnmatchedArg {
    /// Keep their rows without a group
    Retain,
    /// Remove their rows
    Drop,
    /// Fail the run
    Reject,
}

impl From<UnmatchedArg> for UnmatchedSamplePolicy {
    fn from(arg: UnmatchedArg) -> Self {
        match arg {
            UnmatchedArg::Retain => UnmatchedSamplePolicy::Retain,
            UnmatchedArg::Drop => UnmatchedSamplePolicy::Drop,
            UnmatchedArg::Reject => UnmatchedSamplePolicy::Reject,
        }
    }
}

/// Arguments shared by every subcommand
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Perseus export (tab-separated)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Researcher token embedded in sample column names
    #[arg(short = 'r', long)]
    researcher: Option<String>,

    /// Work-order token embedded in sample column names
    #[arg(short = 'w', long)]
    work_order: Option<String>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Handling of abundance samples without metadata
    #[arg(long, value_enum)]
    unmatched: Option<UnmatchedArg>,
}

impl RunArgs {
    /// Merge the config file with the flags; flags win
    fn resolve(&self) -> Result<(Config, RunNaming, PipelineConfig)> {
        let config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        let researcher = self
            .researcher
            .clone()
            .or_else(|| config.naming.researcher.clone());
        let work_order = self
            .work_order
            .clone()
            .or_else(|| config.naming.work_order.clone());
        let (Some(researcher), Some(work_order)) = (researcher, work_order) else {
            bail!("Researcher and work order are required (-r/-w or the [naming] config section)");
        };

        let mut pipeline = config.pipeline_config();
        if let Some(unmatched) = self.unmatched {
            pipeline.reconciliation.unmatched_samples = unmatched.into();
        }

        Ok((config, RunNaming::new(researcher, work_order), pipeline))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile an export and write the report tables
    Run {
        #[command(flatten)]
        args: RunArgs,

        /// Output directory
        #[arg(short = 'o', long, default_value = "report")]
        output: PathBuf,

        /// Table format (overrides the config file)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Check that every block of an export lines up
    Validate {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Show how each column of an export is classified
    Inspect {
        #[command(flatten)]
        args: RunArgs,

        /// Print the layout as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            args,
            output,
            format,
        } => run::run(args, output, format.map(OutputFormat::from)),
        Commands::Validate { args } => validate::run(args),
        Commands::Inspect { args, json } => inspect::run(args, json),
    }
}
