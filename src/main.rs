//! # perseus-report
//!
//! Command-line tool that reconciles a Perseus proteomics export into
//! long-format report tables.
//!
//! ## Usage
//!
//! ```bash
//! # Build the report tables
//! perseus-report run export.txt -r jdoe -w 23_001 -o report/
//!
//! # Only check that the blocks line up
//! perseus-report validate export.txt -r jdoe -w 23_001
//!
//! # Show how each column was classified
//! perseus-report inspect export.txt -r jdoe -w 23_001
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{dispatch, init_logging, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity());
    dispatch(cli)
}
