//! CLI struct definitions for the `garage` binary.
//!
//! All clap-derived types live here. Dispatch lives in `lib.rs`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "garage",
    version = env!("CARGO_PKG_VERSION"),
    about = "Vehicle garage simulator: capacity-managed garages with a persistent license plate registry."
)]
pub(crate) struct Cli {
    /// Config file (defaults to ./garage.toml when present).
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Validate and manage registered license plates
    Plates(PlatesCli),
    /// Build a garage, park the sample catalog in it and print the result
    Demo(DemoCli),
    /// Interactive garage console on stdin/stdout
    Shell,
    /// Print the command schema as JSON
    Schema,
}

#[derive(clap::Args, Debug)]
pub(crate) struct PlatesCli {
    #[clap(subcommand)]
    pub command: PlatesCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum PlatesCommand {
    /// Check format and availability without registering
    Validate { plate: String },
    /// Validate and register a plate
    Register { plate: String },
    /// Release a registered plate
    Remove { plate: String },
    /// Forget every registered plate
    Clear,
    /// List registered plates
    List {
        /// Output format: 'text' or 'json'.
        #[clap(long, default_value = "text")]
        format: String,
    },
}

#[derive(clap::Args, Debug)]
pub(crate) struct DemoCli {
    /// Garage size (1 - 524288). Defaults to the size of the sample catalog.
    #[clap(long)]
    pub size: Option<usize>,
    /// Only list vehicles matching these terms, e.g. `kind=car` `color=red` `wheels>2`.
    #[clap(long = "filter")]
    pub filters: Vec<String>,
    /// Output format: 'text' or 'json'.
    #[clap(long, default_value = "text")]
    pub format: String,
}
