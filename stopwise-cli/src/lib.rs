//! Command-line interface for replaying delivery plans headlessly.
//!
//! `stopwise plan request.json` mounts a planner on an in-memory map, replays
//! each stop as a map click against the TomTom services and prints the final
//! ordering and route as JSON.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod plan;

pub use error::CliError;

pub(crate) const ARG_PLAN_REQUEST: &str = "request";
pub(crate) const ARG_API_KEY: &str = "api-key";
pub(crate) const ARG_BASE_URL: &str = "base-url";
pub(crate) const ARG_TIMEOUT_SECS: &str = "timeout-secs";
pub(crate) const ENV_PLAN_REQUEST: &str = "STOPWISE_CMDS_PLAN_REQUEST_PATH";

/// Run the Stopwise CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Plan(args) => plan::run_plan(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "stopwise",
    about = "Order delivery stops by driving time and route them",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay a list of stops through the planner and print the route.
    Plan(plan::PlanArgs),
}

#[cfg(test)]
mod tests;
