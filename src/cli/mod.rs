//! CLI module
//!
//! Command-line interface over the API client.
//!
//! # Commands
//!
//! - `bills list|get` - Browse bills
//! - `votes sessions|tally` - Voting sessions and tallies
//! - `regions list|get` - Governance regions
//! - `metrics overview` - Platform-wide metrics
//! - `search bills` - Full-text bill search
//! - `webhook verify|sign` - Offline webhook signature tools

mod commands;
mod runner;

pub use commands::{
    BillsCommand, Cli, Commands, ListArgs, MetricsCommand, OutputFormat, PayloadArgs,
    RegionsCommand, SearchCommand, VotesCommand, WebhookCommand,
};
pub use runner::Runner;
