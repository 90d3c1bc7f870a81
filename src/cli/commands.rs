//! CLI commands and argument parsing

use crate::resources::{BillStatus, RegionType, VoteSessionStatus};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Constitutional Platform API command-line client
#[derive(Parser, Debug)]
#[command(name = "constitutional")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API key (falls back to CONSTITUTIONAL_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Base URL override
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Regional host, e.g. `eu`
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Retries after the first attempt
    #[arg(long, global = true)]
    pub max_retries: Option<u32>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Browse bills
    Bills {
        #[command(subcommand)]
        command: BillsCommand,
    },

    /// Voting sessions and tallies
    Votes {
        #[command(subcommand)]
        command: VotesCommand,
    },

    /// Governance regions
    Regions {
        #[command(subcommand)]
        command: RegionsCommand,
    },

    /// Platform metrics
    Metrics {
        #[command(subcommand)]
        command: MetricsCommand,
    },

    /// Full-text search
    Search {
        #[command(subcommand)]
        command: SearchCommand,
    },

    /// Sign or verify webhook payloads (no API key needed)
    Webhook {
        #[command(subcommand)]
        command: WebhookCommand,
    },
}

/// Paging flags shared by listing commands
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Page size
    #[arg(long)]
    pub limit: Option<u32>,

    /// Start from this cursor
    #[arg(long, conflicts_with = "all")]
    pub cursor: Option<String>,

    /// Follow cursors through every page
    #[arg(long)]
    pub all: bool,

    /// Stop after this many items (implies --all)
    #[arg(long)]
    pub max_items: Option<usize>,
}

impl ListArgs {
    /// Whether to walk pages instead of printing one
    pub fn paginate(&self) -> bool {
        self.all || self.max_items.is_some()
    }
}

#[derive(Subcommand, Debug)]
pub enum BillsCommand {
    /// List bills
    List {
        #[arg(long)]
        status: Option<BillStatus>,

        #[arg(long)]
        category: Option<String>,

        /// Region the bill belongs to
        #[arg(long)]
        in_region: Option<String>,

        #[arg(long)]
        search: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one bill
    Get { id: String },
}

#[derive(Subcommand, Debug)]
pub enum VotesCommand {
    /// List voting sessions
    Sessions {
        #[arg(long)]
        status: Option<VoteSessionStatus>,

        #[arg(long)]
        bill_id: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Detailed tally for a session
    Tally { session_id: String },
}

#[derive(Subcommand, Debug)]
pub enum RegionsCommand {
    /// List regions
    List {
        #[arg(long = "type")]
        region_type: Option<RegionType>,

        #[arg(long)]
        parent_id: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one region
    Get { id: String },
}

#[derive(Subcommand, Debug)]
pub enum MetricsCommand {
    /// Platform-wide overview
    Overview,
}

#[derive(Subcommand, Debug)]
pub enum SearchCommand {
    /// Search bills
    Bills {
        query: String,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        limit: Option<u32>,

        #[arg(long)]
        cursor: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum WebhookCommand {
    /// Check an X-Webhook-Signature header
    Verify {
        #[command(flatten)]
        payload: PayloadArgs,

        /// Signature header, `t=<unix>,v1=<hex>`
        #[arg(long)]
        signature: String,

        #[arg(long)]
        secret: String,

        /// Allowed clock skew in seconds
        #[arg(long, default_value = "300")]
        tolerance: u64,

        /// Verify as of this unix time instead of now
        #[arg(long)]
        now: Option<i64>,
    },

    /// Produce a signature header for a payload
    Sign {
        #[command(flatten)]
        payload: PayloadArgs,

        #[arg(long)]
        secret: String,

        /// Unix time to sign with (defaults to now)
        #[arg(long)]
        timestamp: Option<i64>,
    },
}

/// Raw webhook body, inline or from a file
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Payload text
    #[arg(long)]
    pub payload: Option<String>,

    /// File holding the raw payload bytes
    #[arg(long)]
    pub payload_file: Option<PathBuf>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}
