//! CLI runner - executes commands

use crate::cli::commands::{
    BillsCommand, Cli, Commands, ListArgs, MetricsCommand, OutputFormat, PayloadArgs,
    RegionsCommand, SearchCommand, VotesCommand, WebhookCommand,
};
use crate::client::Constitutional;
use crate::config::{ClientConfig, ENV_API_KEY};
use crate::error::{Error, Result, ResultExt};
use crate::pagination::{Page, PageInfo, Paginator};
use crate::resources::{BillFilter, BillSearch, RegionFilter, SessionFilter};
use crate::webhook::{sign_payload, signature_header, verify_signature_at, SignatureHeader};
use serde::Serialize;
use serde_json::{json, Value};
use std::fs;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command and print its result
    pub async fn run(&self) -> Result<()> {
        let output = self.execute().await?;
        self.output_message(&output);
        Ok(())
    }

    /// Run the CLI command, returning what would be printed
    pub async fn execute(&self) -> Result<Value> {
        match &self.cli.command {
            Commands::Webhook { command } => self.webhook(command),
            Commands::Bills { command } => self.bills(command).await,
            Commands::Votes { command } => self.votes(command).await,
            Commands::Regions { command } => self.regions(command).await,
            Commands::Metrics { command } => self.metrics(command).await,
            Commands::Search { command } => self.search(command).await,
        }
    }

    /// Settings from flags, falling back to the environment
    fn client_config(&self) -> Result<ClientConfig> {
        let flag_key = self.cli.api_key.clone();
        let mut config = ClientConfig::from_lookup(|key| {
            if key == ENV_API_KEY && flag_key.is_some() {
                return flag_key.clone();
            }
            std::env::var(key).ok()
        })
        .map_err(|e| match e {
            Error::MissingConfigField { .. } => {
                Error::config("API key not specified (use --api-key or CONSTITUTIONAL_API_KEY)")
            }
            other => other,
        })?;

        if let Some(url) = &self.cli.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(region) = &self.cli.region {
            config.region = Some(region.clone());
        }
        if let Some(timeout) = self.cli.timeout {
            config = config.timeout(Duration::from_secs(timeout));
        }
        if let Some(retries) = self.cli.max_retries {
            config = config.max_retries(retries);
        }

        Ok(config)
    }

    fn client(&self) -> Result<Constitutional> {
        let config = self.client_config()?;
        debug!("Using API at {}", config.resolved_base_url());
        Constitutional::new(config)
    }

    async fn bills(&self, command: &BillsCommand) -> Result<Value> {
        let client = self.client()?;
        let bills = client.bills();

        match command {
            BillsCommand::List {
                status,
                category,
                in_region,
                search,
                list,
            } => {
                let filter = BillFilter {
                    status: *status,
                    category: category.clone(),
                    region: in_region.clone(),
                    search: search.clone(),
                    limit: list.limit,
                };
                if list.paginate() {
                    to_output(&drain(bills.list_all(filter), list).await?)
                } else {
                    to_output(&bills.list(&filter, list.cursor.as_deref()).await?)
                }
            }
            BillsCommand::Get { id } => to_output(&bills.get(id).await?),
        }
    }

    async fn votes(&self, command: &VotesCommand) -> Result<Value> {
        let client = self.client()?;
        let votes = client.votes();

        match command {
            VotesCommand::Sessions {
                status,
                bill_id,
                list,
            } => {
                let filter = SessionFilter {
                    status: *status,
                    bill_id: bill_id.clone(),
                    limit: list.limit,
                };
                if list.paginate() {
                    to_output(&drain(votes.list_all_sessions(filter), list).await?)
                } else {
                    to_output(&votes.list_sessions(&filter, list.cursor.as_deref()).await?)
                }
            }
            VotesCommand::Tally { session_id } => to_output(&votes.tally(session_id).await?),
        }
    }

    async fn regions(&self, command: &RegionsCommand) -> Result<Value> {
        let client = self.client()?;
        let regions = client.regions();

        match command {
            RegionsCommand::List {
                region_type,
                parent_id,
                list,
            } => {
                let filter = RegionFilter {
                    region_type: *region_type,
                    parent_id: parent_id.clone(),
                    limit: list.limit,
                };
                if list.paginate() {
                    to_output(&drain(regions.list_all(filter), list).await?)
                } else {
                    to_output(&regions.list(&filter, list.cursor.as_deref()).await?)
                }
            }
            RegionsCommand::Get { id } => to_output(&regions.get(id).await?),
        }
    }

    async fn metrics(&self, command: &MetricsCommand) -> Result<Value> {
        let client = self.client()?;

        match command {
            MetricsCommand::Overview => to_output(&client.metrics().overview().await?),
        }
    }

    async fn search(&self, command: &SearchCommand) -> Result<Value> {
        let client = self.client()?;

        match command {
            SearchCommand::Bills {
                query,
                status,
                category,
                limit,
                cursor,
            } => {
                let search = BillSearch {
                    status: status.clone(),
                    category: category.clone(),
                    limit: *limit,
                    ..BillSearch::new(query.as_str())
                };
                to_output(&client.search().bills(&search, cursor.as_deref()).await?)
            }
        }
    }

    fn webhook(&self, command: &WebhookCommand) -> Result<Value> {
        match command {
            WebhookCommand::Verify {
                payload,
                signature,
                secret,
                tolerance,
                now,
            } => {
                let body = read_payload(payload)?;
                let now = now.unwrap_or_else(|| chrono::Utc::now().timestamp());

                if !verify_signature_at(&body, signature, secret, *tolerance, now) {
                    let reason = match SignatureHeader::parse(signature) {
                        Ok(_) => "signature mismatch or timestamp outside tolerance".to_string(),
                        Err(e) => e.to_string(),
                    };
                    return Err(Error::Other(format!("Invalid webhook signature: {reason}")));
                }

                Ok(json!({ "valid": true }))
            }
            WebhookCommand::Sign {
                payload,
                secret,
                timestamp,
            } => {
                let body = read_payload(payload)?;
                let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());

                Ok(json!({
                    "timestamp": timestamp,
                    "signature": sign_payload(&body, secret, timestamp),
                    "header": signature_header(&body, secret, timestamp),
                }))
            }
        }
    }

    /// Print output in the selected format
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Walk a paginated listing, honouring `--max-items`
///
/// `total` is only reported when the walk reached the end of the listing.
async fn drain<T, F, Fut>(mut pager: Paginator<T, F>, list: &ListArgs) -> Result<Page<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    while list.max_items.map_or(true, |max| items.len() < max) {
        match pager.next_item().await? {
            Some(item) => items.push(item),
            None => break,
        }
    }

    let truncated = !pager.is_done();
    let total = (!truncated).then_some(items.len() as u64);
    debug!("Collected {} items over {} pages", items.len(), pager.pages_fetched());
    Ok(Page::new(
        items,
        PageInfo {
            cursor: None,
            has_more: truncated,
            total,
        },
    ))
}

fn read_payload(args: &PayloadArgs) -> Result<Vec<u8>> {
    match (&args.payload, &args.payload_file) {
        (Some(text), _) => Ok(text.as_bytes().to_vec()),
        (None, Some(path)) => fs::read(path)
            .with_context(|| format!("Failed to read payload file {}", path.display())),
        (None, None) => Err(Error::config("Provide --payload or --payload-file")),
    }
}

fn to_output<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
