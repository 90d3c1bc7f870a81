// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Constitutional SDK
//!
//! Typed async client for the Constitutional Platform public API.
//!
//! ## Features
//!
//! - **Resilient Transport**: Server-timed waits on 429, exponential backoff
//!   on timeouts and connection failures, immediate failure on 401/404
//! - **Typed Errors**: One error enum with a stable code/status taxonomy
//! - **Lazy Pagination**: Cursor-following iterators that fetch on demand
//! - **Webhook Verification**: HMAC-SHA256 signatures with replay tolerance
//! - **Resource Wrappers**: Bills, votes, regions, metrics, search, webhooks
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use constitutional_sdk::{BillFilter, BillStatus, Constitutional, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Constitutional::from_env()?;
//!
//!     // One page
//!     let filter = BillFilter::new().status(BillStatus::Voting);
//!     let page = client.bills().list(&filter, None).await?;
//!
//!     // Every page, fetched lazily
//!     let mut bills = client.bills().list_all(filter);
//!     while let Some(bill) = bills.next_item().await? {
//!         println!("{}", bill.title);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Constitutional                           │
//! │  bills()  votes()  regions()  metrics()  search()  webhooks()   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────────┬──────────────┴──────┬──────────────────────────┐
//! │   Transport   │     Pagination      │        Webhooks          │
//! ├───────────────┼─────────────────────┼──────────────────────────┤
//! │ Bearer auth   │ Cursor following    │ HMAC-SHA256              │
//! │ 429 waits     │ Lazy page fetch     │ Timestamp tolerance      │
//! │ Backoff       │ max_items cap       │ Constant-time compare    │
//! │ Error mapping │ Stream adapter      │ Event catalogue          │
//! └───────────────┴─────────────────────┴──────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP transport with retry and backoff
pub mod http;

/// Cursor pagination
pub mod pagination;

/// Webhook signature verification
pub mod webhook;

/// Typed API resources
pub mod resources;

/// Client configuration
pub mod config;

/// Top-level client
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

// Re-export commonly used types
pub use client::Constitutional;
pub use config::ClientConfig;
pub use http::{HttpClient, HttpClientConfig, RequestConfig, RetryPolicy};
pub use pagination::{Page, PageInfo, Paginator};
pub use resources::*;
pub use webhook::{verify_signature, WebhookEvent};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
