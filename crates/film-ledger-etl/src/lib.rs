//! Film Ledger ETL: remote fetchers, rate-limited batch collectors and the stage runner behind the `film-ledger` CLI.

pub mod collect;
pub mod config;
pub mod error;
pub mod fetch;
pub mod http;
pub mod pipeline;
pub mod progress;

pub use collect::{BatchOptions, CollectReport, Collected, Collector, Seed};
pub use config::{ConfigOverrides, EtlConfig};
pub use error::{EtlError, EtlResult};
pub use fetch::{BoxOfficeClient, BudgetClient, FetchOutcome, OmdbClient};
pub use http::HttpClient;
pub use pipeline::Pipeline;
