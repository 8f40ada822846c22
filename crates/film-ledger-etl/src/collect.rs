//! Batch collectors: one fetch per distinct film id, assembled into a table.
//!
//! Requests share a token-bucket limiter and run through an ordered
//! buffered stream, so output rows follow first-appearance order of the
//! seeds whatever order the responses arrive in. A failed fetch becomes an
//! empty cell and never aborts the batch; revenue rows carry a status so a
//! failed cell is not read as a missing figure.

use std::collections::HashSet;
use std::future::Future;
use std::num::NonZeroU32;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

use film_ledger::{BudgetRow, FetchStatus, Market, MovieInfo, Nomination, RevenueRow};

use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_DELAY_MS};
use crate::fetch::{BoxOfficeClient, BudgetClient, FetchOutcome, OmdbClient};
use crate::progress::batch_bar;

/// A film to look up: its id and the title shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub filmid: String,
    pub title: Option<String>,
}

impl Seed {
    pub fn new(filmid: impl Into<String>, title: Option<String>) -> Self {
        Self {
            filmid: filmid.into(),
            title,
        }
    }
}

/// Distinct ids in order of first appearance; each keeps its first title.
pub fn distinct_seeds<I: IntoIterator<Item = Seed>>(seeds: I) -> Vec<Seed> {
    let mut seen = HashSet::new();
    seeds
        .into_iter()
        .filter(|s| seen.insert(s.filmid.clone()))
        .collect()
}

/// Seeds from cleaned nominations, titled by the nominated film.
pub fn seeds_from_nominations(nominations: &[Nomination]) -> Vec<Seed> {
    distinct_seeds(
        nominations
            .iter()
            .map(|n| Seed::new(n.filmid.as_str(), n.film.clone())),
    )
}

/// Seeds from movie metadata, titled by the API title.
pub fn seeds_from_movies(movies: &[MovieInfo]) -> Vec<Seed> {
    distinct_seeds(
        movies
            .iter()
            .map(|m| Seed::new(m.filmid.as_str(), m.title.clone())),
    )
}

/// Pacing of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Minimum spacing between request starts. Zero disables the limiter.
    pub delay: Duration,
    /// Requests allowed in flight at once.
    pub concurrency: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(DEFAULT_DELAY_MS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Outcome counts for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectReport {
    pub total: usize,
    pub found: usize,
    pub not_found: usize,
    pub unavailable: usize,
    pub transport_errors: usize,
}

impl CollectReport {
    pub fn from_outcomes<T>(outcomes: &[FetchOutcome<T>]) -> Self {
        let mut report = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                FetchOutcome::Found(_) => report.found += 1,
                FetchOutcome::NotFound => report.not_found += 1,
                FetchOutcome::Unavailable { .. } => report.unavailable += 1,
                FetchOutcome::TransportError(_) => report.transport_errors += 1,
            }
        }
        report
    }

    /// Fetches that did not produce a value.
    pub fn missed(&self) -> usize {
        self.total - self.found
    }
}

impl std::fmt::Display for CollectReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} found, {} not found, {} unavailable, {} transport errors",
            self.found, self.total, self.not_found, self.unavailable, self.transport_errors
        )
    }
}

/// Rows of a collected table plus how the fetches went.
#[derive(Debug, Clone, PartialEq)]
pub struct Collected<T> {
    pub rows: Vec<T>,
    pub report: CollectReport,
}

/// The three revenue tables produced from one summary request per film.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxOfficeTables {
    pub domestic: Vec<RevenueRow>,
    pub international: Vec<RevenueRow>,
    pub worldwide: Vec<RevenueRow>,
    pub report: CollectReport,
}

impl BoxOfficeTables {
    pub fn market(&self, market: Market) -> &[RevenueRow] {
        match market {
            Market::Domestic => &self.domestic,
            Market::International => &self.international,
            Market::Worldwide => &self.worldwide,
        }
    }
}

/// Runs fetches for a batch of seeds under a shared rate limit.
pub struct Collector {
    limiter: Option<DefaultDirectRateLimiter>,
    concurrency: usize,
    show_progress: bool,
}

impl Collector {
    pub fn new(options: BatchOptions) -> Self {
        let limiter = Quota::with_period(options.delay)
            .map(|quota| RateLimiter::direct(quota.allow_burst(NonZeroU32::MIN)));
        Self {
            limiter,
            concurrency: options.concurrency.max(1),
            show_progress: false,
        }
    }

    /// Draw a progress bar on stderr while the batch runs.
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    /// Fetch every seed, returning one outcome per seed in seed order.
    pub async fn run<T, F, Fut>(
        &self,
        label: &str,
        seeds: &[Seed],
        fetch: F,
    ) -> (Vec<FetchOutcome<T>>, CollectReport)
    where
        F: Fn(Seed) -> Fut,
        Fut: Future<Output = FetchOutcome<T>>,
    {
        let total = seeds.len();
        tracing::info!("querying {label} for {total} films");

        let bar = batch_bar(total as u64, label, self.show_progress);
        let limiter = self.limiter.as_ref();
        let fetch = &fetch;
        let progress = &bar;

        let outcomes: Vec<FetchOutcome<T>> = stream::iter(seeds.iter().cloned().enumerate())
            .map(move |(i, seed)| async move {
                if let Some(limiter) = limiter {
                    limiter.until_ready().await;
                }
                tracing::info!("({}/{total}) querying {label} for {}", i + 1, seed.filmid);
                let outcome = fetch(seed).await;
                progress.inc(1);
                outcome
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        bar.finish_and_clear();
        let report = CollectReport::from_outcomes(&outcomes);
        tracing::info!("{label}: {report}");
        (outcomes, report)
    }
}

/// Metadata for every seed. Films the API has nothing for are left out.
pub async fn collect_movie_info(
    collector: &Collector,
    client: &OmdbClient,
    seeds: &[Seed],
) -> Collected<MovieInfo> {
    let (outcomes, report) = collector
        .run("movie info", seeds, |seed| {
            let client = client.clone();
            async move { client.fetch(&seed.filmid).await }
        })
        .await;

    let rows: Vec<MovieInfo> = outcomes.into_iter().filter_map(FetchOutcome::found).collect();
    if report.missed() > 0 {
        tracing::info!("{} films left out of the metadata table", report.missed());
    }
    Collected { rows, report }
}

/// Revenue text for one market, one row per seed.
pub async fn collect_box_office(
    collector: &Collector,
    client: &BoxOfficeClient,
    seeds: &[Seed],
    market: Market,
) -> Collected<RevenueRow> {
    let label = format!("{} box office", market.label().to_lowercase());
    let (outcomes, report) = collector
        .run(&label, seeds, |seed| {
            let client = client.clone();
            async move { client.fetch(&seed.filmid, market).await }
        })
        .await;

    let rows = seeds
        .iter()
        .zip(outcomes)
        .map(|(seed, outcome)| RevenueRow {
            filmid: seed.filmid.clone(),
            title: seed.title.clone(),
            status: outcome.status(),
            revenue: outcome.found(),
        })
        .collect();
    Collected { rows, report }
}

/// All three markets from one summary request per seed.
pub async fn collect_box_office_summary(
    collector: &Collector,
    client: &BoxOfficeClient,
    seeds: &[Seed],
) -> BoxOfficeTables {
    let (outcomes, report) = collector
        .run("box office", seeds, |seed| {
            let client = client.clone();
            async move { client.fetch_summary(&seed.filmid).await }
        })
        .await;

    let mut tables = BoxOfficeTables {
        domestic: Vec::with_capacity(seeds.len()),
        international: Vec::with_capacity(seeds.len()),
        worldwide: Vec::with_capacity(seeds.len()),
        report,
    };
    for (seed, outcome) in seeds.iter().zip(outcomes) {
        let page = outcome.status();
        let summary = outcome.found().unwrap_or_default();
        let row = |revenue: Option<String>| RevenueRow {
            filmid: seed.filmid.clone(),
            title: seed.title.clone(),
            status: match (&revenue, page) {
                (Some(_), _) => FetchStatus::Found,
                (None, FetchStatus::Found) => FetchStatus::NotFound,
                (None, page) => page,
            },
            revenue,
        };
        tables.domestic.push(row(summary.domestic));
        tables.international.push(row(summary.international));
        tables.worldwide.push(row(summary.worldwide));
    }
    tables
}

/// Production budgets, looked up by title, one row per seed.
pub async fn collect_budgets(
    collector: &Collector,
    client: &BudgetClient,
    seeds: &[Seed],
) -> Collected<BudgetRow> {
    let (outcomes, report) = collector
        .run("budgets", seeds, |seed| {
            let client = client.clone();
            async move {
                match seed.title.as_deref() {
                    Some(title) => client.fetch(title).await,
                    None => {
                        tracing::debug!("no title to look up a budget for {}", seed.filmid);
                        FetchOutcome::NotFound
                    }
                }
            }
        })
        .await;

    let rows = seeds
        .iter()
        .zip(outcomes)
        .map(|(seed, outcome)| BudgetRow {
            filmid: seed.filmid.clone(),
            title: seed.title.clone(),
            budget: outcome.found(),
        })
        .collect();
    Collected { rows, report }
}
