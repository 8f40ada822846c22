//! Pipeline stages over CSV checkpoints.
//!
//! Each stage reads the checkpoints it depends on from the output directory
//! and writes its own, so stages can be run one at a time or all in order.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use film_ledger::checkpoint::{self, read_records, write_records};
use film_ledger::{
    BoxOfficeRecord, BudgetOverrides, BudgetRow, CleanBudget, FilmRecord, FinancialRecord, Frame,
    Market, MovieInfo, Nomination, RevenueRow,
};

use crate::collect::{
    collect_box_office, collect_box_office_summary, collect_budgets, collect_movie_info,
    seeds_from_movies, seeds_from_nominations, CollectReport, Collector,
};
use crate::config::EtlConfig;
use crate::error::{EtlError, EtlResult};
use crate::fetch::{BoxOfficeClient, BudgetClient, OmdbClient};
use crate::http::HttpClient;

/// Checkpoint file holding one market's raw revenue.
pub fn revenue_checkpoint(market: Market) -> &'static str {
    match market {
        Market::Domestic => checkpoint::DOMESTIC_BOXOFFICE,
        Market::International => checkpoint::INTERNATIONAL_BOXOFFICE,
        Market::Worldwide => checkpoint::WORLDWIDE_BOXOFFICE,
    }
}

/// CLI stage that produces a checkpoint, for error hints.
fn producing_stage(name: &str) -> &'static str {
    match name {
        checkpoint::CLEAN_AWARDS => "clean-awards",
        checkpoint::MOVIE_INFO => "info",
        checkpoint::DOMESTIC_BOXOFFICE
        | checkpoint::INTERNATIONAL_BOXOFFICE
        | checkpoint::WORLDWIDE_BOXOFFICE => "box-office",
        checkpoint::MOVIE_BUDGETS => "budget",
        checkpoint::BOXOFFICE => "combine-box-office",
        checkpoint::CLEAN_BUDGETS => "clean-budget",
        checkpoint::FINANCIAL_DATA => "financials",
        _ => "run",
    }
}

/// Stage runner bound to one configuration.
pub struct Pipeline {
    config: EtlConfig,
    http: HttpClient,
    show_progress: bool,
}

impl Pipeline {
    pub fn new(config: EtlConfig) -> EtlResult<Self> {
        let http = HttpClient::new(config.timeout)?;
        Ok(Self {
            config,
            http,
            show_progress: false,
        })
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.show_progress = enabled;
        self
    }

    fn collector(&self) -> Collector {
        Collector::new(self.config.batch_options()).with_progress(self.show_progress)
    }

    fn read_stage<T: DeserializeOwned>(&self, name: &str) -> EtlResult<Vec<T>> {
        let path = self.config.checkpoint(name);
        if !path.exists() {
            return Err(EtlError::MissingCheckpoint {
                path,
                stage: producing_stage(name),
            });
        }
        Ok(read_records(&path)?)
    }

    fn write_stage<T: Serialize>(&self, name: &str, rows: &[T]) -> EtlResult<()> {
        write_records(&self.config.checkpoint(name), rows)?;
        Ok(())
    }

    /// Clean the raw awards file into `kaggle_clean.csv`.
    pub fn clean_awards(&self, awards: &Path) -> EtlResult<Vec<Nomination>> {
        let raw = Frame::read_csv(awards)?;
        let nominations = film_ledger::clean_awards(&raw)?;
        self.write_stage(checkpoint::CLEAN_AWARDS, &nominations)?;
        Ok(nominations)
    }

    /// Fetch metadata for every nominated film into `df_imdb.csv`.
    pub async fn movie_info(&self) -> EtlResult<CollectReport> {
        let api_key = self.config.require_api_key()?;
        let nominations: Vec<Nomination> = self.read_stage(checkpoint::CLEAN_AWARDS)?;
        let seeds = seeds_from_nominations(&nominations);

        let client = OmdbClient::new(self.http.clone(), &self.config.omdb_url, api_key);
        let collected = collect_movie_info(&self.collector(), &client, &seeds).await;
        self.write_stage(checkpoint::MOVIE_INFO, &collected.rows)?;
        Ok(collected.report)
    }

    /// Scrape box office revenue for every nominated film.
    ///
    /// With no market, all three tables come from one request per film.
    pub async fn box_office(&self, market: Option<Market>) -> EtlResult<CollectReport> {
        let nominations: Vec<Nomination> = self.read_stage(checkpoint::CLEAN_AWARDS)?;
        let seeds = seeds_from_nominations(&nominations);
        let client = BoxOfficeClient::new(self.http.clone(), &self.config.mojo_url);
        let collector = self.collector();

        match market {
            Some(market) => {
                let collected = collect_box_office(&collector, &client, &seeds, market).await;
                self.write_stage(revenue_checkpoint(market), &collected.rows)?;
                Ok(collected.report)
            }
            None => {
                let tables = collect_box_office_summary(&collector, &client, &seeds).await;
                for market in Market::ALL {
                    self.write_stage(revenue_checkpoint(market), tables.market(market))?;
                }
                Ok(tables.report)
            }
        }
    }

    /// Scrape production budgets, by API title, into `movie_budgets.csv`.
    pub async fn budgets(&self) -> EtlResult<CollectReport> {
        let movies: Vec<MovieInfo> = self.read_stage(checkpoint::MOVIE_INFO)?;
        let seeds = seeds_from_movies(&movies);
        let client = BudgetClient::new(self.http.clone(), &self.config.numbers_url);

        let collected = collect_budgets(&self.collector(), &client, &seeds).await;
        self.write_stage(checkpoint::MOVIE_BUDGETS, &collected.rows)?;
        Ok(collected.report)
    }

    /// Outer-join the three revenue tables into `boxoffice.csv`.
    pub fn combine_box_office(&self) -> EtlResult<Vec<BoxOfficeRecord>> {
        let domestic: Vec<RevenueRow> = self.read_stage(checkpoint::DOMESTIC_BOXOFFICE)?;
        let international: Vec<RevenueRow> = self.read_stage(checkpoint::INTERNATIONAL_BOXOFFICE)?;
        let worldwide: Vec<RevenueRow> = self.read_stage(checkpoint::WORLDWIDE_BOXOFFICE)?;

        let records = film_ledger::create_boxoffice_dataset(&domestic, &international, &worldwide)?;
        self.write_stage(checkpoint::BOXOFFICE, &records)?;
        Ok(records)
    }

    /// Apply manual overrides to scraped budgets into `movie_budgets_clean.csv`.
    pub fn clean_budget(&self, overrides: Option<&Path>) -> EtlResult<Vec<CleanBudget>> {
        let budgets: Vec<BudgetRow> = self.read_stage(checkpoint::MOVIE_BUDGETS)?;
        let overrides = match overrides {
            Some(path) => BudgetOverrides::load(path)?,
            None => BudgetOverrides::new(),
        };

        let cleaned = film_ledger::clean_budget(&budgets, &overrides);
        self.write_stage(checkpoint::CLEAN_BUDGETS, &cleaned)?;
        Ok(cleaned)
    }

    /// Join budgets with box office into `financial_data.csv`.
    pub fn financials(&self) -> EtlResult<Vec<FinancialRecord>> {
        let budgets: Vec<CleanBudget> = self.read_stage(checkpoint::CLEAN_BUDGETS)?;
        let boxoffice: Vec<BoxOfficeRecord> = self.read_stage(checkpoint::BOXOFFICE)?;

        let records = film_ledger::create_financial_data(&budgets, &boxoffice);
        self.write_stage(checkpoint::FINANCIAL_DATA, &records)?;
        Ok(records)
    }

    /// Join metadata, financials and nominations into `final_dataset.csv`.
    pub fn final_dataset(&self) -> EtlResult<Vec<FilmRecord>> {
        let movies: Vec<MovieInfo> = self.read_stage(checkpoint::MOVIE_INFO)?;
        let financial: Vec<FinancialRecord> = self.read_stage(checkpoint::FINANCIAL_DATA)?;
        let nominations: Vec<Nomination> = self.read_stage(checkpoint::CLEAN_AWARDS)?;

        let records = film_ledger::create_final_dataset(&movies, &financial, &nominations);
        self.write_stage(checkpoint::FINAL_DATASET, &records)?;
        Ok(records)
    }

    /// Every stage in order, from the raw awards file to the final dataset.
    pub async fn run_all(
        &self,
        awards: &Path,
        overrides: Option<&Path>,
    ) -> EtlResult<Vec<FilmRecord>> {
        // Fail before any scraping if the API stage cannot run.
        self.config.require_api_key()?;

        let nominations = self.clean_awards(awards)?;
        tracing::info!("stage 1/8: {} nominations kept", nominations.len());

        let report = self.movie_info().await?;
        tracing::info!("stage 2/8: movie info {report}");

        let report = self.box_office(None).await?;
        tracing::info!("stage 3/8: box office {report}");

        let report = self.budgets().await?;
        tracing::info!("stage 4/8: budgets {report}");

        let boxoffice = self.combine_box_office()?;
        tracing::info!("stage 5/8: {} films with box office", boxoffice.len());

        let budgets = self.clean_budget(overrides)?;
        tracing::info!("stage 6/8: {} budgets cleaned", budgets.len());

        let financial = self.financials()?;
        tracing::info!("stage 7/8: {} films with financials", financial.len());

        let records = self.final_dataset()?;
        tracing::info!(
            "stage 8/8: final dataset written to {}",
            self.config.checkpoint(checkpoint::FINAL_DATASET).display()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigOverrides;

    fn pipeline(dir: &Path) -> Pipeline {
        let overrides = ConfigOverrides {
            out_dir: Some(dir.to_path_buf()),
            ..Default::default()
        };
        let config = EtlConfig::resolve_with(overrides, |_| None).unwrap();
        Pipeline::new(config).unwrap()
    }

    #[test]
    fn test_missing_checkpoint_names_producer() {
        let dir = tempfile::tempdir().unwrap();
        let err = pipeline(dir.path()).financials().unwrap_err();
        match err {
            EtlError::MissingCheckpoint { stage, .. } => assert_eq!(stage, "clean-budget"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_run_all_needs_api_key_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let awards = dir.path().join("awards.csv");
        std::fs::write(&awards, "Year,Category,FilmId\n2019,BEST PICTURE,tt1\n").unwrap();

        let result = tokio_test::block_on(pipeline(dir.path()).run_all(&awards, None));
        assert!(matches!(result, Err(EtlError::MissingApiKey)));
        assert!(!dir.path().join(checkpoint::CLEAN_AWARDS).exists());
    }

    #[test]
    fn test_revenue_checkpoints() {
        assert_eq!(revenue_checkpoint(Market::Domestic), "domestic_boxoffice.csv");
        assert_eq!(producing_stage(revenue_checkpoint(Market::Worldwide)), "box-office");
    }
}
