//! Joins across the per-source tables, keyed on `filmid`.
//!
//! Every join indexes its right-hand table by the first row seen for each
//! id; later duplicates are ignored rather than multiplied.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::money::parse_amount;
use crate::overrides::BudgetOverrides;
use crate::types::{
    BoxOfficeRecord, BudgetRow, CleanBudget, FetchStatus, FilmRecord, FinancialRecord,
    LedgerError, LedgerResult, Market, MovieInfo, Nomination, RevenueRow, Roi,
};

/// Index rows by id, first occurrence wins.
fn index_by_id<'a, T>(rows: &'a [T], id: impl Fn(&T) -> &str) -> HashMap<&'a str, &'a T> {
    let mut index = HashMap::with_capacity(rows.len());
    for row in rows {
        index.entry(id(row)).or_insert(row);
    }
    index
}

/// Coerce a scraped revenue cell to whole currency units. Empty is zero.
fn coerce_revenue(row: Option<&RevenueRow>, market: Market) -> LedgerResult<u64> {
    let Some(row) = row else { return Ok(0) };
    let raw = row.revenue.as_deref().unwrap_or_default();
    parse_amount(raw).or_zero().ok_or_else(|| LedgerError::Coercion {
        column: market.column().to_string(),
        filmid: row.filmid.clone(),
        value: raw.to_string(),
    })
}

/// Outer-join the three revenue tables on `filmid`.
///
/// Every id present in any input appears once in the output, ordered by id,
/// except ids with a `Failed` row in any table: their revenue is unknown,
/// so they are left out rather than counted as zero. The title comes from
/// the domestic table only. Revenue text must reduce to digits once `$` and
/// `,` are stripped.
pub fn create_boxoffice_dataset(
    domestic: &[RevenueRow],
    international: &[RevenueRow],
    worldwide: &[RevenueRow],
) -> LedgerResult<Vec<BoxOfficeRecord>> {
    let domestic_idx = index_by_id(domestic, |r| r.filmid.as_str());
    let international_idx = index_by_id(international, |r| r.filmid.as_str());
    let worldwide_idx = index_by_id(worldwide, |r| r.filmid.as_str());

    let failed: HashSet<&str> = [&domestic_idx, &international_idx, &worldwide_idx]
        .into_iter()
        .flat_map(|idx| idx.values())
        .filter(|row| row.status == FetchStatus::Failed)
        .map(|row| row.filmid.as_str())
        .collect();

    let ids: BTreeSet<&str> = domestic_idx
        .keys()
        .chain(international_idx.keys())
        .chain(worldwide_idx.keys())
        .copied()
        .collect();

    let mut records = Vec::with_capacity(ids.len());
    for id in ids {
        if failed.contains(id) {
            tracing::warn!("{id}: box office page could not be read, left out of the dataset");
            continue;
        }
        let dom = domestic_idx.get(id).copied();
        let intl = international_idx.get(id).copied();
        let world = worldwide_idx.get(id).copied();

        records.push(BoxOfficeRecord {
            filmid: id.to_string(),
            title: dom.and_then(|r| r.title.clone()),
            domestic_boxoffice: coerce_revenue(dom, Market::Domestic)?,
            international_boxoffice: coerce_revenue(intl, Market::International)?,
            worldwide_boxoffice: coerce_revenue(world, Market::Worldwide)?,
        });
    }

    tracing::info!(
        "box office dataset: {} films ({} left out after failed fetches)",
        records.len(),
        failed.len()
    );
    Ok(records)
}

/// Apply manual overrides to scraped budgets.
///
/// An override (matched on the scraped title) wins over the scraped value;
/// with neither, the budget is zero. Titles are lower-cased on output.
pub fn clean_budget(budgets: &[BudgetRow], overrides: &BudgetOverrides) -> Vec<CleanBudget> {
    let mut overridden = 0usize;
    let cleaned: Vec<CleanBudget> = budgets
        .iter()
        .map(|row| {
            let manual = row.title.as_deref().and_then(|t| overrides.get(t));
            if manual.is_some() {
                overridden += 1;
            }
            CleanBudget {
                filmid: row.filmid.clone(),
                title: row.title.as_ref().map(|t| t.to_lowercase()),
                budget: manual.or(row.budget).unwrap_or(0),
            }
        })
        .collect();

    tracing::info!(
        "cleaned {} budgets ({} from manual overrides)",
        cleaned.len(),
        overridden
    );
    cleaned
}

/// Inner-join budgets with box office on `filmid` and derive ROI.
///
/// Films missing from either side are dropped. Output follows box office
/// order.
pub fn create_financial_data(
    budgets: &[CleanBudget],
    boxoffice: &[BoxOfficeRecord],
) -> Vec<FinancialRecord> {
    let budget_idx = index_by_id(budgets, |b| b.filmid.as_str());

    let records: Vec<FinancialRecord> = boxoffice
        .iter()
        .filter_map(|bo| {
            let budget = budget_idx.get(bo.filmid.as_str())?.budget;
            Some(FinancialRecord {
                filmid: bo.filmid.clone(),
                title: bo.title.clone(),
                domestic_boxoffice: bo.domestic_boxoffice,
                international_boxoffice: bo.international_boxoffice,
                worldwide_boxoffice: bo.worldwide_boxoffice,
                budget,
                roi: Roi::compute(bo.worldwide_boxoffice, budget),
            })
        })
        .collect();

    let undefined = records.iter().filter(|r| r.roi == Roi::Undefined).count();
    tracing::info!(
        "financial data: {} films ({} with undefined ROI)",
        records.len(),
        undefined
    );
    records
}

/// Join metadata, financials and nominations into the final dataset.
///
/// Films need all three sources to appear. A film nominated in several
/// kept categories yields one row per nomination. Genre and country keep
/// their first listed value only.
pub fn create_final_dataset(
    movies: &[MovieInfo],
    financial: &[FinancialRecord],
    nominations: &[Nomination],
) -> Vec<FilmRecord> {
    let financial_idx = index_by_id(financial, |f| f.filmid.as_str());
    let mut nominations_by_film: HashMap<&str, Vec<&Nomination>> = HashMap::new();
    for nomination in nominations {
        nominations_by_film
            .entry(nomination.filmid.as_str())
            .or_default()
            .push(nomination);
    }

    let mut records = Vec::new();
    for movie in movies {
        let Some(money) = financial_idx.get(movie.filmid.as_str()) else {
            continue;
        };
        let Some(film_nominations) = nominations_by_film.get(movie.filmid.as_str()) else {
            continue;
        };

        for nomination in film_nominations {
            records.push(FilmRecord {
                filmid: movie.filmid.clone(),
                title: movie.title.clone(),
                runtime: movie.runtime.clone(),
                genre: primary_value(movie.genre.as_deref()),
                director: movie.director.clone(),
                actors: movie.actors.clone(),
                language: movie.language.clone(),
                country: primary_value(movie.country.as_deref()),
                imdb_rating: movie.imdb_rating,
                metascore: movie.metascore.clone(),
                imdb_votes: movie.imdb_votes.clone(),
                worldwide_boxoffice: money.worldwide_boxoffice,
                budget: money.budget,
                roi: money.roi,
                year: nomination.year,
                winner: nomination.winner,
                category: nomination.category.clone(),
            });
        }
    }

    tracing::info!("final dataset: {} rows", records.len());
    records
}

/// First comma-separated value, trimmed: `"Drama, Thriller"` → `"Drama"`.
pub fn primary_value(list: Option<&str>) -> Option<String> {
    let first = list?.split(',').next()?.trim();
    Some(first.to_string())
}
