//! Core record types shared by every pipeline stage.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Box office market segment reported on a title summary page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Market {
    Domestic,
    International,
    Worldwide,
}

impl Market {
    /// All markets, in the order they appear on a summary page.
    pub const ALL: [Market; 3] = [Market::Domestic, Market::International, Market::Worldwide];

    /// Section label used by the summary page.
    pub fn label(self) -> &'static str {
        match self {
            Market::Domestic => "Domestic",
            Market::International => "International",
            Market::Worldwide => "Worldwide",
        }
    }

    /// Column name of the coerced revenue in the combined box office table.
    pub fn column(self) -> &'static str {
        match self {
            Market::Domestic => "domestic_boxoffice",
            Market::International => "international_boxoffice",
            Market::Worldwide => "worldwide_boxoffice",
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Award outcome, kept as a `yes`/`no` label for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Yes,
    No,
}

/// How the request behind a scraped cell went.
///
/// `Failed` covers error statuses and transport errors: the page was never
/// read, unlike `NotFound` where it was read and had no figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Found,
    NotFound,
    Failed,
}

/// Return on investment, `(worldwide - budget) / budget`.
///
/// A zero budget leaves the ratio undefined rather than producing an
/// infinity; it is written as an empty cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Roi {
    Ratio(f64),
    Undefined,
}

impl Roi {
    /// Compute the ratio rounded to two decimal places, ties to even.
    pub fn compute(worldwide: u64, budget: u64) -> Self {
        if budget == 0 {
            return Roi::Undefined;
        }
        let ratio = (worldwide as f64 - budget as f64) / budget as f64;
        Roi::Ratio((ratio * 100.0).round_ties_even() / 100.0)
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Roi::Ratio(v) => Some(*v),
            Roi::Undefined => None,
        }
    }
}

impl Serialize for Roi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Roi {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<f64>::deserialize(deserializer)? {
            Some(v) if v.is_finite() => Roi::Ratio(v),
            _ => Roi::Undefined,
        })
    }
}

/// Descriptive metadata for one film, as returned by the movie API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub filmid: String,
    pub title: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<f64>,
    pub metascore: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
}

/// One scraped revenue figure, still in its raw currency text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueRow {
    pub filmid: String,
    pub title: Option<String>,
    pub revenue: Option<String>,
    pub status: FetchStatus,
}

/// One scraped production budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRow {
    pub filmid: String,
    pub title: Option<String>,
    pub budget: Option<u64>,
}

/// A budget after manual overrides have been applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanBudget {
    pub filmid: String,
    pub title: Option<String>,
    pub budget: u64,
}

/// Revenue per market for one film, coerced to whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxOfficeRecord {
    pub filmid: String,
    pub title: Option<String>,
    pub domestic_boxoffice: u64,
    pub international_boxoffice: u64,
    pub worldwide_boxoffice: u64,
}

/// Box office joined with budget, plus the derived ROI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    pub filmid: String,
    pub title: Option<String>,
    pub domestic_boxoffice: u64,
    pub international_boxoffice: u64,
    pub worldwide_boxoffice: u64,
    pub budget: u64,
    #[serde(rename = "ROI")]
    pub roi: Roi,
}

/// A cleaned award nomination row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nomination {
    pub year: i32,
    #[serde(rename = "canonicalcategory")]
    pub canonical_category: Option<String>,
    pub category: String,
    pub film: Option<String>,
    pub filmid: String,
    pub winner: Winner,
}

/// A row of the final joined dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilmRecord {
    pub filmid: String,
    pub title: Option<String>,
    pub runtime: Option<String>,
    pub genre: Option<String>,
    pub director: Option<String>,
    pub actors: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<f64>,
    pub metascore: Option<String>,
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: Option<String>,
    pub worldwide_boxoffice: u64,
    pub budget: u64,
    #[serde(rename = "ROI")]
    pub roi: Roi,
    pub year: i32,
    pub winner: Winner,
    pub category: String,
}

/// Errors that can occur while reconciling tables.
#[derive(thiserror::Error, Debug)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing column '{column}' in {table}")]
    MissingColumn { table: String, column: String },

    #[error("Row {line} of {table} has {found} cells, expected {expected}")]
    RaggedRow {
        table: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: invalid year '{value}'")]
    InvalidYear { line: usize, value: String },

    #[error("Line {line}: invalid winner flag '{value}'")]
    InvalidWinner { line: usize, value: String },

    #[error("Cannot coerce {column} of {filmid}: '{value}' is not an amount")]
    Coercion {
        column: String,
        filmid: String,
        value: String,
    },
}

/// Convenience result type.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roi_rounding() {
        assert_eq!(Roi::compute(300, 100), Roi::Ratio(2.0));
        assert_eq!(Roi::compute(100, 300), Roi::Ratio(-0.67));
        assert_eq!(Roi::compute(1_000, 3), Roi::Ratio(332.33));
    }

    #[test]
    fn test_roi_rounds_half_to_even() {
        assert_eq!(Roi::compute(1_125, 1_000), Roi::Ratio(0.12));
        assert_eq!(Roi::compute(1_375, 1_000), Roi::Ratio(0.38));
        assert_eq!(Roi::compute(875, 1_000), Roi::Ratio(-0.12));
    }

    #[test]
    fn test_fetch_status_labels() {
        assert_eq!(serde_json::to_string(&FetchStatus::NotFound).unwrap(), "\"not_found\"");
        let parsed: FetchStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(parsed, FetchStatus::Failed);
    }

    #[test]
    fn test_roi_zero_budget_is_undefined() {
        assert_eq!(Roi::compute(500, 0), Roi::Undefined);
        assert_eq!(Roi::compute(0, 0).value(), None);
    }

    #[test]
    fn test_winner_labels() {
        assert_eq!(serde_json::to_string(&Winner::Yes).unwrap(), "\"yes\"");
        let parsed: Winner = serde_json::from_str("\"no\"").unwrap();
        assert_eq!(parsed, Winner::No);
    }

    #[test]
    fn test_roi_serializes_undefined_as_null() {
        assert_eq!(serde_json::to_string(&Roi::Undefined).unwrap(), "null");
        assert_eq!(serde_json::to_string(&Roi::Ratio(1.5)).unwrap(), "1.5");
        let parsed: Roi = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Roi::Undefined);
    }

    #[test]
    fn test_market_columns() {
        assert_eq!(Market::Worldwide.column(), "worldwide_boxoffice");
        assert_eq!(Market::Domestic.to_string(), "Domestic");
        assert_eq!(Market::ALL.len(), 3);
    }
}
