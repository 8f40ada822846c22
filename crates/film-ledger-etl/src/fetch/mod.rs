//! Remote fetchers: one film id in, one value or an explicit absence out.

pub mod box_office;
pub mod budget;
pub mod omdb;

pub use box_office::{BoxOfficeClient, BoxOfficeSummary};
pub use budget::BudgetClient;
pub use omdb::OmdbClient;

use film_ledger::FetchStatus;

use crate::http::HttpClient;

/// Result of a single fetch. Failures are values, not errors, so one bad
/// film never aborts a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Found(T),
    /// The page or payload was fetched but the wanted field is not there.
    NotFound,
    /// The server answered with a non-success status.
    Unavailable { status: u16 },
    /// Connection, timeout or body read failure.
    TransportError(String),
}

impl<T> FetchOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            FetchOutcome::Found(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found(_))
    }

    /// The kind of outcome, as recorded next to a scraped cell.
    pub fn status(&self) -> FetchStatus {
        match self {
            FetchOutcome::Found(_) => FetchStatus::Found,
            FetchOutcome::NotFound => FetchStatus::NotFound,
            FetchOutcome::Unavailable { .. } | FetchOutcome::TransportError(_) => {
                FetchStatus::Failed
            }
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> FetchOutcome<U>>(self, f: F) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Found(v) => f(v),
            FetchOutcome::NotFound => FetchOutcome::NotFound,
            FetchOutcome::Unavailable { status } => FetchOutcome::Unavailable { status },
            FetchOutcome::TransportError(e) => FetchOutcome::TransportError(e),
        }
    }

    /// `Found` when present, `NotFound` otherwise.
    pub fn from_option(value: Option<T>) -> Self {
        value.map_or(FetchOutcome::NotFound, FetchOutcome::Found)
    }
}

/// GET a page, turning transport failures and non-200 statuses into
/// outcomes. `what` names the film in log lines.
pub(crate) async fn fetch_page(http: &HttpClient, url: &str, what: &str) -> FetchOutcome<String> {
    match http.get(url).await {
        Ok(resp) if resp.is_ok() => {
            tracing::debug!("received {} for {what}", resp.url);
            FetchOutcome::Found(resp.body)
        }
        Ok(resp) => {
            tracing::warn!("{url} answered {} for {what}", resp.status);
            FetchOutcome::Unavailable {
                status: resp.status,
            }
        }
        Err(e) => {
            tracing::warn!("error accessing {url} for {what}: {e}");
            FetchOutcome::TransportError(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_then_keeps_failure_kind() {
        let failed: FetchOutcome<&str> = FetchOutcome::Unavailable { status: 503 };
        let mapped = failed.and_then(|s| FetchOutcome::Found(s.len()));
        assert_eq!(mapped, FetchOutcome::Unavailable { status: 503 });
    }

    #[test]
    fn test_found_helpers() {
        let outcome = FetchOutcome::Found("$1".to_string());
        assert!(outcome.is_found());
        assert_eq!(outcome.found().as_deref(), Some("$1"));
        assert_eq!(FetchOutcome::<u64>::from_option(None), FetchOutcome::NotFound);
    }

    #[test]
    fn test_failures_share_one_status() {
        assert_eq!(FetchOutcome::Found(1).status(), FetchStatus::Found);
        assert_eq!(FetchOutcome::<u8>::NotFound.status(), FetchStatus::NotFound);
        assert_eq!(
            FetchOutcome::<u8>::Unavailable { status: 503 }.status(),
            FetchStatus::Failed
        );
        assert_eq!(
            FetchOutcome::<u8>::TransportError("reset".into()).status(),
            FetchStatus::Failed
        );
    }
}
