//! Box office revenue from a title's performance summary page.
//!
//! The summary page lists one section per market; each carries a label
//! (`Domestic`, `International`, `Worldwide`) and a `span.money` amount.
//! All three markets come from the same page, so one request serves all.

use scraper::{Html, Selector};
use url::Url;

use film_ledger::Market;

use super::{fetch_page, FetchOutcome};
use crate::config::base_str;
use crate::http::HttpClient;

const SECTION_SELECTOR: &str = "div.mojo-performance-summary-table div.a-section.a-spacing-none";
const MONEY_SELECTOR: &str = "span.money";

/// Raw revenue text per market, e.g. `"$20,000,000"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoxOfficeSummary {
    pub domestic: Option<String>,
    pub international: Option<String>,
    pub worldwide: Option<String>,
}

impl BoxOfficeSummary {
    pub fn get(&self, market: Market) -> Option<&str> {
        match market {
            Market::Domestic => self.domestic.as_deref(),
            Market::International => self.international.as_deref(),
            Market::Worldwide => self.worldwide.as_deref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Market::ALL.iter().all(|m| self.get(*m).is_none())
    }
}

/// Parse every market from a summary page.
pub fn parse_summary(html: &str) -> BoxOfficeSummary {
    let document = Html::parse_document(html);
    let (Ok(section_sel), Ok(money_sel)) = (
        Selector::parse(SECTION_SELECTOR),
        Selector::parse(MONEY_SELECTOR),
    ) else {
        return BoxOfficeSummary::default();
    };

    let sections: Vec<(String, Option<String>)> = document
        .select(&section_sel)
        .map(|section| {
            let text: String = section.text().collect();
            let money = section
                .select(&money_sel)
                .next()
                .map(|m| m.text().collect::<String>().trim().to_string());
            (text, money)
        })
        .collect();

    // First section mentioning the label that also has an amount.
    let amount_for = |market: Market| {
        sections
            .iter()
            .filter(|(text, _)| text.contains(market.label()))
            .find_map(|(_, money)| money.clone())
    };

    BoxOfficeSummary {
        domestic: amount_for(Market::Domestic),
        international: amount_for(Market::International),
        worldwide: amount_for(Market::Worldwide),
    }
}

/// Parse a single market from a summary page.
pub fn parse_market(html: &str, market: Market) -> Option<String> {
    let summary = parse_summary(html);
    summary.get(market).map(str::to_string)
}

/// Client for the box office site.
#[derive(Clone)]
pub struct BoxOfficeClient {
    http: HttpClient,
    base: String,
}

impl BoxOfficeClient {
    pub fn new(http: HttpClient, base: &Url) -> Self {
        Self {
            http,
            base: base_str(base).to_string(),
        }
    }

    pub fn title_url(&self, filmid: &str) -> String {
        format!("{}/title/{}/", self.base, filmid)
    }

    /// Fetch all three markets with one request.
    pub async fn fetch_summary(&self, filmid: &str) -> FetchOutcome<BoxOfficeSummary> {
        let url = self.title_url(filmid);
        fetch_page(&self.http, &url, filmid).await.and_then(|body| {
            let summary = parse_summary(&body);
            if summary.is_empty() {
                tracing::debug!("no box office figures for {filmid}");
                FetchOutcome::NotFound
            } else {
                FetchOutcome::Found(summary)
            }
        })
    }

    /// Fetch the revenue text of one market.
    pub async fn fetch(&self, filmid: &str, market: Market) -> FetchOutcome<String> {
        let url = self.title_url(filmid);
        fetch_page(&self.http, &url, filmid).await.and_then(|body| {
            let amount = parse_market(&body, market);
            if amount.is_none() {
                tracing::debug!("no {market} box office for {filmid}");
            }
            FetchOutcome::from_option(amount)
        })
    }
}
