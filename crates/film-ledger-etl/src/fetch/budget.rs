//! Production budget from the budget site's movie summary page.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use film_ledger::{parse_budget_text, title_slug, Amount};

use super::{fetch_page, FetchOutcome};
use crate::config::base_str;
use crate::http::HttpClient;

const BUDGET_LABEL: &str = "Production Budget:";

/// Text of the cell next to the `Production Budget:` label, if any.
///
/// The label is a `<b>` inside a `<td>`; the value is the next `<td>` in the
/// same row, e.g. `"$2,000,000 (Estimated)"`.
pub fn find_budget_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let Ok(bold) = Selector::parse("b") else {
        return None;
    };

    document
        .select(&bold)
        .filter(|b| b.text().collect::<String>().trim() == BUDGET_LABEL)
        .find_map(|b| {
            let cell = b
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "td")?;
            let value = cell
                .next_siblings()
                .filter_map(ElementRef::wrap)
                .find(|e| e.value().name() == "td")?;
            Some(value.text().collect::<String>().trim().to_string())
        })
}

/// Client for the budget site. Pages are addressed by normalized title.
#[derive(Clone)]
pub struct BudgetClient {
    http: HttpClient,
    base: String,
}

impl BudgetClient {
    pub fn new(http: HttpClient, base: &Url) -> Self {
        Self {
            http,
            base: base_str(base).to_string(),
        }
    }

    pub fn movie_url(&self, title: &str) -> String {
        format!("{}/movie/{}", self.base, title_slug(title))
    }

    /// Fetch the production budget in whole currency units.
    pub async fn fetch(&self, title: &str) -> FetchOutcome<u64> {
        let url = self.movie_url(title);
        fetch_page(&self.http, &url, title)
            .await
            .and_then(|body| match find_budget_text(&body) {
                None => {
                    tracing::debug!("budget not found for {title}");
                    FetchOutcome::NotFound
                }
                Some(text) => match parse_budget_text(&text) {
                    Amount::Value(budget) => {
                        tracing::debug!("budget found for {title}: {budget}");
                        FetchOutcome::Found(budget)
                    }
                    Amount::Blank | Amount::Invalid => {
                        tracing::warn!("unreadable budget for {title}: '{text}'");
                        FetchOutcome::NotFound
                    }
                },
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(cells: &str) -> String {
        format!("<html><body><table><tr>{cells}</tr></table></body></html>")
    }

    #[test]
    fn test_budget_cell_next_to_label() {
        let html = page(
            r#"<td class="label"><b>Production Budget:</b></td><td>$11,400,000 (Estimated)</td>"#,
        );
        assert_eq!(
            find_budget_text(&html).as_deref(),
            Some("$11,400,000 (Estimated)")
        );
    }

    #[test]
    fn test_label_nested_deeper_in_cell() {
        let html = page(r#"<td><span><b>Production Budget:</b></span></td><td> $55,000,000 </td>"#);
        assert_eq!(find_budget_text(&html).as_deref(), Some("$55,000,000"));
    }

    #[test]
    fn test_missing_label_or_value() {
        assert_eq!(find_budget_text(&page("<td><b>Running Time:</b></td><td>132 minutes</td>")), None);
        assert_eq!(find_budget_text(&page("<td><b>Production Budget:</b></td>")), None);
        assert_eq!(find_budget_text("<b>Production Budget:</b> $5"), None);
    }

    #[test]
    fn test_movie_url_uses_slug() {
        let http = HttpClient::new(std::time::Duration::from_secs(1)).unwrap();
        let base = Url::parse("https://www.the-numbers.com").unwrap();
        let client = BudgetClient::new(http, &base);
        assert_eq!(
            client.movie_url("Star Wars: Episode VII"),
            "https://www.the-numbers.com/movie/Star-Wars--Episode-VII"
        );
    }
}
