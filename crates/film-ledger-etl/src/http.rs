//! Async HTTP client wrapping reqwest.
//!
//! One shared client for every fetcher: a fixed timeout, a browser-like
//! user agent, and at most five redirects. Requests are never retried.

use std::time::Duration;

use crate::error::EtlResult;

/// Response from an HTTP GET request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Final URL after redirects, query string included.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// HTTP client shared by the fetchers. Cheap to clone.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub const USER_AGENT: &'static str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                                          AppleWebKit/537.36 (KHTML, like Gecko) \
                                          Chrome/131.0.0.0 Safari/537.36";

    pub fn new(timeout: Duration) -> EtlResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(Self::USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// GET a URL and read the whole body.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        Self::read(self.client.get(url).send().await?).await
    }

    /// GET a URL with URL-encoded query parameters.
    pub async fn get_with_query(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<HttpResponse, reqwest::Error> {
        Self::read(self.client.get(url).query(query).send().await?).await
    }

    async fn read(resp: reqwest::Response) -> Result<HttpResponse, reqwest::Error> {
        let status = resp.status().as_u16();
        let url = resp.url().to_string();
        let body = resp.text().await?;

        Ok(HttpResponse { url, status, body })
    }
}
