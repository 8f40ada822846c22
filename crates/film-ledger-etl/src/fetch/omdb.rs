//! Movie metadata from an OMDb-style JSON API.

use serde::Deserialize;
use url::Url;

use film_ledger::MovieInfo;

use super::FetchOutcome;
use crate::config::base_str;
use crate::http::HttpClient;

/// The subset of the API payload the pipeline keeps.
#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Director")]
    director: Option<String>,
    #[serde(rename = "Actors")]
    actors: Option<String>,
    #[serde(rename = "Language")]
    language: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    #[serde(rename = "Metascore")]
    metascore: Option<String>,
    #[serde(rename = "imdbVotes")]
    imdb_votes: Option<String>,
}

/// `"8.6"` → `Some(8.6)`; `"N/A"` and anything unparseable → `None`.
pub fn parse_rating(raw: Option<&str>) -> Option<f64> {
    match raw?.trim() {
        "N/A" => None,
        text => text.parse().ok(),
    }
}

/// Decode an API body into movie metadata.
///
/// A payload with `"Response": "False"` is the API's way of saying the id
/// is unknown and yields `NotFound`.
pub fn parse_movie(filmid: &str, body: &str) -> FetchOutcome<MovieInfo> {
    let data: OmdbResponse = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("undecodable API payload for {filmid}: {e}");
            return FetchOutcome::TransportError(format!("invalid JSON: {e}"));
        }
    };

    if data.response.as_deref() == Some("False") {
        tracing::debug!(
            "API has no record of {filmid}: {}",
            data.error.as_deref().unwrap_or("no reason given")
        );
        return FetchOutcome::NotFound;
    }

    FetchOutcome::Found(MovieInfo {
        filmid: filmid.to_string(),
        imdb_rating: parse_rating(data.imdb_rating.as_deref()),
        title: data.title,
        runtime: data.runtime,
        genre: data.genre,
        director: data.director,
        actors: data.actors,
        language: data.language,
        country: data.country,
        metascore: data.metascore,
        imdb_votes: data.imdb_votes,
    })
}

/// Client for the movie metadata API.
#[derive(Clone)]
pub struct OmdbClient {
    http: HttpClient,
    endpoint: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(http: HttpClient, base: &Url, api_key: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: format!("{}/", base_str(base)),
            api_key: api_key.into(),
        }
    }

    /// Fetch metadata for one film id. Only a 200 is treated as success.
    pub async fn fetch(&self, filmid: &str) -> FetchOutcome<MovieInfo> {
        let query = [("apikey", self.api_key.as_str()), ("i", filmid)];
        match self.http.get_with_query(&self.endpoint, &query).await {
            Ok(resp) if resp.is_ok() => parse_movie(filmid, &resp.body),
            Ok(resp) => {
                tracing::warn!(
                    "error fetching data for {filmid}, status code: {}",
                    resp.status
                );
                FetchOutcome::Unavailable {
                    status: resp.status,
                }
            }
            Err(e) => {
                tracing::warn!("error calling the movie API for {filmid}: {e}");
                FetchOutcome::TransportError(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating(Some("8.6")), Some(8.6));
        assert_eq!(parse_rating(Some("N/A")), None);
        assert_eq!(parse_rating(Some("")), None);
        assert_eq!(parse_rating(None), None);
    }

    #[test]
    fn test_parse_movie_fields() {
        let body = r#"{
            "Title": "Parasite", "Year": "2019", "Runtime": "132 min",
            "Genre": "Drama, Thriller", "Director": "Bong Joon Ho",
            "Actors": "Song Kang-ho, Lee Sun-kyun", "Language": "Korean, English",
            "Country": "South Korea", "Metascore": "96", "imdbRating": "8.5",
            "imdbVotes": "1,000,000", "Response": "True"
        }"#;
        let movie = parse_movie("tt6751668", body).found().unwrap();
        assert_eq!(movie.filmid, "tt6751668");
        assert_eq!(movie.title.as_deref(), Some("Parasite"));
        assert_eq!(movie.genre.as_deref(), Some("Drama, Thriller"));
        assert_eq!(movie.imdb_rating, Some(8.5));
        assert_eq!(movie.imdb_votes.as_deref(), Some("1,000,000"));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let body = r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#;
        assert_eq!(parse_movie("tt0000000", body), FetchOutcome::NotFound);
    }

    #[test]
    fn test_garbage_body() {
        assert!(matches!(
            parse_movie("tt1", "<html>"),
            FetchOutcome::TransportError(_)
        ));
    }
}
