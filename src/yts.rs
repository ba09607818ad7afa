use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::Listing;

pub const YTS_BASE: &str = "https://yts.mx/api/v2";
const LIST_MOVIES_PATH: &str = "/list_movies.json";
// Only narrows which movies are listed; every movie still carries all its torrents.
const LIST_MOVIES_QUERY: [(&str, &str); 2] = [("sort_by", "date_added"), ("quality", "1080p")];

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_latest_movies(&self) -> Result<Listing>;
}

#[derive(Debug, Clone)]
pub struct YtsClient {
    client: Client,
    base_url: String,
}

impl YtsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let user_agent = format!("yts/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(Error::Transport)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn list_movies_url(&self) -> String {
        format!("{}{LIST_MOVIES_PATH}", self.base_url)
    }
}

#[async_trait]
impl CatalogApi for YtsClient {
    async fn fetch_latest_movies(&self) -> Result<Listing> {
        let url = self.list_movies_url();
        debug!("Fetching latest movies from {}", url);
        let res = self
            .client
            .get(&url)
            .query(&LIST_MOVIES_QUERY)
            .send()
            .await
            .map_err(Error::Transport)?;
        let status = res.status();
        if !status.is_success() {
            warn!("Catalog answered {}, decoding body anyway", status);
        }
        let body = res.bytes().await.map_err(Error::Transport)?;
        let listing = decode_listing(&body)?;
        debug!(
            movies = listing.movies().len(),
            status = %listing.status,
            "Decoded listing"
        );
        Ok(listing)
    }
}

/// Decodes a `list_movies.json` body. Missing sections fall back to empty
/// defaults; anything that is not JSON of the right shape is a decode error.
pub fn decode_listing(body: &[u8]) -> Result<Listing> {
    serde_json::from_slice(body).map_err(Error::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_list_url_without_double_slash() {
        let client = YtsClient::new("https://yts.test/api/v2/").expect("client");
        assert_eq!(
            client.list_movies_url(),
            "https://yts.test/api/v2/list_movies.json"
        );
    }

    #[test]
    fn missing_data_yields_empty_listing() {
        let body = json!({ "status": "ok", "status_message": "Query was successful" });
        let listing = decode_listing(body.to_string().as_bytes()).expect("decode");
        assert_eq!(listing.status, "ok");
        assert!(listing.movies().is_empty());
    }

    #[test]
    fn missing_movies_key_yields_empty_listing() {
        let body = json!({
            "status": "ok",
            "data": { "movie_count": 0, "limit": 20, "page_number": 1 }
        });
        let listing = decode_listing(body.to_string().as_bytes()).expect("decode");
        assert_eq!(listing.data.limit, 20);
        assert!(listing.movies().is_empty());
    }

    #[test]
    fn null_values_decode_as_defaults() {
        let body = br#"{"data":{"movies":[{"id":7,"genres":null,"mpa_rating":null,"rating":null,
            "torrents":[{"quality":"720p","url":null,"type":null}]}]},"@meta":null}"#;
        let listing = decode_listing(body).expect("decode");
        let movie = &listing.movies()[0];
        assert_eq!(movie.id, 7);
        assert!(movie.genres.is_empty());
        assert_eq!(movie.mpa_rating, "");
        assert_eq!(movie.rating, 0.0);
        assert_eq!(movie.torrents[0].quality, "720p");
        assert_eq!(movie.torrents[0].url, "");
        assert_eq!(listing.meta.api_version, 0);

        let null_data = decode_listing(br#"{"status":"ok","data":null}"#).expect("decode");
        assert!(null_data.movies().is_empty());
    }

    #[test]
    fn html_body_is_a_decode_error() {
        let err = decode_listing(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn wrong_field_type_is_a_decode_error() {
        let body = json!({ "data": { "movies": [{ "id": "not-a-number" }] } });
        let err = decode_listing(body.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
