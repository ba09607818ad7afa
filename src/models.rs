use serde::{Deserialize, Deserializer, Serialize};

/// The catalog sends `null` for absent values; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// One page of `list_movies.json`.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Listing {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status_message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: ListingData,
    #[serde(rename = "@meta", deserialize_with = "null_as_default")]
    pub meta: Meta,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ListingData {
    #[serde(deserialize_with = "null_as_default")]
    pub movie_count: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub limit: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub page_number: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub movies: Vec<Movie>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Meta {
    #[serde(deserialize_with = "null_as_default")]
    pub server_time: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub server_timezone: String,
    #[serde(deserialize_with = "null_as_default")]
    pub api_version: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub execution_time: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Movie {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub imdb_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title_english: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title_long: String,
    #[serde(deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(deserialize_with = "null_as_default")]
    pub year: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub runtime: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub genres: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description_full: String,
    #[serde(deserialize_with = "null_as_default")]
    pub synopsis: String,
    #[serde(deserialize_with = "null_as_default")]
    pub yt_trailer_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub language: String,
    #[serde(deserialize_with = "null_as_default")]
    pub mpa_rating: String,
    #[serde(deserialize_with = "null_as_default")]
    pub background_image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub background_image_original: String,
    #[serde(deserialize_with = "null_as_default")]
    pub small_cover_image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub medium_cover_image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub large_cover_image: String,
    #[serde(deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(deserialize_with = "null_as_default")]
    pub torrents: Vec<Torrent>,
    #[serde(deserialize_with = "null_as_default")]
    pub date_uploaded: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_uploaded_unix: i64,
}

/// A downloadable rendition of a movie.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Torrent {
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub hash: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quality: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub seeds: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub peers: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub size: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size_bytes: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub date_uploaded: String,
    #[serde(deserialize_with = "null_as_default")]
    pub date_uploaded_unix: i64,
}

impl Listing {
    pub fn movies(&self) -> &[Movie] {
        &self.data.movies
    }
}

/// Outbound request to the transfer daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferJob {
    pub url: String,
    pub download_dir: String,
}
