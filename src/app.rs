use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::{Configuration, Transmission};
use crate::error::{Error, Result};
use crate::models::{Listing, Movie, Torrent, TransferJob};
use crate::quality::QualityRanks;
use crate::transmission::{Submitted, TransferApi, TransmissionClient};
use crate::yts::{CatalogApi, YtsClient};

#[derive(Clone)]
pub struct App {
    pub catalog: Arc<dyn CatalogApi>,
    pub transfer: Arc<dyn TransferApi>,
    pub ranks: QualityRanks,
    pub transmission: Transmission,
}

/// How the user points at a movie in the latest listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieSelector {
    /// Position in the freshly fetched listing. The catalog is sorted by
    /// recency, so the same position can name a different movie later.
    Index(usize),
    /// Catalog id, stable across fetches.
    Id(u64),
}

impl fmt::Display for MovieSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieSelector::Index(i) => write!(f, "index {i}"),
            MovieSelector::Id(id) => write!(f, "id {id}"),
        }
    }
}

/// A movie and the torrent chosen for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub movie: Movie,
    pub torrent: Torrent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dispatched {
    pub movie: Movie,
    pub torrent: Torrent,
    pub submitted: Submitted,
}

impl App {
    pub fn from_config(config: &Configuration, debug: bool) -> Result<Self> {
        Ok(Self {
            catalog: Arc::new(YtsClient::new(&config.catalog.base_url)?),
            transfer: Arc::new(TransmissionClient::new(&config.transmission, debug)?),
            ranks: config.ranks(),
            transmission: config.transmission.clone(),
        })
    }

    pub async fn list(&self) -> Result<Listing> {
        self.catalog.fetch_latest_movies().await
    }

    /// Fetches the listing, picks the best torrent of the selected movie and
    /// queues it on Transmission.
    pub async fn download(&self, selector: MovieSelector) -> Result<Dispatched> {
        let pick = self.pick(selector).await?;
        self.dispatch(pick).await
    }

    /// Everything up to the hand-off: config check, fetch, movie and torrent
    /// selection. Nothing is sent to Transmission.
    pub async fn pick(&self, selector: MovieSelector) -> Result<Pick> {
        self.transmission.ensure_configured()?;

        let listing = self.catalog.fetch_latest_movies().await?;
        let movie = select_movie(&listing, selector)?;
        let torrent = self
            .ranks
            .select_best(&movie.torrents)
            .filter(|t| !t.url.trim().is_empty())
            .ok_or_else(|| Error::NothingToDownload {
                title: movie.title.clone(),
            })?;
        debug!(
            quality = %torrent.quality,
            size = %torrent.size,
            url = %torrent.url,
            "Selected torrent"
        );
        Ok(Pick {
            movie: movie.clone(),
            torrent: torrent.clone(),
        })
    }

    pub async fn dispatch(&self, pick: Pick) -> Result<Dispatched> {
        let job = TransferJob {
            url: pick.torrent.url.clone(),
            download_dir: self.transmission.destination_path.clone(),
        };
        let submitted = self.transfer.submit(&job).await?;
        info!("Queued {} on transmission", pick.movie.title);
        Ok(Dispatched {
            movie: pick.movie,
            torrent: pick.torrent,
            submitted,
        })
    }
}

pub fn select_movie(listing: &Listing, selector: MovieSelector) -> Result<&Movie> {
    let movies = listing.movies();
    let found = match selector {
        MovieSelector::Index(i) => movies.get(i),
        MovieSelector::Id(id) => movies.iter().find(|m| m.id == id),
    };
    found.ok_or_else(|| Error::MovieNotFound {
        selector: selector.to_string(),
        available: movies.len(),
    })
}
