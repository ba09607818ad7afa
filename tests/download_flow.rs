use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use yts::app::{App, MovieSelector};
use yts::config::Transmission;
use yts::models::{Listing, Movie, Torrent, TransferJob};
use yts::quality::QualityRanks;
use yts::transmission::{Submitted, TorrentInfo, TransferApi};
use yts::yts::CatalogApi;
use yts::Error;

struct FakeCatalog {
    listing: Option<Listing>,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl CatalogApi for FakeCatalog {
    async fn fetch_latest_movies(&self) -> yts::Result<Listing> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.listing {
            Some(l) => Ok(l.clone()),
            None => Err(Error::Decode(
                serde_json::from_str::<Listing>("<html>").unwrap_err(),
            )),
        }
    }
}

#[derive(Default)]
struct FakeTransfer {
    jobs: Mutex<Vec<TransferJob>>,
}

#[async_trait::async_trait]
impl TransferApi for FakeTransfer {
    async fn submit(&self, job: &TransferJob) -> yts::Result<Submitted> {
        self.jobs.lock().unwrap().push(job.clone());
        Ok(Submitted::Added(TorrentInfo {
            id: 1,
            name: "queued".to_string(),
            hash_string: "hash".to_string(),
        }))
    }
}

fn torrent(quality: &str) -> Torrent {
    Torrent {
        url: format!("https://yts.test/torrent/download/{quality}"),
        quality: quality.to_string(),
        ..Default::default()
    }
}

fn sample_listing() -> Listing {
    let mut listing = Listing::default();
    listing.data.movies = vec![
        Movie {
            id: 501,
            title: "Recent Movie".to_string(),
            year: 2024,
            torrents: vec![torrent("720p"), torrent("2160p"), torrent("1080p")],
            ..Default::default()
        },
        Movie {
            id: 502,
            title: "Only 3D".to_string(),
            year: 2012,
            torrents: vec![torrent("3D")],
            ..Default::default()
        },
        Movie {
            id: 503,
            title: "Blank Url".to_string(),
            year: 2001,
            torrents: vec![Torrent {
                quality: "1080p".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        },
    ];
    listing
}

fn configured() -> Transmission {
    Transmission {
        user: "user".to_string(),
        pass: "pass".to_string(),
        host: "nas.local".to_string(),
        destination_path: "/srv/movies".to_string(),
        ..Transmission::default()
    }
}

fn app_with(
    listing: Option<Listing>,
    transmission: Transmission,
) -> (App, Arc<FakeCatalog>, Arc<FakeTransfer>) {
    let catalog = Arc::new(FakeCatalog {
        listing,
        calls: AtomicUsize::new(0),
    });
    let transfer = Arc::new(FakeTransfer::default());
    let app = App {
        catalog: catalog.clone(),
        transfer: transfer.clone(),
        ranks: QualityRanks::default(),
        transmission,
    };
    (app, catalog, transfer)
}

#[tokio::test]
async fn dispatches_best_quality_to_destination() {
    let (app, _, transfer) = app_with(Some(sample_listing()), configured());

    let dispatched = app
        .download(MovieSelector::Index(0))
        .await
        .expect("download");

    assert_eq!(dispatched.movie.id, 501);
    assert_eq!(dispatched.torrent.quality, "2160p");
    let jobs = transfer.jobs.lock().unwrap();
    assert_eq!(
        *jobs,
        vec![TransferJob {
            url: "https://yts.test/torrent/download/2160p".to_string(),
            download_dir: "/srv/movies".to_string(),
        }]
    );
}

#[tokio::test]
async fn selects_by_catalog_id() {
    let (app, _, transfer) = app_with(Some(sample_listing()), configured());
    let err = app.download(MovieSelector::Id(502)).await.unwrap_err();
    assert!(matches!(err, Error::NothingToDownload { ref title } if title == "Only 3D"));
    assert!(transfer.jobs.lock().unwrap().is_empty());

    let dispatched = app.download(MovieSelector::Id(501)).await.expect("by id");
    assert_eq!(dispatched.movie.title, "Recent Movie");
}

#[tokio::test]
async fn empty_url_is_nothing_to_download() {
    let (app, _, transfer) = app_with(Some(sample_listing()), configured());
    let err = app.download(MovieSelector::Index(2)).await.unwrap_err();
    assert!(matches!(err, Error::NothingToDownload { .. }));
    assert!(transfer.jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn out_of_range_index_does_not_dispatch() {
    let (app, _, transfer) = app_with(Some(sample_listing()), configured());
    let err = app.download(MovieSelector::Index(20)).await.unwrap_err();
    assert!(matches!(err, Error::MovieNotFound { available: 3, .. }));
    assert!(transfer.jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn placeholder_host_fails_before_fetching() {
    let (app, catalog, transfer) = app_with(Some(sample_listing()), Transmission::default());
    let err = app.download(MovieSelector::Index(0)).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    assert!(transfer.jobs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn list_propagates_fetch_errors() {
    let (app, _, _) = app_with(None, configured());
    assert!(matches!(app.list().await, Err(Error::Decode(_))));
    assert!(matches!(
        app.download(MovieSelector::Index(0)).await,
        Err(Error::Decode(_))
    ));
}

#[tokio::test]
async fn pick_selects_without_dispatching() {
    let (app, catalog, transfer) = app_with(Some(sample_listing()), configured());

    let pick = app.pick(MovieSelector::Index(0)).await.expect("pick");

    assert_eq!(pick.movie.title, "Recent Movie");
    assert_eq!(pick.movie.year, 2024);
    assert_eq!(pick.torrent.quality, "2160p");
    assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    assert!(transfer.jobs.lock().unwrap().is_empty());

    let dispatched = app.dispatch(pick).await.expect("dispatch");
    assert_eq!(dispatched.torrent.quality, "2160p");
    assert_eq!(transfer.jobs.lock().unwrap().len(), 1);
}
