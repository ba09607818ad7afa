use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong between fetching the catalog and handing a
/// torrent to Transmission.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog API could not be reached or its body could not be read.
    #[error("catalog request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The catalog body was not the JSON shape we expect.
    #[error("catalog response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),

    /// The Transmission daemon is unreachable or refused our credentials.
    #[error("cannot reach transmission at {host}: {reason}")]
    Connection { host: String, reason: String },

    /// The daemon answered but did not accept the job.
    #[error("transmission rejected the torrent: {reason}")]
    Submission { reason: String },

    #[error("nothing to download for '{title}': no torrent with a known quality")]
    NothingToDownload { title: String },

    #[error("no movie matching {selector} in the latest listing ({available} movies)")]
    MovieNotFound { selector: String, available: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
