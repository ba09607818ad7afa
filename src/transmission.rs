use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::config::Transmission;
use crate::error::{Error, Result};
use crate::models::TransferJob;

const SESSION_HEADER: &str = "X-Transmission-Session-Id";

#[async_trait]
pub trait TransferApi: Send + Sync {
    /// Queues the job on the daemon. Returns once the daemon accepted it; the
    /// download itself runs on the daemon.
    async fn submit(&self, job: &TransferJob) -> Result<Submitted>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Added(TorrentInfo),
    Duplicate(TorrentInfo),
    /// The daemon reported success without describing the torrent.
    Accepted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TorrentInfo {
    pub id: i64,
    pub name: String,
    #[serde(rename = "hashString")]
    pub hash_string: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: String,
    #[serde(default)]
    arguments: TorrentAddArguments,
}

#[derive(Debug, Default, Deserialize)]
struct TorrentAddArguments {
    #[serde(rename = "torrent-added")]
    added: Option<TorrentInfo>,
    #[serde(rename = "torrent-duplicate")]
    duplicate: Option<TorrentInfo>,
}

/// Client for the Transmission JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct TransmissionClient {
    client: Client,
    endpoint: String,
    host: String,
    user: String,
    pass: String,
    debug: bool,
}

impl TransmissionClient {
    pub fn new(settings: &Transmission, debug: bool) -> Result<Self> {
        let user_agent = format!("yts/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Connection {
                host: settings.host.clone(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: settings.rpc_endpoint(),
            host: settings.host.clone(),
            user: settings.user.clone(),
            pass: settings.pass.clone(),
            debug,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn connection_error(&self, reason: impl Into<String>) -> Error {
        Error::Connection {
            host: self.host.clone(),
            reason: reason.into(),
        }
    }

    async fn call(&self, payload: &serde_json::Value) -> Result<RpcResponse> {
        if self.debug {
            info!(target: "transmission", "POST {} {}", self.endpoint, payload);
        }

        let mut session_id: Option<String> = None;
        // A fresh daemon answers 409 once to hand out the session id.
        for _ in 0..2 {
            let mut req = self.client.post(&self.endpoint).json(payload);
            if !self.user.is_empty() {
                req = req.basic_auth(&self.user, Some(&self.pass));
            }
            if let Some(id) = &session_id {
                req = req.header(SESSION_HEADER, id);
            }
            let res = req
                .send()
                .await
                .map_err(|e| self.connection_error(e.to_string()))?;
            let status = res.status();

            if status == StatusCode::CONFLICT {
                let id = res
                    .headers()
                    .get(SESSION_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(|s| s.to_string())
                    .ok_or_else(|| self.connection_error("409 without a session id"))?;
                debug!("Got transmission session id");
                session_id = Some(id);
                continue;
            }
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return Err(self.connection_error(format!(
                    "{status}: check transmission.user and transmission.pass"
                )));
            }

            let text = res
                .text()
                .await
                .map_err(|e| self.connection_error(format!("reading response failed: {e}")))?;
            if self.debug {
                info!(target: "transmission", "{} {}", status, text);
            }
            if !status.is_success() {
                return Err(Error::Submission {
                    reason: format!("{status}: {}", text.trim()),
                });
            }
            return serde_json::from_str(&text).map_err(|e| Error::Submission {
                reason: format!("unreadable daemon reply: {e}"),
            });
        }
        Err(self.connection_error("daemon kept rejecting the session id"))
    }
}

#[async_trait]
impl TransferApi for TransmissionClient {
    async fn submit(&self, job: &TransferJob) -> Result<Submitted> {
        let payload = json!({
            "method": "torrent-add",
            "arguments": {
                "filename": job.url,
                "download-dir": job.download_dir,
            }
        });
        let response = self.call(&payload).await?;
        if response.result != "success" {
            return Err(Error::Submission {
                reason: response.result,
            });
        }
        let TorrentAddArguments { added, duplicate } = response.arguments;
        Ok(match (added, duplicate) {
            (Some(t), _) => Submitted::Added(t),
            (None, Some(t)) => Submitted::Duplicate(t),
            (None, None) => Submitted::Accepted,
        })
    }
}
