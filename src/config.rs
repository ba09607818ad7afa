//! YAML configuration: Transmission credentials, destination directory, and
//! optional overrides for the catalog URL and quality ranking.
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::quality::QualityRanks;
use crate::yts::YTS_BASE;

pub const CONFIG_FILENAME: &str = "config.yaml";
const CONFIG_DIR: &str = ".config/yts";
const PLACEHOLDER_USER: &str = "<rpc_username>";
const PLACEHOLDER_PASS: &str = "<rpc_password>";
const PLACEHOLDER_HOST: &str = "<rpc_hostname>";
const PLACEHOLDER_DESTINATION: &str = "<path for downloads>";
const DEFAULT_PORT: u16 = 9091;
const DEFAULT_RPC_PATH: &str = "/transmission/rpc";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(skip)]
    pub file: PathBuf,
    #[serde(default)]
    pub transmission: Transmission,
    #[serde(default)]
    pub catalog: Catalog,
    #[serde(default = "default_qualities")]
    pub qualities: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transmission {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub destination_path: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub https: bool,
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_rpc_path() -> String {
    DEFAULT_RPC_PATH.to_string()
}

fn default_base_url() -> String {
    YTS_BASE.to_string()
}

fn default_qualities() -> BTreeMap<String, u32> {
    [("720p", 1), ("1080p", 2), ("2160p", 3)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

impl Default for Transmission {
    fn default() -> Self {
        Self {
            user: PLACEHOLDER_USER.to_string(),
            pass: PLACEHOLDER_PASS.to_string(),
            host: PLACEHOLDER_HOST.to_string(),
            destination_path: PLACEHOLDER_DESTINATION.to_string(),
            port: DEFAULT_PORT,
            https: false,
            rpc_path: default_rpc_path(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Transmission {
    /// Full URL of the RPC endpoint. A host may carry its own scheme and
    /// port; `port` only fills in a missing one.
    pub fn rpc_endpoint(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        let base = if host.contains("://") {
            host.to_string()
        } else {
            let scheme = if self.https { "https" } else { "http" };
            format!("{scheme}://{host}")
        };
        match Url::parse(&base) {
            Ok(mut url) => {
                if url.port().is_none() {
                    // Fails only for hosts that cannot carry a port.
                    let _ = url.set_port(Some(self.port));
                }
                url.set_path(&self.rpc_path);
                url.to_string()
            }
            Err(_) => format!("{base}:{}{}", self.port, self.rpc_path),
        }
    }

    /// Fails when the host or destination are unset or still placeholders.
    pub fn ensure_configured(&self) -> Result<()> {
        let host = self.host.trim();
        if host.is_empty() || host == PLACEHOLDER_HOST {
            return Err(Error::Config(
                "transmission.host is not set; run `yts config init` and edit the file".to_string(),
            ));
        }
        let dest = self.destination_path.trim();
        if dest.is_empty() || dest == PLACEHOLDER_DESTINATION {
            return Err(Error::Config(
                "transmission.destinationPath is not set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Configuration {
    pub fn new_default(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            transmission: Transmission::default(),
            catalog: Catalog::default(),
            qualities: default_qualities(),
        }
    }

    /// Reads the file if present. `Ok(None)` means there is no file.
    pub fn try_load(file: &Path) -> Result<Option<Self>> {
        let text = match fs::read_to_string(file) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let mut config: Configuration = serde_yaml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", file.display())))?;
        config.file = file.to_path_buf();
        Ok(Some(config))
    }

    /// Loads the file, falling back to defaults with a warning when it is
    /// missing or cannot be read.
    pub fn load(file: &Path) -> Self {
        match Self::try_load(file) {
            Ok(Some(config)) => {
                debug!("Loaded configuration from {}", file.display());
                config
            }
            Ok(None) => {
                warn!("Can't find config file {}, using defaults", file.display());
                Self::new_default(file)
            }
            Err(e) => {
                warn!("Found config but can't read it ({}), using defaults", e);
                Self::new_default(file)
            }
        }
    }

    pub fn exists(&self) -> bool {
        self.file.is_file()
    }

    pub fn ranks(&self) -> QualityRanks {
        QualityRanks::new(self.qualities.clone())
    }

    /// Writes the configuration, creating its directory readable by the
    /// owner only.
    pub fn save_to_disk(&self) -> Result<()> {
        if let Some(dir) = self.file.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_private_dir(dir)?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|e| Error::Config(e.to_string()))?;
        let mut file = open_private_file(&self.file)?;
        file.write_all(yaml.as_bytes())?;
        info!("Wrote configuration to {}", self.file.display());
        Ok(())
    }
}

/// `explicit`, else `./config.yaml` when present, else `~/.config/yts/config.yaml`.
pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let local = PathBuf::from(CONFIG_FILENAME);
    if local.is_file() {
        return local;
    }
    match env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(CONFIG_DIR).join(CONFIG_FILENAME),
        None => local,
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)?;
    Ok(())
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(unix)]
fn open_private_file(path: &Path) -> Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    let file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private_file(path: &Path) -> Result<fs::File> {
    Ok(fs::File::create(path)?)
}
