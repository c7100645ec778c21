use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use std::io::{ Cursor, Read };
use tar::Archive;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ AurError, Result };
use crate::package_info::PackageInfo;

/// Decompressed snapshot tarball of a package, ready to be unpacked.
pub type PackageArchive = Archive<Cursor<Vec<u8>>>;

/// A fully read HTTP response.
pub struct HttpResponse {
    pub status: u16,
    pub reason: String,
    pub body: Vec<u8>,
}

/// Performs a single blocking GET and reads the whole body.
pub trait Transport {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(AurError::ClientSetup)?;

        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        let transport_error = |source| AurError::Transport { url: url.to_string(), source };

        let response = self.client.get(url).send().map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().map_err(transport_error)?.to_vec();

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            body,
        })
    }
}

// Every RPC answer is wrapped in this.
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    results: Value,
}

pub struct AurClient<T = HttpTransport> {
    transport: T,
    config: ClientConfig,
}

impl AurClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(AurClient { transport, config })
    }
}

impl<T: Transport> AurClient<T> {
    #[allow(dead_code)]
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        AurClient { transport, config }
    }

    /// Look up a single package by exact name.
    pub fn fetch_package_info(&self, name: &str) -> Result<PackageInfo> {
        let results = self.query("info", name)?;
        Ok(serde_json::from_value(results)?)
    }

    /// Search packages by keyword, most voted first.
    pub fn search_packages(&self, term: &str) -> Result<Vec<PackageInfo>> {
        let results = self.query("search", term)?;
        let mut packages: Vec<PackageInfo> = serde_json::from_value(results)?;

        // Stable, so equally voted packages keep the order the AUR sent them in
        packages.sort_by(|a, b| b.num_votes.cmp(&a.num_votes));

        Ok(packages)
    }

    /// Download the snapshot tarball of a package and decompress it.
    pub fn fetch_package_archive(&self, name: &str) -> Result<PackageArchive> {
        let info = self.fetch_package_info(name)?;
        if info.download_path.is_empty() {
            return Err(AurError::MissingDownloadPath { name: name.to_string() });
        }

        let url = self.config.download_url(&info.download_path);
        let compressed = self.request(&url)?;
        if self.config.debug {
            debug!("response: {} bytes of archive data", compressed.len());
        }

        let mut tarball = Vec::new();
        GzDecoder::new(compressed.as_slice())
            .read_to_end(&mut tarball)
            .map_err(|source| AurError::Decompression { name: name.to_string(), source })?;

        Ok(Archive::new(Cursor::new(tarball)))
    }

    /// Issue an RPC query and return the `results` of a response of the expected type.
    fn query(&self, kind: &'static str, arg: &str) -> Result<Value> {
        let url = self.config.query_url(kind, arg);
        let body = self.request(&url)?;
        if self.config.debug {
            debug!("response:\n{}", String::from_utf8_lossy(&body));
        }

        let envelope: Envelope = serde_json::from_slice(&body)?;
        if envelope.kind == "error" {
            let message = match envelope.results {
                Value::String(message) => message,
                other => other.to_string(),
            };
            return Err(AurError::Remote(message));
        }
        if envelope.kind != kind {
            return Err(AurError::UnexpectedResponseType { got: envelope.kind, want: kind });
        }

        Ok(envelope.results)
    }

    fn request(&self, url: &str) -> Result<Vec<u8>> {
        if self.config.debug {
            debug!("GET: \"{}\"", url);
        }

        let response = self.transport.get(url)?;
        if response.status != 200 {
            return Err(AurError::HttpStatus {
                status: response.status,
                reason: response.reason,
                url: url.to_string(),
            });
        }

        Ok(response.body)
    }
}
