use image::DynamicImage;
use log::*;
use reqwest::blocking::{Client, Response};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File the map image is written to when the caller does not pick one
pub const DEFAULT_MAP_FILE: &str = "map.png";

#[derive(Debug, Error)]
pub enum MapError {
    /// The map service answered with a non-success status
    #[error("Request execution: {status} ({reason}) on {url}")]
    Request {
        status: u16,
        reason: String,
        url: String,
    },

    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode map image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, MapError>;

/// Query parameters for a static map request, sent in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapRequest {
    params: Vec<(String, String)>,
}

impl MapRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary parameter; a repeated key replaces the earlier value
    pub fn param(mut self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some(existing) => existing.1 = value,
            None => self.params.push((key.to_string(), value)),
        }
        self
    }

    /// Map center as `"<lon>,<lat>"`
    pub fn center(self, ll: impl Into<String>) -> Self {
        self.param("ll", ll)
    }

    /// Viewport span as `"<dx>,<dy>"`
    pub fn span(self, spn: impl Into<String>) -> Self {
        self.param("spn", spn)
    }

    /// Layer selector, e.g. `"map"`
    pub fn layer(self, layer: impl Into<String>) -> Self {
        self.param("l", layer)
    }

    /// Point marker at `"<lon>,<lat>"` drawn with the given style token
    pub fn marker(self, ll: &str, style: &str) -> Self {
        self.param("pt", format!("{},{}", ll, style))
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// Static map image API client
pub struct StaticMapAPI {
    client: Client,
    base_url: String,
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(MapError::Request {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        url: response.url().to_string(),
    })
}

/// Write image bytes to `path`, creating or truncating it
pub fn persist_image(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a persisted map image back from disk
pub fn load_image(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl StaticMapAPI {
    /// Create a new StaticMapAPI instance
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.to_string(),
        })
    }

    /// Fetch the raw response body for a map request
    pub fn fetch_bytes(&self, request: &MapRequest) -> Result<Vec<u8>> {
        info!("Requesting map from {} with {:?}", self.base_url, request.params());
        let response = self.client.get(&self.base_url).query(request.params()).send()?;
        let response = check_status(response)?;
        let bytes = response.bytes()?;
        info!("Received {} bytes of map image", bytes.len());
        Ok(bytes.to_vec())
    }

    /// Download the map and write it to `path`
    pub fn save_map_image(&self, request: &MapRequest, path: &Path) -> Result<()> {
        let bytes = self.fetch_bytes(request)?;
        persist_image(path, &bytes)?;
        info!("Saved map to {:?}", path);
        Ok(())
    }

    /// Download the map and decode it in memory without touching disk
    pub fn fetch_map_image(&self, request: &MapRequest) -> Result<DynamicImage> {
        let bytes = self.fetch_bytes(request)?;
        Ok(image::load_from_memory(&bytes)?)
    }
}
