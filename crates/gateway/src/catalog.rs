//! Asset catalog: where the gateway gets its asset records from.
//!
//! The catalog file is either a bare list of assets or a document with an
//! `assets` key, in YAML or JSON:
//!
//! ```yaml
//! assets:
//!   - id: clx9f2k1
//!     name: web-01
//!     ip: 10.20.1.10
//!     status: ACTIVE
//!     itemType:
//!       name: Web Server
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use blokhouse_export::{data_bag_slug, Asset};
use thiserror::Error;
use tokio::fs;
use tracing::debug;

/// Errors that can occur while loading assets.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML catalog could not be parsed.
    #[error("Failed to parse YAML catalog: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON catalog could not be parsed.
    #[error("Failed to parse JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither YAML nor JSON.
    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Top level is neither a list nor a document with an `assets` key.
    #[error("Catalog must be a list of assets or a document with an `assets` key")]
    InvalidDocument,
}

/// Source of asset records.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// List every asset, in storage order.
    async fn list_assets(&self) -> Result<Vec<Asset>, CatalogError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Catalog backed by a YAML or JSON file, re-read on every call.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    path: PathBuf,
}

impl FileCatalog {
    /// Create a catalog reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AssetSource for FileCatalog {
    async fn list_assets(&self) -> Result<Vec<Asset>, CatalogError> {
        let format = Format::from_path(&self.path)
            .ok_or_else(|| CatalogError::UnsupportedFormat(self.path.clone()))?;

        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Catalog file missing, serving no assets");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(CatalogError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let assets = parse(&contents, format)?;
        debug!(path = %self.path.display(), count = assets.len(), "Loaded asset catalog");
        Ok(assets)
    }
}

/// Parse a catalog document.
///
/// The top-level shape is matched on the untyped value, then the asset list
/// is deserialized on its own and its errors name the failing field.
fn parse(contents: &str, format: Format) -> Result<Vec<Asset>, CatalogError> {
    match format {
        Format::Yaml => parse_yaml(contents),
        Format::Json => parse_json(contents),
    }
}

fn parse_yaml(contents: &str) -> Result<Vec<Asset>, CatalogError> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let list = match serde_yaml::from_str::<serde_yaml::Value>(contents)? {
        serde_yaml::Value::Null => return Ok(Vec::new()),
        list @ serde_yaml::Value::Sequence(_) => list,
        serde_yaml::Value::Mapping(mut doc) => {
            doc.remove("assets").ok_or(CatalogError::InvalidDocument)?
        }
        _ => return Err(CatalogError::InvalidDocument),
    };
    Ok(serde_yaml::from_value(list)?)
}

fn parse_json(contents: &str) -> Result<Vec<Asset>, CatalogError> {
    let list = match serde_json::from_str::<serde_json::Value>(contents)? {
        list @ serde_json::Value::Array(_) => list,
        serde_json::Value::Object(mut doc) => {
            doc.remove("assets").ok_or(CatalogError::InvalidDocument)?
        }
        _ => return Err(CatalogError::InvalidDocument),
    };
    Ok(serde_json::from_value(list)?)
}

/// Fixed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    assets: Vec<Asset>,
}

impl StaticCatalog {
    /// Create a catalog serving `assets`.
    #[must_use]
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }
}

#[async_trait]
impl AssetSource for StaticCatalog {
    async fn list_assets(&self) -> Result<Vec<Asset>, CatalogError> {
        Ok(self.assets.clone())
    }
}

/// Resolve a node query to an asset by exact name or IP address.
///
/// The first matching asset in catalog order wins.
#[must_use]
pub fn find_node<'a>(assets: &'a [Asset], query: &str) -> Option<&'a Asset> {
    assets
        .iter()
        .find(|a| a.name == query || a.ip() == Some(query))
}

/// Resolve a data bag item id to the asset it was slugged from.
#[must_use]
pub fn find_data_bag_item<'a>(assets: &'a [Asset], id: &str) -> Option<&'a Asset> {
    assets.iter().find(|a| data_bag_slug(&a.name) == id)
}
