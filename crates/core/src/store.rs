//! Catalog persistence.
//!
//! The catalog is stored as a single JSON document with an explicit,
//! versioned layout. Records are separate from the domain types so the
//! on-disk format can evolve independently.

use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::info;

use crate::{
    catalog::Catalog,
    models::{Business, Ware},
};

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

/// Directory under the user's data directory holding the catalog.
pub const DEFAULT_DATA_DIR: &str = "shopledger";

/// File name of the catalog inside [`DEFAULT_DATA_DIR`].
pub const DEFAULT_CATALOG_FILE: &str = "catalog.json";

/// Top-level document stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Layout version.
    pub version: u32,
    /// When the document was written.
    pub saved_at: DateTime<Utc>,
    /// Businesses in listing order.
    #[serde(default)]
    pub businesses: Vec<BusinessRecord>,
}

/// Persisted form of a business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessRecord {
    /// Business name.
    pub name: String,
    /// Cash on hand.
    pub money_available: f64,
    /// Wares in listing order.
    #[serde(default)]
    pub wares: Vec<WareRecord>,
}

/// Persisted form of a ware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WareRecord {
    /// Ware name.
    pub name: String,
    /// Cost basis per unit.
    pub buy_price: f64,
    /// Active markdown fraction.
    #[serde(default)]
    pub discount: f64,
    /// Units on hand.
    #[serde(default)]
    pub quantity: u32,
}

impl CatalogFile {
    /// Snapshot a catalog into its on-disk form.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            version: SCHEMA_VERSION,
            saved_at: Utc::now(),
            businesses: catalog.iter().map(BusinessRecord::from).collect(),
        }
    }

    /// Validate the document and rebuild the catalog.
    pub fn into_catalog(self) -> Result<Catalog> {
        if self.version != SCHEMA_VERSION {
            bail!(
                "unsupported catalog version {} (expected {SCHEMA_VERSION})",
                self.version
            );
        }

        let mut catalog = Catalog::new();
        for record in self.businesses {
            let business = Business::try_from(record)?;
            let name = business.name.clone();
            if catalog.insert(business).is_some() {
                bail!("duplicate business '{name}'");
            }
        }
        Ok(catalog)
    }
}

impl From<&Business> for BusinessRecord {
    fn from(business: &Business) -> Self {
        Self {
            name: business.name.clone(),
            money_available: business.money_available,
            wares: business.wares.values().map(WareRecord::from).collect(),
        }
    }
}

impl From<&Ware> for WareRecord {
    fn from(ware: &Ware) -> Self {
        Self {
            name: ware.name.clone(),
            buy_price: ware.buy_price,
            discount: ware.discount,
            quantity: ware.quantity,
        }
    }
}

impl TryFrom<BusinessRecord> for Business {
    type Error = anyhow::Error;

    fn try_from(record: BusinessRecord) -> Result<Self> {
        if record.name.trim().is_empty() {
            bail!("business with an empty name");
        }
        if !record.money_available.is_finite() {
            bail!("business '{}' has a non-finite balance", record.name);
        }

        let mut wares = BTreeMap::new();
        for ware in record.wares {
            let ware = Ware::try_from(ware)
                .with_context(|| format!("invalid ware in business '{}'", record.name))?;
            let name = ware.name.clone();
            if wares.insert(name.clone(), ware).is_some() {
                bail!("duplicate ware '{name}' in business '{}'", record.name);
            }
        }

        Ok(Business {
            name: record.name,
            money_available: record.money_available,
            wares,
        })
    }
}

impl TryFrom<WareRecord> for Ware {
    type Error = anyhow::Error;

    fn try_from(record: WareRecord) -> Result<Self> {
        if record.name.trim().is_empty() {
            bail!("ware with an empty name");
        }
        if !record.buy_price.is_finite() || record.buy_price < 0.0 {
            bail!("ware '{}' has invalid buy price {}", record.name, record.buy_price);
        }
        if !(0.0..1.0).contains(&record.discount) {
            bail!("ware '{}' has invalid discount {}", record.name, record.discount);
        }
        Ok(Ware {
            name: record.name,
            buy_price: record.buy_price,
            discount: record.discount,
            quantity: record.quantity,
        })
    }
}

/// Reads and writes the catalog file.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    /// Store backed by the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location under the user's data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DATA_DIR)
            .join(DEFAULT_CATALOG_FILE)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the catalog. A missing file yields an empty catalog.
    pub fn load(&self) -> Result<Catalog> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no catalog on disk; starting empty");
            return Ok(Catalog::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read catalog {}", self.path.display()))?;
        let file: CatalogFile = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse catalog {}", self.path.display()))?;
        let catalog = file
            .into_catalog()
            .with_context(|| format!("invalid catalog {}", self.path.display()))?;
        info!(path = %self.path.display(), businesses = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    /// Overwrite the file with the full catalog.
    pub fn save(&self, catalog: &Catalog) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;

        let serialised = serde_json::to_vec_pretty(&CatalogFile::from_catalog(catalog))
            .context("failed to serialize catalog")?;

        let mut temp = NamedTempFile::new_in(&parent)
            .with_context(|| format!("failed to create temporary file in {}", parent.display()))?;
        temp.write_all(&serialised)
            .context("failed to write catalog contents")?;
        temp.persist(&self.path)
            .map_err(|err| anyhow!(err.error))
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        info!(path = %self.path.display(), businesses = catalog.len(), "catalog saved");
        Ok(())
    }
}
