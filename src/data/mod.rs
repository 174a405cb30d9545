use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use bincode::ErrorKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Catalog;

/// Compression level used when encoding serialized catalogs.
const CATALOG_COMPRESSION_LEVEL: i32 = 19;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] Box<ErrorKind>),
    #[error("Compression error: {0}")]
    Compression(#[source] std::io::Error),
    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

/// Summary written next to a catalog bundle.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CatalogMetadata {
    pub id: String,
    pub name: String,
    pub seed: String,
    pub systems: usize,
    pub radius_parsecs: f64,
    pub generated_at_epoch: u64,
}

impl CatalogMetadata {
    pub fn describe(catalog: &Catalog, seed: &str) -> Self {
        CatalogMetadata {
            id: catalog.id.clone(),
            name: catalog.name.clone(),
            seed: seed.to_string(),
            systems: catalog.len(),
            radius_parsecs: catalog.radius,
            generated_at_epoch: current_epoch_seconds(),
        }
    }
}

pub fn serialize_catalog(catalog: &Catalog) -> Result<Vec<u8>, DataError> {
    let encoded = bincode::serialize(catalog)?;
    let mut cursor = Cursor::new(encoded);
    zstd::stream::encode_all(&mut cursor, CATALOG_COMPRESSION_LEVEL)
        .map_err(DataError::Compression)
}

pub fn deserialize_catalog(bytes: &[u8]) -> Result<Catalog, DataError> {
    let mut cursor = Cursor::new(bytes);
    let decoded = zstd::stream::decode_all(&mut cursor).map_err(DataError::Compression)?;
    let catalog: Catalog = bincode::deserialize(&decoded)?;
    Ok(catalog)
}

pub fn write_catalog_to_file<P: AsRef<Path>>(catalog: &Catalog, path: P) -> Result<(), DataError> {
    let bytes = serialize_catalog(catalog)?;
    fs::write(path, bytes)?;
    Ok(())
}

pub fn read_catalog_from_file<P: AsRef<Path>>(path: P) -> Result<Catalog, DataError> {
    let bytes = fs::read(path)?;
    deserialize_catalog(&bytes)
}

pub fn write_metadata_to_file<P: AsRef<Path>>(
    metadata: &CatalogMetadata,
    path: P,
) -> Result<(), DataError> {
    let json = serde_json::to_vec_pretty(metadata)?;
    fs::write(path, json)?;
    Ok(())
}

fn current_epoch_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
