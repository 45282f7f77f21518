//! Static memoria catalogue: YAML (or JSON) with a `memoria:` root list.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::card::{Card, Memoria};
use crate::skill::ParseError;

pub const DEFAULT_CATALOGUE_PATH: &str = "data/memoria.yaml";

#[derive(Debug, thiserror::Error)]
pub enum CatalogueError {
    #[error("unable to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unable to parse yaml '{}': {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("unable to parse json '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate memoria id {0}")]
    DuplicateId(u32),
    #[error("unknown memoria id {0}")]
    UnknownId(u32),
    #[error("memoria {id} has {} unparseable ability text errors", errors.len())]
    Unparseable { id: u32, errors: Vec<ParseError> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogueFile {
    pub memoria: Vec<Memoria>,
}

/// Records indexed by id; ability text stays raw until a card is requested.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    records: BTreeMap<u32, Memoria>,
}

impl Catalogue {
    pub fn from_records(records: Vec<Memoria>) -> Result<Self, CatalogueError> {
        let mut indexed = BTreeMap::new();
        for record in records {
            let id = record.id;
            if indexed.insert(id, record).is_some() {
                return Err(CatalogueError::DuplicateId(id));
            }
        }
        Ok(Self { records: indexed })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &Memoria> {
        self.records.values()
    }

    pub fn get(&self, id: u32) -> Option<&Memoria> {
        self.records.get(&id)
    }

    /// Parse one record into a [Card].
    pub fn card(&self, id: u32) -> Result<Card, CatalogueError> {
        let record = self.get(id).ok_or(CatalogueError::UnknownId(id))?;
        Card::from_memoria(record).map_err(|errors| CatalogueError::Unparseable { id, errors })
    }
}

pub fn load_catalogue(path: impl AsRef<Path>) -> Result<Catalogue, CatalogueError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| CatalogueError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let file: CatalogueFile = if is_json {
        serde_json::from_str(&raw).map_err(|source| CatalogueError::Json {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml::from_str(&raw).map_err(|source| CatalogueError::Yaml {
            path: path.to_path_buf(),
            source,
        })?
    };
    debug!(path = %path.display(), records = file.memoria.len(), "read catalogue");
    let catalogue = Catalogue::from_records(file.memoria)?;
    info!(path = %path.display(), records = catalogue.len(), "loaded memoria catalogue");
    Ok(catalogue)
}
