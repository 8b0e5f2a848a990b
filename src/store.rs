//! Persistent plant collection and language preference.
//!
//! Everything is stored as whole JSON documents under two keys. Reads that
//! fail or find corrupt data fall back to an empty collection or the default
//! language; failed writes are logged and dropped. Callers never see a
//! storage error.

use diesel::SqliteConnection;
use tracing::{debug, error, warn};

use crate::actions;
use crate::error::StoreError;
use crate::models::{Language, Plant};

pub const PLANTS_KEY: &str = "greenlens_plants";
pub const LANGUAGE_KEY: &str = "greenlens_language";

/// Raw string storage underneath [`PlantStore`].
pub trait KeyValueBackend: Send {
    fn read(&mut self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// SQLite-backed key-value storage.
pub struct SqliteBackend {
    conn: SqliteConnection,
}

impl SqliteBackend {
    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self {
            conn: actions::establish_connection(url)?,
        })
    }
}

impl KeyValueBackend for SqliteBackend {
    fn read(&mut self, key: &str) -> Result<Option<String>, StoreError> {
        actions::read_value(&mut self.conn, key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        actions::write_value(&mut self.conn, key, value)
    }
}

pub struct PlantStore {
    backend: Box<dyn KeyValueBackend>,
}

impl PlantStore {
    pub fn new(backend: impl KeyValueBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    pub fn open(url: &str) -> Result<Self, StoreError> {
        Ok(Self::new(SqliteBackend::open(url)?))
    }

    /// Saved plants, most recently added first.
    pub fn list_plants(&mut self) -> Vec<Plant> {
        match self.try_list() {
            Ok(plants) => plants,
            Err(e) => {
                error!(error = %e, "Failed to load plants, using empty collection");
                Vec::new()
            }
        }
    }

    pub fn save(&mut self, plant: Plant) {
        let mut plants = self.list_plants();
        debug!(plant_id = %plant.id, "Saving plant");
        plants.insert(0, plant);
        self.persist(&plants);
    }

    pub fn delete(&mut self, id: &str) {
        let mut plants = self.list_plants();
        let before = plants.len();
        plants.retain(|p| p.id != id);
        if plants.len() == before {
            debug!(plant_id = %id, "Delete ignored, no such plant");
            return;
        }
        self.persist(&plants);
    }

    /// Replaces the stored plant with the same id, keeping its position.
    pub fn update(&mut self, plant: &Plant) {
        let mut plants = self.list_plants();
        match plants.iter_mut().find(|p| p.id == plant.id) {
            Some(slot) => *slot = plant.clone(),
            None => {
                debug!(plant_id = %plant.id, "Update ignored, no such plant");
                return;
            }
        }
        self.persist(&plants);
    }

    pub fn language_preference(&mut self) -> Language {
        match self.backend.read(LANGUAGE_KEY) {
            Ok(Some(code)) => code.parse().unwrap_or_else(|e| {
                warn!(error = %e, "Ignoring stored language preference");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(e) => {
                error!(error = %e, "Failed to read language preference");
                Language::default()
            }
        }
    }

    pub fn set_language_preference(&mut self, language: Language) {
        if let Err(e) = self.backend.write(LANGUAGE_KEY, language.code()) {
            error!(error = %e, %language, "Failed to persist language preference");
        }
    }

    fn try_list(&mut self) -> Result<Vec<Plant>, StoreError> {
        match self.backend.read(PLANTS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&mut self, plants: &[Plant]) {
        let json = match serde_json::to_string(plants) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to encode plants");
                return;
            }
        };
        if let Err(e) = self.backend.write(PLANTS_KEY, &json) {
            warn!(error = %e, count = plants.len(), "Dropping plant collection write");
        }
    }
}
