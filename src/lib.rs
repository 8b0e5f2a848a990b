//! GreenLens: photograph a plant, get it identified, keep track of watering.
//!
//! State lives in a local SQLite file. Identification goes to Gemini when an
//! API key is configured and falls back to the bundled catalog otherwise.

pub mod actions;
pub mod analysis;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod i18n;
pub mod identify;
pub mod image;
pub mod models;
pub mod progress;
pub mod schema;
pub mod server;
pub mod store;

pub use controller::{AppController, AppSnapshot, SharedController};
pub use error::{ActionError, IdentifyError, ImageError, RecognitionError, StoreError};
pub use identify::{Identification, IdentificationService, IdentificationSource};
pub use models::{CareInfo, IdentificationResult, Language, Plant};
pub use store::PlantStore;
