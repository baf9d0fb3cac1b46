//! Core block interaction and concept synthesis logic for MelioConcept.
//! This crate is the single source of truth for canvas and merge invariants.

pub mod collision;
pub mod config;
pub mod controller;
pub mod db;
pub mod driver;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod prompt;
pub mod repo;
pub mod session;
pub mod store;
pub mod synth;

pub use collision::{find_merge_target, overlaps, Footprint, OVERLAP_RATIO};
pub use config::{ConfigError, MelioConfig};
pub use controller::{AppState, DragSession, Effect, Event, Phase};
pub use driver::Driver;
pub use gateway::{ConceptGateway, InMemoryConceptGateway, PersistenceError, SqliteConceptGateway};
pub use logging::{init_logging, init_logging_from_config, logging_status, LogLevel, LoggingError};
pub use model::appearance::{Appearance, BackgroundPreset, BlockColorPreset};
pub use model::block::{Block, BlockId, BlockValidationError, Position, BLOCK_HEIGHT, BLOCK_WIDTH};
pub use model::canvas::Canvas;
pub use model::concept::{Concept, ConceptId};
pub use session::{AnonymousSession, ConfiguredSession, SessionError, SessionId, SessionProvider};
pub use store::block_store::{BlockPatch, BlockStore};
pub use synth::{GeminiSynthesizer, SynthesisError, SynthesisRequest, Synthesizer};
