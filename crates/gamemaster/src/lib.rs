//! gamemaster - Game Master ingestion and cross-referencing
//!
//! Turns a Game Master JSON document into two cross-referenced lookup
//! tables: PvP moves and creatures. Creatures reference moves by id and are
//! linked into family chains, with forward references inside the document
//! resolved after the main sweep.
//!
//! ```no_run
//! use gamemaster::{IngestConfig, IngestContext};
//!
//! let ctx = IngestContext::new(IngestConfig::default())?;
//! let out = ctx.ingest_path("GAME_MASTER.json")?;
//! for rejection in &out.report.rejections {
//!     eprintln!("{rejection}");
//! }
//! # Ok::<(), gamemaster::IngestError>(())
//! ```

/// Settings for an ingestion context
pub mod config;

/// Error taxonomy
pub mod error;

/// Creature types and type masks
pub mod types;

/// Creature tags and regions
pub mod tags;

/// Token tape over a parsed document
pub mod tokens;

/// Scoped iteration over the token tape
pub mod iter_stack;

/// Template identifier classification
pub mod classify;

/// Name and id lookup indices
pub mod index;

mod fields;

/// Move records and table
pub mod moves;

/// Creature records, table and family chains
pub mod creatures;

/// Deferred family resolution
pub mod deferred;

/// Ingestion driver
pub mod ingest;

/// Read-only storage facade
pub mod store;

/// Creature predicates
pub mod filter;

/// Creatures with level and IVs
pub mod roster;

// Re-export commonly used types
pub use classify::{Classifier, EntryKind, PatternSet};
pub use config::IngestConfig;
pub use creatures::{Creature, CreatureId, CreatureKey, CreatureTable, MoveRef, Stats};
pub use error::{EntryError, IngestError, Rejection};
pub use filter::{Predicate, PredicateExt};
pub use ingest::{ingest_str, GameMaster, IngestContext, IngestReport, Ingested};
pub use moves::{Buff, Move, MoveCategory, MoveDetail, MoveId, MoveTable};
pub use roster::{BaseMon, Ivs, RosterError};
pub use store::{GameMasterStore, Store, StoreError, StoreKey, StoreKind, StoreValue};
pub use tags::{Region, Tags};
pub use tokens::TokenTape;
pub use types::{Type, TypeMask};
