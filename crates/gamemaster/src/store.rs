//! Read-only key/value facade over an ingested [`GameMaster`].
//!
//! The [`Store`] trait is the generic storage interface; [`GameMasterStore`]
//! is the static backend. Writes and exports are refused with status errors
//! rather than panicking.

use std::io::Write;

use bitflags::bitflags;
use thiserror::Error;

use crate::creatures::{Creature, CreatureKey};
use crate::ingest::GameMaster;
use crate::moves::{Move, MoveId};

/// Display name of the static backend.
pub const STORE_NAME: &str = "Game Master Static";

bitflags! {
    /// Capabilities a store advertises.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StoreFlags: u8 {
        /// Data comes from an official document.
        const OFFICIAL_DATA    = 0b0000_0001;
        /// Keys are [`StoreKey`]s.
        const STANDARD_KEY     = 0b0000_0010;
        /// Values are typed [`StoreValue`]s.
        const TYPED            = 0b0000_0100;
        const GET_STRING       = 0b0000_1000;
        const GET_TYPED_STRING = 0b0001_0000;
        const WRITABLE         = 0b0010_0000;
        const EXPORTABLE       = 0b0100_0000;
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("no such entry")]
    NotFound,
    #[error("entry has a different type")]
    WrongType,
    #[error("store is read-only")]
    NotWritable,
    #[error("operation not defined for this store")]
    NotDefined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Pokemon,
    Move,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Pokemon { dex: u16, form: u8 },
    Move(MoveId),
}

impl StoreKey {
    #[inline]
    pub fn kind(self) -> StoreKind {
        match self {
            StoreKey::Pokemon { .. } => StoreKind::Pokemon,
            StoreKey::Move(_) => StoreKind::Move,
        }
    }
}

impl From<CreatureKey> for StoreKey {
    fn from(key: CreatureKey) -> Self {
        StoreKey::Pokemon {
            dex: key.dex,
            form: key.form,
        }
    }
}

/// Borrowed value returned by reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StoreValue<'a> {
    Pokemon(&'a Creature),
    Move(&'a Move),
}

impl<'a> StoreValue<'a> {
    #[inline]
    pub fn kind(&self) -> StoreKind {
        match self {
            StoreValue::Pokemon(_) => StoreKind::Pokemon,
            StoreValue::Move(_) => StoreKind::Move,
        }
    }

    pub fn as_pokemon(self) -> Option<&'a Creature> {
        match self {
            StoreValue::Pokemon(c) => Some(c),
            StoreValue::Move(_) => None,
        }
    }

    pub fn as_move(self) -> Option<&'a Move> {
        match self {
            StoreValue::Move(m) => Some(m),
            StoreValue::Pokemon(_) => None,
        }
    }
}

/// Owned value offered to writes.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEntry {
    Pokemon(Creature),
    Move(Move),
}

/// Export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreSink {
    Json,
    Binary,
}

/// Generic storage interface.
pub trait Store {
    fn name(&self) -> &str;
    fn flags(&self) -> StoreFlags;
    fn has(&self, key: StoreKey) -> bool;
    fn get(&self, key: StoreKey) -> Result<StoreValue<'_>, StoreError>;
    /// Look a value up by name in any table.
    fn get_str(&self, name: &str) -> Result<StoreValue<'_>, StoreError>;
    /// Look a value up by name in the table for `kind`.
    fn get_str_t(&self, kind: StoreKind, name: &str) -> Result<StoreValue<'_>, StoreError>;
    fn add(&mut self, key: StoreKey, value: StoreEntry) -> Result<(), StoreError>;
    fn set(&mut self, key: StoreKey, value: StoreEntry) -> Result<(), StoreError>;
    fn export(&self, sink: StoreSink, target: &mut dyn Write) -> Result<(), StoreError>;
}

// ============================================================================
// Static backend
// ============================================================================

/// The static, read-only store built from an ingested document.
#[derive(Debug, Clone)]
pub struct GameMasterStore {
    game_master: GameMaster,
}

impl GameMasterStore {
    pub fn new(game_master: GameMaster) -> Self {
        Self { game_master }
    }

    #[inline]
    pub fn game_master(&self) -> &GameMaster {
        &self.game_master
    }

    pub fn into_inner(self) -> GameMaster {
        self.game_master
    }

    pub fn get_pokemon(&self, dex: u16, form: u8) -> Result<&Creature, StoreError> {
        self.game_master
            .creatures
            .get(CreatureKey::new(dex, form))
            .ok_or(StoreError::NotFound)
    }

    pub fn get_pokemon_by_name(&self, name: &str) -> Result<&Creature, StoreError> {
        self.game_master
            .creatures
            .get_by_name(name)
            .ok_or(StoreError::NotFound)
    }

    pub fn get_move(&self, id: MoveId) -> Result<&Move, StoreError> {
        self.game_master.moves.get(id).ok_or(StoreError::NotFound)
    }

    pub fn get_move_by_name(&self, name: &str) -> Result<&Move, StoreError> {
        self.game_master
            .moves
            .get_by_name(name)
            .ok_or(StoreError::NotFound)
    }

    fn has_name(&self, kind: StoreKind, name: &str) -> bool {
        match kind {
            StoreKind::Pokemon => self.game_master.creatures.contains_name(name),
            StoreKind::Move => self.game_master.moves.get_by_name(name).is_some(),
        }
    }
}

impl From<GameMaster> for GameMasterStore {
    fn from(game_master: GameMaster) -> Self {
        Self::new(game_master)
    }
}

impl Store for GameMasterStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    fn flags(&self) -> StoreFlags {
        StoreFlags::OFFICIAL_DATA
            | StoreFlags::STANDARD_KEY
            | StoreFlags::TYPED
            | StoreFlags::GET_STRING
            | StoreFlags::GET_TYPED_STRING
    }

    fn has(&self, key: StoreKey) -> bool {
        self.get(key).is_ok()
    }

    fn get(&self, key: StoreKey) -> Result<StoreValue<'_>, StoreError> {
        match key {
            StoreKey::Pokemon { dex, form } => self.get_pokemon(dex, form).map(StoreValue::Pokemon),
            StoreKey::Move(id) => self.get_move(id).map(StoreValue::Move),
        }
    }

    fn get_str(&self, name: &str) -> Result<StoreValue<'_>, StoreError> {
        self.get_move_by_name(name)
            .map(StoreValue::Move)
            .or_else(|_| self.get_pokemon_by_name(name).map(StoreValue::Pokemon))
    }

    fn get_str_t(&self, kind: StoreKind, name: &str) -> Result<StoreValue<'_>, StoreError> {
        let found = match kind {
            StoreKind::Pokemon => self.get_pokemon_by_name(name).map(StoreValue::Pokemon),
            StoreKind::Move => self.get_move_by_name(name).map(StoreValue::Move),
        };
        found.map_err(|err| {
            let other = match kind {
                StoreKind::Pokemon => StoreKind::Move,
                StoreKind::Move => StoreKind::Pokemon,
            };
            if self.has_name(other, name) {
                StoreError::WrongType
            } else {
                err
            }
        })
    }

    fn add(&mut self, _key: StoreKey, _value: StoreEntry) -> Result<(), StoreError> {
        Err(StoreError::NotWritable)
    }

    fn set(&mut self, _key: StoreKey, _value: StoreEntry) -> Result<(), StoreError> {
        Err(StoreError::NotWritable)
    }

    fn export(&self, _sink: StoreSink, _target: &mut dyn Write) -> Result<(), StoreError> {
        Err(StoreError::NotDefined)
    }
}
