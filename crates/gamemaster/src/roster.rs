//! Creatures at a concrete level with individual values.

use thiserror::Error;

use crate::creatures::Creature;
use crate::moves::MoveId;
use crate::store::{GameMasterStore, StoreError};

pub const MIN_LEVEL: f32 = 1.0;
pub const MAX_LEVEL: f32 = 51.0;
pub const MAX_IV: u8 = 15;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum RosterError {
    #[error("level {0} is not a half step within 1..=51")]
    Level(f32),
    #[error("{stat} IV {value} exceeds 15")]
    Iv { stat: &'static str, value: u8 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Individual values, each 0..=15.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ivs {
    pub attack: u8,
    pub stamina: u8,
    pub defense: u8,
}

impl Ivs {
    pub const fn new(attack: u8, stamina: u8, defense: u8) -> Self {
        Self {
            attack,
            stamina,
            defense,
        }
    }

    pub const fn perfect() -> Self {
        Self::new(MAX_IV, MAX_IV, MAX_IV)
    }

    pub fn validate(&self) -> Result<(), RosterError> {
        for (stat, value) in [
            ("attack", self.attack),
            ("stamina", self.stamina),
            ("defense", self.defense),
        ] {
            if value > MAX_IV {
                return Err(RosterError::Iv { stat, value });
            }
        }
        Ok(())
    }
}

/// Check a level is within range and a whole or half level.
pub fn validate_level(level: f32) -> Result<(), RosterError> {
    let doubled = level * 2.0;
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&level) || doubled.fract() != 0.0 {
        return Err(RosterError::Level(level));
    }
    Ok(())
}

/// A creature record with a level and IVs attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseMon<'a> {
    pub creature: &'a Creature,
    pub level: f32,
    pub ivs: Ivs,
}

impl<'a> BaseMon<'a> {
    pub fn new(creature: &'a Creature, level: f32, ivs: Ivs) -> Result<Self, RosterError> {
        validate_level(level)?;
        ivs.validate()?;
        Ok(Self {
            creature,
            level,
            ivs,
        })
    }

    #[inline]
    pub fn dex(&self) -> u16 {
        self.creature.dex
    }

    #[inline]
    pub fn form(&self) -> u8 {
        self.creature.form
    }

    #[inline]
    pub fn has_fast(&self, id: MoveId) -> bool {
        self.creature.has_fast(id)
    }

    #[inline]
    pub fn has_charged(&self, id: MoveId) -> bool {
        self.creature.has_charged(id)
    }
}

impl AsRef<Creature> for BaseMon<'_> {
    fn as_ref(&self) -> &Creature {
        self.creature
    }
}

impl GameMasterStore {
    /// Look up a creature by dex number and form and build a [`BaseMon`].
    pub fn base_mon(
        &self,
        dex: u16,
        form: u8,
        level: f32,
        ivs: Ivs,
    ) -> Result<BaseMon<'_>, RosterError> {
        let creature = self.get_pokemon(dex, form)?;
        BaseMon::new(creature, level, ivs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ingest_str;

    const DOC: &str = r#"{ "itemTemplates": [
        { "templateId": "V0001_POKEMON_BULBASAUR", "pokemonSettings": {
            "pokemonId": "BULBASAUR", "type": "POKEMON_TYPE_GRASS", "type2": "POKEMON_TYPE_POISON",
            "stats": { "baseAttack": 118, "baseStamina": 128, "baseDefense": 111 } } }
    ] }"#;

    fn store() -> GameMasterStore {
        GameMasterStore::new(ingest_str(DOC).unwrap().game_master)
    }

    #[test]
    fn test_base_mon_from_store() {
        let store = store();
        let mon = store.base_mon(1, 0, 15.0, Ivs::new(10, 11, 12)).unwrap();
        assert_eq!(mon.dex(), 1);
        assert_eq!(mon.form(), 0);
        assert_eq!(mon.level, 15.0);
        assert_eq!(mon.ivs, Ivs::new(10, 11, 12));
        assert_eq!(mon.as_ref().name, "BULBASAUR");
    }

    #[test]
    fn test_base_mon_validation() {
        let store = store();
        assert_eq!(
            store.base_mon(1, 0, 15.25, Ivs::default()).unwrap_err(),
            RosterError::Level(15.25)
        );
        assert_eq!(
            store.base_mon(1, 0, 52.0, Ivs::default()).unwrap_err(),
            RosterError::Level(52.0)
        );
        assert_eq!(
            store.base_mon(1, 0, 40.5, Ivs::new(15, 16, 0)).unwrap_err(),
            RosterError::Iv {
                stat: "stamina",
                value: 16
            }
        );
        assert_eq!(
            store.base_mon(2, 0, 20.0, Ivs::perfect()).unwrap_err(),
            RosterError::Store(StoreError::NotFound)
        );
        assert!(store.base_mon(1, 0, 51.0, Ivs::perfect()).is_ok());
    }
}
