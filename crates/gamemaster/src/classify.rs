//! Template identifier classification.
//!
//! Entries are recognised purely by their `templateId`. Variant patterns are
//! prefixed by the general ones, so they are always tried first.

use regex::Regex;

use crate::error::IngestError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    NotRelevant,
    CreatureBase,
    CreatureShadow,
    CreaturePurified,
    MoveFast,
    MoveCharged,
}

impl EntryKind {
    #[inline]
    pub fn is_creature(self) -> bool {
        matches!(
            self,
            EntryKind::CreatureBase | EntryKind::CreatureShadow | EntryKind::CreaturePurified
        )
    }

    #[inline]
    pub fn is_move(self) -> bool {
        matches!(self, EntryKind::MoveFast | EntryKind::MoveCharged)
    }
}

/// Pattern sources for the classifier. The general creature and move
/// patterns must capture the template number and the name portion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    pub creature: String,
    pub shadow: String,
    pub purified: String,
    pub combat_move: String,
    pub fast_move: String,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self {
            creature: r"^V(\d{4})_POKEMON_([A-Z0-9_]+)$".to_string(),
            shadow: r"^V\d{4}_POKEMON_[A-Z0-9_]+_SHADOW$".to_string(),
            purified: r"^V\d{4}_POKEMON_[A-Z0-9_]+_PURIFIED$".to_string(),
            combat_move: r"^COMBAT_V(\d{4})_MOVE_([A-Z0-9_]+)$".to_string(),
            fast_move: r"^COMBAT_V\d{4}_MOVE_[A-Z0-9_]+_FAST$".to_string(),
        }
    }
}

/// Numeric prefix and name portion of a template identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateParts<'a> {
    pub number: &'a str,
    pub name: &'a str,
}

impl TemplateParts<'_> {
    /// The template number, range checked to 1..=9999.
    pub fn id(&self) -> Option<u16> {
        self.number
            .parse::<u16>()
            .ok()
            .filter(|n| (1..=9999).contains(n))
    }
}

/// Compiled pattern set.
#[derive(Debug, Clone)]
pub struct Classifier {
    creature: Regex,
    shadow: Regex,
    purified: Regex,
    combat_move: Regex,
    fast_move: Regex,
}

fn compile(pattern: &str) -> Result<Regex, IngestError> {
    Regex::new(pattern).map_err(|source| IngestError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

impl Classifier {
    /// Compile the default pattern set.
    pub fn new() -> Result<Self, IngestError> {
        Self::with_patterns(&PatternSet::default())
    }

    pub fn with_patterns(patterns: &PatternSet) -> Result<Self, IngestError> {
        Ok(Self {
            creature: compile(&patterns.creature)?,
            shadow: compile(&patterns.shadow)?,
            purified: compile(&patterns.purified)?,
            combat_move: compile(&patterns.combat_move)?,
            fast_move: compile(&patterns.fast_move)?,
        })
    }

    pub fn classify(&self, template_id: &str) -> EntryKind {
        if self.shadow.is_match(template_id) {
            EntryKind::CreatureShadow
        } else if self.purified.is_match(template_id) {
            EntryKind::CreaturePurified
        } else if self.creature.is_match(template_id) {
            EntryKind::CreatureBase
        } else if self.fast_move.is_match(template_id) {
            EntryKind::MoveFast
        } else if self.combat_move.is_match(template_id) {
            EntryKind::MoveCharged
        } else {
            EntryKind::NotRelevant
        }
    }

    /// Split a template identifier of the given kind into its parts.
    pub fn template_parts<'a>(
        &self,
        kind: EntryKind,
        template_id: &'a str,
    ) -> Option<TemplateParts<'a>> {
        let re = if kind.is_creature() {
            &self.creature
        } else if kind.is_move() {
            &self.combat_move
        } else {
            return None;
        };
        let caps = re.captures(template_id)?;
        Some(TemplateParts {
            number: caps.get(1)?.as_str(),
            name: caps.get(2)?.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_creatures() {
        let c = Classifier::new().unwrap();
        assert_eq!(c.classify("V0001_POKEMON_BULBASAUR"), EntryKind::CreatureBase);
        assert_eq!(c.classify("V0019_POKEMON_RATTATA_ALOLA"), EntryKind::CreatureBase);
        assert_eq!(c.classify("V0019_POKEMON_RATTATA_SHADOW"), EntryKind::CreatureShadow);
        assert_eq!(c.classify("V0019_POKEMON_RATTATA_PURIFIED"), EntryKind::CreaturePurified);
    }

    #[test]
    fn test_shadow_wins_over_base() {
        let c = Classifier::new().unwrap();
        let id = "V0150_POKEMON_MEWTWO_SHADOW";
        // Both patterns match; the variant takes precedence.
        assert!(c.creature.is_match(id));
        assert!(c.shadow.is_match(id));
        assert_eq!(c.classify(id), EntryKind::CreatureShadow);
    }

    #[test]
    fn test_classify_moves() {
        let c = Classifier::new().unwrap();
        assert_eq!(c.classify("COMBAT_V0214_MOVE_VINE_WHIP_FAST"), EntryKind::MoveFast);
        assert_eq!(c.classify("COMBAT_V0118_MOVE_POWER_WHIP"), EntryKind::MoveCharged);
    }

    #[test]
    fn test_not_relevant() {
        let c = Classifier::new().unwrap();
        for id in [
            "V0214_MOVE_VINE_WHIP_FAST",
            "BADGE_BATTLE_ATTACK_WON",
            "SPAWN_V0001_POKEMON_BULBASAUR",
            "V001_POKEMON_BULBASAUR",
            "COMBAT_V0214_MOVE_",
            "",
        ] {
            assert_eq!(c.classify(id), EntryKind::NotRelevant, "{id}");
        }
    }

    #[test]
    fn test_template_parts() {
        let c = Classifier::new().unwrap();
        let parts = c
            .template_parts(EntryKind::CreatureShadow, "V0019_POKEMON_RATTATA_SHADOW")
            .unwrap();
        assert_eq!(parts.name, "RATTATA_SHADOW");
        assert_eq!(parts.id(), Some(19));

        let parts = c
            .template_parts(EntryKind::MoveFast, "COMBAT_V0214_MOVE_VINE_WHIP_FAST")
            .unwrap();
        assert_eq!(parts.name, "VINE_WHIP_FAST");
        assert_eq!(parts.id(), Some(214));

        let zero = c
            .template_parts(EntryKind::MoveCharged, "COMBAT_V0000_MOVE_STRUGGLE")
            .unwrap();
        assert_eq!(zero.id(), None);
    }

    #[test]
    fn test_bad_pattern_is_fatal() {
        let patterns = PatternSet {
            shadow: "^V(\\d{4}_POKEMON_".to_string(),
            ..PatternSet::default()
        };
        let err = Classifier::with_patterns(&patterns).unwrap_err();
        assert!(matches!(err, IngestError::Pattern { .. }));
    }
}
