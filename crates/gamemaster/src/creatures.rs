//! Creature records, the creature table and family chains.
//!
//! Records live in an arena owned by [`CreatureTable`]. Family chains are
//! singly linked through [`Creature::next_form`], rooted at the family's
//! base form; links are arena indices.

use std::collections::HashMap;

use tracing::debug;

use crate::classify::{Classifier, EntryKind};
use crate::error::{EntryError, Failure};
use crate::fields::{self, EntryHeader};
use crate::filter::Predicate;
use crate::index::{IdIndex, NameIndex};
use crate::iter_stack::IterStack;
use crate::moves::{MoveId, MoveTable};
use crate::tags::{derive_tags, Region, TagSource, Tags};
use crate::tokens::TokenKind;
use crate::types::TypeMask;

/// Arena index of a creature record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct CreatureId(pub u32);

impl CreatureId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Record identity: dex number plus form index within that dex number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CreatureKey {
    pub dex: u16,
    pub form: u8,
}

impl CreatureKey {
    pub const fn new(dex: u16, form: u8) -> Self {
        Self { dex, form }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Stats {
    pub attack: u16,
    pub stamina: u16,
    pub defense: u16,
}

/// Reference to an eligible move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRef {
    pub id: MoveId,
    /// Elite/legacy move, not in the regular pool.
    pub legacy: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Creature {
    pub dex: u16,
    /// Form index, assigned when the record is accepted.
    pub form: u8,
    /// Template name, e.g. `RATTATA_ALOLA`. Unique.
    pub name: String,
    /// Form name, e.g. `ALOLA`, or `NORMAL`.
    pub form_name: String,
    /// Dex number of the family's root, assigned when accepted.
    pub family: u16,
    pub types: TypeMask,
    pub stats: Stats,
    pub fast_moves: Vec<MoveRef>,
    pub charged_moves: Vec<MoveRef>,
    pub tags: Tags,
    /// Record this one was attached after.
    pub predecessor: Option<CreatureId>,
    /// Next record in the family chain.
    pub next_form: Option<CreatureId>,
}

impl Creature {
    #[inline]
    pub fn key(&self) -> CreatureKey {
        CreatureKey::new(self.dex, self.form)
    }

    #[inline]
    pub fn region(&self) -> Region {
        Region::of_dex(self.dex)
    }

    pub fn has_fast(&self, id: MoveId) -> bool {
        self.fast_moves.iter().any(|m| m.id == id)
    }

    pub fn has_charged(&self, id: MoveId) -> bool {
        self.charged_moves.iter().any(|m| m.id == id)
    }

    /// All referenced move ids, fast first.
    pub fn move_ids(&self) -> impl Iterator<Item = MoveId> + '_ {
        self.fast_moves
            .iter()
            .chain(self.charged_moves.iter())
            .map(|m| m.id)
    }
}

// ============================================================================
// Creature table
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct CreatureTable {
    creatures: Vec<Creature>,
    by_name: NameIndex<CreatureId>,
    by_key: IdIndex<CreatureKey, CreatureId>,
    forms_per_dex: HashMap<u16, u8>,
}

impl CreatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.creatures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.creatures.is_empty()
    }

    /// Records in acceptance order.
    pub fn iter(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter()
    }

    #[inline]
    pub fn by_id(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures.get(id.index())
    }

    pub fn get(&self, key: CreatureKey) -> Option<&Creature> {
        self.by_key.get(key).and_then(|id| self.by_id(id))
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Creature> {
        self.by_name.get(name).and_then(|id| self.by_id(id))
    }

    #[inline]
    pub fn id_of(&self, name: &str) -> Option<CreatureId> {
        self.by_name.get(name)
    }

    #[inline]
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains(name)
    }

    /// Look up `name` with `n` trailing components removed, so
    /// `("RATTATA_SHADOW", 1)` finds `RATTATA`.
    pub fn get_trimmed(&self, name: &str, n: usize) -> Option<&Creature> {
        self.by_name.get_trimmed(name, n).and_then(|id| self.by_id(id))
    }

    /// Dex number of `name`.
    pub fn dex_of(&self, name: &str) -> Option<u16> {
        self.get_by_name(name).map(|c| c.dex)
    }

    /// Walk the family chain starting at `start`.
    pub fn chain(&self, start: CreatureId) -> Chain<'_> {
        Chain {
            table: self,
            next: Some(start),
        }
    }

    /// Records with no predecessor, i.e. the heads of family chains.
    pub fn roots(&self) -> impl Iterator<Item = CreatureId> + '_ {
        self.creatures
            .iter()
            .enumerate()
            .filter(|(_, c)| c.predecessor.is_none())
            .map(|(i, _)| CreatureId(i as u32))
    }

    /// Records matching a predicate.
    pub fn filter<'a, P>(&'a self, pred: &'a P) -> impl Iterator<Item = &'a Creature> + 'a
    where
        P: Predicate<Creature> + ?Sized,
    {
        self.creatures.iter().filter(move |c| pred.test(c))
    }

    /// Accept a record, splicing it into its predecessor's chain.
    ///
    /// The record is assigned its form index and family, then inserted into
    /// both indices. On error the table is unchanged.
    pub fn attach(
        &mut self,
        mut creature: Creature,
        predecessor: Option<CreatureId>,
    ) -> Result<CreatureId, EntryError> {
        if self.by_name.contains(&creature.name) {
            return Err(EntryError::DuplicateName(creature.name));
        }
        let form = self.forms_per_dex.get(&creature.dex).copied().unwrap_or(0);
        if form == u8::MAX {
            return Err(EntryError::BadValue {
                field: "form",
                value: creature.name,
            });
        }

        let id = CreatureId(self.creatures.len() as u32);
        creature.form = form;
        creature.predecessor = predecessor;
        match predecessor.and_then(|p| self.creatures.get(p.index())) {
            Some(pred) => {
                creature.family = pred.family;
                creature.next_form = pred.next_form;
            }
            None => {
                creature.family = creature.dex;
                creature.next_form = None;
            }
        }

        self.by_name.insert(&creature.name, id)?;
        self.by_key.try_insert(creature.key(), id);
        self.forms_per_dex.insert(creature.dex, form + 1);
        if let Some(pred) = predecessor.and_then(|p| self.creatures.get_mut(p.index())) {
            pred.next_form = Some(id);
        }
        debug!(
            name = %creature.name,
            dex = creature.dex,
            form,
            family = creature.family,
            "accepted creature"
        );
        self.creatures.push(creature);
        Ok(id)
    }
}

/// Iterator over a family chain.
pub struct Chain<'a> {
    table: &'a CreatureTable,
    next: Option<CreatureId>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a Creature;

    fn next(&mut self) -> Option<&'a Creature> {
        let cur = self.table.by_id(self.next?)?;
        self.next = cur.next_form;
        Some(cur)
    }
}

// ============================================================================
// Extraction
// ============================================================================

const POKEMON_ID: &str = "pokemonId";
const TYPE: &str = "type";
const TYPE2: &str = "type2";
const STATS: &str = "stats";
const BASE_ATTACK: &str = "baseAttack";
const BASE_STAMINA: &str = "baseStamina";
const BASE_DEFENSE: &str = "baseDefense";
const QUICK_MOVES: &str = "quickMoves";
const CINEMATIC_MOVES: &str = "cinematicMoves";
const ELITE_QUICK_MOVE: &str = "eliteQuickMove";
const ELITE_CINEMATIC_MOVE: &str = "eliteCinematicMove";
const FORM: &str = "form";
const PARENT_POKEMON_ID: &str = "parentPokemonId";
const SHADOW: &str = "shadow";
const POKEMON_CLASS: &str = "pokemonClass";

/// Default form name for entries without a `form` field.
pub const NORMAL_FORM: &str = "NORMAL";

/// A creature extracted from the document but not yet accepted.
#[derive(Debug, Clone)]
pub(crate) struct PendingCreature {
    pub creature: Creature,
    /// Name of the record this one follows in its family chain.
    pub reference: Option<String>,
}

#[derive(Default)]
struct MoveNames {
    fast: Vec<String>,
    charged: Vec<String>,
    elite_fast: Vec<String>,
    elite_charged: Vec<String>,
}

/// Extract a creature record from a classified entry, resolving its move
/// names against `moves`.
pub(crate) fn extract_creature(
    stack: &mut IterStack<'_>,
    classifier: &Classifier,
    moves: &MoveTable,
    header: &EntryHeader,
    kind: EntryKind,
) -> Result<PendingCreature, Failure> {
    let tape = stack.tape();
    let parts = classifier
        .template_parts(kind, &header.template_id)
        .ok_or_else(|| EntryError::BadTemplateId(header.template_id.clone()))?;
    let dex = parts
        .id()
        .ok_or_else(|| EntryError::BadTemplateId(header.template_id.clone()))?;
    let name = parts.name.to_string();
    let settings =
        fields::require_object(tape, header.pokemon_settings, fields::POKEMON_SETTINGS)?;

    let mut pokemon_id = None;
    let mut type1 = None;
    let mut type2 = None;
    let mut stats = None;
    let mut move_names = MoveNames::default();
    let mut form = None;
    let mut parent = None;
    let mut shadow_eligible = false;
    let mut class = None;

    stack.enter(settings)?;
    while let Some(key) = stack.next(None) {
        let Some(value) = tape.get(key).and_then(|t| t.first_child) else {
            continue;
        };
        match tape.text(key) {
            POKEMON_ID => pokemon_id = Some(fields::string(tape, value, POKEMON_ID)?),
            TYPE => type1 = Some(fields::ptype(tape, value, TYPE)?),
            TYPE2 => type2 = Some(fields::ptype(tape, value, TYPE2)?),
            STATS => stats = Some(extract_stats(stack, value)?),
            QUICK_MOVES => move_names.fast = fields::string_list(stack, value, QUICK_MOVES)?,
            CINEMATIC_MOVES => {
                move_names.charged = fields::string_list(stack, value, CINEMATIC_MOVES)?
            }
            ELITE_QUICK_MOVE => {
                move_names.elite_fast = fields::string_list(stack, value, ELITE_QUICK_MOVE)?
            }
            ELITE_CINEMATIC_MOVE => {
                move_names.elite_charged =
                    fields::string_list(stack, value, ELITE_CINEMATIC_MOVE)?
            }
            FORM => form = Some(fields::string(tape, value, FORM)?),
            PARENT_POKEMON_ID => parent = Some(fields::string(tape, value, PARENT_POKEMON_ID)?),
            SHADOW => shadow_eligible = tape.kind(value) == Some(TokenKind::Object),
            POKEMON_CLASS => class = tape.as_str(value),
            _ => {}
        }
    }
    stack.exit();

    let pokemon_id = fields::require(pokemon_id, POKEMON_ID)?;
    let type1 = fields::require(type1, TYPE)?;
    let stats = fields::require(stats, STATS)?;

    let form_name = match form {
        Some(f) => f
            .strip_prefix(pokemon_id.as_str())
            .and_then(|rest| rest.strip_prefix('_'))
            .unwrap_or(&f)
            .to_string(),
        None => NORMAL_FORM.to_string(),
    };

    let mut types = TypeMask::from(type1);
    if let Some(t) = type2 {
        types |= TypeMask::from(t);
    }

    let fast_moves = resolve_moves(moves, &move_names.fast, &move_names.elite_fast)?;
    let charged_moves = resolve_moves(moves, &move_names.charged, &move_names.elite_charged)?;

    let tags = derive_tags(&TagSource {
        dex,
        kind,
        form_name: &form_name,
        shadow_eligible,
        class,
    });

    // A form points at its base record; a base record at its parent.
    let reference = if name != pokemon_id {
        Some(pokemon_id)
    } else {
        parent
    };

    debug!(name = %name, dex, reference = ?reference, "extracted creature");
    Ok(PendingCreature {
        creature: Creature {
            dex,
            form: 0,
            name,
            form_name,
            family: 0,
            types,
            stats,
            fast_moves,
            charged_moves,
            tags,
            predecessor: None,
            next_form: None,
        },
        reference,
    })
}

fn extract_stats(stack: &mut IterStack<'_>, token: usize) -> Result<Stats, Failure> {
    let tape = stack.tape();
    let token = fields::require_object(tape, Some(token), STATS)?;
    let mut attack = None;
    let mut stamina = None;
    let mut defense = None;

    stack.enter(token)?;
    while let Some(key) = stack.next(None) {
        let Some(value) = tape.get(key).and_then(|t| t.first_child) else {
            continue;
        };
        match tape.text(key) {
            BASE_ATTACK => attack = Some(fields::int_in(tape, value, BASE_ATTACK, 1, 999)?),
            BASE_STAMINA => stamina = Some(fields::int_in(tape, value, BASE_STAMINA, 1, 999)?),
            BASE_DEFENSE => defense = Some(fields::int_in(tape, value, BASE_DEFENSE, 1, 999)?),
            _ => {}
        }
    }
    stack.exit();

    Ok(Stats {
        attack: fields::require(attack, BASE_ATTACK)? as u16,
        stamina: fields::require(stamina, BASE_STAMINA)? as u16,
        defense: fields::require(defense, BASE_DEFENSE)? as u16,
    })
}

fn resolve_moves(
    moves: &MoveTable,
    regular: &[String],
    elite: &[String],
) -> Result<Vec<MoveRef>, EntryError> {
    let tagged = regular
        .iter()
        .map(|n| (n, false))
        .chain(elite.iter().map(|n| (n, true)));
    let mut out: Vec<MoveRef> = Vec::with_capacity(regular.len() + elite.len());
    for (name, legacy) in tagged {
        let id = moves
            .id_of(name)
            .ok_or_else(|| EntryError::UnknownMove(name.clone()))?;
        if !out.iter().any(|m| m.id == id) {
            out.push(MoveRef { id, legacy });
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    fn creature(dex: u16, name: &str) -> Creature {
        Creature {
            dex,
            form: 0,
            name: name.to_string(),
            form_name: NORMAL_FORM.to_string(),
            family: 0,
            types: TypeMask::from(Type::Normal),
            stats: Stats {
                attack: 100,
                stamina: 100,
                defense: 100,
            },
            fast_moves: Vec::new(),
            charged_moves: Vec::new(),
            tags: Tags::empty(),
            predecessor: None,
            next_form: None,
        }
    }

    #[test]
    fn test_attach_root_and_forms() {
        let mut table = CreatureTable::new();
        let base = table.attach(creature(19, "RATTATA"), None).unwrap();
        let alola = table.attach(creature(19, "RATTATA_ALOLA"), Some(base)).unwrap();

        let rattata = table.get_by_name("RATTATA").unwrap();
        assert_eq!(rattata.key(), CreatureKey::new(19, 0));
        assert_eq!(rattata.family, 19);
        assert_eq!(rattata.next_form, Some(alola));

        let alolan = table.get(CreatureKey::new(19, 1)).unwrap();
        assert_eq!(alolan.name, "RATTATA_ALOLA");
        assert_eq!(alolan.predecessor, Some(base));
        assert_eq!(alolan.family, 19);
    }

    #[test]
    fn test_splice_keeps_single_chain() {
        let mut table = CreatureTable::new();
        let eevee = table.attach(creature(133, "EEVEE"), None).unwrap();
        table.attach(creature(134, "VAPOREON"), Some(eevee)).unwrap();
        table.attach(creature(135, "JOLTEON"), Some(eevee)).unwrap();

        let names: Vec<_> = table.chain(eevee).map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["EEVEE", "JOLTEON", "VAPOREON"]);
        assert!(table.iter().all(|c| c.family == 133));
        assert_eq!(table.roots().collect::<Vec<_>>(), vec![eevee]);
    }

    #[test]
    fn test_duplicate_name_leaves_table_unchanged() {
        let mut table = CreatureTable::new();
        let base = table.attach(creature(1, "BULBASAUR"), None).unwrap();
        let err = table.attach(creature(1, "BULBASAUR"), Some(base)).unwrap_err();
        assert_eq!(err, EntryError::DuplicateName("BULBASAUR".to_string()));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get_by_name("BULBASAUR").unwrap().next_form, None);
        assert!(table.get(CreatureKey::new(1, 1)).is_none());
    }

    #[test]
    fn test_trimmed_lookup_matches_direct_dex() {
        let mut table = CreatureTable::new();
        let base = table.attach(creature(19, "RATTATA"), None).unwrap();
        table.attach(creature(19, "RATTATA_SHADOW"), Some(base)).unwrap();
        let trimmed = table.get_trimmed("RATTATA_SHADOW", 1).unwrap();
        assert_eq!(Some(trimmed.dex), table.dex_of("RATTATA_SHADOW"));
    }

    #[test]
    fn test_resolve_moves_marks_elite_and_dedups() {
        use crate::moves::{Move, MoveDetail};

        let mut moves = MoveTable::new();
        for (id, name) in [(214, "VINE_WHIP_FAST"), (221, "TACKLE_FAST")] {
            moves
                .insert(Move {
                    id,
                    name: name.to_string(),
                    ptype: Type::Grass,
                    power: 5,
                    energy: 5,
                    detail: MoveDetail::Fast { turns: 1 },
                })
                .unwrap();
        }

        let refs = resolve_moves(
            &moves,
            &["VINE_WHIP_FAST".to_string()],
            &["TACKLE_FAST".to_string(), "VINE_WHIP_FAST".to_string()],
        )
        .unwrap();
        assert_eq!(
            refs,
            vec![
                MoveRef { id: 214, legacy: false },
                MoveRef { id: 221, legacy: true },
            ]
        );

        let err = resolve_moves(&moves, &["SPLASH_FAST".to_string()], &[]).unwrap_err();
        assert_eq!(err, EntryError::UnknownMove("SPLASH_FAST".to_string()));
    }
}
