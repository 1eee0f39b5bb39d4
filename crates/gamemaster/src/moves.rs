//! PvP move records and the move table.

use tracing::debug;

use crate::classify::{Classifier, EntryKind};
use crate::error::{EntryError, Failure};
use crate::fields::{self, EntryHeader};
use crate::index::{IdIndex, NameIndex};
use crate::iter_stack::IterStack;
use crate::types::Type;

/// Externally assigned move number (the `V####` of the template id).
pub type MoveId = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveCategory {
    Fast,
    Charged,
}

/// Stat stage changes a charged move may apply.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Buff {
    pub attacker_attack: i8,
    pub attacker_defense: i8,
    pub target_attack: i8,
    pub target_defense: i8,
    /// Activation chance in `[0, 1]`.
    pub chance: f32,
}

impl Buff {
    #[inline]
    pub fn is_none(&self) -> bool {
        self.attacker_attack == 0
            && self.attacker_defense == 0
            && self.target_attack == 0
            && self.target_defense == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveDetail {
    Fast { turns: u8 },
    Charged { buff: Option<Buff> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub id: MoveId,
    pub name: String,
    pub ptype: Type,
    pub power: u16,
    /// Energy gained by a fast move, or spent by a charged move.
    pub energy: u16,
    pub detail: MoveDetail,
}

impl Move {
    #[inline]
    pub fn category(&self) -> MoveCategory {
        match self.detail {
            MoveDetail::Fast { .. } => MoveCategory::Fast,
            MoveDetail::Charged { .. } => MoveCategory::Charged,
        }
    }

    #[inline]
    pub fn is_fast(&self) -> bool {
        self.category() == MoveCategory::Fast
    }

    /// Turn count, fast moves only.
    pub fn turns(&self) -> Option<u8> {
        match self.detail {
            MoveDetail::Fast { turns } => Some(turns),
            MoveDetail::Charged { .. } => None,
        }
    }

    /// Buff descriptor, charged moves only.
    pub fn buff(&self) -> Option<&Buff> {
        match &self.detail {
            MoveDetail::Charged { buff } => buff.as_ref(),
            MoveDetail::Fast { .. } => None,
        }
    }
}

// ============================================================================
// Move table
// ============================================================================

/// Move records with name and id indices kept in step.
#[derive(Debug, Clone, Default)]
pub struct MoveTable {
    moves: Vec<Move>,
    by_name: NameIndex<usize>,
    by_id: IdIndex<MoveId, usize>,
}

impl MoveTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Moves in acceptance order.
    pub fn iter(&self) -> impl Iterator<Item = &Move> {
        self.moves.iter()
    }

    #[inline]
    pub fn contains_id(&self, id: MoveId) -> bool {
        self.by_id.contains(id)
    }

    pub fn get(&self, id: MoveId) -> Option<&Move> {
        self.by_id.get(id).map(|i| &self.moves[i])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Move> {
        self.by_name.get(name).map(|i| &self.moves[i])
    }

    /// Id of the move called `name`.
    pub fn id_of(&self, name: &str) -> Option<MoveId> {
        self.get_by_name(name).map(|m| m.id)
    }

    /// Id of the move called `name` with `n` trailing components removed.
    pub fn id_of_trimmed(&self, name: &str, n: usize) -> Option<MoveId> {
        self.by_name.get_trimmed(name, n).map(|i| self.moves[i].id)
    }

    /// Insert a move into both indices, or neither.
    pub fn insert(&mut self, mv: Move) -> Result<MoveId, EntryError> {
        if self.by_name.contains(&mv.name) {
            return Err(EntryError::DuplicateName(mv.name));
        }
        if self.by_id.contains(mv.id) {
            return Err(EntryError::DuplicateId(mv.id));
        }
        let idx = self.moves.len();
        let id = mv.id;
        self.by_name.insert(&mv.name, idx)?;
        self.by_id.try_insert(id, idx);
        self.moves.push(mv);
        Ok(id)
    }
}

// ============================================================================
// Extraction
// ============================================================================

const UNIQUE_ID: &str = "uniqueId";
const TYPE: &str = "type";
const POWER: &str = "power";
const ENERGY_DELTA: &str = "energyDelta";
const DURATION_TURNS: &str = "durationTurns";
const BUFFS: &str = "buffs";

/// Extract a move record from a classified entry.
pub(crate) fn extract_move(
    stack: &mut IterStack<'_>,
    classifier: &Classifier,
    header: &EntryHeader,
    kind: EntryKind,
) -> Result<Move, Failure> {
    let tape = stack.tape();
    let id = classifier
        .template_parts(kind, &header.template_id)
        .and_then(|p| p.id())
        .ok_or_else(|| EntryError::BadTemplateId(header.template_id.clone()))?;
    let settings = fields::require_object(tape, header.combat_move, fields::COMBAT_MOVE)?;

    let mut name = None;
    let mut ptype = None;
    let mut power = 0;
    let mut energy_delta = 0;
    let mut duration = 0;
    let mut buff = None;

    stack.enter(settings)?;
    while let Some(key) = stack.next(None) {
        let Some(value) = tape.get(key).and_then(|t| t.first_child) else {
            continue;
        };
        match tape.text(key) {
            UNIQUE_ID => name = Some(fields::string(tape, value, UNIQUE_ID)?),
            TYPE => ptype = Some(fields::ptype(tape, value, TYPE)?),
            POWER => power = fields::rounded(tape, value, POWER, u16::MAX)?,
            ENERGY_DELTA => {
                energy_delta = fields::int_in(tape, value, ENERGY_DELTA, -100, 100)?
            }
            DURATION_TURNS => duration = fields::int_in(tape, value, DURATION_TURNS, 0, 20)?,
            BUFFS => buff = Some(extract_buff(stack, value)?),
            _ => {}
        }
    }
    stack.exit();

    let name = fields::require(name, UNIQUE_ID)?;
    let ptype = fields::require(ptype, TYPE)?;

    let detail = match kind {
        EntryKind::MoveFast => MoveDetail::Fast {
            turns: duration as u8 + 1,
        },
        _ => MoveDetail::Charged {
            buff: buff.filter(|b: &Buff| !b.is_none()),
        },
    };

    debug!(id, name = %name, ?ptype, "extracted move");
    Ok(Move {
        id,
        name,
        ptype,
        power,
        energy: energy_delta.unsigned_abs() as u16,
        detail,
    })
}

fn extract_buff(stack: &mut IterStack<'_>, token: usize) -> Result<Buff, Failure> {
    let tape = stack.tape();
    let token = fields::require_object(tape, Some(token), BUFFS)?;
    let mut buff = Buff {
        chance: 1.0,
        ..Buff::default()
    };

    stack.enter(token)?;
    while let Some(key) = stack.next(None) {
        let Some(value) = tape.get(key).and_then(|t| t.first_child) else {
            continue;
        };
        let stage = |field| fields::int_in(tape, value, field, -4, 4).map(|v| v as i8);
        match tape.text(key) {
            "attackerAttackStatStageChange" => {
                buff.attacker_attack = stage("attackerAttackStatStageChange")?
            }
            "attackerDefenseStatStageChange" => {
                buff.attacker_defense = stage("attackerDefenseStatStageChange")?
            }
            "targetAttackStatStageChange" => {
                buff.target_attack = stage("targetAttackStatStageChange")?
            }
            "targetDefenseStatStageChange" => {
                buff.target_defense = stage("targetDefenseStatStageChange")?
            }
            "buffActivationChance" => {
                buff.chance = fields::fraction(tape, value, "buffActivationChance")?
            }
            _ => {}
        }
    }
    stack.exit();
    Ok(buff)
}
