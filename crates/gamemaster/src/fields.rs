//! Typed field readers over the token tape.
//!
//! Field names are part of the document schema and matched literally.

use crate::error::{EntryError, IngestError};
use crate::iter_stack::IterStack;
use crate::tokens::{TokenId, TokenKind, TokenTape};
use crate::types::Type;

pub(crate) const TEMPLATE_ID: &str = "templateId";
pub(crate) const POKEMON_SETTINGS: &str = "pokemonSettings";
pub(crate) const COMBAT_MOVE: &str = "combatMove";

/// The parts of an item template every builder needs.
#[derive(Debug, Clone)]
pub(crate) struct EntryHeader {
    /// Token of the entry object.
    pub token: TokenId,
    pub template_id: String,
    pub pokemon_settings: Option<TokenId>,
    pub combat_move: Option<TokenId>,
}

/// Read the header of one template entry in a single walk over its members.
///
/// Entries that are not objects or carry no string `templateId` yield
/// `None`; they are not relevant to any builder.
pub(crate) fn read_header(
    stack: &mut IterStack<'_>,
    item: TokenId,
) -> Result<Option<EntryHeader>, IngestError> {
    let tape = stack.tape();
    if tape.kind(item) != Some(TokenKind::Object) {
        return Ok(None);
    }

    let mut template_id = None;
    let mut pokemon_settings = None;
    let mut combat_move = None;

    stack.enter(item)?;
    while let Some(key) = stack.next(None) {
        let Some(value) = tape.get(key).and_then(|t| t.first_child) else {
            continue;
        };
        match tape.text(key) {
            TEMPLATE_ID => template_id = tape.as_str(value),
            POKEMON_SETTINGS => pokemon_settings = Some(value),
            COMBAT_MOVE => combat_move = Some(value),
            _ => {}
        }
    }
    stack.exit();

    Ok(template_id.map(|id| EntryHeader {
        token: item,
        template_id: id.to_string(),
        pokemon_settings,
        combat_move,
    }))
}

pub(crate) fn require_object(
    tape: &TokenTape,
    token: Option<TokenId>,
    field: &'static str,
) -> Result<TokenId, EntryError> {
    let token = token.ok_or(EntryError::MissingField(field))?;
    if tape.kind(token) != Some(TokenKind::Object) {
        return Err(EntryError::WrongKind {
            field,
            expected: "object",
        });
    }
    Ok(token)
}

pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T, EntryError> {
    value.ok_or(EntryError::MissingField(field))
}

pub(crate) fn string(
    tape: &TokenTape,
    token: TokenId,
    field: &'static str,
) -> Result<String, EntryError> {
    tape.as_str(token)
        .map(str::to_string)
        .ok_or(EntryError::WrongKind {
            field,
            expected: "string",
        })
}

pub(crate) fn ptype(
    tape: &TokenTape,
    token: TokenId,
    field: &'static str,
) -> Result<Type, EntryError> {
    let name = tape.as_str(token).ok_or(EntryError::WrongKind {
        field,
        expected: "string",
    })?;
    Type::from_gm(name).ok_or_else(|| EntryError::UnknownType(name.to_string()))
}

/// Integer field constrained to `[min, max]`.
pub(crate) fn int_in(
    tape: &TokenTape,
    token: TokenId,
    field: &'static str,
    min: i64,
    max: i64,
) -> Result<i64, EntryError> {
    let value = tape.as_i64(token).ok_or(EntryError::WrongKind {
        field,
        expected: "integer",
    })?;
    if value < min || value > max {
        return Err(EntryError::BadValue {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

/// Non-negative number rounded to the nearest integer, at most `max`.
pub(crate) fn rounded(
    tape: &TokenTape,
    token: TokenId,
    field: &'static str,
    max: u16,
) -> Result<u16, EntryError> {
    let value = tape.as_f64(token).ok_or(EntryError::WrongKind {
        field,
        expected: "number",
    })?;
    let rounded = value.round();
    if !(0.0..=f64::from(max)).contains(&rounded) {
        return Err(EntryError::BadValue {
            field,
            value: tape.text(token).to_string(),
        });
    }
    Ok(rounded as u16)
}

pub(crate) fn fraction(
    tape: &TokenTape,
    token: TokenId,
    field: &'static str,
) -> Result<f32, EntryError> {
    let value = tape.as_f64(token).ok_or(EntryError::WrongKind {
        field,
        expected: "number",
    })?;
    if !(0.0..=1.0).contains(&value) {
        return Err(EntryError::BadValue {
            field,
            value: tape.text(token).to_string(),
        });
    }
    Ok(value as f32)
}

/// Array of strings, walked through its own scope.
pub(crate) fn string_list(
    stack: &mut IterStack<'_>,
    token: TokenId,
    field: &'static str,
) -> Result<Vec<String>, crate::error::Failure> {
    let tape = stack.tape();
    if tape.kind(token) != Some(TokenKind::Array) {
        return Err(EntryError::WrongKind {
            field,
            expected: "array",
        }
        .into());
    }
    let mut out = Vec::with_capacity(tape.get(token).map_or(0, |t| t.size));
    stack.enter(token)?;
    while let Some(item) = stack.next(None) {
        out.push(string(tape, item, field)?);
    }
    stack.exit();
    Ok(out)
}
