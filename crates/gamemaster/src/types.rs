//! Elemental types and type masks.

use bitflags::bitflags;

/// Prefix used by the Game Master for type names.
pub const TYPE_PREFIX: &str = "POKEMON_TYPE_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Type {
    #[default]
    Normal = 0,
    Fighting = 1,
    Flying = 2,
    Poison = 3,
    Ground = 4,
    Rock = 5,
    Bug = 6,
    Ghost = 7,
    Steel = 8,
    Fire = 9,
    Water = 10,
    Grass = 11,
    Electric = 12,
    Psychic = 13,
    Ice = 14,
    Dragon = 15,
    Dark = 16,
    Fairy = 17,
}

impl Type {
    pub const COUNT: usize = 18;

    pub const ALL: [Type; Type::COUNT] = [
        Type::Normal,
        Type::Fighting,
        Type::Flying,
        Type::Poison,
        Type::Ground,
        Type::Rock,
        Type::Bug,
        Type::Ghost,
        Type::Steel,
        Type::Fire,
        Type::Water,
        Type::Grass,
        Type::Electric,
        Type::Psychic,
        Type::Ice,
        Type::Dragon,
        Type::Dark,
        Type::Fairy,
    ];

    /// Parse a Game Master type name such as `POKEMON_TYPE_GRASS`.
    /// The bare upper case name (`GRASS`) is accepted too.
    pub fn from_gm(s: &str) -> Option<Self> {
        let bare = s.strip_prefix(TYPE_PREFIX).unwrap_or(s);
        Some(match bare {
            "NORMAL" => Type::Normal,
            "FIGHTING" => Type::Fighting,
            "FLYING" => Type::Flying,
            "POISON" => Type::Poison,
            "GROUND" => Type::Ground,
            "ROCK" => Type::Rock,
            "BUG" => Type::Bug,
            "GHOST" => Type::Ghost,
            "STEEL" => Type::Steel,
            "FIRE" => Type::Fire,
            "WATER" => Type::Water,
            "GRASS" => Type::Grass,
            "ELECTRIC" => Type::Electric,
            "PSYCHIC" => Type::Psychic,
            "ICE" => Type::Ice,
            "DRAGON" => Type::Dragon,
            "DARK" => Type::Dark,
            "FAIRY" => Type::Fairy,
            _ => return None,
        })
    }

    /// Single bit mask for this type.
    #[inline]
    pub fn mask(self) -> TypeMask {
        TypeMask::from_bits_truncate(1 << self as u32)
    }
}

bitflags! {
    /// Set of types, one bit per [`Type`] discriminant.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct TypeMask: u32 {
        const NORMAL   = 1 << 0;
        const FIGHTING = 1 << 1;
        const FLYING   = 1 << 2;
        const POISON   = 1 << 3;
        const GROUND   = 1 << 4;
        const ROCK     = 1 << 5;
        const BUG      = 1 << 6;
        const GHOST    = 1 << 7;
        const STEEL    = 1 << 8;
        const FIRE     = 1 << 9;
        const WATER    = 1 << 10;
        const GRASS    = 1 << 11;
        const ELECTRIC = 1 << 12;
        const PSYCHIC  = 1 << 13;
        const ICE      = 1 << 14;
        const DRAGON   = 1 << 15;
        const DARK     = 1 << 16;
        const FAIRY    = 1 << 17;
    }
}

impl TypeMask {
    /// Types in the mask, in discriminant order.
    pub fn types(self) -> impl Iterator<Item = Type> {
        Type::ALL.into_iter().filter(move |t| self.contains(t.mask()))
    }

    /// True when every type in `other` is present.
    #[inline]
    pub fn has_all(self, other: TypeMask) -> bool {
        self.contains(other)
    }

    /// True when any type in `other` is present.
    #[inline]
    pub fn has_any(self, other: TypeMask) -> bool {
        self.intersects(other)
    }
}

impl From<Type> for TypeMask {
    fn from(t: Type) -> Self {
        t.mask()
    }
}

impl FromIterator<Type> for TypeMask {
    fn from_iter<I: IntoIterator<Item = Type>>(iter: I) -> Self {
        iter.into_iter().fold(TypeMask::empty(), |acc, t| acc | t.mask())
    }
}
