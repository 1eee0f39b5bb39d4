//! Creature tag masks, regions and the static tag tables.
//!
//! Tags are pure derivations from a creature's dex number, its template
//! variant and its form name. None of them depend on family resolution.

use bitflags::bitflags;
use phf::phf_set;

use crate::classify::EntryKind;

bitflags! {
    /// Categorical properties of a creature, one named bit each.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Tags: u16 {
        const LEGENDARY       = 1 << 0;
        const MYTHIC          = 1 << 1;
        const MEGA            = 1 << 2;
        const SHADOW_ELIGIBLE = 1 << 3;
        const SHADOW          = 1 << 4;
        const PURIFIED        = 1 << 5;
        const ALOLAN          = 1 << 6;
        const GALARIAN        = 1 << 7;
        const STARTER         = 1 << 8;
        const REGIONAL        = 1 << 9;
    }
}

impl Tags {
    #[inline]
    pub fn is_legendary(self) -> bool {
        self.contains(Tags::LEGENDARY)
    }

    #[inline]
    pub fn is_mythic(self) -> bool {
        self.contains(Tags::MYTHIC)
    }

    #[inline]
    pub fn is_mega(self) -> bool {
        self.contains(Tags::MEGA)
    }

    #[inline]
    pub fn is_shadow_eligible(self) -> bool {
        self.contains(Tags::SHADOW_ELIGIBLE)
    }

    #[inline]
    pub fn is_shadow(self) -> bool {
        self.contains(Tags::SHADOW)
    }

    #[inline]
    pub fn is_purified(self) -> bool {
        self.contains(Tags::PURIFIED)
    }

    #[inline]
    pub fn is_alolan(self) -> bool {
        self.contains(Tags::ALOLAN)
    }

    #[inline]
    pub fn is_galarian(self) -> bool {
        self.contains(Tags::GALARIAN)
    }

    #[inline]
    pub fn is_starter(self) -> bool {
        self.contains(Tags::STARTER)
    }

    #[inline]
    pub fn is_regional(self) -> bool {
        self.contains(Tags::REGIONAL)
    }
}

// ============================================================================
// Regions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Region {
    Kanto = 0,
    Johto = 1,
    Hoenn = 2,
    Sinnoh = 3,
    Unova = 4,
    Kalos = 5,
    Alola = 6,
    Galar = 7,
    Unknown = 8,
}

/// Inclusive dex range of a region.
#[derive(Debug, Clone, Copy)]
pub struct RegionRange {
    pub region: Region,
    pub dex_start: u16,
    pub dex_end: u16,
}

pub static REGIONS: [RegionRange; 8] = [
    RegionRange { region: Region::Kanto, dex_start: 1, dex_end: 151 },
    RegionRange { region: Region::Johto, dex_start: 152, dex_end: 251 },
    RegionRange { region: Region::Hoenn, dex_start: 252, dex_end: 386 },
    RegionRange { region: Region::Sinnoh, dex_start: 387, dex_end: 493 },
    RegionRange { region: Region::Unova, dex_start: 494, dex_end: 649 },
    RegionRange { region: Region::Kalos, dex_start: 650, dex_end: 721 },
    RegionRange { region: Region::Alola, dex_start: 722, dex_end: 809 },
    RegionRange { region: Region::Galar, dex_start: 810, dex_end: 898 },
];

impl Region {
    /// Region a dex number belongs to.
    pub fn of_dex(dex: u16) -> Region {
        REGIONS
            .iter()
            .find(|r| r.dex_start <= dex && dex <= r.dex_end)
            .map(|r| r.region)
            .unwrap_or(Region::Unknown)
    }

    /// Dex range, `None` for [`Region::Unknown`].
    pub fn range(self) -> Option<&'static RegionRange> {
        REGIONS.iter().find(|r| r.region == self)
    }

    /// Whether `dex` falls in this region. Unknown matches any dex number
    /// outside every known range.
    pub fn contains(self, dex: u16) -> bool {
        match self.range() {
            Some(r) => r.dex_start <= dex && dex <= r.dex_end,
            None => Region::of_dex(dex) == Region::Unknown,
        }
    }
}

// ============================================================================
// Static tag tables
// ============================================================================

static LEGENDARY: phf::Set<u16> = phf_set! {
    144u16, 145u16, 146u16, 150u16,
    243u16, 244u16, 245u16, 249u16, 250u16,
    377u16, 378u16, 379u16, 380u16, 381u16, 382u16, 383u16, 384u16,
    480u16, 481u16, 482u16, 483u16, 484u16, 485u16, 486u16, 487u16, 488u16,
    638u16, 639u16, 640u16, 641u16, 642u16, 643u16, 644u16, 645u16, 646u16,
    716u16, 717u16, 718u16,
    785u16, 786u16, 787u16, 788u16, 789u16, 790u16, 791u16, 792u16, 800u16,
    888u16, 889u16, 890u16, 891u16, 892u16, 894u16, 895u16, 896u16, 897u16, 898u16,
};

static MYTHIC: phf::Set<u16> = phf_set! {
    151u16, 251u16, 385u16, 386u16,
    489u16, 490u16, 491u16, 492u16, 493u16,
    494u16, 647u16, 648u16, 649u16,
    719u16, 720u16, 721u16,
    801u16, 802u16, 807u16, 808u16, 809u16, 893u16,
};

static MEGA_CAPABLE: phf::Set<u16> = phf_set! {
    3u16, 6u16, 9u16, 15u16, 18u16, 65u16, 80u16, 94u16, 115u16, 127u16,
    130u16, 142u16, 150u16, 181u16, 208u16, 212u16, 214u16, 229u16, 248u16,
    254u16, 257u16, 260u16, 282u16, 302u16, 303u16, 306u16, 308u16, 310u16,
    319u16, 323u16, 334u16, 354u16, 359u16, 362u16, 373u16, 376u16, 380u16,
    381u16, 384u16, 428u16, 445u16, 448u16, 460u16, 475u16, 531u16, 719u16,
};

static REGIONAL_EXCLUSIVE: phf::Set<u16> = phf_set! {
    83u16, 115u16, 122u16, 128u16, 214u16, 222u16,
    313u16, 314u16, 324u16, 335u16, 336u16, 337u16, 338u16, 357u16, 369u16,
    417u16, 441u16, 455u16,
    511u16, 513u16, 515u16, 556u16, 561u16, 626u16, 631u16, 632u16,
    701u16, 707u16,
};

/// Starter lines, first stage through final evolution.
static STARTER_LINES: [(u16, u16); 8] = [
    (1, 9),
    (152, 160),
    (252, 260),
    (387, 395),
    (495, 503),
    (650, 658),
    (722, 730),
    (810, 818),
];

/// Inputs to tag derivation gathered by the creature builder.
#[derive(Debug, Clone, Copy)]
pub struct TagSource<'a> {
    pub dex: u16,
    pub kind: EntryKind,
    pub form_name: &'a str,
    pub shadow_eligible: bool,
    /// `pokemonClass` field, when present.
    pub class: Option<&'a str>,
}

/// Derive a creature's tag mask.
pub fn derive_tags(src: &TagSource<'_>) -> Tags {
    let mut tags = Tags::empty();
    let dex = src.dex;

    if LEGENDARY.contains(&dex) || src.class == Some("POKEMON_CLASS_LEGENDARY") {
        tags |= Tags::LEGENDARY;
    }
    if MYTHIC.contains(&dex) || src.class == Some("POKEMON_CLASS_MYTHIC") {
        tags |= Tags::MYTHIC;
    }
    if MEGA_CAPABLE.contains(&dex) || src.form_name.starts_with("MEGA") {
        tags |= Tags::MEGA;
    }
    if REGIONAL_EXCLUSIVE.contains(&dex) {
        tags |= Tags::REGIONAL;
    }
    if STARTER_LINES.iter().any(|&(lo, hi)| lo <= dex && dex <= hi) {
        tags |= Tags::STARTER;
    }

    match src.kind {
        EntryKind::CreatureShadow => tags |= Tags::SHADOW,
        EntryKind::CreaturePurified => tags |= Tags::PURIFIED,
        _ => {}
    }
    if src.shadow_eligible {
        tags |= Tags::SHADOW_ELIGIBLE;
    }

    // Shadow and purified regional forms are named e.g. `ALOLA_SHADOW`.
    for part in src.form_name.split('_') {
        match part {
            "ALOLA" => tags |= Tags::ALOLAN,
            "GALARIAN" => tags |= Tags::GALARIAN,
            _ => {}
        }
    }

    tags
}
