//! Predicates for narrowing creature tables and rosters.
//!
//! Every concrete predicate works on both shapes, a bare [`Creature`] and a
//! [`BaseMon`]. Closures are predicates too, and [`OnBase`] lifts any
//! creature predicate (closures included) onto [`BaseMon`].

use crate::creatures::Creature;
use crate::moves::MoveId;
use crate::roster::BaseMon;
use crate::tags::{Region, Tags};
use crate::types::TypeMask;

pub trait Predicate<T: ?Sized> {
    fn test(&self, item: &T) -> bool;
}

impl<T: ?Sized, F> Predicate<T> for F
where
    F: Fn(&T) -> bool,
{
    #[inline]
    fn test(&self, item: &T) -> bool {
        self(item)
    }
}

/// Chaining for the predicate types defined here.
pub trait PredicateExt: Sized {
    fn and<Q>(self, other: Q) -> And<Self, Q> {
        And(self, other)
    }

    fn or<Q>(self, other: Q) -> Or<Self, Q> {
        Or(self, other)
    }

    fn negate(self) -> Not<Self> {
        Not(self)
    }
}

// ============================================================================
// Combinators
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct And<A, B>(pub A, pub B);

#[derive(Debug, Clone, Copy)]
pub struct Or<A, B>(pub A, pub B);

#[derive(Debug, Clone, Copy)]
pub struct Not<P>(pub P);

impl<T: ?Sized, A: Predicate<T>, B: Predicate<T>> Predicate<T> for And<A, B> {
    #[inline]
    fn test(&self, item: &T) -> bool {
        self.0.test(item) && self.1.test(item)
    }
}

impl<T: ?Sized, A: Predicate<T>, B: Predicate<T>> Predicate<T> for Or<A, B> {
    #[inline]
    fn test(&self, item: &T) -> bool {
        self.0.test(item) || self.1.test(item)
    }
}

impl<T: ?Sized, P: Predicate<T>> Predicate<T> for Not<P> {
    #[inline]
    fn test(&self, item: &T) -> bool {
        !self.0.test(item)
    }
}

impl<A, B> PredicateExt for And<A, B> {}
impl<A, B> PredicateExt for Or<A, B> {}
impl<P> PredicateExt for Not<P> {}

pub fn and<A, B>(a: A, b: B) -> And<A, B> {
    And(a, b)
}

pub fn or<A, B>(a: A, b: B) -> Or<A, B> {
    Or(a, b)
}

pub fn not<P>(p: P) -> Not<P> {
    Not(p)
}

/// Lifts a creature predicate onto [`BaseMon`].
#[derive(Debug, Clone, Copy)]
pub struct OnBase<P>(pub P);

impl<'a, P: Predicate<Creature>> Predicate<BaseMon<'a>> for OnBase<P> {
    #[inline]
    fn test(&self, mon: &BaseMon<'a>) -> bool {
        self.0.test(mon.creature)
    }
}

impl<P> PredicateExt for OnBase<P> {}

// ============================================================================
// Creature predicates
// ============================================================================

macro_rules! creature_predicate {
    ($(#[$meta:meta])* $name:ident($arg:ty), |$mon:ident, $val:ident| $body:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub $arg);

        impl Predicate<Creature> for $name {
            #[inline]
            fn test(&self, $mon: &Creature) -> bool {
                let $val = self.0;
                $body
            }
        }

        impl<'a> Predicate<BaseMon<'a>> for $name {
            #[inline]
            fn test(&self, mon: &BaseMon<'a>) -> bool {
                Predicate::<Creature>::test(self, mon.creature)
            }
        }

        impl PredicateExt for $name {}
    };
}

creature_predicate!(
    /// Dex number falls in the region's range.
    InRegion(Region),
    |mon, region| region.contains(mon.dex)
);

creature_predicate!(
    /// Belongs to the family rooted at this dex number.
    InFamily(u16),
    |mon, family| mon.family == family
);

creature_predicate!(
    /// Carries any of the tags.
    HasTags(Tags),
    |mon, tags| mon.tags.intersects(tags)
);

creature_predicate!(TypesAny(TypeMask), |mon, types| mon.types.has_any(types));

creature_predicate!(TypesAll(TypeMask), |mon, types| mon.types.has_all(types));

creature_predicate!(
    /// Can learn the fast move, legacy or not.
    HasFast(MoveId),
    |mon, id| mon.has_fast(id)
);

creature_predicate!(
    /// Can learn the charged move, legacy or not.
    HasCharged(MoveId),
    |mon, id| mon.has_charged(id)
);

macro_rules! region_filters {
    ($($fname:ident => $region:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $fname() -> InRegion {
                InRegion(Region::$region)
            }
        )*
    };
}

region_filters! {
    kanto => Kanto,
    johto => Johto,
    hoenn => Hoenn,
    sinnoh => Sinnoh,
    unova => Unova,
    kalos => Kalos,
    alola => Alola,
    galar => Galar,
    region_unknown => Unknown,
}

macro_rules! tag_filters {
    ($($fname:ident => $tag:ident),* $(,)?) => {
        $(
            #[inline]
            pub fn $fname() -> HasTags {
                HasTags(Tags::$tag)
            }
        )*
    };
}

tag_filters! {
    legendary => LEGENDARY,
    mythic => MYTHIC,
    mythical => MYTHIC,
    mega => MEGA,
    shadow_eligible => SHADOW_ELIGIBLE,
    shadow => SHADOW,
    purified => PURIFIED,
    pure => PURIFIED,
    alolan => ALOLAN,
    galarian => GALARIAN,
    starter => STARTER,
    regional => REGIONAL,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creatures::{CreatureTable, MoveRef, Stats, NORMAL_FORM};
    use crate::roster::Ivs;
    use crate::types::Type;

    fn creature(dex: u16, name: &str, types: &[Type], tags: Tags) -> Creature {
        Creature {
            dex,
            form: 0,
            name: name.to_string(),
            form_name: NORMAL_FORM.to_string(),
            family: dex,
            types: types.iter().copied().collect(),
            stats: Stats::default(),
            fast_moves: vec![MoveRef { id: 214, legacy: false }],
            charged_moves: vec![MoveRef { id: 90, legacy: true }],
            tags,
            predecessor: None,
            next_form: None,
        }
    }

    fn table() -> CreatureTable {
        let mut table = CreatureTable::new();
        table
            .attach(creature(1, "BULBASAUR", &[Type::Grass, Type::Poison], Tags::STARTER), None)
            .unwrap();
        table
            .attach(creature(144, "ARTICUNO", &[Type::Ice, Type::Flying], Tags::LEGENDARY), None)
            .unwrap();
        table
            .attach(creature(249, "LUGIA", &[Type::Psychic, Type::Flying], Tags::LEGENDARY), None)
            .unwrap();
        table
    }

    fn names<'a>(it: impl Iterator<Item = &'a Creature>) -> Vec<&'a str> {
        it.map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_region_and_tags() {
        let table = table();
        assert_eq!(names(table.filter(&kanto())), vec!["BULBASAUR", "ARTICUNO"]);
        assert_eq!(names(table.filter(&legendary())), vec!["ARTICUNO", "LUGIA"]);
        assert_eq!(names(table.filter(&legendary().and(kanto()))), vec!["ARTICUNO"]);
        assert_eq!(names(table.filter(&starter().or(johto()))), vec!["BULBASAUR", "LUGIA"]);
        assert_eq!(names(table.filter(&legendary().negate())), vec!["BULBASAUR"]);
        assert!(table.filter(&region_unknown()).next().is_none());
    }

    #[test]
    fn test_types() {
        let table = table();
        let flying = TypeMask::from(Type::Flying);
        assert_eq!(names(table.filter(&TypesAny(flying))), vec!["ARTICUNO", "LUGIA"]);
        let ice_flying = TypeMask::from_iter([Type::Ice, Type::Flying]);
        assert_eq!(names(table.filter(&TypesAll(ice_flying))), vec!["ARTICUNO"]);
        let grass_fire = TypeMask::from_iter([Type::Grass, Type::Fire]);
        assert!(table.filter(&TypesAll(grass_fire)).next().is_none());
        assert_eq!(table.filter(&TypesAny(grass_fire)).count(), 1);
    }

    #[test]
    fn test_moves_and_family() {
        let table = table();
        assert_eq!(table.filter(&HasFast(214)).count(), 3);
        // Legacy moves still count.
        assert_eq!(table.filter(&HasCharged(90)).count(), 3);
        assert_eq!(table.filter(&HasCharged(214)).count(), 0);
        assert_eq!(names(table.filter(&InFamily(249))), vec!["LUGIA"]);
    }

    #[test]
    fn test_closures_and_base_mon() {
        let table = table();
        let strong = |c: &Creature| c.dex > 100;
        assert_eq!(table.filter(&strong).count(), 2);
        assert_eq!(table.filter(&and(strong, not(legendary()))).count(), 0);

        let lugia = table.get_by_name("LUGIA").unwrap();
        let mon = BaseMon::new(lugia, 40.0, Ivs::perfect()).unwrap();
        assert!(legendary().test(&mon));
        assert!(!kanto().test(&mon));
        assert!(OnBase(strong).test(&mon));
        assert!(OnBase(strong).and(johto()).test(&mon));
    }
}
