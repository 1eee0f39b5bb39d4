//! Deferred family resolution.
//!
//! A creature whose family reference is not yet indexed waits on a bounded
//! stack. Once the whole document has been swept, the stack is drained in
//! repeated passes until it empties or a pass attaches nothing.

use tracing::{debug, info, warn};

use crate::creatures::{CreatureTable, PendingCreature};
use crate::error::{EntryError, IngestError, Rejection};
use crate::tokens::TokenId;

/// A creature waiting for its family reference to appear.
#[derive(Debug, Clone)]
pub(crate) struct Deferred {
    pub token: TokenId,
    pub template_id: String,
    pub reference: String,
    pub pending: PendingCreature,
}

impl Deferred {
    fn reject(self, error: EntryError) -> Rejection {
        Rejection {
            template_id: self.template_id,
            token: self.token,
            error,
        }
    }
}

/// Outcome of draining the deferred stack.
#[derive(Debug, Default)]
pub(crate) struct Resolution {
    pub passes: usize,
    pub attached: usize,
    pub rejections: Vec<Rejection>,
}

/// Fixed capacity stack of deferred creatures.
#[derive(Debug)]
pub struct DeferredStack {
    entries: Vec<Deferred>,
    capacity: usize,
}

impl DeferredStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push an entry. Running out of room aborts the ingestion.
    pub(crate) fn push(&mut self, entry: Deferred) -> Result<(), IngestError> {
        if self.entries.len() >= self.capacity {
            return Err(IngestError::DeferredOverflow {
                capacity: self.capacity,
            });
        }
        debug!(
            template_id = %entry.template_id,
            reference = %entry.reference,
            depth = self.entries.len() + 1,
            "deferred creature"
        );
        self.entries.push(entry);
        Ok(())
    }

    /// Drain the stack into `table`.
    ///
    /// Each pass sweeps from the top of the stack down, attaching every
    /// entry whose reference is now indexed. Passes repeat while entries
    /// remain and the previous pass attached something, up to `max_passes`.
    /// Every productive pass removes at least one entry, so the pass count
    /// never exceeds the initial occupancy. Leftovers are reported once each.
    pub(crate) fn resolve(
        &mut self,
        table: &mut CreatureTable,
        max_passes: Option<usize>,
    ) -> Resolution {
        let mut out = Resolution::default();
        let initial = self.entries.len();

        while !self.entries.is_empty() && max_passes.map_or(true, |max| out.passes < max) {
            out.passes += 1;
            let before = self.entries.len();

            for i in (0..self.entries.len()).rev() {
                let Some(pred) = table.id_of(&self.entries[i].reference) else {
                    continue;
                };
                let entry = self.entries.remove(i);
                let pending = entry.pending.creature.clone();
                match table.attach(pending, Some(pred)) {
                    Ok(_) => out.attached += 1,
                    Err(err) => {
                        warn!(
                            template_id = %entry.template_id,
                            error = %err,
                            "rejected deferred creature"
                        );
                        out.rejections.push(entry.reject(err));
                    }
                }
            }

            let resolved = before - self.entries.len();
            info!(pass = out.passes, resolved, remaining = self.entries.len(), "resolution pass");
            if resolved == 0 {
                break;
            }
        }

        for entry in self.entries.drain(..) {
            warn!(
                template_id = %entry.template_id,
                reference = %entry.reference,
                "family reference never resolved"
            );
            let reference = entry.reference.clone();
            out.rejections.push(entry.reject(EntryError::UnresolvedFamily(reference)));
        }

        debug_assert!(out.passes <= initial);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creatures::{Creature, Stats, NORMAL_FORM};
    use crate::tags::Tags;
    use crate::types::{Type, TypeMask};

    fn deferred(dex: u16, name: &str, reference: &str) -> Deferred {
        Deferred {
            token: dex as usize,
            template_id: format!("V{dex:04}_POKEMON_{name}"),
            reference: reference.to_string(),
            pending: PendingCreature {
                creature: Creature {
                    dex,
                    form: 0,
                    name: name.to_string(),
                    form_name: NORMAL_FORM.to_string(),
                    family: 0,
                    types: TypeMask::from(Type::Normal),
                    stats: Stats::default(),
                    fast_moves: Vec::new(),
                    charged_moves: Vec::new(),
                    tags: Tags::empty(),
                    predecessor: None,
                    next_form: None,
                },
                reference: Some(reference.to_string()),
            },
        }
    }

    fn root(table: &mut CreatureTable, dex: u16, name: &str) {
        let d = deferred(dex, name, "");
        table.attach(d.pending.creature, None).unwrap();
    }

    #[test]
    fn test_push_respects_capacity() {
        let mut stack = DeferredStack::new(1);
        stack.push(deferred(2, "IVYSAUR", "BULBASAUR")).unwrap();
        let err = stack.push(deferred(3, "VENUSAUR", "IVYSAUR")).unwrap_err();
        assert!(matches!(err, IngestError::DeferredOverflow { capacity: 1 }));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_chain_resolves_within_occupancy() {
        let mut table = CreatureTable::new();
        root(&mut table, 1, "BULBASAUR");

        // Pushed so that the top of the stack depends on the entry below it.
        let mut stack = DeferredStack::new(8);
        stack.push(deferred(2, "IVYSAUR", "BULBASAUR")).unwrap();
        stack.push(deferred(3, "VENUSAUR", "IVYSAUR")).unwrap();

        let res = stack.resolve(&mut table, None);
        assert!(res.rejections.is_empty());
        assert_eq!(res.attached, 2);
        assert!(res.passes <= 2);
        assert!(stack.is_empty());
        assert_eq!(table.get_by_name("VENUSAUR").unwrap().family, 1);
    }

    #[test]
    fn test_unresolvable_reported_once() {
        let mut table = CreatureTable::new();
        root(&mut table, 1, "BULBASAUR");

        let mut stack = DeferredStack::new(8);
        stack.push(deferred(2, "IVYSAUR", "BULBASAUR")).unwrap();
        stack.push(deferred(999, "MISSINGNO", "NOBODY")).unwrap();

        let res = stack.resolve(&mut table, None);
        assert_eq!(res.passes, 2);
        assert_eq!(res.rejections.len(), 1);
        assert_eq!(
            res.rejections[0].error,
            EntryError::UnresolvedFamily("NOBODY".to_string())
        );
        assert!(table.get_by_name("MISSINGNO").is_none());
    }

    #[test]
    fn test_pass_cap() {
        let mut table = CreatureTable::new();
        root(&mut table, 1, "BULBASAUR");

        let mut stack = DeferredStack::new(8);
        stack.push(deferred(3, "VENUSAUR", "IVYSAUR")).unwrap();
        stack.push(deferred(2, "IVYSAUR", "BULBASAUR")).unwrap();

        // Top to bottom: IVYSAUR attaches first, then VENUSAUR in the same pass.
        let res = stack.resolve(&mut table, Some(1));
        assert_eq!(res.passes, 1);
        assert_eq!(res.attached, 2);

        let mut stack = DeferredStack::new(8);
        stack.push(deferred(5, "CHARMELEON", "CHARMANDER")).unwrap();
        stack.push(deferred(6, "CHARIZARD", "CHARMELEON")).unwrap();
        stack.push(deferred(4, "CHARMANDER", "BULBASAUR")).unwrap();
        let res = stack.resolve(&mut table, Some(1));
        assert_eq!(res.passes, 1);
        // CHARMANDER and CHARMELEON attach, CHARIZARD was swept before its
        // reference existed and the cap stops a second pass.
        assert_eq!(res.attached, 2);
        assert_eq!(
            res.rejections[0].error,
            EntryError::UnresolvedFamily("CHARMELEON".to_string())
        );
    }

    #[test]
    fn test_duplicate_name_during_resolution() {
        let mut table = CreatureTable::new();
        root(&mut table, 1, "BULBASAUR");
        root(&mut table, 2, "IVYSAUR");

        let mut stack = DeferredStack::new(8);
        stack.push(deferred(2, "IVYSAUR", "BULBASAUR")).unwrap();
        let res = stack.resolve(&mut table, None);
        assert_eq!(
            res.rejections[0].error,
            EntryError::DuplicateName("IVYSAUR".to_string())
        );
        assert_eq!(table.len(), 2);
    }
}
