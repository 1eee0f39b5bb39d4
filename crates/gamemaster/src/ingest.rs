//! Ingestion driver.
//!
//! A document is tokenized once and its template list swept twice in
//! document order: moves first, so every move name a creature lists can be
//! resolved no matter where the move appears, then creatures. Creatures whose
//! family reference is still unknown are deferred and resolved in passes
//! after the creature sweep.

use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

use crate::classify::{Classifier, EntryKind, PatternSet};
use crate::config::IngestConfig;
use crate::creatures::{CreatureTable, PendingCreature};
use crate::deferred::{Deferred, DeferredStack};
use crate::error::{EntryError, Failure, IngestError, Rejection, Result};
use crate::fields::{self, EntryHeader};
use crate::iter_stack::IterStack;
use crate::moves::{self, MoveTable};
use crate::tokens::{TokenKind, TokenTape};

/// The ingested move and creature tables.
#[derive(Debug, Clone, Default)]
pub struct GameMaster {
    pub moves: MoveTable,
    pub creatures: CreatureTable,
}

impl GameMaster {
    #[inline]
    pub fn moves(&self) -> &MoveTable {
        &self.moves
    }

    #[inline]
    pub fn creatures(&self) -> &CreatureTable {
        &self.creatures
    }
}

/// Aggregate outcome of one ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Template list entries seen.
    pub entries: usize,
    pub moves: usize,
    pub creatures: usize,
    /// Entries that are neither moves nor creatures.
    pub skipped: usize,
    /// Creatures that waited on the deferred stack.
    pub deferred: usize,
    pub resolution_passes: usize,
    pub rejections: Vec<Rejection>,
}

impl IngestReport {
    #[inline]
    pub fn rejected(&self) -> usize {
        self.rejections.len()
    }

    /// Rejections caused by a given kind of error.
    pub fn rejections_where<'a>(
        &'a self,
        pred: impl Fn(&EntryError) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Rejection> + 'a {
        self.rejections.iter().filter(move |r| pred(&r.error))
    }
}

/// Tables plus the report describing how they were built.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub game_master: GameMaster,
    pub report: IngestReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    Moves,
    Creatures,
}

/// Compiled classifier plus configuration. Build one and reuse it for any
/// number of documents.
#[derive(Debug, Clone)]
pub struct IngestContext {
    config: IngestConfig,
    classifier: Classifier,
}

impl IngestContext {
    pub fn new(config: IngestConfig) -> Result<Self> {
        Self::with_patterns(config, &PatternSet::default())
    }

    pub fn with_patterns(config: IngestConfig, patterns: &PatternSet) -> Result<Self> {
        config.validate()?;
        let classifier = Classifier::with_patterns(patterns)?;
        Ok(Self { config, classifier })
    }

    #[inline]
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    #[inline]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn ingest_path(&self, path: impl AsRef<Path>) -> Result<Ingested> {
        let path = path.as_ref();
        info!(path = %path.display(), "reading game master");
        let doc = std::fs::read_to_string(path)?;
        self.ingest_str(&doc)
    }

    pub fn ingest_str(&self, doc: &str) -> Result<Ingested> {
        let tape = TokenTape::parse(doc)?;
        self.ingest_tape(&tape)
    }

    pub fn ingest_value(&self, doc: &Value) -> Result<Ingested> {
        self.ingest_tape(&TokenTape::from_value(doc))
    }

    pub fn ingest_tape(&self, tape: &TokenTape) -> Result<Ingested> {
        let list = self.template_list(tape)?;
        info!(tokens = tape.len(), "ingesting game master");

        let mut run = Run {
            ctx: self,
            game_master: GameMaster::default(),
            report: IngestReport::default(),
            deferred: DeferredStack::new(self.config.deferred_capacity),
        };

        run.sweep(tape, list, Sweep::Moves)?;
        run.sweep(tape, list, Sweep::Creatures)?;
        run.resolve()?;

        let Run {
            game_master,
            mut report,
            ..
        } = run;
        report.moves = game_master.moves.len();
        report.creatures = game_master.creatures.len();
        info!(
            entries = report.entries,
            moves = report.moves,
            creatures = report.creatures,
            skipped = report.skipped,
            rejected = report.rejected(),
            passes = report.resolution_passes,
            "ingestion finished"
        );
        Ok(Ingested {
            game_master,
            report,
        })
    }

    fn template_list(&self, tape: &TokenTape) -> Result<usize> {
        let key = &self.config.templates_key;
        let missing = || IngestError::MissingTemplates(key.clone());
        if tape.kind(tape.root()) != Some(TokenKind::Object) {
            return Err(missing());
        }
        let mut stack = IterStack::new(tape);
        stack.enter(tape.root())?;
        let list = stack.find_key(key).ok_or_else(missing)?;
        if tape.kind(list) != Some(TokenKind::Array) {
            return Err(missing());
        }
        Ok(list)
    }
}

/// State of one ingestion.
struct Run<'c> {
    ctx: &'c IngestContext,
    game_master: GameMaster,
    report: IngestReport,
    deferred: DeferredStack,
}

impl Run<'_> {
    fn sweep(&mut self, tape: &TokenTape, list: usize, sweep: Sweep) -> Result<()> {
        let mut stack = IterStack::new(tape);
        stack.enter(list)?;

        while let Some(item) = stack.next(stack.hint()) {
            if sweep == Sweep::Moves {
                self.report.entries += 1;
            }
            let header = fields::read_header(&mut stack, item)?;
            let kind = header
                .as_ref()
                .map_or(EntryKind::NotRelevant, |h| self.ctx.classifier.classify(&h.template_id));

            match (sweep, header) {
                (Sweep::Moves, Some(header)) if kind.is_move() => {
                    self.visit_move(&mut stack, &header, kind)?
                }
                (Sweep::Creatures, Some(header)) if kind.is_creature() => {
                    self.visit_creature(&mut stack, &header, kind)?
                }
                (Sweep::Moves, _) if kind == EntryKind::NotRelevant => self.report.skipped += 1,
                _ => {}
            }
        }
        stack.exit();
        Ok(())
    }

    fn visit_move(
        &mut self,
        stack: &mut IterStack<'_>,
        header: &EntryHeader,
        kind: EntryKind,
    ) -> Result<()> {
        let depth = stack.depth();
        let result = moves::extract_move(stack, &self.ctx.classifier, header, kind)
            .and_then(|mv| self.game_master.moves.insert(mv).map_err(Failure::from));
        match result {
            Ok(_) => Ok(()),
            Err(Failure::Fatal(err)) => Err(err),
            Err(Failure::Entry(err)) => {
                stack.unwind_to(depth);
                self.reject(header, err)
            }
        }
    }

    fn visit_creature(
        &mut self,
        stack: &mut IterStack<'_>,
        header: &EntryHeader,
        kind: EntryKind,
    ) -> Result<()> {
        let depth = stack.depth();
        let pending = match crate::creatures::extract_creature(
            stack,
            &self.ctx.classifier,
            &self.game_master.moves,
            header,
            kind,
        ) {
            Ok(pending) => pending,
            Err(Failure::Fatal(err)) => return Err(err),
            Err(Failure::Entry(err)) => {
                stack.unwind_to(depth);
                return self.reject(header, err);
            }
        };
        self.place(header, pending)
    }

    /// Attach a creature now, or defer it until its reference is indexed.
    fn place(&mut self, header: &EntryHeader, pending: PendingCreature) -> Result<()> {
        let creatures: &mut CreatureTable = &mut self.game_master.creatures;
        let predecessor = match pending.reference.clone() {
            None => None,
            Some(reference) => match creatures.id_of(&reference) {
                Some(pred) => Some(pred),
                None => {
                    self.report.deferred += 1;
                    return self.deferred.push(Deferred {
                        token: header.token,
                        template_id: header.template_id.clone(),
                        reference,
                        pending,
                    });
                }
            },
        };
        match creatures.attach(pending.creature, predecessor) {
            Ok(_) => Ok(()),
            Err(err) => self.reject(header, err),
        }
    }

    fn resolve(&mut self) -> Result<()> {
        let resolution = self
            .deferred
            .resolve(&mut self.game_master.creatures, self.ctx.config.max_passes);
        if resolution.passes > 0 {
            info!(
                passes = resolution.passes,
                attached = resolution.attached,
                unresolved = resolution.rejections.len(),
                "family resolution finished"
            );
        }
        self.report.resolution_passes = resolution.passes;
        self.report.rejections.extend(resolution.rejections);
        self.check_limit()
    }

    fn reject(&mut self, header: &EntryHeader, error: EntryError) -> Result<()> {
        warn!(template_id = %header.template_id, token = header.token, %error, "rejected entry");
        self.report.rejections.push(Rejection {
            template_id: header.template_id.clone(),
            token: header.token,
            error,
        });
        self.check_limit()
    }

    fn check_limit(&self) -> Result<()> {
        match self.ctx.config.max_rejections {
            Some(limit) if self.report.rejections.len() > limit => {
                Err(IngestError::TooManyRejections {
                    rejected: self.report.rejections.len(),
                    limit,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Ingest a document with the default configuration.
pub fn ingest_str(doc: &str) -> Result<Ingested> {
    IngestContext::new(IngestConfig::default())?.ingest_str(doc)
}
