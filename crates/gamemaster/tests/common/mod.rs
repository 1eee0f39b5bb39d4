//! Shared helpers for the ingestion tests.
//!
//! Documents are built as `serde_json::Value`s so each test states only the
//! fields it cares about.

#![allow(dead_code)]

pub mod builders;

use gamemaster::{IngestConfig, IngestContext, IngestError, Ingested};
use serde_json::Value;

/// Ingest with the default configuration, panicking on a fatal error.
pub fn ingest(doc: &Value) -> Ingested {
    ingest_with(doc, IngestConfig::default()).expect("ingestion should succeed")
}

pub fn ingest_with(doc: &Value, config: IngestConfig) -> Result<Ingested, IngestError> {
    IngestContext::new(config)?.ingest_value(doc)
}

/// Creature names in acceptance order.
pub fn creature_names(out: &Ingested) -> Vec<&str> {
    out.game_master
        .creatures
        .iter()
        .map(|c| c.name.as_str())
        .collect()
}

/// Template ids of rejected entries, in report order.
pub fn rejected_ids(out: &Ingested) -> Vec<&str> {
    out.report
        .rejections
        .iter()
        .map(|r| r.template_id.as_str())
        .collect()
}
