//! Ingestion settings.

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// The deferred stack index is a byte wide; capacity may not exceed it.
pub const MAX_DEFERRED_CAPACITY: usize = u8::MAX as usize;

/// Default capacity of the deferred family stack. Baby pre-evolutions and
/// every one of their forms defer, and overflow is fatal, so the default is
/// the largest capacity allowed.
pub const DEFAULT_DEFERRED_CAPACITY: usize = MAX_DEFERRED_CAPACITY;

/// Default top level key holding the template list.
pub const DEFAULT_TEMPLATES_KEY: &str = "itemTemplates";

/// Settings for one ingestion context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngestConfig {
    /// Capacity of the deferred family stack (1..=255).
    pub deferred_capacity: usize,

    /// Escalate per-entry rejections to a fatal error once this many
    /// accumulate. `None` never escalates.
    pub max_rejections: Option<usize>,

    /// Hard cap on family resolution passes. `None` runs until the deferred
    /// stack drains or a pass makes no progress.
    pub max_passes: Option<usize>,

    /// Top level key holding the template list.
    pub templates_key: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            deferred_capacity: DEFAULT_DEFERRED_CAPACITY,
            max_rejections: None,
            max_passes: None,
            templates_key: DEFAULT_TEMPLATES_KEY.to_string(),
        }
    }
}

impl IngestConfig {
    /// Set deferred stack capacity
    pub fn deferred_capacity(mut self, capacity: usize) -> Self {
        self.deferred_capacity = capacity;
        self
    }

    /// Set rejection threshold
    pub fn max_rejections(mut self, limit: usize) -> Self {
        self.max_rejections = Some(limit);
        self
    }

    /// Set resolution pass cap
    pub fn max_passes(mut self, passes: usize) -> Self {
        self.max_passes = Some(passes);
        self
    }

    /// Parse a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self, IngestError> {
        let config: IngestConfig = serde_json::from_str(text)
            .map_err(|e| IngestError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.deferred_capacity == 0 || self.deferred_capacity > MAX_DEFERRED_CAPACITY {
            return Err(IngestError::InvalidConfig(format!(
                "deferredCapacity must be within 1..={}, got {}",
                MAX_DEFERRED_CAPACITY, self.deferred_capacity
            )));
        }
        if self.max_passes == Some(0) {
            return Err(IngestError::InvalidConfig(
                "maxPasses must be at least 1".to_string(),
            ));
        }
        if self.templates_key.is_empty() {
            return Err(IngestError::InvalidConfig(
                "templatesKey must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
