//! History of applied filters and what they replaced.
//!
//! The ledger is mechanism only: it does not refuse a second filter on an
//! already filtered target. That policy lives in [`crate::validate::validate`],
//! which callers consult with [`FilterLedger::entries`] before applying.

use crate::errors::FilterError;
use crate::engine::MapEngine;
use crate::expression::Expression;
use serde::Serialize;
use uuid::Uuid;

/// Opaque handle for one applied filter, assigned when it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntryId(Uuid);

impl EntryId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text shown on the "active filter" control for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryDescription {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterHistoryEntry {
    pub id: EntryId,
    pub layer_id: String,
    pub targets: Vec<String>,
    pub predicate: Expression,
    /// Aligned with `targets`; `None` means the target had no filter.
    pub prior_predicates: Vec<Option<Expression>>,
    pub description: EntryDescription,
}

impl FilterHistoryEntry {
    /// True when this entry filters `id`, given as a layer id or a target id.
    pub fn covers(&self, id: &str) -> bool {
        self.layer_id == id || self.targets.iter().any(|t| t == id)
    }
}

/// A filter ready to be pushed to the engine.
#[derive(Debug, Clone)]
pub struct NewFilter {
    pub layer_id: String,
    pub targets: Vec<String>,
    pub predicate: Expression,
    pub prior_predicates: Vec<Option<Expression>>,
    pub description: EntryDescription,
}

#[derive(Debug, Default)]
pub struct FilterLedger {
    entries: Vec<FilterHistoryEntry>,
}

impl FilterLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes the predicate to every target, then records the entry.
    ///
    /// If the engine fails on a target, the targets already updated are put
    /// back to their priors and nothing is recorded.
    pub fn apply<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        filter: NewFilter,
    ) -> Result<EntryId, FilterError> {
        if filter.targets.is_empty() {
            return Err(FilterError::NoTargets);
        }
        if filter.targets.len() != filter.prior_predicates.len() {
            return Err(FilterError::MismatchedPriors {
                targets: filter.targets.len(),
                priors: filter.prior_predicates.len(),
            });
        }

        for (idx, target) in filter.targets.iter().enumerate() {
            if let Err(e) = engine.set_predicate(target, Some(filter.predicate.clone())) {
                tracing::warn!(
                    "Applying filter to {} failed, rolling back {} target(s): {:#}",
                    target,
                    idx,
                    e
                );
                for (applied, prior) in filter.targets[..idx]
                    .iter()
                    .zip(filter.prior_predicates.iter())
                {
                    if let Err(rollback_err) = engine.set_predicate(applied, prior.clone()) {
                        tracing::warn!("Rollback of {} failed: {:#}", applied, rollback_err);
                    }
                }
                return Err(FilterError::Engine {
                    target: target.clone(),
                    message: format!("{:#}", e),
                });
            }
        }

        let entry = FilterHistoryEntry {
            id: EntryId::new(),
            layer_id: filter.layer_id,
            targets: filter.targets,
            predicate: filter.predicate,
            prior_predicates: filter.prior_predicates,
            description: filter.description,
        };
        let id = entry.id;
        tracing::info!(
            "Applied filter {} to {}: {}",
            id,
            entry.targets.join(", "),
            entry.predicate
        );
        self.entries.push(entry);
        Ok(id)
    }

    /// Restores the priors recorded for `id` and drops the entry.
    ///
    /// The entry is kept if the engine fails, so the revert can be retried.
    pub fn revert<E: MapEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        id: EntryId,
    ) -> Result<FilterHistoryEntry, FilterError> {
        let idx = self
            .entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| FilterError::EntryNotFound(id.to_string()))?;

        let entry = &self.entries[idx];
        for (target, prior) in entry.targets.iter().zip(entry.prior_predicates.iter()) {
            engine
                .set_predicate(target, prior.clone())
                .map_err(|e| FilterError::Engine {
                    target: target.clone(),
                    message: format!("{:#}", e),
                })?;
        }

        let entry = self.entries.remove(idx);
        tracing::info!("Reverted filter {} on {}", id, entry.targets.join(", "));
        Ok(entry)
    }

    /// Active entries, oldest first.
    pub fn entries(&self) -> &[FilterHistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: EntryId) -> Option<&FilterHistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn entry_for(&self, id: &str) -> Option<&FilterHistoryEntry> {
        self.entries.iter().find(|entry| entry.covers(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
