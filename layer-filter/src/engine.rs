use crate::catalog::FieldCatalog;
use crate::expression::Expression;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// The map renderer's per-target filter slots.
pub trait MapEngine {
    /// Current predicate of `target`, `None` when unfiltered or unknown.
    fn predicate(&self, target: &str) -> Option<Expression>;

    fn set_predicate(&mut self, target: &str, predicate: Option<Expression>) -> anyhow::Result<()>;
}

/// Engine state kept in memory: one predicate slot per known target.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEngine {
    targets: IndexMap<String, Option<Expression>>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every target of `catalog` with its configured default predicate.
    pub fn from_catalog(catalog: &FieldCatalog) -> Self {
        let mut engine = Self::new();
        for target in catalog.targets() {
            engine.add_target(&target.id, target.default_predicate.clone());
        }
        engine
    }

    pub fn add_target(&mut self, target: &str, predicate: Option<Expression>) {
        self.targets.insert(target.to_string(), predicate);
    }

    pub fn has_target(&self, target: &str) -> bool {
        self.targets.contains_key(target)
    }

    /// Features of `target` that its current predicate lets through.
    pub fn visible<'a>(
        &self,
        target: &str,
        features: &'a [Map<String, Value>],
    ) -> Vec<&'a Map<String, Value>> {
        match self.targets.get(target) {
            Some(Some(predicate)) => features.iter().filter(|f| predicate.evaluate(f)).collect(),
            Some(None) => features.iter().collect(),
            None => Vec::new(),
        }
    }
}

impl MapEngine for InMemoryEngine {
    fn predicate(&self, target: &str) -> Option<Expression> {
        self.targets.get(target).cloned().flatten()
    }

    fn set_predicate(&mut self, target: &str, predicate: Option<Expression>) -> anyhow::Result<()> {
        let Some(slot) = self.targets.get_mut(target) else {
            anyhow::bail!("Unknown target: {}", target);
        };
        *slot = predicate;
        Ok(())
    }
}
