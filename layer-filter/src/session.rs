//! One viewing session's filter state.
//!
//! The session owns the engine handle and the ledger and borrows the catalog,
//! so every filter change goes through one place. It is dropped with the view.

use crate::catalog::{FieldCatalog, FieldDescriptor, LayerFilterProfile};
use crate::compile::compile;
use crate::engine::MapEngine;
use crate::errors::FilterError;
use crate::ledger::{EntryDescription, EntryId, FilterHistoryEntry, FilterLedger, NewFilter};
use crate::operator::{operators_for, Operator};
use crate::validate::{validate, InputRejection};
use serde::{Deserialize, Serialize};

/// What the user picked and typed in the filter builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFilterInput {
    pub layer_id: String,
    pub field: String,
    pub operator: Operator,
    pub text: String,
}

impl RawFilterInput {
    pub fn new(
        layer_id: impl Into<String>,
        field: impl Into<String>,
        operator: Operator,
        text: impl Into<String>,
    ) -> Self {
        Self {
            layer_id: layer_id.into(),
            field: field.into(),
            operator,
            text: text.into(),
        }
    }
}

pub struct FilterSession<'a, E: MapEngine> {
    catalog: &'a FieldCatalog,
    engine: E,
    ledger: FilterLedger,
}

impl<'a, E: MapEngine> FilterSession<'a, E> {
    pub fn new(catalog: &'a FieldCatalog, engine: E) -> Self {
        Self {
            catalog,
            engine,
            ledger: FilterLedger::new(),
        }
    }

    pub fn catalog(&self) -> &'a FieldCatalog {
        self.catalog
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Operators to offer for a field; `None` until a known layer and field are picked.
    pub fn operators_for(
        &self,
        layer_id: &str,
        field: &str,
    ) -> Option<Vec<(Operator, &'static str)>> {
        self.catalog.describe_field(layer_id, field).map(operators_for)
    }

    /// Live diagnostic for the input box, including the one-filter-per-layer rule.
    pub fn check(&self, input: &RawFilterInput) -> Result<(), InputRejection> {
        validate(
            &input.text,
            input.operator,
            Some(input.layer_id.as_str()),
            Some(self.ledger.entries()),
        )
    }

    /// Validates, compiles and applies `input` to every target of its layer.
    pub fn submit(&mut self, input: &RawFilterInput) -> Result<EntryId, FilterError> {
        let catalog = self.catalog;
        let layer = catalog
            .describe_layer(&input.layer_id)
            .ok_or_else(|| FilterError::UnknownLayer(input.layer_id.clone()))?;
        let field = layer
            .field(&input.field)
            .ok_or_else(|| FilterError::UnknownField {
                layer: input.layer_id.clone(),
                field: input.field.clone(),
            })?;
        if !Operator::for_value_type(field.value_type).contains(&input.operator) {
            return Err(FilterError::OperatorNotApplicable {
                field: field.field.clone(),
                operator: input.operator.to_string(),
            });
        }
        if let Err(rejection) = self.check(input) {
            tracing::debug!(
                "Rejected filter input {:?} for {}: {}",
                input.text,
                input.layer_id,
                rejection
            );
            return Err(rejection.into());
        }

        let predicate = compile(&field.field, input.operator, &input.text);
        let targets = layer.target_ids();
        let prior_predicates = targets.iter().map(|t| self.engine.predicate(t)).collect();
        let filter = NewFilter {
            layer_id: layer.layer_id.clone(),
            targets,
            predicate,
            prior_predicates,
            description: describe(layer, field, input),
        };
        self.ledger.apply(&mut self.engine, filter)
    }

    pub fn revert(&mut self, id: EntryId) -> Result<FilterHistoryEntry, FilterError> {
        self.ledger.revert(&mut self.engine, id)
    }

    /// Active filters, oldest first.
    pub fn active_filters(&self) -> &[FilterHistoryEntry] {
        self.ledger.entries()
    }
}

fn describe(
    layer: &LayerFilterProfile,
    field: &FieldDescriptor,
    input: &RawFilterInput,
) -> EntryDescription {
    EntryDescription {
        title: format!("{} Filter:", layer.name),
        body: format!("{} {} {}", field.display_name, input.operator, input.text),
    }
}
