//! Attribute filters for web map layers.
//!
//! A user picks a layer, a field and an operator and types a value. The value
//! is checked against the operator's grammar ([`validate`]), compiled into a
//! predicate ([`compile`]) and pushed to every engine target of the layer
//! through the [`FilterLedger`], which remembers what each target showed
//! before so the filter can be reverted exactly.

pub mod catalog;
pub mod compile;
pub mod config;
pub mod engine;
pub mod errors;
pub mod expression;
pub mod help;
pub mod ledger;
pub mod operator;
pub mod session;
pub mod validate;

pub use catalog::{FieldCatalog, FieldDescriptor, LayerFilterProfile, LayerTarget, ValueType};
pub use compile::compile;
pub use config::{CatalogConfig, CONFIG_PATH_ENV};
pub use engine::{InMemoryEngine, MapEngine};
pub use errors::FilterError;
pub use expression::{Attribute, ComparisonOp, Expression, Literal};
pub use help::{field_help, layer_help, operator_help};
pub use ledger::{EntryDescription, EntryId, FilterHistoryEntry, FilterLedger, NewFilter};
pub use operator::{operators_for, Operator};
pub use session::{FilterSession, RawFilterInput};
pub use validate::{validate, InputRejection};
