use crate::catalog::{FieldDescriptor, ValueType};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Comparison operators a user can pick for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Equals,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "between")]
    Between,
    #[serde(rename = "in")]
    InSet,
}

const NUMERIC_OPERATORS: [Operator; 4] = [
    Operator::Equals,
    Operator::LessThan,
    Operator::GreaterThan,
    Operator::Between,
];

const TEXT_OPERATORS: [Operator; 2] = [Operator::Equals, Operator::InSet];

impl Operator {
    /// Label shown in the operator dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Operator::Equals => "Equal To",
            Operator::LessThan => "Less Than",
            Operator::GreaterThan => "Greater Than",
            Operator::Between => "Between",
            Operator::InSet => "In",
        }
    }

    /// Short form used in filter descriptions and configuration.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Equals => "==",
            Operator::LessThan => "<",
            Operator::GreaterThan => ">",
            Operator::Between => "between",
            Operator::InSet => "in",
        }
    }

    /// Operators offered for a value type, in presentation order.
    pub fn for_value_type(value_type: ValueType) -> &'static [Operator] {
        match value_type {
            ValueType::Numeric => &NUMERIC_OPERATORS,
            ValueType::Text => &TEXT_OPERATORS,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operator {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Operator::Equals),
            "<" => Ok(Operator::LessThan),
            ">" => Ok(Operator::GreaterThan),
            "between" => Ok(Operator::Between),
            "in" => Ok(Operator::InSet),
            _ => anyhow::bail!("Invalid filter operator: {}", s),
        }
    }
}

/// Operators legal for `descriptor`, paired with their display labels.
pub fn operators_for(descriptor: &FieldDescriptor) -> Vec<(Operator, &'static str)> {
    Operator::for_value_type(descriptor.value_type)
        .iter()
        .map(|op| (*op, op.label()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(value_type: ValueType) -> FieldDescriptor {
        FieldDescriptor {
            field: "value".to_string(),
            display_name: "Value".to_string(),
            value_type,
            help_text: String::new(),
        }
    }

    #[test]
    fn test_numeric_operators_in_order() {
        let ops: Vec<Operator> = operators_for(&descriptor(ValueType::Numeric))
            .into_iter()
            .map(|(op, _)| op)
            .collect();
        assert_eq!(
            ops,
            vec![
                Operator::Equals,
                Operator::LessThan,
                Operator::GreaterThan,
                Operator::Between
            ]
        );
    }

    #[test]
    fn test_text_operators_in_order() {
        let ops = operators_for(&descriptor(ValueType::Text));
        assert_eq!(
            ops,
            vec![(Operator::Equals, "Equal To"), (Operator::InSet, "In")]
        );
    }

    #[test]
    fn test_symbol_parses_back() {
        for op in NUMERIC_OPERATORS.iter().chain(TEXT_OPERATORS.iter()) {
            assert_eq!(Operator::from_str(op.symbol()).unwrap(), *op);
        }
        for text in [">=", "=", "eq", "lt", "gt", " ==", "IN", "Between"] {
            assert!(Operator::from_str(text).is_err(), "{}", text);
        }
    }

    #[test]
    fn test_serde_uses_symbols() {
        let json = serde_json::to_string(&Operator::Between).unwrap();
        assert_eq!(json, "\"between\"");
        let op: Operator = serde_json::from_str("\"in\"").unwrap();
        assert_eq!(op, Operator::InSet);
    }
}
