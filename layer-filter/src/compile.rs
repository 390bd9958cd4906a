//! Turns a validated field/operator/text triple into a predicate.
//!
//! `Equals` picks numeric or text comparison from whether the text parses as
//! a number, not from the field's declared type. Numeric comparisons always
//! cast the attribute explicitly since the engine does not coerce.

use crate::expression::{Attribute, ComparisonOp, Expression, Literal};
use crate::operator::Operator;
use crate::validate::parse_number;

/// Compiles `text` for `operator` on `field`.
///
/// Input is expected to have passed [`crate::validate::validate`]. Unparseable
/// numbers on unvalidated input compile to `NaN` literals, which match nothing.
pub fn compile(field: &str, operator: Operator, text: &str) -> Expression {
    let expression = match operator {
        Operator::Equals => match parse_number(text) {
            Some(n) => numeric(ComparisonOp::Eq, field, n),
            None => Expression::Comparison {
                op: ComparisonOp::Eq,
                attribute: Attribute::Value(field.to_string()),
                literal: Literal::Text(text.to_string()),
            },
        },
        Operator::InSet => Expression::SetMembership {
            attribute: field.to_string(),
            values: text.split(',').map(str::to_string).collect(),
        },
        Operator::GreaterThan => numeric(ComparisonOp::Gt, field, number(text)),
        Operator::LessThan => numeric(ComparisonOp::Lt, field, number(text)),
        Operator::Between => {
            let (low, high) = text.split_once(',').unwrap_or((text, ""));
            Expression::All(vec![
                numeric(ComparisonOp::Gt, field, number(low)),
                numeric(ComparisonOp::Lt, field, number(high)),
            ])
        }
    };
    tracing::debug!("Compiled {} {} {:?} into {}", field, operator, text, expression);
    expression
}

fn number(text: &str) -> f64 {
    parse_number(text).unwrap_or(f64::NAN)
}

fn numeric(op: ComparisonOp, field: &str, n: f64) -> Expression {
    Expression::Comparison {
        op,
        attribute: Attribute::Numeric(field.to_string()),
        literal: Literal::Number(n),
    }
}
