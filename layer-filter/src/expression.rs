//! Boolean predicate trees handed to the map engine.
//!
//! The JSON form is the MapLibre expression syntax the engine accepts, e.g.
//! `["all", [">", ["to-number", ["get", "pop"]], 10], ["<", ["to-number", ["get", "pop"]], 20]]`.

use crate::errors::FilterError;
use crate::validate::parse_number;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Lt,
    Gt,
}

impl ComparisonOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "==",
            ComparisonOp::Lt => "<",
            ComparisonOp::Gt => ">",
        }
    }

    fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "==" => Some(ComparisonOp::Eq),
            "<" => Some(ComparisonOp::Lt),
            ">" => Some(ComparisonOp::Gt),
            _ => None,
        }
    }

    fn holds(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Gt => ordering == Ordering::Greater,
        }
    }
}

/// How a feature attribute is read.
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// `["get", field]`: the raw attribute value.
    Value(String),
    /// `["to-number", ["get", field]]`: the attribute cast to a number.
    Numeric(String),
}

impl Attribute {
    pub fn field(&self) -> &str {
        match self {
            Attribute::Value(field) | Attribute::Numeric(field) => field,
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Attribute::Value(field) => json!(["get", field]),
            Attribute::Numeric(field) => json!(["to-number", ["get", field]]),
        }
    }

    fn from_json(value: &Value) -> Result<Self, FilterError> {
        match value {
            // legacy filter syntax names the property directly
            Value::String(field) => Ok(Attribute::Value(field.clone())),
            Value::Array(items) => match items.as_slice() {
                [Value::String(op), Value::String(field)] if op == "get" => {
                    Ok(Attribute::Value(field.clone()))
                }
                [Value::String(op), inner] if op == "to-number" => match Attribute::from_json(inner)? {
                    Attribute::Value(field) => Ok(Attribute::Numeric(field)),
                    Attribute::Numeric(_) => Err(FilterError::InvalidExpression(format!(
                        "nested to-number: {}",
                        value
                    ))),
                },
                _ => Err(FilterError::InvalidExpression(format!(
                    "unsupported attribute accessor: {}",
                    value
                ))),
            },
            _ => Err(FilterError::InvalidExpression(format!(
                "unsupported attribute accessor: {}",
                value
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    fn to_json(&self) -> Value {
        match self {
            Literal::Number(n) => json!(n),
            Literal::Text(s) => json!(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Comparison {
        op: ComparisonOp,
        attribute: Attribute,
        literal: Literal,
    },
    SetMembership {
        attribute: String,
        values: Vec<String>,
    },
    All(Vec<Expression>),
    Any(Vec<Expression>),
    Not(Box<Expression>),
    /// Excludes every feature.
    False,
}

impl Expression {
    pub fn to_json(&self) -> Value {
        match self {
            Expression::Comparison {
                op,
                attribute,
                literal,
            } => json!([op.symbol(), attribute.to_json(), literal.to_json()]),
            Expression::SetMembership { attribute, values } => {
                let mut items = vec![json!("in"), json!(attribute)];
                items.extend(values.iter().map(|v| json!(v)));
                Value::Array(items)
            }
            Expression::All(children) => combinator_json("all", children),
            Expression::Any(children) => combinator_json("any", children),
            Expression::Not(child) => json!(["!", child.to_json()]),
            Expression::False => Value::Bool(false),
        }
    }

    /// Parses the subset of the engine's expression syntax that this crate emits.
    ///
    /// Input is normalized: `true` reads as an empty `all` and a bare property
    /// name reads as a `get` accessor, so [`Expression::to_json`] writes those
    /// back in the canonical form. Both forms select the same features.
    pub fn from_json(value: &Value) -> Result<Self, FilterError> {
        let items = match value {
            Value::Bool(false) => return Ok(Expression::False),
            Value::Bool(true) => return Ok(Expression::All(Vec::new())),
            Value::Array(items) => items,
            _ => {
                return Err(FilterError::InvalidExpression(format!(
                    "expected an expression array, found {}",
                    value
                )))
            }
        };
        let Some((Value::String(head), args)) = items.split_first() else {
            return Err(FilterError::InvalidExpression(format!(
                "expression has no operator: {}",
                value
            )));
        };

        if let Some(op) = ComparisonOp::from_symbol(head) {
            let [attribute, literal] = args else {
                return Err(FilterError::InvalidExpression(format!(
                    "{} takes two arguments: {}",
                    head, value
                )));
            };
            let literal = match literal {
                Value::Number(n) => Literal::Number(n.as_f64().ok_or_else(|| {
                    FilterError::InvalidExpression(format!("unrepresentable number {}", n))
                })?),
                Value::String(s) => Literal::Text(s.clone()),
                other => {
                    return Err(FilterError::InvalidExpression(format!(
                        "unsupported literal: {}",
                        other
                    )))
                }
            };
            return Ok(Expression::Comparison {
                op,
                attribute: Attribute::from_json(attribute)?,
                literal,
            });
        }

        match head.as_str() {
            "in" => {
                let Some((Value::String(attribute), members)) = args.split_first() else {
                    return Err(FilterError::InvalidExpression(format!(
                        "in expects a property name: {}",
                        value
                    )));
                };
                let values = members
                    .iter()
                    .map(|member| match member {
                        Value::String(s) => Ok(s.clone()),
                        other => Err(FilterError::InvalidExpression(format!(
                            "in expects string members, found {}",
                            other
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Expression::SetMembership {
                    attribute: attribute.clone(),
                    values,
                })
            }
            "all" => Ok(Expression::All(parse_children(args)?)),
            "any" => Ok(Expression::Any(parse_children(args)?)),
            "!" => match args {
                [child] => Ok(Expression::Not(Box::new(Expression::from_json(child)?))),
                _ => Err(FilterError::InvalidExpression(format!(
                    "! takes one argument: {}",
                    value
                ))),
            },
            _ => Err(FilterError::InvalidExpression(format!(
                "unsupported operator {}",
                head
            ))),
        }
    }

    /// Whether a feature with `properties` passes this predicate.
    pub fn evaluate(&self, properties: &Map<String, Value>) -> bool {
        match self {
            Expression::Comparison {
                op,
                attribute,
                literal,
            } => compare(*op, attribute, literal, properties),
            Expression::SetMembership { attribute, values } => match properties.get(attribute) {
                Some(Value::String(s)) => values.iter().any(|v| v == s),
                _ => false,
            },
            Expression::All(children) => children.iter().all(|c| c.evaluate(properties)),
            Expression::Any(children) => children.iter().any(|c| c.evaluate(properties)),
            Expression::Not(child) => !child.evaluate(properties),
            Expression::False => false,
        }
    }
}

fn combinator_json(name: &str, children: &[Expression]) -> Value {
    let mut items = vec![json!(name)];
    items.extend(children.iter().map(Expression::to_json));
    Value::Array(items)
}

fn parse_children(args: &[Value]) -> Result<Vec<Expression>, FilterError> {
    args.iter().map(Expression::from_json).collect()
}

/// Mirrors the engine's `to-number`: null is 0, booleans are 0/1, strings must parse.
fn to_number(value: Option<&Value>) -> Option<f64> {
    match value {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                parse_number(s)
            }
        }
        Some(_) => None,
    }
}

fn compare(
    op: ComparisonOp,
    attribute: &Attribute,
    literal: &Literal,
    properties: &Map<String, Value>,
) -> bool {
    let value = properties.get(attribute.field());
    let ordering = match (attribute, literal) {
        (Attribute::Numeric(_), Literal::Number(l)) => {
            to_number(value).and_then(|n| n.partial_cmp(l))
        }
        (Attribute::Value(_), Literal::Number(l)) => match value {
            Some(Value::Number(n)) => n.as_f64().and_then(|n| n.partial_cmp(l)),
            _ => None,
        },
        (Attribute::Value(_), Literal::Text(l)) => match value {
            Some(Value::String(s)) => Some(s.as_str().cmp(l.as_str())),
            _ => None,
        },
        (Attribute::Numeric(_), Literal::Text(_)) => None,
    };
    ordering.is_some_and(|o| op.holds(o))
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Expression::from_json(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("Expected object"),
        }
    }

    fn numeric(op: ComparisonOp, field: &str, n: f64) -> Expression {
        Expression::Comparison {
            op,
            attribute: Attribute::Numeric(field.to_string()),
            literal: Literal::Number(n),
        }
    }

    #[test]
    fn test_to_json_shapes() {
        let between = Expression::All(vec![
            numeric(ComparisonOp::Gt, "pop", 10.0),
            numeric(ComparisonOp::Lt, "pop", 20.0),
        ]);
        assert_eq!(
            between.to_json(),
            json!([
                "all",
                [">", ["to-number", ["get", "pop"]], 10.0],
                ["<", ["to-number", ["get", "pop"]], 20.0]
            ])
        );

        let members = Expression::SetMembership {
            attribute: "code".to_string(),
            values: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(members.to_json(), json!(["in", "code", "A", "B"]));
        assert_eq!(Expression::False.to_json(), json!(false));
        assert_eq!(
            Expression::Not(Box::new(members)).to_json(),
            json!(["!", ["in", "code", "A", "B"]])
        );
    }

    #[test]
    fn test_from_json_reads_engine_forms() {
        let parsed = Expression::from_json(&json!([
            "any",
            ["==", ["get", "kind"], "label"],
            ["!", ["in", "name", "A", "B"]],
            [">", ["to-number", ["get", "depth"]], 5]
        ]))
        .unwrap();
        assert_eq!(
            parsed,
            Expression::Any(vec![
                Expression::Comparison {
                    op: ComparisonOp::Eq,
                    attribute: Attribute::Value("kind".to_string()),
                    literal: Literal::Text("label".to_string()),
                },
                Expression::Not(Box::new(Expression::SetMembership {
                    attribute: "name".to_string(),
                    values: vec!["A".to_string(), "B".to_string()],
                })),
                numeric(ComparisonOp::Gt, "depth", 5.0),
            ])
        );
        assert_eq!(Expression::from_json(&json!(false)).unwrap(), Expression::False);
    }

    #[test]
    fn test_legacy_forms_are_normalized() {
        let legacy = Expression::from_json(&json!(["==", "kind", "label"])).unwrap();
        assert_eq!(legacy.to_json(), json!(["==", ["get", "kind"], "label"]));

        let always = Expression::from_json(&json!(true)).unwrap();
        assert_eq!(always.to_json(), json!(["all"]));

        for kind in ["label", "fill"] {
            let feature = props(json!({ "kind": kind }));
            assert_eq!(legacy.evaluate(&feature), kind == "label");
            assert!(always.evaluate(&feature));
        }
        // canonical output parses back unchanged
        assert_eq!(Expression::from_json(&legacy.to_json()).unwrap(), legacy);
        assert_eq!(Expression::from_json(&always.to_json()).unwrap(), always);
    }

    #[test]
    fn test_from_json_rejects_unknown_shapes() {
        for value in [
            json!(["coalesce", 1, 2]),
            json!([]),
            json!(["==", ["get", "a"]]),
            json!(["in", "a", 1]),
            json!(["!", true, false]),
            json!("all"),
            json!(["==", ["get", "a"], null]),
        ] {
            assert!(
                matches!(
                    Expression::from_json(&value),
                    Err(FilterError::InvalidExpression(_))
                ),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_numeric_cast_evaluation() {
        let gt = numeric(ComparisonOp::Gt, "pop", 10.0);
        assert!(gt.evaluate(&props(json!({"pop": 11}))));
        assert!(gt.evaluate(&props(json!({"pop": "11.5"}))));
        assert!(!gt.evaluate(&props(json!({"pop": 10}))));
        assert!(!gt.evaluate(&props(json!({"pop": "many"}))));
        // missing attributes read as null, which casts to zero
        let lt = numeric(ComparisonOp::Lt, "pop", 10.0);
        assert!(lt.evaluate(&props(json!({}))));
        assert!(lt.evaluate(&props(json!({"pop": false}))));
    }

    #[test]
    fn test_raw_equality_is_type_strict() {
        let eq = Expression::Comparison {
            op: ComparisonOp::Eq,
            attribute: Attribute::Value("code".to_string()),
            literal: Literal::Text("42".to_string()),
        };
        assert!(eq.evaluate(&props(json!({"code": "42"}))));
        assert!(!eq.evaluate(&props(json!({"code": 42}))));
        assert!(!eq.evaluate(&props(json!({}))));
    }

    #[test]
    fn test_raw_text_ordering() {
        let lt = Expression::Comparison {
            op: ComparisonOp::Lt,
            attribute: Attribute::Value("name".to_string()),
            literal: Literal::Text("m".to_string()),
        };
        assert!(lt.evaluate(&props(json!({"name": "alpha"}))));
        assert!(!lt.evaluate(&props(json!({"name": "zulu"}))));
    }

    #[test]
    fn test_set_membership_and_combinators() {
        let members = Expression::SetMembership {
            attribute: "code".to_string(),
            values: vec!["SE-A".to_string(), "SE-B".to_string()],
        };
        assert!(members.evaluate(&props(json!({"code": "SE-B"}))));
        assert!(!members.evaluate(&props(json!({"code": "SE-C"}))));

        let not = Expression::Not(Box::new(members.clone()));
        assert!(not.evaluate(&props(json!({"code": "SE-C"}))));

        assert!(Expression::All(vec![]).evaluate(&props(json!({}))));
        assert!(!Expression::Any(vec![]).evaluate(&props(json!({}))));
        assert!(!Expression::False.evaluate(&props(json!({"code": "SE-A"}))));
    }

    #[test]
    fn test_serde_uses_engine_json() {
        let expr = numeric(ComparisonOp::Lt, "depth", 3.5);
        let text = serde_json::to_string(&expr).unwrap();
        assert_eq!(text, r#"["<",["to-number",["get","depth"]],3.5]"#);
        let back: Expression = serde_json::from_str(&text).unwrap();
        assert_eq!(back, expr);
    }
}
