use crate::validate::InputRejection;

#[derive(Debug, PartialEq)]
pub enum FilterError {
    UnknownLayer(String),
    UnknownField { layer: String, field: String },
    OperatorNotApplicable { field: String, operator: String },
    Rejected(InputRejection),
    NoTargets,
    MismatchedPriors { targets: usize, priors: usize },
    EntryNotFound(String),
    Engine { target: String, message: String },
    InvalidExpression(String),
}

impl From<InputRejection> for FilterError {
    fn from(rejection: InputRejection) -> Self {
        FilterError::Rejected(rejection)
    }
}

impl From<FilterError> for String {
    fn from(error: FilterError) -> Self {
        error.to_string()
    }
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::UnknownLayer(layer) => write!(f, "Unknown layer: {}", layer),
            FilterError::UnknownField { layer, field } => {
                write!(f, "Unknown field {} on layer {}", field, layer)
            }
            FilterError::OperatorNotApplicable { field, operator } => {
                write!(f, "Operator {} cannot be used with field {}", operator, field)
            }
            FilterError::Rejected(rejection) => write!(f, "Invalid input: {}", rejection),
            FilterError::NoTargets => write!(f, "A filter needs at least one target"),
            FilterError::MismatchedPriors { targets, priors } => write!(
                f,
                "Expected one prior predicate per target: {} targets, {} priors",
                targets, priors
            ),
            FilterError::EntryNotFound(id) => write!(f, "Filter history entry not found: {}", id),
            FilterError::Engine { target, message } => {
                write!(f, "Map engine failed on target {}: {}", target, message)
            }
            FilterError::InvalidExpression(msg) => write!(f, "Invalid expression: {}", msg),
        }
    }
}

impl std::error::Error for FilterError {}
