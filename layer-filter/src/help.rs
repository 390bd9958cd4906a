//! Help prose shown next to the filter builder's selectors.

use crate::catalog::{FieldDescriptor, LayerFilterProfile};
use crate::operator::Operator;

const GENERIC_OPERATOR_HELP: &str = "An operator is a simple way of summarising a comparison. \
Here it compares your input against the values of the features (polygons/lines/points) in a layer. \
For example 'Equal To' compares your input to each feature and is only true when they match completely.";

const GENERIC_LAYER_HELP: &str = "A layer is a map element, selected from the layer menu, \
containing polygons, lines or points. For example the Current Communities layer is a polygon layer.";

const GENERIC_FIELD_HELP: &str = "A field is a property of a layer that holds a value for each \
polygon/line/point, like a column in a spreadsheet. For example the Name field holds the name of each feature.";

/// Help for the selected operator, or an explanation of operators when none is selected.
pub fn operator_help(operator: Option<Operator>) -> &'static str {
    let Some(operator) = operator else {
        return GENERIC_OPERATOR_HELP;
    };
    match operator {
        Operator::Equals => {
            "Equal To: compares a single input to the selected field and only matches features \
whose value is exactly the input. E.g. SE-SEGH only returns the polygon of SE-SEGH."
        }
        Operator::InSet => {
            "In: compares several inputs separated by commas to the selected field and matches \
features whose value exactly equals any of them. E.g. SE-BUCKNG,SE-BUCKNG-02 returns the \
polygons of both SE-BUCKNG and SE-BUCKNG-02."
        }
        Operator::GreaterThan => {
            "Greater Than: compares a single number to the selected field and only matches features \
whose value is greater than the input. E.g. 400 only returns features with a value above 400."
        }
        Operator::LessThan => {
            "Less Than: compares a single number to the selected field and only matches features \
whose value is less than the input. E.g. 400 only returns features with a value below 400."
        }
        Operator::Between => {
            "Between: takes two numbers separated by a comma and only matches features whose value \
is greater than the first and less than the second. E.g. 100,400 returns features with a value \
between 100 and 400, excluding 100 and 400 themselves."
        }
    }
}

/// Name and description of the selected layer, or an explanation of layers.
pub fn layer_help(layer: Option<&LayerFilterProfile>) -> String {
    match layer {
        Some(layer) if layer.description.is_empty() => layer.name.clone(),
        Some(layer) => format!("{}\n\n{}", layer.name, layer.description),
        None => GENERIC_LAYER_HELP.to_string(),
    }
}

/// Name and help text of the selected field, or an explanation of fields.
pub fn field_help(field: Option<&FieldDescriptor>) -> String {
    match field {
        Some(field) if field.help_text.is_empty() => field.display_name.clone(),
        Some(field) => format!("{}\n\n{}", field.display_name, field.help_text),
        None => GENERIC_FIELD_HELP.to_string(),
    }
}
