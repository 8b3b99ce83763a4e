use crate::chain::ChainError;
use crate::types::TypeParseError;
use miette::Report;

/// Renders a failed chain as a miette report: the failing operation, the
/// message, its code, and any help text.
pub fn render_report(error: &ChainError) -> String {
    format!("{:?}", Report::new(error.clone()))
}

/// Renders a type expression error with the offending input underlined.
pub fn render_type_error(error: &TypeParseError) -> String {
    format!("{:?}", Report::new(error.clone()))
}
