//! Errors produced while coercing or validating input values.
//!
//! Two channels that are never conflated: [`InvalidValue`] is the soft
//! "cannot be represented under this type" marker that coercion propagates
//! upward, and [`InputValueError`] is a detailed report produced by the
//! validation walk, one per violation.

use std::fmt;

use displaydoc::Display;
use serde::Serialize;
use serde_json_bytes::Value;
use thiserror::Error;

use crate::path::Path;

/// Marker for a candidate value that cannot be represented under the
/// expected input type.
///
/// Distinct from coercing to `Value::Null`: a nullable position holding
/// `null` coerces successfully, while `InvalidValue` aborts the innermost
/// composite being built and propagates to the entry point. It carries no
/// detail; the validation walk recomputes every violation with full
/// messages when the caller asks for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidValue;

/// `" Did you mean 'x', 'y', or 'z'?"` suffix for misspelled-name reports.
///
/// Displays as the empty string when there is nothing to suggest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DidYouMean(Vec<String>);

impl DidYouMean {
    pub(crate) fn new(suggestions: Vec<String>) -> Self {
        Self(suggestions)
    }

    pub fn suggestions(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for DidYouMean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        write!(f, " Did you mean ")?;
        match self.0.as_slice() {
            [only] => write!(f, "'{only}'?"),
            [first, second] => write!(f, "'{first}' or '{second}'?"),
            [head @ .., last] => {
                for suggestion in head {
                    write!(f, "'{suggestion}', ")?;
                }
                write!(f, "or '{last}'?")
            }
            [] => Ok(()),
        }
    }
}

/// The violation classes an input value can be reported for.
///
/// Messages follow the input-coercion rules of the GraphQL specification:
/// <https://spec.graphql.org/draft/#sec-Input-Values>
#[derive(Error, Display, Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum InputValueErrorKind {
    /// expected non-nullable type '{ty}' not to be null
    UnexpectedNull { ty: String },
    /// expected type '{ty}' to be an object
    NotAnObject { ty: String },
    /// field '{field}' of required type '{ty}' was not provided
    MissingRequiredField { field: String, ty: String },
    /// field '{field}' is not defined by type '{ty}'.{did_you_mean}
    UndefinedField {
        field: String,
        ty: String,
        did_you_mean: DidYouMean,
    },
    /// Int cannot represent non-integer value: {value}
    IntNotAnInteger { value: String },
    /// Int cannot represent non 32-bit signed integer value: {value}
    IntTooLarge { value: String },
    /// Float cannot represent non-numeric value: {value}
    FloatNotANumber { value: String },
    /// String cannot represent a non-string value: {value}
    StringNotAString { value: String },
    /// Boolean cannot represent a non-boolean value: {value}
    BooleanNotABoolean { value: String },
    /// ID cannot represent value: {value}
    InvalidId { value: String },
    /// Enum '{ty}' cannot represent non-string value: {value}
    EnumValueNotAString { ty: String, value: String },
    /// value '{value}' does not exist in '{ty}' enum.{did_you_mean}
    UndefinedEnumValue {
        value: String,
        ty: String,
        did_you_mean: DidYouMean,
    },
    /// variable '${name}' of required type '{ty}' was not provided
    MissingRequiredVariable { name: String, ty: String },
    /// '{ty}' is not a defined input type
    NotAnInputType { ty: String },
    /// value is not coercible to type '{ty}'
    NotCoercible { ty: String },
}

/// A single structural violation found in an input value.
///
/// The validation walk produces zero or more of these per call and never
/// stops at the first; the default coercion entry point returns the first
/// one it is handed.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("invalid value {}{}: {kind}", render_json(.value), .path.in_input_value())]
pub struct InputValueError {
    /// What went wrong.
    pub kind: InputValueErrorKind,
    /// Where it went wrong, relative to the root of the coerced value.
    pub path: Path,
    /// The offending (sub)value, as received.
    pub value: Value,
}

/// Compact JSON rendering of a value for inclusion in error messages.
pub(crate) fn render_json(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_default()
}
