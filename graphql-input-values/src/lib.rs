//! Type-directed coercion and validation of GraphQL input values.
//!
//! Four operations over one schema, all reached through [`InputCoercion`]:
//!
//! * [`coerce_input_value`][InputCoercion::coerce_input_value] — coerce an
//!   externally-supplied value (for example deserialized JSON) against an
//!   input type.
//! * [`validate_input_value`][InputCoercion::validate_input_value] — the
//!   same walk, reporting every structural violation instead of producing
//!   a value.
//! * [`coerce_input_literal`][InputCoercion::coerce_input_literal] —
//!   coerce a parsed value literal, substituting variable references.
//! * [`literal_from_value`][InputCoercion::literal_from_value] — the
//!   inverse: spell an already-trusted value as a literal.
//!
//! The schema and the literal AST both come from `apollo-compiler`; values
//! are `serde_json_bytes` JSON. Coercion failures propagate as the soft
//! [`InvalidValue`] marker, while validation hands structured
//! [`InputValueError`]s to a caller-supplied sink.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

mod default_values;
mod error;
mod literal_coercion;
mod literal_from_value;
mod path;
mod scalars;
mod suggestions;
mod value_coercion;
mod value_validation;
mod variables;

pub use error::DidYouMean;
pub use error::InputValueError;
pub use error::InputValueErrorKind;
pub use error::InvalidValue;
#[allow(deprecated)]
pub use literal_coercion::value_from_ast;
pub use literal_coercion::value_from_literal_untyped;
pub use path::Path;
pub use path::PathElement;
pub use value_coercion::InputCoercion;

/// A keyed input value, as it appears in variable maps and coerced
/// input objects.
pub type Object = serde_json_bytes::Map<serde_json_bytes::ByteString, serde_json_bytes::Value>;
