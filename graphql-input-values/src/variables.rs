//! Coercion of a request's variable values against an operation's variable
//! definitions.

use std::ops::ControlFlow;

use apollo_compiler::executable::Operation;
use serde_json_bytes::Value;

use crate::InputCoercion;
use crate::Object;
use crate::error::InputValueError;
use crate::error::InputValueErrorKind;
use crate::error::InvalidValue;
use crate::literal_coercion::value_from_literal_untyped;
use crate::path::Path;
use crate::path::PathElement;

impl InputCoercion<'_> {
    /// Coerce each provided variable value against its declared type, fill
    /// coerced default literals in for absent variables, and leave an
    /// absent nullable variable absent, so that literal coercion can tell
    /// "missing" apart from null later.
    ///
    /// Entries in `values` that no definition names are ignored. Errors
    /// across all variables are collected before failing; each error's path
    /// starts with the variable name.
    ///
    /// <https://spec.graphql.org/draft/#sec-Coercing-Variable-Values>
    #[tracing::instrument(skip_all, level = "trace")]
    pub fn coerce_variable_values(
        &self,
        operation: &Operation,
        values: &Object,
    ) -> Result<Object, Vec<InputValueError>> {
        let mut coerced = Object::new();
        let mut errors = Vec::new();
        for variable in &operation.variables {
            let name = variable.name.as_str();
            match values.get(name) {
                Some(value) => {
                    let result =
                        self.coerce_input_value_with(value, &variable.ty, &mut |mut error| {
                            error.path.0.insert(0, PathElement::Key(name.to_string()));
                            errors.push(error);
                            ControlFlow::Continue(())
                        });
                    if let Ok(value) = result {
                        coerced.insert(name, value);
                    }
                }
                None => {
                    if let Some(default) = &variable.default_value {
                        // Defaults cannot reference other variables.
                        match self.coerce_input_literal(default, &variable.ty, None) {
                            Ok(value) => {
                                coerced.insert(name, value);
                            }
                            Err(InvalidValue) => errors.push(InputValueError {
                                kind: InputValueErrorKind::NotCoercible {
                                    ty: variable.ty.to_string(),
                                },
                                path: Path(vec![PathElement::Key(name.to_string())]),
                                value: value_from_literal_untyped(default, None),
                            }),
                        }
                    } else if variable.ty.is_non_null() {
                        errors.push(InputValueError {
                            kind: InputValueErrorKind::MissingRequiredVariable {
                                name: name.to_string(),
                                ty: variable.ty.to_string(),
                            },
                            path: Path::default(),
                            value: Value::Null,
                        });
                    }
                    // Absent nullable variables stay absent, they do not
                    // become null.
                }
            }
        }
        if errors.is_empty() {
            Ok(coerced)
        } else {
            Err(errors)
        }
    }
}
