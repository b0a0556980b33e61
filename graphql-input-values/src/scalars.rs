//! Input coercion for leaf types: the five built-in scalars, custom
//! scalars, and enums.
//!
//! Both the coercing walk and the validating walk go through these
//! functions so the two always agree on what a leaf accepts; coercion
//! discards the error detail, validation reports it.

use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::schema::EnumType;
use apollo_compiler::schema::ScalarType;
use serde_json_bytes::Value;

use crate::Object;
use crate::error::DidYouMean;
use crate::error::InputValueErrorKind;
use crate::error::InvalidValue;
use crate::error::render_json;
use crate::literal_coercion::value_from_literal_untyped;
use crate::suggestions::suggestion_list;

pub(crate) fn coerce_scalar_value(
    scalar: &Node<ScalarType>,
    value: &Value,
) -> Result<Value, InputValueErrorKind> {
    if !scalar.is_built_in() {
        // We cannot know about the expected format of custom scalars,
        // so the value is passed through unexamined.
        return Ok(value.clone());
    }
    match scalar.name.as_str() {
        // https://spec.graphql.org/draft/#sec-Int.Input-Coercion
        "Int" => coerce_int_value(value),
        // https://spec.graphql.org/draft/#sec-Float.Input-Coercion
        "Float" => {
            if value.is_i64() || value.is_u64() || value.is_f64() {
                Ok(value.clone())
            } else {
                Err(InputValueErrorKind::FloatNotANumber {
                    value: render_json(value),
                })
            }
        }
        // https://spec.graphql.org/draft/#sec-String.Input-Coercion
        "String" => {
            if value.is_string() {
                Ok(value.clone())
            } else {
                Err(InputValueErrorKind::StringNotAString {
                    value: render_json(value),
                })
            }
        }
        // https://spec.graphql.org/draft/#sec-Boolean.Input-Coercion
        "Boolean" => {
            if value.is_boolean() {
                Ok(value.clone())
            } else {
                Err(InputValueErrorKind::BooleanNotABoolean {
                    value: render_json(value),
                })
            }
        }
        // "While it is often numeric, it should always serialize as a
        // String": integers are accepted and coerced to their decimal form.
        // https://spec.graphql.org/draft/#sec-ID.Input-Coercion
        "ID" => coerce_id_value(value),
        _ => Ok(value.clone()),
    }
}

fn coerce_int_value(value: &Value) -> Result<Value, InputValueErrorKind> {
    if let Value::Number(number) = value {
        if let Some(int) = number.as_i64() {
            return i32::try_from(int)
                .map(|int| Value::from(i64::from(int)))
                .map_err(|_| InputValueErrorKind::IntTooLarge {
                    value: render_json(value),
                });
        }
        if number.as_u64().is_some() {
            return Err(InputValueErrorKind::IntTooLarge {
                value: render_json(value),
            });
        }
        if let Some(float) = number.as_f64() {
            // JSON does not distinguish `5.0` from `5`
            if float.fract() == 0.0 {
                return if float >= f64::from(i32::MIN) && float <= f64::from(i32::MAX) {
                    Ok(Value::from(float as i64))
                } else {
                    Err(InputValueErrorKind::IntTooLarge {
                        value: render_json(value),
                    })
                };
            }
        }
    }
    Err(InputValueErrorKind::IntNotAnInteger {
        value: render_json(value),
    })
}

fn coerce_id_value(value: &Value) -> Result<Value, InputValueErrorKind> {
    match value {
        Value::String(_) => Ok(value.clone()),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Ok(Value::from(int.to_string()))
            } else if let Some(int) = number.as_u64() {
                Ok(Value::from(int.to_string()))
            } else {
                Err(InputValueErrorKind::InvalidId {
                    value: render_json(value),
                })
            }
        }
        _ => Err(InputValueErrorKind::InvalidId {
            value: render_json(value),
        }),
    }
}

pub(crate) fn coerce_enum_value(
    enum_def: &EnumType,
    value: &Value,
) -> Result<Value, InputValueErrorKind> {
    let Some(name) = value.as_str() else {
        return Err(InputValueErrorKind::EnumValueNotAString {
            ty: enum_def.name.to_string(),
            value: render_json(value),
        });
    };
    if enum_def.values.contains_key(name) {
        Ok(value.clone())
    } else {
        Err(InputValueErrorKind::UndefinedEnumValue {
            value: name.to_string(),
            ty: enum_def.name.to_string(),
            did_you_mean: DidYouMean::new(suggestion_list(
                name,
                enum_def.values.keys().map(|value| value.as_str()),
            )),
        })
    }
}

pub(crate) fn coerce_scalar_literal(
    scalar: &Node<ScalarType>,
    node: &ast::Value,
    variables: Option<&Object>,
) -> Result<Value, InvalidValue> {
    if !scalar.is_built_in() {
        // Custom scalars take the whole literal, variables substituted, so
        // leaf types may embed variables inside compound literals.
        return Ok(value_from_literal_untyped(node, variables));
    }
    match (scalar.name.as_str(), node) {
        ("Int", ast::Value::Int(int)) => int
            .try_to_i32()
            .map(|int| Value::from(i64::from(int)))
            .map_err(|_| InvalidValue),
        ("Float", ast::Value::Float(float)) => {
            float.try_to_f64().map(Value::from).map_err(|_| InvalidValue)
        }
        // Int literals are valid Float input
        ("Float", ast::Value::Int(int)) => {
            int.try_to_f64().map(Value::from).map_err(|_| InvalidValue)
        }
        ("String", ast::Value::String(string)) => Ok(Value::from(string.as_str())),
        ("Boolean", ast::Value::Boolean(boolean)) => Ok(Value::Bool(*boolean)),
        ("ID", ast::Value::String(string)) => Ok(Value::from(string.as_str())),
        // The raw digits carry over verbatim: an ID serializes as a string
        ("ID", ast::Value::Int(int)) => Ok(Value::from(int.as_str())),
        _ => Err(InvalidValue),
    }
}

pub(crate) fn coerce_enum_literal(
    enum_def: &EnumType,
    node: &ast::Value,
) -> Result<Value, InvalidValue> {
    // Enum input must be an enum literal: a string literal spelling a
    // member name is not accepted here.
    match node {
        ast::Value::Enum(name) if enum_def.values.contains_key(name.as_str()) => {
            Ok(Value::from(name.as_str()))
        }
        _ => Err(InvalidValue),
    }
}
