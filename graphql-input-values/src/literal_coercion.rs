//! Coercion of value literals (parsed AST nodes) to input values,
//! substituting variable references.
//!
//! <https://spec.graphql.org/draft/#sec-Coercing-Field-Arguments>

use std::sync::Once;

use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::InputObjectType;
use apollo_compiler::schema::Type;
use serde_json_bytes::Value;

use crate::InputCoercion;
use crate::Object;
use crate::error::InvalidValue;
use crate::scalars;

impl InputCoercion<'_> {
    /// Coerce a value literal against an input type, resolving variable
    /// references through `variables`.
    ///
    /// Variable values are trusted to have been coerced and validated when
    /// the request started executing; they are substituted verbatim and
    /// never re-validated here. There is no error-reporting variant of this
    /// path: a malformed literal is `Err(InvalidValue)`, nothing more.
    #[tracing::instrument(skip_all, level = "trace")]
    pub fn coerce_input_literal(
        &self,
        node: &ast::Value,
        ty: &Type,
        variables: Option<&Object>,
    ) -> Result<Value, InvalidValue> {
        match node {
            ast::Value::Variable(name) => {
                // Absent from the mapping means missing, which is not the
                // same thing as resolving to null.
                let Some(value) = variables.and_then(|variables| variables.get(name.as_str()))
                else {
                    return Err(InvalidValue);
                };
                if value.is_null() && ty.is_non_null() {
                    return Err(InvalidValue);
                }
                Ok(value.clone())
            }
            ast::Value::Null => {
                if ty.is_non_null() {
                    Err(InvalidValue)
                } else {
                    Ok(Value::Null)
                }
            }
            _ => match ty {
                Type::List(item_ty) | Type::NonNullList(item_ty) => match node {
                    ast::Value::List(items) => {
                        let mut coerced = Vec::with_capacity(items.len());
                        for item in items {
                            if is_missing_variable(item, variables) {
                                // A hole in the list becomes null, unless
                                // the item type forbids it.
                                if item_ty.is_non_null() {
                                    return Err(InvalidValue);
                                }
                                coerced.push(Value::Null);
                            } else {
                                coerced.push(self.coerce_input_literal(item, item_ty, variables)?);
                            }
                        }
                        Ok(Value::Array(coerced))
                    }
                    // A single non-list literal coerces to a one-element
                    // list.
                    _ => Ok(Value::Array(vec![self.coerce_input_literal(
                        node,
                        item_ty,
                        variables,
                    )?])),
                },
                Type::Named(name) | Type::NonNullNamed(name) => match self.schema.types.get(name) {
                    Some(ExtendedType::InputObject(definition)) => {
                        self.coerce_object_literal(node, definition, variables)
                    }
                    Some(ExtendedType::Scalar(scalar)) => {
                        scalars::coerce_scalar_literal(scalar, node, variables)
                    }
                    Some(ExtendedType::Enum(enum_def)) => {
                        scalars::coerce_enum_literal(enum_def, node)
                    }
                    _ => Err(InvalidValue),
                },
            },
        }
    }

    fn coerce_object_literal(
        &self,
        node: &ast::Value,
        definition: &InputObjectType,
        variables: Option<&Object>,
    ) -> Result<Value, InvalidValue> {
        let ast::Value::Object(object) = node else {
            return Err(InvalidValue);
        };
        let mut coerced = Object::new();
        for (name, field) in &definition.fields {
            let supplied = object
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value_node)| value_node);
            match supplied {
                Some(value_node) if !is_missing_variable(value_node, variables) => {
                    coerced.insert(
                        name.as_str(),
                        self.coerce_input_literal(value_node, &field.ty, variables)?,
                    );
                }
                // A field holding a missing variable counts as absent.
                _ => {
                    if field.default_value.is_some() {
                        if let Some(default) = self.coerced_default_value(&field.node) {
                            coerced.insert(name.as_str(), default);
                        }
                    } else if field.ty.is_non_null() {
                        return Err(InvalidValue);
                    }
                }
            }
        }
        // Unknown fields in the literal were already rejected by document
        // validation, so there is nothing to check for here.
        Ok(Value::Object(coerced))
    }
}

/// A variable reference with no entry in the mapping. Distinct from a
/// variable that resolved to null.
fn is_missing_variable(node: &ast::Value, variables: Option<&Object>) -> bool {
    match node {
        ast::Value::Variable(name) => {
            variables.is_none_or(|variables| !variables.contains_key(name.as_str()))
        }
        _ => false,
    }
}

/// Lower a literal to a value without consulting any type: enum names
/// become strings, variables take their mapped value, or null when
/// missing.
///
/// This is how custom scalars receive their literals, so that a leaf type
/// may embed variables inside a compound literal.
pub fn value_from_literal_untyped(node: &ast::Value, variables: Option<&Object>) -> Value {
    match node {
        ast::Value::Null => Value::Null,
        ast::Value::Variable(name) => variables
            .and_then(|variables| variables.get(name.as_str()))
            .cloned()
            .unwrap_or(Value::Null),
        ast::Value::Enum(name) => Value::from(name.as_str()),
        ast::Value::String(string) => Value::from(string.as_str()),
        ast::Value::Boolean(boolean) => Value::Bool(*boolean),
        ast::Value::Int(int) => int
            .as_str()
            .parse::<i64>()
            .ok()
            .map(Value::from)
            .or_else(|| int.as_str().parse::<u64>().ok().map(Value::from))
            .or_else(|| int.try_to_f64().ok().map(Value::from))
            .unwrap_or(Value::Null),
        ast::Value::Float(float) => float
            .try_to_f64()
            .ok()
            .map(Value::from)
            .unwrap_or(Value::Null),
        ast::Value::List(items) => Value::Array(
            items
                .iter()
                .map(|item| value_from_literal_untyped(item, variables))
                .collect(),
        ),
        ast::Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().into(),
                        value_from_literal_untyped(value, variables),
                    )
                })
                .collect(),
        ),
    }
}

/// Forwarding wrapper kept for callers of the pre-[`InputCoercion`] API.
///
/// An absent node returns `None` without entering coercion at all; any
/// other input forwards to
/// [`coerce_input_literal`][InputCoercion::coerce_input_literal], with
/// `None` standing in for `Err(InvalidValue)`.
#[deprecated(note = "use `InputCoercion::coerce_input_literal` instead")]
pub fn value_from_ast(
    coercion: &InputCoercion<'_>,
    node: Option<&ast::Value>,
    ty: &Type,
    variables: Option<&Object>,
) -> Option<Value> {
    static DEPRECATION: Once = Once::new();
    DEPRECATION.call_once(|| {
        tracing::warn!(
            "value_from_ast is deprecated, use InputCoercion::coerce_input_literal instead"
        );
    });
    let node = node?;
    coercion.coerce_input_literal(node, ty, variables).ok()
}
