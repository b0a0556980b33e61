//! Coercion of externally-supplied input values (for example deserialized
//! JSON variable values) to the shape their schema type declares.
//!
//! This is the value-side half of input coercion:
//! <https://spec.graphql.org/draft/#sec-Input-Values>

use std::ops::ControlFlow;

use apollo_compiler::Node;
use apollo_compiler::Schema;
use apollo_compiler::ast::InputValueDefinition;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::InputObjectType;
use apollo_compiler::schema::Type;
use apollo_compiler::validation::Valid;
use serde_json_bytes::Value;

use crate::Object;
use crate::default_values::DefaultValueCache;
use crate::error::InputValueError;
use crate::error::InputValueErrorKind;
use crate::error::InvalidValue;
use crate::literal_coercion::value_from_literal_untyped;
use crate::scalars;

/// Input value coercion, validation and literal conversion over one schema.
///
/// Holds the memoized default values for that schema, so callers that keep
/// a schema around should keep its `InputCoercion` alongside it instead of
/// rebuilding one per request.
pub struct InputCoercion<'schema> {
    pub(crate) schema: &'schema Valid<Schema>,
    pub(crate) defaults: DefaultValueCache,
}

impl<'schema> InputCoercion<'schema> {
    pub fn new(schema: &'schema Valid<Schema>) -> Self {
        Self {
            schema,
            defaults: DefaultValueCache::default(),
        }
    }

    pub fn schema(&self) -> &'schema Valid<Schema> {
        self.schema
    }

    /// Coerce a value against an input type.
    ///
    /// On failure the same input is re-walked by
    /// [`validate_input_value`][Self::validate_input_value] and the first
    /// violation found is returned. Use
    /// [`coerce_input_value_with`][Self::coerce_input_value_with] to observe
    /// every violation instead of the first.
    #[tracing::instrument(skip_all, level = "trace")]
    pub fn coerce_input_value(&self, value: &Value, ty: &Type) -> Result<Value, InputValueError> {
        match self.coerce_value(value, ty) {
            Ok(coerced) => Ok(coerced),
            Err(InvalidValue) => {
                let mut first = None;
                self.validate_input_value(value, ty, &mut |error| {
                    first = Some(error);
                    ControlFlow::Break(())
                });
                // The validation walk mirrors the coercion walk, so it
                // reports at least one violation for any value coercion
                // rejected.
                Err(first.unwrap_or_else(|| InputValueError {
                    kind: InputValueErrorKind::NotCoercible { ty: ty.to_string() },
                    path: Default::default(),
                    value: value.clone(),
                }))
            }
        }
    }

    /// Coerce a value against an input type, delivering every violation to
    /// `on_error` when the value does not coerce.
    ///
    /// `ControlFlow::Break` from the sink aborts the remaining validation
    /// walk. Whatever the sink does, the call returns `Err(InvalidValue)`
    /// for a value that did not coerce.
    #[tracing::instrument(skip_all, level = "trace")]
    pub fn coerce_input_value_with(
        &self,
        value: &Value,
        ty: &Type,
        on_error: &mut dyn FnMut(InputValueError) -> ControlFlow<()>,
    ) -> Result<Value, InvalidValue> {
        match self.coerce_value(value, ty) {
            Ok(coerced) => Ok(coerced),
            Err(InvalidValue) => {
                self.validate_input_value(value, ty, on_error);
                Err(InvalidValue)
            }
        }
    }

    pub(crate) fn coerce_value(&self, value: &Value, ty: &Type) -> Result<Value, InvalidValue> {
        if value.is_null() {
            return if ty.is_non_null() {
                Err(InvalidValue)
            } else {
                Ok(Value::Null)
            };
        }
        match ty {
            Type::List(item_ty) | Type::NonNullList(item_ty) => match value {
                Value::Array(array) => array
                    .iter()
                    .map(|element| self.coerce_value(element, item_ty))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                // A single non-list value coerces to a one-element list.
                _ => Ok(Value::Array(vec![self.coerce_value(value, item_ty)?])),
            },
            Type::Named(name) | Type::NonNullNamed(name) => match self.schema.types.get(name) {
                Some(ExtendedType::InputObject(definition)) => {
                    self.coerce_input_object(value, definition)
                }
                Some(ExtendedType::Scalar(scalar)) => {
                    scalars::coerce_scalar_value(scalar, value).map_err(|_| InvalidValue)
                }
                Some(ExtendedType::Enum(enum_def)) => {
                    scalars::coerce_enum_value(enum_def, value).map_err(|_| InvalidValue)
                }
                // Output-only types cannot appear in input positions of a
                // validated document; undefined names mean the type and the
                // schema do not belong together.
                _ => Err(InvalidValue),
            },
        }
    }

    fn coerce_input_object(
        &self,
        value: &Value,
        definition: &InputObjectType,
    ) -> Result<Value, InvalidValue> {
        let Some(object) = value.as_object() else {
            return Err(InvalidValue);
        };
        let mut coerced = Object::new();
        for (name, field) in &definition.fields {
            if let Some(field_value) = object.get(name.as_str()) {
                coerced.insert(name.as_str(), self.coerce_value(field_value, &field.ty)?);
            } else if field.default_value.is_some() {
                if let Some(default) = self.coerced_default_value(&field.node) {
                    coerced.insert(name.as_str(), default);
                }
            } else if field.ty.is_non_null() {
                // missing required field
                return Err(InvalidValue);
            }
            // Optional fields without defaults stay absent, not null.
        }
        // Every provided key must name a declared field.
        if object
            .keys()
            .any(|key| !definition.fields.contains_key(key.as_str()))
        {
            return Err(InvalidValue);
        }
        Ok(Value::Object(coerced))
    }

    /// The field's declared default, coerced against the field type once
    /// and memoized for the schema's lifetime. `None` when the field has no
    /// default or the default does not coerce.
    pub(crate) fn coerced_default_value(
        &self,
        definition: &Node<InputValueDefinition>,
    ) -> Option<Value> {
        self.defaults.get_or_compute(definition, || {
            let literal = definition.default_value.as_ref()?;
            let lowered = value_from_literal_untyped(literal, None);
            match self.coerce_value(&lowered, &definition.ty) {
                Ok(coerced) => Some(coerced),
                Err(InvalidValue) => {
                    // Schema validation checks default values against their
                    // field types, so this is only reachable with a
                    // hand-assembled schema.
                    tracing::debug!(
                        field = %definition.name,
                        "skipping default value that does not coerce to its field type",
                    );
                    None
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::ty;
    use serde_json_bytes::json;
    use test_log::test;

    use super::*;

    const SCHEMA: &str = r#"
        type Query { field(filters: Filters): Int }
        scalar Upload
        enum Episode { NEWHOPE EMPIRE JEDI }
        input Point { x: Int! y: Int! z: Int = 0 }
        input Filters {
            episode: Episode
            point: Point
            points: [Point]
            tags: [String!]
            name: String
            id: ID
            threshold: Float
            attachment: Upload
        }
    "#;

    fn schema() -> Valid<Schema> {
        Schema::parse_and_validate(SCHEMA, "coercion.graphql").unwrap()
    }

    #[test]
    fn coerces_builtin_scalars() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        assert_eq!(
            coercion.coerce_input_value(&json!(3), &ty!(Int)).unwrap(),
            json!(3)
        );
        assert_eq!(
            coercion
                .coerce_input_value(&json!(123), &ty!(ID))
                .unwrap(),
            json!("123")
        );
        assert_eq!(
            coercion
                .coerce_input_value(&json!(1.5), &ty!(Float))
                .unwrap(),
            json!(1.5)
        );
        assert!(coercion.coerce_input_value(&json!("x"), &ty!(Int)).is_err());
    }

    #[test]
    fn null_needs_a_nullable_type() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        assert_eq!(
            coercion.coerce_input_value(&json!(null), &ty!(Int)).unwrap(),
            json!(null)
        );
        let error = coercion
            .coerce_input_value(&json!(null), &ty!(Int!))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid value null: expected non-nullable type 'Int!' not to be null"
        );
    }

    #[test]
    fn single_values_coerce_to_singleton_lists() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        assert_eq!(
            coercion
                .coerce_input_value(&json!(1), &ty!([Int]))
                .unwrap(),
            json!([1])
        );
        // the promoted value still has to coerce against the item type
        assert!(
            coercion
                .coerce_input_value(&json!("x"), &ty!([Int]))
                .is_err()
        );
    }

    #[test]
    fn one_bad_element_rejects_the_whole_list() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let error = coercion
            .coerce_input_value(&json!([1, "bad", 3]), &ty!([Int]))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid value \"bad\" at 'value[1]': Int cannot represent non-integer value: \"bad\""
        );
    }

    #[test]
    fn input_objects_fill_defaults_and_omit_absent_optionals() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let coerced = coercion
            .coerce_input_value(&json!({"point": {"x": 1, "y": 2}}), &ty!(Filters))
            .unwrap();
        // `z` takes its default; the other Filters fields stay absent
        // rather than appearing as null
        assert_eq!(coerced, json!({"point": {"x": 1, "y": 2, "z": 0}}));
        let object = coerced.as_object().unwrap();
        assert!(!object.contains_key("episode"));
        assert!(!object.contains_key("name"));
    }

    #[test]
    fn default_values_are_memoized_per_field() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let input = json!({"point": {"x": 1, "y": 2}});
        let first = coercion.coerce_input_value(&input, &ty!(Filters)).unwrap();
        let second = coercion.coerce_input_value(&input, &ty!(Filters)).unwrap();
        assert_eq!(first, second);
        assert_eq!(coercion.defaults.len(), 1);
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let error = coercion
            .coerce_input_value(&json!({"point": {"x": 1}}), &ty!(Filters))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid value {\"x\":1} at 'value.point': \
             field 'y' of required type 'Int!' was not provided"
        );
    }

    #[test]
    fn null_for_required_field_is_rejected() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let mut errors = Vec::new();
        let result = coercion.coerce_input_value_with(
            &json!({"x": null, "y": 2}),
            &ty!(Point),
            &mut |error| {
                errors.push(error);
                ControlFlow::Continue(())
            },
        );
        assert_eq!(result, Err(InvalidValue));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "invalid value null at 'value.x': expected non-nullable type 'Int!' not to be null"
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let error = coercion
            .coerce_input_value(&json!({"nme": "R2-D2"}), &ty!(Filters))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid value {\"nme\":\"R2-D2\"}: \
             field 'nme' is not defined by type 'Filters'. Did you mean 'name'?"
        );
    }

    #[test]
    fn non_objects_are_rejected_for_input_objects() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let error = coercion
            .coerce_input_value(&json!([1, 2]), &ty!(Point))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid value [1,2]: expected type 'Point' to be an object"
        );
    }

    #[test]
    fn custom_scalars_accept_anything() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let value = json!({"filename": "x.png", "parts": [1, 2]});
        assert_eq!(
            coercion
                .coerce_input_value(&json!({"attachment": value}), &ty!(Filters))
                .unwrap(),
            json!({"attachment": value})
        );
    }

    #[test]
    fn enums_check_membership() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        assert_eq!(
            coercion
                .coerce_input_value(&json!({"episode": "JEDI"}), &ty!(Filters))
                .unwrap(),
            json!({"episode": "JEDI"})
        );
        let error = coercion
            .coerce_input_value(&json!({"episode": "JEDDI"}), &ty!(Filters))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid value \"JEDDI\" at 'value.episode': \
             value 'JEDDI' does not exist in 'Episode' enum. Did you mean 'JEDI'?"
        );
    }

    #[test]
    fn nested_list_paths_point_at_the_failing_element() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let error = coercion
            .coerce_input_value(
                &json!({"points": [{"x": 1, "y": 2}, {"x": 1, "y": "two"}]}),
                &ty!(Filters),
            )
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid value \"two\" at 'value.points[1].y': \
             Int cannot represent non-integer value: \"two\""
        );
    }
}
