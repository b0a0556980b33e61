//! Validation of input values: the same type walk as coercion, but instead
//! of producing a value it reports every structural violation it finds.

use std::ops::ControlFlow;

use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::InputObjectType;
use apollo_compiler::schema::Type;
use serde_json_bytes::Value;

use crate::InputCoercion;
use crate::error::DidYouMean;
use crate::error::InputValueError;
use crate::error::InputValueErrorKind;
use crate::path::LinkedPath;
use crate::path::LinkedPathElement;
use crate::path::PathElement;
use crate::path::path_to_root;
use crate::scalars;
use crate::suggestions::suggestion_list;

impl InputCoercion<'_> {
    /// Walk `value` against `ty` and hand every violation to `on_error`,
    /// without stopping at the first one.
    ///
    /// `ControlFlow::Break` from the sink aborts the remaining walk
    /// immediately; this is the only way to stop it early.
    #[tracing::instrument(skip_all, level = "trace")]
    pub fn validate_input_value(
        &self,
        value: &Value,
        ty: &Type,
        on_error: &mut dyn FnMut(InputValueError) -> ControlFlow<()>,
    ) {
        let _ = self.validate_value(value, ty, None, on_error);
    }

    fn validate_value(
        &self,
        value: &Value,
        ty: &Type,
        path: LinkedPath<'_>,
        on_error: &mut dyn FnMut(InputValueError) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        if value.is_null() {
            if ty.is_non_null() {
                return report(
                    on_error,
                    path,
                    value,
                    InputValueErrorKind::UnexpectedNull { ty: ty.to_string() },
                );
            }
            return ControlFlow::Continue(());
        }
        match ty {
            Type::List(item_ty) | Type::NonNullList(item_ty) => match value {
                Value::Array(array) => {
                    // No aggregate list error: each bad element reports on
                    // its own.
                    for (index, element) in array.iter().enumerate() {
                        let frame = LinkedPathElement {
                            element: PathElement::Index(index),
                            next: path,
                        };
                        self.validate_value(element, item_ty, Some(&frame), on_error)?;
                    }
                    ControlFlow::Continue(())
                }
                // Mirror of singleton promotion: the value answers for the
                // item type.
                _ => self.validate_value(value, item_ty, path, on_error),
            },
            Type::Named(name) | Type::NonNullNamed(name) => match self.schema.types.get(name) {
                Some(ExtendedType::InputObject(definition)) => {
                    self.validate_input_object(value, definition, path, on_error)
                }
                Some(ExtendedType::Scalar(scalar)) => {
                    match scalars::coerce_scalar_value(scalar, value) {
                        Ok(_) => ControlFlow::Continue(()),
                        Err(kind) => report(on_error, path, value, kind),
                    }
                }
                Some(ExtendedType::Enum(enum_def)) => {
                    match scalars::coerce_enum_value(enum_def, value) {
                        Ok(_) => ControlFlow::Continue(()),
                        Err(kind) => report(on_error, path, value, kind),
                    }
                }
                _ => report(
                    on_error,
                    path,
                    value,
                    InputValueErrorKind::NotAnInputType {
                        ty: name.to_string(),
                    },
                ),
            },
        }
    }

    fn validate_input_object(
        &self,
        value: &Value,
        definition: &InputObjectType,
        path: LinkedPath<'_>,
        on_error: &mut dyn FnMut(InputValueError) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        let Some(object) = value.as_object() else {
            return report(
                on_error,
                path,
                value,
                InputValueErrorKind::NotAnObject {
                    ty: definition.name.to_string(),
                },
            );
        };
        for (name, field) in &definition.fields {
            if let Some(field_value) = object.get(name.as_str()) {
                let frame = LinkedPathElement {
                    element: PathElement::Key(name.to_string()),
                    next: path,
                };
                self.validate_value(field_value, &field.ty, Some(&frame), on_error)?;
            } else if field.ty.is_non_null() && field.default_value.is_none() {
                report(
                    on_error,
                    path,
                    value,
                    InputValueErrorKind::MissingRequiredField {
                        field: name.to_string(),
                        ty: field.ty.to_string(),
                    },
                )?;
            }
        }
        for key in object.keys() {
            if !definition.fields.contains_key(key.as_str()) {
                report(
                    on_error,
                    path,
                    value,
                    InputValueErrorKind::UndefinedField {
                        field: key.as_str().to_string(),
                        ty: definition.name.to_string(),
                        did_you_mean: DidYouMean::new(suggestion_list(
                            key.as_str(),
                            definition.fields.keys().map(|name| name.as_str()),
                        )),
                    },
                )?;
            }
        }
        ControlFlow::Continue(())
    }
}

fn report(
    on_error: &mut dyn FnMut(InputValueError) -> ControlFlow<()>,
    path: LinkedPath<'_>,
    value: &Value,
    kind: InputValueErrorKind,
) -> ControlFlow<()> {
    on_error(InputValueError {
        kind,
        path: path_to_root(path),
        value: value.clone(),
    })
}

#[cfg(test)]
mod tests {
    use apollo_compiler::Schema;
    use apollo_compiler::ty;
    use apollo_compiler::validation::Valid;
    use serde_json_bytes::json;
    use test_log::test;

    use super::*;

    const SCHEMA: &str = r#"
        type Query { field(filters: Filters): Int }
        enum Episode { NEWHOPE EMPIRE JEDI }
        input Point { x: Int! y: Int! z: Int = 0 }
        input Filters {
            episode: Episode
            point: Point
            points: [Point]
            name: String
        }
    "#;

    fn schema() -> Valid<Schema> {
        Schema::parse_and_validate(SCHEMA, "validation.graphql").unwrap()
    }

    fn collect_errors(value: &Value, ty: &Type) -> Vec<InputValueError> {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let mut errors = Vec::new();
        coercion.validate_input_value(value, ty, &mut |error| {
            errors.push(error);
            ControlFlow::Continue(())
        });
        errors
    }

    #[test]
    fn reports_every_missing_required_field() {
        let errors = collect_errors(&json!({}), &ty!(Point));
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [
                "invalid value {}: field 'x' of required type 'Int!' was not provided",
                "invalid value {}: field 'y' of required type 'Int!' was not provided",
            ]
        );
    }

    #[test]
    fn reports_every_unknown_key() {
        let errors = collect_errors(&json!({"nme": "a", "bogus": 1}), &ty!(Filters));
        assert_eq!(errors.len(), 2);
        insta::assert_snapshot!(
            errors[0],
            @r#"invalid value {"nme":"a","bogus":1}: field 'nme' is not defined by type 'Filters'. Did you mean 'name'?"#
        );
        insta::assert_snapshot!(
            errors[1],
            @r#"invalid value {"nme":"a","bogus":1}: field 'bogus' is not defined by type 'Filters'."#
        );
    }

    #[test]
    fn keeps_walking_siblings_after_a_failure() {
        let errors = collect_errors(
            &json!({
                "episode": "SOLO",
                "point": {"x": null},
                "points": [{"x": 1, "y": 1}, 7],
            }),
            &ty!(Filters),
        );
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [
                "invalid value \"SOLO\" at 'value.episode': \
                 value 'SOLO' does not exist in 'Episode' enum.",
                "invalid value null at 'value.point.x': \
                 expected non-nullable type 'Int!' not to be null",
                "invalid value {\"x\":null} at 'value.point': \
                 field 'y' of required type 'Int!' was not provided",
                "invalid value 7 at 'value.points[1]': \
                 expected type 'Point' to be an object",
            ]
        );
    }

    #[test]
    fn break_from_the_sink_stops_the_walk() {
        let schema = schema();
        let coercion = InputCoercion::new(&schema);
        let mut errors = Vec::new();
        coercion.validate_input_value(&json!({}), &ty!(Point), &mut |error| {
            errors.push(error);
            ControlFlow::Break(())
        });
        // two fields are missing, but the sink broke after the first report
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn valid_values_report_nothing() {
        assert!(
            collect_errors(
                &json!({"episode": "JEDI", "point": {"x": 0, "y": 0}}),
                &ty!(Filters)
            )
            .is_empty()
        );
        assert!(collect_errors(&json!(null), &ty!(Filters)).is_empty());
    }
}
