//! Reconstruction of value literals from input values, for printing and
//! introspection output.

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::schema::Type;
use serde_json_bytes::Value;

use crate::InputCoercion;

impl InputCoercion<'_> {
    /// Build the literal spelling a value, the inverse direction of
    /// [`coerce_input_literal`][Self::coerce_input_literal].
    ///
    /// No validation happens here. The caller already trusts the value; the
    /// optional type hint only disambiguates leaf node kinds (enum versus
    /// string, ID digits versus string) and supplies nested hints, it never
    /// rejects a mismatched shape.
    pub fn literal_from_value(&self, value: &Value, ty: Option<&Type>) -> ast::Value {
        match value {
            Value::Null => ast::Value::Null,
            Value::Bool(boolean) => ast::Value::Boolean(*boolean),
            Value::Number(number) => number_literal(number),
            Value::String(string) => self.string_literal(string.as_str(), ty),
            Value::Array(array) => {
                let item_ty = ty.filter(|ty| ty.is_list()).map(|ty| ty.item_type());
                ast::Value::List(
                    array
                        .iter()
                        .map(|element| Node::new(self.literal_from_value(element, item_ty)))
                        .collect(),
                )
            }
            Value::Object(object) => {
                let definition = self.input_object_definition(ty);
                ast::Value::Object(
                    object
                        .iter()
                        .map(|(key, field_value)| {
                            let field_ty = definition
                                .and_then(|definition| definition.fields.get(key.as_str()))
                                .map(|field| {
                                    let ty: &Type = &field.ty;
                                    ty
                                });
                            (
                                Name::new_unchecked(key.as_str()),
                                Node::new(self.literal_from_value(field_value, field_ty)),
                            )
                        })
                        .collect(),
                )
            }
        }
    }

    fn input_object_definition(
        &self,
        ty: Option<&Type>,
    ) -> Option<&apollo_compiler::schema::InputObjectType> {
        match self.leaf_definition(ty) {
            Some(ExtendedType::InputObject(definition)) => Some(definition),
            _ => None,
        }
    }

    fn leaf_definition(&self, ty: Option<&Type>) -> Option<&ExtendedType> {
        match ty? {
            Type::Named(name) | Type::NonNullNamed(name) => self.schema.types.get(name),
            Type::List(_) | Type::NonNullList(_) => None,
        }
    }

    fn string_literal(&self, string: &str, ty: Option<&Type>) -> ast::Value {
        match self.leaf_definition(ty) {
            Some(ExtendedType::Enum(_)) => {
                if let Ok(name) = Name::new(string) {
                    return ast::Value::Enum(name);
                }
            }
            Some(ExtendedType::Scalar(scalar)) if scalar.is_built_in() && scalar.name == "ID" => {
                // Numeric IDs print as their digits.
                if is_int_spelling(string) {
                    if let Ok(int) = string.parse::<i32>() {
                        return ast::Value::Int(int.into());
                    }
                }
            }
            _ => {}
        }
        ast::Value::String(string.to_string())
    }
}

fn number_literal(number: &serde_json::Number) -> ast::Value {
    if let Some(int) = number.as_i64() {
        if let Ok(int) = i32::try_from(int) {
            return ast::Value::Int(int.into());
        }
        // GraphQL Int is 32-bit; anything wider spells as a float literal.
        return ast::Value::Float((int as f64).into());
    }
    if let Some(int) = number.as_u64() {
        return ast::Value::Float((int as f64).into());
    }
    match number.as_f64() {
        Some(float)
            if float.fract() == 0.0
                && float >= f64::from(i32::MIN)
                && float <= f64::from(i32::MAX) =>
        {
            ast::Value::Int((float as i32).into())
        }
        Some(float) => ast::Value::Float(float.into()),
        // JSON numbers are always finite; there is nothing else to spell.
        None => ast::Value::Null,
    }
}

/// `-?(0|[1-9][0-9]*)`: integer spelling with no leading zero.
fn is_int_spelling(string: &str) -> bool {
    let digits = string.strip_prefix('-').unwrap_or(string);
    !digits.is_empty()
        && digits.bytes().all(|byte| byte.is_ascii_digit())
        && (digits == "0" || !digits.starts_with('0'))
}
