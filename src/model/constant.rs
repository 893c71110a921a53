//! Attribute argument constants.

use smol_str::SmolStr;

use crate::base::StructuralArray;
use crate::error::{GeneratorError, Result};
use crate::host::{ConstantValue, Primitive};
use crate::syntax::SyntaxKind;
use crate::syntax::factory::{ExpressionSyntax, TypeSyntax};

/// Numeric and character constants. Floating point values are kept as bit
/// patterns so the constant stays `Eq + Hash`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericConstant {
    Byte(u8),
    SByte(i8),
    Char(char),
    Short(i16),
    UShort(u16),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Float(u32),
    Double(u64),
}

/// A typed attribute argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypedConstant {
    Null,
    String(SmolStr),
    Bool(bool),
    Number(NumericConstant),
    Type {
        fully_qualified_name: SmolStr,
        is_unbound_generic: bool,
    },
    Enum {
        fully_qualified_type_name: SmolStr,
        value: i64,
    },
    Array {
        fully_qualified_element_type_name: SmolStr,
        items: StructuralArray<TypedConstant>,
    },
}

impl TypedConstant {
    pub fn from_constant(value: &ConstantValue) -> Result<Self> {
        Ok(match value {
            ConstantValue::Null => TypedConstant::Null,
            ConstantValue::Primitive(primitive) => match primitive {
                Primitive::String(text) => TypedConstant::String(text.clone()),
                Primitive::Bool(flag) => TypedConstant::Bool(*flag),
                Primitive::Char(v) => TypedConstant::Number(NumericConstant::Char(*v)),
                Primitive::SByte(v) => TypedConstant::Number(NumericConstant::SByte(*v)),
                Primitive::Byte(v) => TypedConstant::Number(NumericConstant::Byte(*v)),
                Primitive::Short(v) => TypedConstant::Number(NumericConstant::Short(*v)),
                Primitive::UShort(v) => TypedConstant::Number(NumericConstant::UShort(*v)),
                Primitive::Int(v) => TypedConstant::Number(NumericConstant::Int(*v)),
                Primitive::UInt(v) => TypedConstant::Number(NumericConstant::UInt(*v)),
                Primitive::Long(v) => TypedConstant::Number(NumericConstant::Long(*v)),
                Primitive::ULong(v) => TypedConstant::Number(NumericConstant::ULong(*v)),
                Primitive::Float(v) => TypedConstant::Number(NumericConstant::Float(v.to_bits())),
                Primitive::Double(v) => TypedConstant::Number(NumericConstant::Double(v.to_bits())),
            },
            ConstantValue::Type(ty) => TypedConstant::Type {
                fully_qualified_name: ty.fully_qualified().into(),
                is_unbound_generic: ty.is_unbound_generic,
            },
            ConstantValue::Enum { ty, value } => TypedConstant::Enum {
                fully_qualified_type_name: ty.fully_qualified().into(),
                value: *value,
            },
            ConstantValue::Array {
                element_type,
                items,
            } => TypedConstant::Array {
                fully_qualified_element_type_name: element_type.fully_qualified().into(),
                items: items
                    .iter()
                    .map(TypedConstant::from_constant)
                    .collect::<Result<Vec<_>>>()?
                    .into(),
            },
            ConstantValue::Error => {
                return Err(GeneratorError::UnsupportedConstant(
                    "argument failed to bind".to_string(),
                ));
            }
        })
    }

    /// The constant as a C# expression.
    pub fn to_expression(&self) -> ExpressionSyntax {
        match self {
            TypedConstant::Null => ExpressionSyntax::null(),
            TypedConstant::String(text) => ExpressionSyntax::string(text),
            TypedConstant::Bool(flag) => ExpressionSyntax::bool(*flag),
            TypedConstant::Number(number) => number.to_expression(),
            TypedConstant::Type {
                fully_qualified_name,
                ..
            } => ExpressionSyntax::type_of(TypeSyntax::parse(fully_qualified_name)),
            TypedConstant::Enum {
                fully_qualified_type_name,
                value,
            } => {
                let literal = ExpressionSyntax::number(&value.unsigned_abs().to_string());
                // A bare negative operand would parse as a subtraction.
                let operand = if *value < 0 {
                    ExpressionSyntax::prefix(SyntaxKind::Minus, literal).parenthesized()
                } else {
                    literal
                };
                ExpressionSyntax::cast(TypeSyntax::parse(fully_qualified_type_name), operand)
            }
            TypedConstant::Array { items, .. } => {
                ExpressionSyntax::collection(items.iter().map(TypedConstant::to_expression).collect())
            }
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedConstant::String(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedConstant::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_enum_value(&self) -> Option<i64> {
        match self {
            TypedConstant::Enum { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Fully qualified name of a `typeof` argument.
    pub fn as_type_name(&self) -> Option<&str> {
        match self {
            TypedConstant::Type {
                fully_qualified_name,
                ..
            } => Some(fully_qualified_name),
            _ => None,
        }
    }
}

impl NumericConstant {
    pub fn to_expression(self) -> ExpressionSyntax {
        let text = match self {
            NumericConstant::Byte(v) => v.to_string(),
            NumericConstant::SByte(v) => v.to_string(),
            NumericConstant::Short(v) => v.to_string(),
            NumericConstant::UShort(v) => v.to_string(),
            NumericConstant::Int(v) => v.to_string(),
            NumericConstant::UInt(v) => format!("{v}U"),
            NumericConstant::Long(v) => format!("{v}L"),
            NumericConstant::ULong(v) => format!("{v}UL"),
            NumericConstant::Float(bits) => return ExpressionSyntax::float(f32::from_bits(bits)),
            NumericConstant::Double(bits) => return ExpressionSyntax::double(f64::from_bits(bits)),
            NumericConstant::Char(c) => return ExpressionSyntax::char(&char_literal(c)),
        };
        ExpressionSyntax::number(&text)
    }
}

fn char_literal(c: char) -> String {
    match c {
        '\'' => "'\\''".to_string(),
        '\\' => "'\\\\'".to_string(),
        '\n' => "'\\n'".to_string(),
        '\r' => "'\\r'".to_string(),
        '\t' => "'\\t'".to_string(),
        '\0' => "'\\0'".to_string(),
        c if c.is_control() => format!("'\\u{:04X}'", c as u32),
        c => format!("'{c}'"),
    }
}
