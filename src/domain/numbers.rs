//! Operand coercion and integer/float narrowing shared by the arithmetic methods

use serde_json::Value;

use crate::errors::RpcError;

/// An operand or result. `Int` is reported as a JSON integer, `Float` as a JSON float.
///
/// `Int` is wide enough for every JSON integer `serde_json` decodes (`i64` and `u64`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    /// Coerces a JSON value into an operand.
    ///
    /// Any integral value is an `Int`, whether written `2`, `2.0` or `2e0`.
    /// Only values with a fractional part are `Float`. Strings are trimmed and
    /// parsed the same way. Booleans, null, arrays and objects are not numbers.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(number) => {
                if let Some(int) = number.as_i64() {
                    Some(Self::Int(i128::from(int)))
                } else if let Some(int) = number.as_u64() {
                    Some(Self::Int(i128::from(int)))
                } else {
                    number.as_f64().map(|float| Self::Float(float).narrowed())
                }
            }
            Value::String(text) => Self::parse(text),
            _ => None,
        }
    }

    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(int) = text.parse::<i128>() {
            return Some(Self::Int(int));
        }

        text.parse::<f64>()
            .ok()
            .filter(|float| float.is_finite())
            .map(|float| Self::Float(float).narrowed())
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(int) => int as f64,
            Self::Float(float) => float,
        }
    }

    pub fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }

    /// Turns a mathematically integral float into an `Int` when it fits.
    pub fn narrowed(self) -> Self {
        match self {
            Self::Float(float)
                if float.is_finite()
                    && float.fract() == 0.0
                    && float >= i64::MIN as f64
                    && float < u64::MAX as f64 =>
            {
                Self::Int(float as i128)
            }
            other => other,
        }
    }

    pub fn plus(self, other: Self) -> Self {
        combine(self, other, i128::checked_add, |a, b| a + b)
    }

    pub fn minus(self, other: Self) -> Self {
        combine(self, other, i128::checked_sub, |a, b| a - b)
    }

    pub fn times(self, other: Self) -> Self {
        combine(self, other, i128::checked_mul, |a, b| a * b)
    }

    /// Floating division, narrowed back to an integer when the quotient is integral.
    pub fn divided_by(self, divisor: Self) -> Result<Self, RpcError> {
        if divisor.is_zero() {
            return Err(RpcError::invalid_params("Invalid params: division by zero"));
        }

        Ok(Self::Float(self.as_f64() / divisor.as_f64()).narrowed())
    }

    pub fn to_value(self) -> Result<Value, RpcError> {
        match self {
            Self::Int(int) => {
                if let Ok(int) = i64::try_from(int) {
                    Ok(Value::from(int))
                } else if let Ok(int) = u64::try_from(int) {
                    Ok(Value::from(int))
                } else {
                    Self::Float(int as f64).to_value()
                }
            }
            Self::Float(float) => serde_json::Number::from_f64(float)
                .map(Value::Number)
                .ok_or_else(|| {
                    RpcError::invalid_params("Invalid params: result is not a finite number")
                }),
        }
    }
}

/// Integer arithmetic while both sides are integral and nothing overflows, float otherwise.
fn combine(
    left: Number,
    right: Number,
    int_op: fn(i128, i128) -> Option<i128>,
    float_op: fn(f64, f64) -> f64,
) -> Number {
    if let (Number::Int(a), Number::Int(b)) = (left, right) {
        if let Some(result) = int_op(a, b) {
            return Number::Int(result);
        }
    }

    Number::Float(float_op(left.as_f64(), right.as_f64()))
}
