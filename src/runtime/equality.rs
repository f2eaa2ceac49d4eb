//! Equality comparisons
//!
//! `SameValue`, `SameValueZero` and strict equality are pure functions of
//! two values. Abstract (loose) equality may run user code through
//! `ToPrimitive` and lives on the context.

use crate::context::Context;
use crate::error::JsResult;
use crate::runtime::conversion::PreferredType;
use crate::value::Value;

/// Number comparison shared by the three pure predicates
#[inline]
fn same_type_equals(x: &Value, y: &Value, numbers: impl Fn(f64, f64) -> bool) -> bool {
    match (x, y) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => numbers(*a, *b),
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Symbol(a), Value::Symbol(b)) => a == b,
        (Value::Object(a), Value::Object(b)) => a == b,
        _ => false,
    }
}

/// `SameValue`: NaN equals NaN, +0 and -0 differ
pub fn same_value(x: &Value, y: &Value) -> bool {
    same_type_equals(x, y, |a, b| {
        if a.is_nan() && b.is_nan() {
            return true;
        }
        a == b && a.is_sign_negative() == b.is_sign_negative()
    })
}

/// `SameValueZero`: NaN equals NaN, +0 equals -0
pub fn same_value_zero(x: &Value, y: &Value) -> bool {
    same_type_equals(x, y, |a, b| (a.is_nan() && b.is_nan()) || a == b)
}

/// Strict equality (`===`)
pub fn strict_equals(x: &Value, y: &Value) -> bool {
    same_type_equals(x, y, |a, b| a == b)
}

impl Context {
    /// Strict equality (`===`)
    pub fn strict_equals(&self, x: &Value, y: &Value) -> bool {
        strict_equals(x, y)
    }

    /// Abstract equality (`==`)
    pub fn loose_equals(&mut self, x: &Value, y: &Value) -> JsResult<bool> {
        if x.type_of() == y.type_of() {
            return Ok(strict_equals(x, y));
        }
        match (x, y) {
            (Value::Undefined, Value::Null) | (Value::Null, Value::Undefined) => Ok(true),
            (Value::Number(a), Value::String(_)) => Ok(*a == self.to_number(y)?),
            (Value::String(_), Value::Number(b)) => Ok(self.to_number(x)? == *b),
            (Value::Bool(_), _) => {
                let x = Value::Number(self.to_number(x)?);
                self.loose_equals(&x, y)
            }
            (_, Value::Bool(_)) => {
                let y = Value::Number(self.to_number(y)?);
                self.loose_equals(x, &y)
            }
            (Value::Number(_) | Value::String(_) | Value::Symbol(_), Value::Object(_)) => {
                let y = self.to_primitive(y, PreferredType::Default)?;
                self.loose_equals(x, &y)
            }
            (Value::Object(_), Value::Number(_) | Value::String(_) | Value::Symbol(_)) => {
                let x = self.to_primitive(x, PreferredType::Default)?;
                self.loose_equals(&x, y)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Symbol;

    #[test]
    fn test_same_value() {
        assert!(same_value(&Value::from(f64::NAN), &Value::from(f64::NAN)));
        assert!(!same_value(&Value::from(0.0), &Value::from(-0.0)));
        assert!(same_value(&Value::from(1), &Value::from(1.0)));
        assert!(!same_value(&Value::from(1), &Value::from("1")));
    }

    #[test]
    fn test_same_value_zero() {
        assert!(same_value_zero(&Value::from(f64::NAN), &Value::from(f64::NAN)));
        assert!(same_value_zero(&Value::from(0.0), &Value::from(-0.0)));
    }

    #[test]
    fn test_strict_equals() {
        assert!(!strict_equals(&Value::from(f64::NAN), &Value::from(f64::NAN)));
        assert!(strict_equals(&Value::from(0.0), &Value::from(-0.0)));
        assert!(!strict_equals(&Value::null(), &Value::undefined()));
        let s = Symbol::new(None);
        assert!(strict_equals(&Value::from(s.clone()), &Value::from(s)));
    }

    #[test]
    fn test_loose_equals_primitives() {
        let mut ctx = Context::new();
        assert!(ctx.loose_equals(&Value::null(), &Value::undefined()).unwrap());
        assert!(!ctx.loose_equals(&Value::null(), &Value::from(0)).unwrap());
        assert!(ctx.loose_equals(&Value::from(1), &Value::from("1")).unwrap());
        assert!(ctx.loose_equals(&Value::from(" 0x10 "), &Value::from(16)).unwrap());
        assert!(ctx.loose_equals(&Value::from(true), &Value::from("1")).unwrap());
        assert!(!ctx.loose_equals(&Value::from(false), &Value::undefined()).unwrap());
        assert!(!ctx.loose_equals(&Value::from(f64::NAN), &Value::from(f64::NAN)).unwrap());
    }

    #[test]
    fn test_loose_equals_symbol_never_coerces() {
        let mut ctx = Context::new();
        let sym = Value::from(Symbol::new(Some("x".into())));
        assert!(!ctx.loose_equals(&sym, &Value::from("Symbol(x)")).unwrap());
        assert!(!ctx.loose_equals(&sym, &Value::from(1)).unwrap());
        assert!(ctx.loose_equals(&sym, &sym.clone()).unwrap());

        let wrapped = ctx.to_object(&sym).unwrap();
        assert!(ctx.loose_equals(&Value::Object(wrapped), &sym).unwrap());
    }

    #[test]
    fn test_loose_equals_object_to_primitive() {
        let mut ctx = Context::new();
        let arr = ctx.create_array_from_list(&[Value::from(1), Value::from(2)]);
        assert!(ctx.loose_equals(&Value::Object(arr), &Value::from("1,2")).unwrap());
        let obj = ctx.new_object();
        let other = ctx.new_object();
        assert!(!ctx.loose_equals(&Value::Object(obj), &Value::Object(other)).unwrap());
    }
}
