//! String constructor and String.prototype

use std::cmp::Ordering;

use crate::builtins::{arg, define_hidden, define_method};
use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::object::ObjectKind;
use crate::runtime::string::JsString;
use crate::util::relative_index;
use crate::util::unicode::is_whitespace;
use crate::value::{ObjectId, Value};

/// `String(value)`: a plain symbol becomes its descriptive string
fn string_call(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    match args.first() {
        None => Ok(Value::from("")),
        Some(Value::Symbol(sym)) => Ok(Value::String(sym.descriptive_string())),
        Some(value) => Ok(Value::String(ctx.to_string(value)?)),
    }
}

/// `new String(value)`: symbols are rejected by `ToString`
fn string_construct(ctx: &mut Context, args: &[Value], new_target: ObjectId) -> JsResult<Value> {
    let s = match args.first() {
        None => JsString::default(),
        Some(value) => ctx.to_string(value)?,
    };
    let fallback = ctx.intrinsics().string_prototype;
    let proto = ctx.get_prototype_from_constructor(new_target, fallback)?;
    Ok(Value::Object(ctx.string_create(s, proto)))
}

fn from_char_code(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let mut units = Vec::with_capacity(args.len());
    for code in args {
        units.push(ctx.to_uint16(code)?);
    }
    Ok(Value::String(JsString::from_units(units)))
}

/// `thisStringValue(value)`
fn this_string_value(ctx: &Context, this: &Value, method: &str) -> JsResult<JsString> {
    match this {
        Value::String(s) => return Ok(s.clone()),
        Value::Object(id) => {
            if let ObjectKind::String(s) = &ctx.object(*id).kind {
                return Ok(s.clone());
            }
        }
        _ => {}
    }
    Err(JsError::type_error(format!(
        "String.prototype.{} requires that 'this' be a String",
        method
    )))
}

fn to_string(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    Ok(Value::String(this_string_value(ctx, this, "toString")?))
}

fn value_of(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    Ok(Value::String(this_string_value(ctx, this, "valueOf")?))
}

/// `RequireObjectCoercible(this)` followed by `ToString`
fn this_to_string(ctx: &mut Context, this: &Value) -> JsResult<JsString> {
    ctx.require_object_coercible(this)?;
    ctx.to_string(this)
}

fn clamp_position(pos: f64, len: usize) -> usize {
    pos.clamp(0.0, len as f64) as usize
}

fn index_of(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let s = this_to_string(ctx, this)?;
    let search = ctx.to_string(&arg(args, 0))?;
    let pos = ctx.to_integer(&arg(args, 1))?;
    let start = clamp_position(pos, s.len());
    Ok(match s.find(&search, start) {
        Some(i) => Value::from(i as f64),
        None => Value::from(-1),
    })
}

fn last_index_of(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let s = this_to_string(ctx, this)?;
    let search = ctx.to_string(&arg(args, 0))?;
    let num_pos = ctx.to_number(&arg(args, 1))?;
    let pos = if num_pos.is_nan() {
        f64::INFINITY
    } else {
        num_pos.trunc()
    };
    let start = clamp_position(pos, s.len());
    Ok(match s.rfind(&search, start) {
        Some(i) => Value::from(i as f64),
        None => Value::from(-1),
    })
}

/// Code unit at an integer position, `None` when out of range
fn unit_at(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Option<u16>> {
    let s = this_to_string(ctx, this)?;
    let pos = ctx.to_integer(&arg(args, 0))?;
    if pos < 0.0 || pos >= s.len() as f64 {
        return Ok(None);
    }
    Ok(s.code_unit_at(pos as usize))
}

fn char_at(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    Ok(match unit_at(ctx, this, args)? {
        Some(unit) => Value::String(JsString::from_units(vec![unit])),
        None => Value::from(""),
    })
}

fn char_code_at(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    Ok(match unit_at(ctx, this, args)? {
        Some(unit) => Value::from(u32::from(unit)),
        None => Value::from(f64::NAN),
    })
}

/// Integer argument, with undefined standing for `default`
fn integer_or(ctx: &mut Context, value: &Value, default: f64) -> JsResult<f64> {
    if value.is_undefined() {
        return Ok(default);
    }
    ctx.to_integer(value)
}

/// `String.prototype.substring(start, end)`: clamped, swapped if reversed
fn substring(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let s = this_to_string(ctx, this)?;
    let len = s.len();
    let start = clamp_position(ctx.to_integer(&arg(args, 0))?, len);
    let end = clamp_position(integer_or(ctx, &arg(args, 1), len as f64)?, len);
    Ok(Value::String(s.slice(start.min(end), start.max(end))))
}

/// `String.prototype.substr(start, length)`
fn substr(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let s = this_to_string(ctx, this)?;
    let len = s.len() as u64;
    let start = relative_index(ctx.to_integer(&arg(args, 0))?, len);
    let count = integer_or(ctx, &arg(args, 1), f64::INFINITY)?;
    let end = (start as f64 + count.max(0.0)).min(len as f64) as usize;
    Ok(Value::String(s.slice(start as usize, end)))
}

/// `String.prototype.slice(start, end)`: negative positions count from the end
fn slice(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let s = this_to_string(ctx, this)?;
    let len = s.len() as u64;
    let start = relative_index(ctx.to_integer(&arg(args, 0))?, len);
    let end = relative_index(integer_or(ctx, &arg(args, 1), len as f64)?, len);
    Ok(Value::String(s.slice(start as usize, end.max(start) as usize)))
}

fn concat(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let mut s = this_to_string(ctx, this)?;
    for item in args {
        let next = ctx.to_string(item)?;
        s = s.concat(&next);
    }
    Ok(Value::String(s))
}

#[derive(Clone, Copy)]
enum Trim {
    Start,
    End,
    Both,
}

fn trim_where(ctx: &mut Context, this: &Value, which: Trim) -> JsResult<Value> {
    let s = this_to_string(ctx, this)?;
    let units = s.units();
    let is_space = |u: &u16| is_whitespace(u32::from(*u));
    let start = match which {
        Trim::End => 0,
        _ => units.iter().position(|u| !is_space(u)).unwrap_or(units.len()),
    };
    let end = match which {
        Trim::Start => units.len(),
        _ => units.iter().rposition(|u| !is_space(u)).map_or(start, |i| i + 1),
    };
    Ok(Value::String(s.slice(start, end.max(start))))
}

fn trim(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    trim_where(ctx, this, Trim::Both)
}

fn trim_start(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    trim_where(ctx, this, Trim::Start)
}

fn trim_end(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    trim_where(ctx, this, Trim::End)
}

/// Map the well-formed runs of `s` through `convert`, passing lone
/// surrogates through unchanged
fn map_case(s: &JsString, convert: fn(&str) -> String) -> JsString {
    let mut out = Vec::with_capacity(s.len());
    let mut run = String::new();
    for decoded in char::decode_utf16(s.units().iter().copied()) {
        match decoded {
            Ok(c) => run.push(c),
            Err(lone) => {
                out.extend(convert(&run).encode_utf16());
                run.clear();
                out.push(lone.unpaired_surrogate());
            }
        }
    }
    out.extend(convert(&run).encode_utf16());
    JsString::from_units(out)
}

fn to_lower_case(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let s = this_to_string(ctx, this)?;
    Ok(Value::String(map_case(&s, str::to_lowercase)))
}

fn to_upper_case(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let s = this_to_string(ctx, this)?;
    Ok(Value::String(map_case(&s, str::to_uppercase)))
}

/// `String.prototype.localeCompare(that)`: code unit order, as -1, 0 or 1
fn locale_compare(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let s = this_to_string(ctx, this)?;
    let that = ctx.to_string(&arg(args, 0))?;
    Ok(Value::from(match s.units().cmp(that.units()) {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }))
}

pub(crate) fn install(ctx: &mut Context) {
    let proto = ctx.intrinsics().string_prototype;
    let ctor = ctx.new_constructor("String", 1, string_call, string_construct, proto);
    define_method(ctx, ctor, "fromCharCode", 1, from_char_code);

    define_method(ctx, proto, "toString", 0, to_string);
    define_method(ctx, proto, "valueOf", 0, value_of);
    define_method(ctx, proto, "indexOf", 1, index_of);
    define_method(ctx, proto, "lastIndexOf", 1, last_index_of);
    define_method(ctx, proto, "charAt", 1, char_at);
    define_method(ctx, proto, "charCodeAt", 1, char_code_at);
    define_method(ctx, proto, "substring", 2, substring);
    define_method(ctx, proto, "substr", 2, substr);
    define_method(ctx, proto, "slice", 2, slice);
    define_method(ctx, proto, "concat", 1, concat);
    define_method(ctx, proto, "trim", 0, trim);
    define_method(ctx, proto, "trimStart", 0, trim_start);
    define_method(ctx, proto, "trimEnd", 0, trim_end);
    define_method(ctx, proto, "toLowerCase", 0, to_lower_case);
    define_method(ctx, proto, "toUpperCase", 0, to_upper_case);
    define_method(ctx, proto, "localeCompare", 1, locale_compare);

    let global = ctx.global_object();
    define_hidden(ctx, global, "String", Value::Object(ctor));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::runtime::function::NativeFn;
    use crate::value::Symbol;

    #[test]
    fn test_string_of_symbol() {
        let mut ctx = Context::new();
        let string = ctx.global("String").unwrap();
        let sym = Value::from(Symbol::new(Some(JsString::from("x"))));
        let s = ctx.call(&string, &Value::undefined(), &[sym.clone()]).unwrap();
        assert_eq!(s, Value::from("Symbol(x)"));

        let err = ctx.construct(&string, &[sym.clone()], None).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::TypeError));

        let err = to_string(&mut ctx, &sym, &[]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::TypeError));
    }

    #[test]
    fn test_new_string_wrapper() {
        let mut ctx = Context::new();
        let string = ctx.global("String").unwrap();
        let wrapper = ctx.construct(&string, &[Value::from(12)], None).unwrap();
        assert_eq!(ctx.type_of(&wrapper), "object");
        assert_eq!(value_of(&mut ctx, &wrapper, &[]).unwrap(), Value::from("12"));
        let id = wrapper.as_object().unwrap();
        assert_eq!(ctx.get(id, "length").unwrap(), Value::from(2));
        assert_eq!(ctx.get(id, "0").unwrap(), Value::from("1"));
    }

    #[test]
    fn test_search() {
        let mut ctx = Context::new();
        let s = Value::from("abcabc");
        assert_eq!(index_of(&mut ctx, &s, &[Value::from("c")]).unwrap(), Value::from(2));
        assert_eq!(
            index_of(&mut ctx, &s, &[Value::from("c"), Value::from(3)]).unwrap(),
            Value::from(5)
        );
        assert_eq!(index_of(&mut ctx, &s, &[Value::from("z")]).unwrap(), Value::from(-1));
        assert_eq!(last_index_of(&mut ctx, &s, &[Value::from("a")]).unwrap(), Value::from(3));
        assert_eq!(
            last_index_of(&mut ctx, &s, &[Value::from("a"), Value::from(2)]).unwrap(),
            Value::from(0)
        );
        assert_eq!(index_of(&mut ctx, &s, &[Value::from("")]).unwrap(), Value::from(0));
        assert!(index_of(&mut ctx, &Value::null(), &[]).is_err());
    }

    #[test]
    fn test_char_access() {
        let mut ctx = Context::new();
        let s = Value::from("hi");
        assert_eq!(char_at(&mut ctx, &s, &[Value::from(1)]).unwrap(), Value::from("i"));
        assert_eq!(char_at(&mut ctx, &s, &[Value::from(5)]).unwrap(), Value::from(""));
        assert_eq!(char_code_at(&mut ctx, &s, &[]).unwrap(), Value::from(104));
        let nan = char_code_at(&mut ctx, &s, &[Value::from(-1)]).unwrap();
        assert!(nan.as_number().unwrap().is_nan());
    }

    #[test]
    fn test_from_char_code() {
        let mut ctx = Context::new();
        let s = from_char_code(
            &mut ctx,
            &Value::undefined(),
            &[Value::from(72), Value::from(65641), Value::from(0xD800)],
        )
        .unwrap();
        let s = s.as_string().unwrap().clone();
        assert_eq!(s.units(), &[72, 105, 0xD800]);
    }
    fn call_str(
        ctx: &mut Context,
        f: NativeFn,
        this: &str,
        args: &[Value],
    ) -> String {
        let result = f(ctx, &Value::from(this), args).unwrap();
        result.as_string().unwrap().to_std_string_lossy()
    }

    #[test]
    fn test_substring_clamps_and_swaps() {
        let mut ctx = Context::new();
        let nan = Value::from(f64::NAN);
        let cases: [(&[Value], &str); 7] = [
            (&[Value::from(1), Value::from(3)], "el"),
            (&[Value::from(3), Value::from(1)], "el"),
            (&[Value::from(-2)], "hello"),
            (&[nan.clone(), Value::from(2)], "he"),
            (&[Value::from(2), nan.clone()], "he"),
            (&[Value::from(1), Value::from(99)], "ello"),
            (&[Value::from(f64::NEG_INFINITY), Value::undefined()], "hello"),
        ];
        for (args, expected) in cases {
            assert_eq!(call_str(&mut ctx, substring, "hello", args), expected, "{args:?}");
        }
    }

    #[test]
    fn test_slice_counts_negative_from_end() {
        let mut ctx = Context::new();
        let nan = Value::from(f64::NAN);
        let cases: [(&[Value], &str); 6] = [
            (&[Value::from(1), Value::from(-1)], "ell"),
            (&[Value::from(-3)], "llo"),
            (&[Value::from(3), Value::from(1)], ""),
            (&[nan.clone()], "hello"),
            (&[Value::from(0), nan.clone()], ""),
            (&[Value::from(-99), Value::from(2)], "he"),
        ];
        for (args, expected) in cases {
            assert_eq!(call_str(&mut ctx, slice, "hello", args), expected, "{args:?}");
        }
    }

    #[test]
    fn test_substr_start_and_length() {
        let mut ctx = Context::new();
        let cases: [(&[Value], &str); 6] = [
            (&[Value::from(1), Value::from(3)], "ell"),
            (&[Value::from(-3), Value::from(2)], "ll"),
            (&[Value::from(-3)], "llo"),
            (&[Value::from(f64::NAN), Value::from(2)], "he"),
            (&[Value::from(1), Value::from(f64::NAN)], ""),
            (&[Value::from(2), Value::from(-1)], ""),
        ];
        for (args, expected) in cases {
            assert_eq!(call_str(&mut ctx, substr, "hello", args), expected, "{args:?}");
        }
    }

    #[test]
    fn test_concat_and_trim() {
        let mut ctx = Context::new();
        let args = [Value::from(1), Value::null(), Value::from(true)];
        assert_eq!(call_str(&mut ctx, concat, "a", &args), "a1nulltrue");

        let padded = "\u{feff} \t x y \n\u{2028}";
        assert_eq!(call_str(&mut ctx, trim, padded, &[]), "x y");
        assert_eq!(call_str(&mut ctx, trim_start, padded, &[]), "x y \n\u{2028}");
        assert_eq!(call_str(&mut ctx, trim_end, padded, &[]), "\u{feff} \t x y");
        assert_eq!(call_str(&mut ctx, trim, " \t ", &[]), "");
        assert_eq!(call_str(&mut ctx, trim_start, " \t ", &[]), "");
        assert_eq!(call_str(&mut ctx, trim_end, " \t ", &[]), "");
    }

    #[test]
    fn test_case_mapping_keeps_lone_surrogates() {
        let mut ctx = Context::new();
        assert_eq!(call_str(&mut ctx, to_upper_case, "straße", &[]), "STRASSE");
        assert_eq!(call_str(&mut ctx, to_lower_case, "ÀB", &[]), "àb");

        let s = Value::String(JsString::from_units(vec![0x61, 0xD800, 0x62]));
        let upper = to_upper_case(&mut ctx, &s, &[]).unwrap();
        assert_eq!(upper.as_string().unwrap().units(), &[0x41, 0xD800, 0x42]);
    }

    #[test]
    fn test_locale_compare_orders_code_units() {
        let mut ctx = Context::new();
        let compare = |ctx: &mut Context, a: &str, b: &str| {
            locale_compare(ctx, &Value::from(a), &[Value::from(b)]).unwrap()
        };
        assert_eq!(compare(&mut ctx, "a", "b"), Value::from(-1));
        assert_eq!(compare(&mut ctx, "b", "a"), Value::from(1));
        assert_eq!(compare(&mut ctx, "ab", "ab"), Value::from(0));
        assert_eq!(compare(&mut ctx, "a", "ab"), Value::from(-1));
    }

    #[test]
    fn test_methods_reject_nullish_this() {
        let mut ctx = Context::new();
        for f in [substring, substr, slice, concat, trim, to_lower_case, locale_compare] {
            let err = f(&mut ctx, &Value::undefined(), &[]).unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::TypeError));
        }
    }
}
