//! JSON.parse and JSON.stringify
//!
//! Both work on UTF-16 code units. Lone surrogates in strings are written as
//! `\uXXXX` escapes so stringified output is always well formed, and parsed
//! `\uXXXX` escapes may produce lone surrogates.

use crate::builtins::{arg, define_hidden, define_method};
use crate::context::Context;
use crate::error::{ErrorKind, JsError, JsResult};
use crate::runtime::object::ObjectKind;
use crate::runtime::property::PropertyKey;
use crate::runtime::string::JsString;
use crate::util::dtoa::number_to_string;
use crate::util::unicode::{is_lead_surrogate, is_trail_surrogate};
use crate::value::{ObjectId, Value};

/// Longest indentation unit accepted from `space`
const MAX_GAP: usize = 10;

fn push_ascii(out: &mut Vec<u16>, s: &str) {
    out.extend(s.encode_utf16());
}

fn push_escaped_unit(out: &mut Vec<u16>, unit: u16) {
    push_ascii(out, &format!("\\u{:04x}", unit));
}

/// `QuoteJSONString`
fn quote(out: &mut Vec<u16>, s: &JsString) {
    let units = s.units();
    out.push(u16::from(b'"'));
    let mut i = 0;
    while i < units.len() {
        let unit = units[i];
        match unit {
            0x08 => push_ascii(out, "\\b"),
            0x09 => push_ascii(out, "\\t"),
            0x0A => push_ascii(out, "\\n"),
            0x0C => push_ascii(out, "\\f"),
            0x0D => push_ascii(out, "\\r"),
            0x22 => push_ascii(out, "\\\""),
            0x5C => push_ascii(out, "\\\\"),
            u if u < 0x20 => push_escaped_unit(out, u),
            u if is_lead_surrogate(u) => {
                match units.get(i + 1) {
                    Some(&next) if is_trail_surrogate(next) => {
                        out.push(u);
                        out.push(next);
                        i += 1;
                    }
                    _ => push_escaped_unit(out, u),
                }
            }
            u if is_trail_surrogate(u) => push_escaped_unit(out, u),
            u => out.push(u),
        }
        i += 1;
    }
    out.push(u16::from(b'"'));
}

struct Serializer {
    /// Objects currently being serialized, for cycle detection
    stack: Vec<ObjectId>,
    indent: Vec<u16>,
    gap: Vec<u16>,
    /// Replacer function, called for every key
    replacer: Option<Value>,
    /// Keys from an array replacer, used for every object
    property_list: Option<Vec<PropertyKey>>,
}

impl Serializer {
    /// `SerializeJSONProperty(key, holder)`; `None` means undefined
    fn property(
        &mut self,
        ctx: &mut Context,
        key: &PropertyKey,
        holder: ObjectId,
    ) -> JsResult<Option<Vec<u16>>> {
        let mut value = ctx.get(holder, key)?;
        if value.is_object() {
            let to_json = ctx.get_v(&value, "toJSON")?;
            if ctx.is_callable(&to_json) {
                value = ctx.call(&to_json, &value, &[key.to_value()])?;
            }
        }
        if let Some(replacer) = self.replacer.clone() {
            value = ctx.call(&replacer, &Value::Object(holder), &[key.to_value(), value])?;
        }
        let value = unwrap_wrapper(ctx, value, true)?;

        let mut out = Vec::new();
        match &value {
            Value::Null => push_ascii(&mut out, "null"),
            Value::Bool(b) => push_ascii(&mut out, if *b { "true" } else { "false" }),
            Value::String(s) => quote(&mut out, s),
            Value::Number(n) if n.is_finite() => push_ascii(&mut out, &number_to_string(*n)),
            Value::Number(_) => push_ascii(&mut out, "null"),
            Value::Object(id) if !ctx.is_callable(&value) => {
                let id = *id;
                if self.stack.contains(&id) {
                    return Err(JsError::type_error("cannot serialize cyclic structure to JSON"));
                }
                self.stack.push(id);
                let result = ctx.with_call_depth(|ctx| {
                    if ctx.is_array(&value)? {
                        self.array(ctx, id)
                    } else {
                        self.object(ctx, id)
                    }
                });
                self.stack.pop();
                out = result?;
            }
            Value::Undefined | Value::Symbol(_) | Value::Object(_) => return Ok(None),
        }
        Ok(Some(out))
    }

    /// Join serialized members between `open` and `close`
    fn wrap(&self, members: Vec<Vec<u16>>, stepback: &[u16], open: u8, close: u8) -> Vec<u16> {
        let mut out = vec![u16::from(open)];
        if !members.is_empty() {
            for (i, member) in members.iter().enumerate() {
                if i > 0 {
                    out.push(u16::from(b','));
                }
                if !self.gap.is_empty() {
                    out.push(u16::from(b'\n'));
                    out.extend_from_slice(&self.indent);
                }
                out.extend_from_slice(member);
            }
            if !self.gap.is_empty() {
                out.push(u16::from(b'\n'));
                out.extend_from_slice(stepback);
            }
        }
        out.push(u16::from(close));
        out
    }

    /// `SerializeJSONObject`
    fn object(&mut self, ctx: &mut Context, id: ObjectId) -> JsResult<Vec<u16>> {
        let stepback = self.indent.clone();
        self.indent.extend_from_slice(&self.gap.clone());
        let keys = match &self.property_list {
            Some(list) => list.clone(),
            None => ctx.enumerable_own_names(id)?,
        };
        let mut members = Vec::new();
        for key in keys {
            let Some(value) = self.property(ctx, &key, id)? else {
                continue;
            };
            let mut member = Vec::new();
            if let Some(name) = key.as_string() {
                quote(&mut member, name);
            }
            member.push(u16::from(b':'));
            if !self.gap.is_empty() {
                member.push(u16::from(b' '));
            }
            member.extend(value);
            members.push(member);
        }
        let out = self.wrap(members, &stepback, b'{', b'}');
        self.indent = stepback;
        Ok(out)
    }

    /// `SerializeJSONArray`: undefined elements become `null`
    fn array(&mut self, ctx: &mut Context, id: ObjectId) -> JsResult<Vec<u16>> {
        let stepback = self.indent.clone();
        self.indent.extend_from_slice(&self.gap.clone());
        let len = ctx.length_of_array_like(id)?;
        ctx.check_list_length(len)?;
        let mut members = Vec::with_capacity(len.min(1024) as usize);
        for index in 0..len {
            let key = PropertyKey::from(index);
            let member = match self.property(ctx, &key, id)? {
                Some(member) => member,
                None => "null".encode_utf16().collect(),
            };
            members.push(member);
        }
        let out = self.wrap(members, &stepback, b'[', b']');
        self.indent = stepback;
        Ok(out)
    }
}

/// Replace Number and String wrapper objects (and Boolean ones when
/// `booleans` is set) with their primitive value
fn unwrap_wrapper(ctx: &mut Context, value: Value, booleans: bool) -> JsResult<Value> {
    let Value::Object(id) = value else {
        return Ok(value);
    };
    Ok(match ctx.object(id).kind.class_name() {
        "Number" => Value::from(ctx.to_number(&value)?),
        "String" => Value::String(ctx.to_string(&value)?),
        "Boolean" if booleans => match ctx.object(id).kind {
            ObjectKind::Boolean(b) => Value::from(b),
            _ => value,
        },
        _ => value,
    })
}

/// Indentation unit from the `space` argument
fn gap_from_space(ctx: &mut Context, space: &Value) -> JsResult<Vec<u16>> {
    Ok(match unwrap_wrapper(ctx, space.clone(), false)? {
        Value::Number(n) => {
            let width = n.clamp(0.0, MAX_GAP as f64) as usize;
            vec![u16::from(b' '); width]
        }
        Value::String(s) => s.units()[..s.len().min(MAX_GAP)].to_vec(),
        _ => Vec::new(),
    })
}

/// Keys named by an array replacer: strings and numbers (or their
/// wrappers), first occurrence wins
fn property_list(ctx: &mut Context, list: ObjectId) -> JsResult<Vec<PropertyKey>> {
    let len = ctx.length_of_array_like(list)?;
    ctx.check_list_length(len)?;
    let mut keys: Vec<PropertyKey> = Vec::new();
    for index in 0..len {
        let element = ctx.get(list, index)?;
        let item = match &element {
            Value::String(s) => Some(s.clone()),
            Value::Number(_) => Some(ctx.to_string(&element)?),
            Value::Object(id) if matches!(ctx.object(*id).kind.class_name(), "String" | "Number") => {
                Some(ctx.to_string(&element)?)
            }
            _ => None,
        };
        if let Some(item) = item {
            let key = PropertyKey::from(item);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    Ok(keys)
}

/// `JSON.stringify(value, replacer, space)`
pub fn stringify(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let replacer = arg(args, 1);
    let mut serializer = Serializer {
        stack: Vec::new(),
        indent: Vec::new(),
        gap: Vec::new(),
        replacer: None,
        property_list: None,
    };
    if ctx.is_callable(&replacer) {
        serializer.replacer = Some(replacer);
    } else if let Some(list) = replacer.as_object() {
        if ctx.is_array(&replacer)? {
            serializer.property_list = Some(property_list(ctx, list)?);
        }
    }
    serializer.gap = gap_from_space(ctx, &arg(args, 2))?;

    let wrapper = ctx.new_object();
    ctx.create_data_property_or_throw(wrapper, "", arg(args, 0))?;
    Ok(match serializer.property(ctx, &PropertyKey::from(""), wrapper)? {
        Some(units) => Value::String(JsString::from_units(units)),
        None => Value::undefined(),
    })
}

/// Recursive-descent reader for the JSON grammar
struct Parser<'a> {
    units: &'a [u16],
    pos: usize,
}

fn is_digit(unit: u16) -> bool {
    (u16::from(b'0')..=u16::from(b'9')).contains(&unit)
}

impl Parser<'_> {
    fn error(&self, what: &str) -> JsError {
        JsError::new(
            ErrorKind::SyntaxError,
            format!("{} in JSON at position {}", what, self.pos),
        )
    }

    fn unexpected(&self) -> JsError {
        match self.peek() {
            None => self.error("unexpected end of input"),
            Some(unit) => {
                let c = char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER);
                self.error(&format!("unexpected token '{}'", c))
            }
        }
    }

    fn peek(&self) -> Option<u16> {
        self.units.get(self.pos).copied()
    }

    fn at(&self, c: u8) -> bool {
        self.peek() == Some(u16::from(c))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(0x09 | 0x0A | 0x0D | 0x20)) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: u8) -> JsResult<()> {
        if !self.at(c) {
            return Err(self.unexpected());
        }
        self.pos += 1;
        Ok(())
    }

    fn keyword(&mut self, word: &str, value: Value) -> JsResult<Value> {
        for c in word.bytes() {
            self.expect(c)?;
        }
        Ok(value)
    }

    fn value(&mut self, ctx: &mut Context) -> JsResult<Value> {
        self.skip_whitespace();
        match self.peek().and_then(|u| u8::try_from(u).ok()) {
            Some(b'{') => ctx.with_call_depth(|ctx| self.object(ctx)),
            Some(b'[') => ctx.with_call_depth(|ctx| self.array(ctx)),
            Some(b'"') => Ok(Value::String(self.string()?)),
            Some(b't') => self.keyword("true", Value::from(true)),
            Some(b'f') => self.keyword("false", Value::from(false)),
            Some(b'n') => self.keyword("null", Value::null()),
            Some(b'-' | b'0'..=b'9') => self.number(),
            _ => Err(self.unexpected()),
        }
    }

    fn object(&mut self, ctx: &mut Context) -> JsResult<Value> {
        self.expect(b'{')?;
        let obj = ctx.new_object();
        self.skip_whitespace();
        if self.at(b'}') {
            self.pos += 1;
            return Ok(Value::Object(obj));
        }
        loop {
            self.skip_whitespace();
            if !self.at(b'"') {
                return Err(self.unexpected());
            }
            let key = self.string()?;
            self.skip_whitespace();
            self.expect(b':')?;
            let value = self.value(ctx)?;
            ctx.create_data_property_or_throw(obj, key, value)?;
            self.skip_whitespace();
            if self.at(b',') {
                self.pos += 1;
            } else {
                self.expect(b'}')?;
                return Ok(Value::Object(obj));
            }
        }
    }

    fn array(&mut self, ctx: &mut Context) -> JsResult<Value> {
        self.expect(b'[')?;
        let mut elements = Vec::new();
        self.skip_whitespace();
        if self.at(b']') {
            self.pos += 1;
            return Ok(Value::Object(ctx.create_array_from_list(&elements)));
        }
        loop {
            elements.push(self.value(ctx)?);
            self.skip_whitespace();
            if self.at(b',') {
                self.pos += 1;
            } else {
                self.expect(b']')?;
                return Ok(Value::Object(ctx.create_array_from_list(&elements)));
            }
        }
    }

    fn string(&mut self) -> JsResult<JsString> {
        self.expect(b'"')?;
        let mut out = Vec::new();
        loop {
            let Some(unit) = self.peek() else {
                return Err(self.error("unterminated string"));
            };
            match unit {
                0x22 => {
                    self.pos += 1;
                    return Ok(JsString::from_units(out));
                }
                0x5C => {
                    self.pos += 1;
                    out.push(self.escape()?);
                }
                u if u < 0x20 => return Err(self.unexpected()),
                u => {
                    self.pos += 1;
                    out.push(u);
                }
            }
        }
    }

    /// Escape sequence after a backslash
    fn escape(&mut self) -> JsResult<u16> {
        let unit = match self.peek().and_then(|u| u8::try_from(u).ok()) {
            Some(b'"') => 0x22,
            Some(b'\\') => 0x5C,
            Some(b'/') => 0x2F,
            Some(b'b') => 0x08,
            Some(b'f') => 0x0C,
            Some(b'n') => 0x0A,
            Some(b'r') => 0x0D,
            Some(b't') => 0x09,
            Some(b'u') => {
                self.pos += 1;
                let mut value = 0u16;
                for _ in 0..4 {
                    let digit = self
                        .peek()
                        .and_then(|u| char::from_u32(u32::from(u)))
                        .and_then(|c| c.to_digit(16))
                        .ok_or_else(|| self.error("bad unicode escape"))?;
                    value = value * 16 + digit as u16;
                    self.pos += 1;
                }
                return Ok(value);
            }
            _ => return Err(self.error("bad escape")),
        };
        self.pos += 1;
        Ok(unit)
    }

    /// At least one decimal digit
    fn digits(&mut self) -> JsResult<()> {
        if !self.peek().is_some_and(is_digit) {
            return Err(self.unexpected());
        }
        while self.peek().is_some_and(is_digit) {
            self.pos += 1;
        }
        Ok(())
    }

    fn number(&mut self) -> JsResult<Value> {
        let start = self.pos;
        if self.at(b'-') {
            self.pos += 1;
        }
        if self.at(b'0') {
            self.pos += 1;
        } else {
            self.digits()?;
        }
        if self.at(b'.') {
            self.pos += 1;
            self.digits()?;
        }
        if self.at(b'e') || self.at(b'E') {
            self.pos += 1;
            if self.at(b'+') || self.at(b'-') {
                self.pos += 1;
            }
            self.digits()?;
        }
        let text: String = self.units[start..self.pos]
            .iter()
            .map(|&u| char::from(u as u8))
            .collect();
        text.parse::<f64>()
            .map(Value::from)
            .map_err(|_| self.error("bad number"))
    }
}

/// `InternalizeJSONProperty(holder, name, reviver)`
fn internalize(
    ctx: &mut Context,
    holder: ObjectId,
    name: PropertyKey,
    reviver: &Value,
) -> JsResult<Value> {
    let value = ctx.get(holder, &name)?;
    if let Some(id) = value.as_object() {
        ctx.with_call_depth(|ctx| {
            let keys: Vec<PropertyKey> = if ctx.is_array(&value)? {
                let len = ctx.length_of_array_like(id)?;
                ctx.check_list_length(len)?;
                (0..len).map(PropertyKey::from).collect()
            } else {
                ctx.enumerable_own_names(id)?
            };
            for key in keys {
                let element = internalize(ctx, id, key.clone(), reviver)?;
                if element.is_undefined() {
                    ctx.delete_property(id, &key)?;
                } else {
                    ctx.create_data_property(id, key, element)?;
                }
            }
            Ok(())
        })?;
    }
    ctx.call(reviver, &Value::Object(holder), &[name.to_value(), value])
}

/// `JSON.parse(text, reviver)`
pub fn parse(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let text = ctx.to_string(&arg(args, 0))?;
    let mut parser = Parser {
        units: text.units(),
        pos: 0,
    };
    let value = parser.value(ctx)?;
    parser.skip_whitespace();
    if parser.pos < parser.units.len() {
        return Err(parser.unexpected());
    }

    let reviver = arg(args, 1);
    if !ctx.is_callable(&reviver) {
        return Ok(value);
    }
    let root = ctx.new_object();
    ctx.create_data_property_or_throw(root, "", value)?;
    internalize(ctx, root, PropertyKey::from(""), &reviver)
}

pub(crate) fn install(ctx: &mut Context) {
    let json = ctx.new_object();
    define_method(ctx, json, "parse", 2, parse);
    define_method(ctx, json, "stringify", 3, stringify);
    let global = ctx.global_object();
    define_hidden(ctx, global, "JSON", Value::Object(json));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn stringify_str(ctx: &mut Context, args: &[Value]) -> Option<String> {
        let result = stringify(ctx, &Value::undefined(), args).unwrap();
        result.as_string().map(JsString::to_std_string_lossy)
    }

    #[test]
    fn test_primitives() {
        let mut ctx = Context::new();
        assert_eq!(stringify_str(&mut ctx, &[Value::null()]).as_deref(), Some("null"));
        assert_eq!(stringify_str(&mut ctx, &[Value::from(1.5)]).as_deref(), Some("1.5"));
        assert_eq!(stringify_str(&mut ctx, &[Value::from(f64::NAN)]).as_deref(), Some("null"));
        assert_eq!(
            stringify_str(&mut ctx, &[Value::from("a\"b\n")]).as_deref(),
            Some(r#""a\"b\n""#)
        );
        assert_eq!(stringify_str(&mut ctx, &[Value::undefined()]), None);
        let sym = Value::from(crate::value::Symbol::new(None));
        assert_eq!(stringify_str(&mut ctx, &[sym]), None);
    }

    #[test]
    fn test_nested_with_omissions() {
        let mut ctx = Context::new();
        let obj = ctx.new_object();
        let f = ctx.new_function("f", 0, |_, _, _| Ok(Value::undefined()));
        let arr = ctx.create_array_from_list(&[Value::undefined(), Value::Object(f), Value::from(true)]);
        ctx.create_data_property_or_throw(obj, "a", Value::Object(arr)).unwrap();
        ctx.create_data_property_or_throw(obj, "f", Value::Object(f)).unwrap();
        ctx.create_data_property_or_throw(obj, "u", Value::undefined()).unwrap();
        ctx.create_data_property_or_throw(obj, "s", Value::from("x")).unwrap();
        assert_eq!(
            stringify_str(&mut ctx, &[Value::Object(obj)]).as_deref(),
            Some(r#"{"a":[null,null,true],"s":"x"}"#)
        );
    }

    #[test]
    fn test_indentation() {
        let mut ctx = Context::new();
        let obj = ctx.new_object();
        let arr = ctx.create_array_from_list(&[Value::from(1)]);
        ctx.create_data_property_or_throw(obj, "a", Value::Object(arr)).unwrap();
        let empty = ctx.create_array_from_list(&[]);
        ctx.create_data_property_or_throw(obj, "b", Value::Object(empty)).unwrap();
        let text = stringify_str(&mut ctx, &[Value::Object(obj), Value::null(), Value::from(2)]);
        assert_eq!(text.as_deref(), Some("{\n  \"a\": [\n    1\n  ],\n  \"b\": []\n}"));
        let text = stringify_str(&mut ctx, &[Value::Object(arr), Value::null(), Value::from("--")]);
        assert_eq!(text.as_deref(), Some("[\n--1\n]"));
    }

    #[test]
    fn test_to_json_and_wrappers() {
        let mut ctx = Context::new();
        let obj = ctx.new_object();
        let to_json = ctx.new_host_function("toJSON", 1, |_, _, args| Ok(arg(args, 0)));
        ctx.create_data_property_or_throw(obj, "toJSON", Value::Object(to_json)).unwrap();
        let holder = ctx.new_object();
        ctx.create_data_property_or_throw(holder, "k", Value::Object(obj)).unwrap();
        let n = Value::Object(ctx.to_object(&Value::from(3)).unwrap());
        ctx.create_data_property_or_throw(holder, "n", n).unwrap();
        assert_eq!(
            stringify_str(&mut ctx, &[Value::Object(holder)]).as_deref(),
            Some(r#"{"k":"k","n":3}"#)
        );
    }

    #[test]
    fn test_cycle_is_type_error() {
        let mut ctx = Context::new();
        let obj = ctx.new_object();
        ctx.create_data_property_or_throw(obj, "self", Value::Object(obj)).unwrap();
        let err = stringify(&mut ctx, &Value::undefined(), &[Value::Object(obj)]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::TypeError));
    }

    #[test]
    fn test_lone_surrogate_is_escaped() {
        let mut ctx = Context::new();
        let s = JsString::from_units(vec![0x61, 0xD800, 0xD83D, 0xDE00]);
        let text = stringify(&mut ctx, &Value::undefined(), &[Value::String(s)]).unwrap();
        let units = text.as_string().unwrap().units().to_vec();
        let mut expected: Vec<u16> = "\"a\\ud800".encode_utf16().collect();
        expected.extend([0xD83D, 0xDE00, u16::from(b'"')]);
        assert_eq!(units, expected);
    }
    fn parse_value(ctx: &mut Context, text: &str) -> JsResult<Value> {
        parse(ctx, &Value::undefined(), &[Value::from(text)])
    }

    fn round_trip(ctx: &mut Context, text: &str) -> String {
        let value = parse_value(ctx, text).unwrap();
        stringify_str(ctx, &[value]).unwrap()
    }

    #[test]
    fn test_array_length_is_bounded() {
        let mut ctx = Context::new();
        let arr = ctx.create_array_from_list(&[]);
        ctx.put(&Value::Object(arr), "length", Value::from(4294967295.0), true)
            .unwrap();
        let err = stringify(&mut ctx, &Value::undefined(), &[Value::Object(arr)]).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::RangeError));
    }

    #[test]
    fn test_function_replacer() {
        let mut ctx = Context::new();
        let obj = ctx.new_object();
        ctx.create_data_property_or_throw(obj, "a", Value::from(1)).unwrap();
        ctx.create_data_property_or_throw(obj, "b", Value::from("x")).unwrap();
        let replacer = ctx.new_function("replacer", 2, |_, this, args| {
            let key = arg(args, 0);
            let value = arg(args, 1);
            if key.as_string().is_some_and(|k| k.eq_str("")) {
                assert!(this.is_object());
                return Ok(value);
            }
            match value {
                Value::Number(n) => Ok(Value::from(n * 10.0)),
                _ => Ok(Value::undefined()),
            }
        });
        let text = stringify_str(&mut ctx, &[Value::Object(obj), Value::Object(replacer)]);
        assert_eq!(text.as_deref(), Some(r#"{"a":10}"#));
    }

    #[test]
    fn test_array_replacer_selects_and_orders_keys() {
        let mut ctx = Context::new();
        let obj = ctx.new_object();
        ctx.create_data_property_or_throw(obj, "a", Value::from(1)).unwrap();
        ctx.create_data_property_or_throw(obj, "b", Value::from(2)).unwrap();
        ctx.create_data_property_or_throw(obj, "1", Value::from(3)).unwrap();
        let list = ctx.create_array_from_list(&[
            Value::from("b"),
            Value::from(1),
            Value::from("b"),
            Value::from(true),
            Value::from("missing"),
        ]);
        let text = stringify_str(&mut ctx, &[Value::Object(obj), Value::Object(list)]);
        assert_eq!(text.as_deref(), Some(r#"{"b":2,"1":3}"#));
    }

    #[test]
    fn test_parse_values() {
        let mut ctx = Context::new();
        assert_eq!(parse_value(&mut ctx, " 1.5e2 ").unwrap(), Value::from(150));
        assert_eq!(parse_value(&mut ctx, "-0").unwrap(), Value::from(-0.0));
        assert_eq!(parse_value(&mut ctx, "true").unwrap(), Value::from(true));
        assert_eq!(parse_value(&mut ctx, "null").unwrap(), Value::null());
        assert_eq!(parse_value(&mut ctx, r#""a\u0041\n""#).unwrap(), Value::from("aA\n"));
        assert_eq!(
            round_trip(&mut ctx, r#" { "a" : [1, {"b": null}, "c"], "a": 2 } "#),
            r#"{"a":2}"#
        );
        assert_eq!(round_trip(&mut ctx, "[[], {}, [0.25]]"), "[[],{},[0.25]]");
    }

    #[test]
    fn test_parse_keeps_lone_surrogates() {
        let mut ctx = Context::new();
        let value = parse_value(&mut ctx, r#""\ud800x""#).unwrap();
        assert_eq!(value.as_string().unwrap().units(), &[0xD800, 0x78]);
    }

    #[test]
    fn test_parse_errors_are_syntax_errors() {
        let mut ctx = Context::new();
        for text in [
            "", "01", "[1,]", "{'a':1}", "{\"a\" 1}", "\"abc", "tru", "1 2", "-", "1.", "[1",
            "\"\\x\"", "\"\u{1}\"",
        ] {
            let err = parse_value(&mut ctx, text).unwrap_err();
            assert_eq!(err.kind(), Some(ErrorKind::SyntaxError), "{text:?}");
        }
    }

    #[test]
    fn test_parse_reviver_runs_bottom_up() {
        let mut ctx = Context::new();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let log = std::rc::Rc::clone(&seen);
        let reviver = ctx.new_host_function("reviver", 2, move |ctx, _, args| {
            let key = ctx.to_string(&arg(args, 0))?.to_std_string_lossy();
            log.borrow_mut().push(key.clone());
            Ok(match arg(args, 1) {
                _ if key == "drop" => Value::undefined(),
                Value::Number(n) => Value::from(n + 1.0),
                other => other,
            })
        });
        let text = Value::from(r#"{"a":[1,2],"drop":3,"b":{"c":4}}"#);
        let value = parse(&mut ctx, &Value::undefined(), &[text, Value::Object(reviver)]).unwrap();
        assert_eq!(*seen.borrow(), ["0", "1", "a", "drop", "c", "b", ""]);
        assert_eq!(stringify_str(&mut ctx, &[value]).as_deref(), Some(r#"{"a":[2,3],"b":{"c":5}}"#));
    }
}
