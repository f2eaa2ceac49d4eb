//! Array constructor and Array.prototype
//!
//! The prototype methods are generic: `this` is converted with `ToObject`
//! and only `length` and index properties are used, so they work on any
//! array-like. Array-producing methods always create plain arrays.

use std::cmp::Ordering;

use crate::builtins::{arg, define_hidden, define_method};
use crate::context::Context;
use crate::error::{JsError, JsResult};
use crate::runtime::conversion::to_boolean;
use crate::runtime::equality::{same_value_zero, strict_equals};
use crate::runtime::string::JsString;
use crate::util::relative_index;
use crate::value::{ObjectId, Value};

/// `ArrayCreate` from constructor arguments
fn construct_array(ctx: &mut Context, args: &[Value], proto: ObjectId) -> JsResult<Value> {
    if let [Value::Number(n)] = args {
        let len = crate::runtime::conversion::f64_to_uint32(*n);
        if f64::from(len) != *n {
            return Err(JsError::range_error("invalid array length"));
        }
        return Ok(Value::Object(ctx.array_create(u64::from(len), Some(proto))?));
    }
    let array = ctx.create_array_from_list(args);
    ctx.object_mut(array).proto = Some(proto);
    Ok(Value::Object(array))
}

fn array_call(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    let proto = ctx.intrinsics().array_prototype;
    construct_array(ctx, args, proto)
}

fn array_construct(ctx: &mut Context, args: &[Value], new_target: ObjectId) -> JsResult<Value> {
    let fallback = ctx.intrinsics().array_prototype;
    let proto = ctx.get_prototype_from_constructor(new_target, fallback)?;
    construct_array(ctx, args, proto)
}

fn is_array(ctx: &mut Context, _this: &Value, args: &[Value]) -> JsResult<Value> {
    Ok(Value::from(ctx.is_array(&arg(args, 0))?))
}

/// `this` as an object together with its length
fn this_with_length(ctx: &mut Context, this: &Value) -> JsResult<(ObjectId, u64)> {
    let id = ctx.to_object(this)?;
    let len = ctx.length_of_array_like(id)?;
    Ok((id, u64::from(len)))
}

/// Resolve a relative start or end argument; undefined yields `default`
fn relative_arg(ctx: &mut Context, value: &Value, len: u64, default: u64) -> JsResult<u64> {
    if value.is_undefined() {
        return Ok(default);
    }
    Ok(relative_index(ctx.to_integer(value)?, len))
}

fn require_callable(ctx: &Context, value: &Value) -> JsResult<()> {
    if !ctx.is_callable(value) {
        return Err(JsError::type_error(format!(
            "{} is not a function",
            ctx.describe(value)
        )));
    }
    Ok(())
}

/// Move element `from` to `to`, deleting `to` if `from` is a hole
fn move_element(ctx: &mut Context, id: ObjectId, from: u64, to: u64) -> JsResult<()> {
    if ctx.has_property(id, &from.into())? {
        let value = ctx.get(id, from)?;
        ctx.set(id, to, value, true)?;
    } else {
        ctx.delete_property_or_throw(id, to)?;
    }
    Ok(())
}

fn set_length(ctx: &mut Context, id: ObjectId, len: u64) -> JsResult<()> {
    ctx.set(id, "length", Value::from(len as f64), true)?;
    Ok(())
}

fn is_concat_spreadable(ctx: &mut Context, value: &Value) -> JsResult<bool> {
    let Some(id) = value.as_object() else {
        return Ok(false);
    };
    let key = ctx.well_known_symbols().is_concat_spreadable.clone();
    let spreadable = ctx.get(id, key)?;
    if !spreadable.is_undefined() {
        return Ok(to_boolean(&spreadable));
    }
    ctx.is_array(value)
}

fn concat(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let first = Value::Object(ctx.to_object(this)?);
    let result = ctx.array_create(0, None)?;
    let mut n: u64 = 0;
    for item in std::iter::once(&first).chain(args) {
        if is_concat_spreadable(ctx, item)? {
            let (source, len) = this_with_length(ctx, item)?;
            for k in 0..len {
                if ctx.has_property(source, &k.into())? {
                    let value = ctx.get(source, k)?;
                    ctx.create_data_property_or_throw(result, n, value)?;
                }
                n += 1;
            }
        } else {
            ctx.create_data_property_or_throw(result, n, item.clone())?;
            n += 1;
        }
    }
    set_length(ctx, result, n)?;
    Ok(Value::Object(result))
}

/// `Array.prototype.join(separator)`: `this`, `length`, separator, then
/// each element in index order
pub fn join(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    let separator = match arg(args, 0) {
        Value::Undefined => JsString::from(","),
        sep => ctx.to_string(&sep)?,
    };
    let mut out: Vec<u16> = Vec::new();
    for k in 0..len {
        if k > 0 {
            out.extend_from_slice(separator.units());
        }
        let element = ctx.get(id, k)?;
        if !element.is_nullish() {
            out.extend_from_slice(ctx.to_string(&element)?.units());
        }
    }
    Ok(Value::String(JsString::from_units(out)))
}

fn to_string(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let id = ctx.to_object(this)?;
    let array = Value::Object(id);
    let func = ctx.get(id, "join")?;
    if ctx.is_callable(&func) {
        return ctx.call(&func, &array, &[]);
    }
    crate::builtins::object::to_string(ctx, &array, &[])
}

fn push(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let (id, mut len) = this_with_length(ctx, this)?;
    for item in args {
        ctx.set(id, len, item.clone(), true)?;
        len += 1;
    }
    set_length(ctx, id, len)?;
    Ok(Value::from(len as f64))
}

fn pop(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    if len == 0 {
        set_length(ctx, id, 0)?;
        return Ok(Value::undefined());
    }
    let index = len - 1;
    let element = ctx.get(id, index)?;
    ctx.delete_property_or_throw(id, index)?;
    set_length(ctx, id, index)?;
    Ok(element)
}

fn shift(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    if len == 0 {
        set_length(ctx, id, 0)?;
        return Ok(Value::undefined());
    }
    let first = ctx.get(id, 0u32)?;
    for k in 1..len {
        move_element(ctx, id, k, k - 1)?;
    }
    ctx.delete_property_or_throw(id, len - 1)?;
    set_length(ctx, id, len - 1)?;
    Ok(first)
}

fn unshift(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    let count = args.len() as u64;
    if count > 0 {
        for k in (0..len).rev() {
            move_element(ctx, id, k, k + count)?;
        }
        for (j, item) in args.iter().enumerate() {
            ctx.set(id, j as u64, item.clone(), true)?;
        }
    }
    set_length(ctx, id, len + count)?;
    Ok(Value::from((len + count) as f64))
}

fn reverse(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    let middle = len / 2;
    for lower in 0..middle {
        let upper = len - lower - 1;
        let lower_value = if ctx.has_property(id, &lower.into())? {
            Some(ctx.get(id, lower)?)
        } else {
            None
        };
        let upper_value = if ctx.has_property(id, &upper.into())? {
            Some(ctx.get(id, upper)?)
        } else {
            None
        };
        match (lower_value, upper_value) {
            (Some(lv), Some(uv)) => {
                ctx.set(id, lower, uv, true)?;
                ctx.set(id, upper, lv, true)?;
            }
            (None, Some(uv)) => {
                ctx.set(id, lower, uv, true)?;
                ctx.delete_property_or_throw(id, upper)?;
            }
            (Some(lv), None) => {
                ctx.delete_property_or_throw(id, lower)?;
                ctx.set(id, upper, lv, true)?;
            }
            (None, None) => {}
        }
    }
    Ok(Value::Object(id))
}

fn slice(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    let start = relative_arg(ctx, &arg(args, 0), len, 0)?;
    let end = relative_arg(ctx, &arg(args, 1), len, len)?;
    let count = end.saturating_sub(start);
    let result = ctx.array_create(count, None)?;
    let mut n: u64 = 0;
    for k in start..end {
        if ctx.has_property(id, &k.into())? {
            let value = ctx.get(id, k)?;
            ctx.create_data_property_or_throw(result, n, value)?;
        }
        n += 1;
    }
    set_length(ctx, result, n)?;
    Ok(Value::Object(result))
}

/// `Array.prototype.splice(start, deleteCount, ...items)`
///
/// With only `start` given, everything from `start` to the end is removed.
fn splice(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    let start = relative_arg(ctx, &arg(args, 0), len, 0)?;
    let delete_count = match args.len() {
        0 => 0,
        1 => len - start,
        _ => {
            let dc = ctx.to_integer(&args[1])?;
            dc.clamp(0.0, (len - start) as f64) as u64
        }
    };
    let items = args.get(2..).unwrap_or(&[]);
    let item_count = items.len() as u64;

    let removed = ctx.array_create(delete_count, None)?;
    for k in 0..delete_count {
        let from = start + k;
        if ctx.has_property(id, &from.into())? {
            let value = ctx.get(id, from)?;
            ctx.create_data_property_or_throw(removed, k, value)?;
        }
    }
    set_length(ctx, removed, delete_count)?;

    let new_len = len - delete_count + item_count;
    if item_count < delete_count {
        for k in start..(len - delete_count) {
            move_element(ctx, id, k + delete_count, k + item_count)?;
        }
        for k in (new_len..len).rev() {
            ctx.delete_property_or_throw(id, k)?;
        }
    } else if item_count > delete_count {
        for k in (start..(len - delete_count)).rev() {
            move_element(ctx, id, k + delete_count, k + item_count)?;
        }
    }
    for (j, item) in items.iter().enumerate() {
        ctx.set(id, start + j as u64, item.clone(), true)?;
    }
    set_length(ctx, id, new_len)?;
    Ok(Value::Object(removed))
}

fn index_of(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    if len == 0 {
        return Ok(Value::from(-1));
    }
    let n = ctx.to_integer(&arg(args, 1))?;
    if n >= len as f64 {
        return Ok(Value::from(-1));
    }
    let search = arg(args, 0);
    for k in relative_index(n, len)..len {
        if ctx.has_property(id, &k.into())? {
            let element = ctx.get(id, k)?;
            if strict_equals(&search, &element) {
                return Ok(Value::from(k as f64));
            }
        }
    }
    Ok(Value::from(-1))
}

fn last_index_of(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    if len == 0 {
        return Ok(Value::from(-1));
    }
    let n = if args.len() > 1 {
        ctx.to_integer(&args[1])?
    } else {
        len as f64 - 1.0
    };
    let start = if n >= 0.0 {
        n.min(len as f64 - 1.0)
    } else {
        len as f64 + n
    };
    if start < 0.0 {
        return Ok(Value::from(-1));
    }
    let search = arg(args, 0);
    for k in (0..=start as u64).rev() {
        if ctx.has_property(id, &k.into())? {
            let element = ctx.get(id, k)?;
            if strict_equals(&search, &element) {
                return Ok(Value::from(k as f64));
            }
        }
    }
    Ok(Value::from(-1))
}

/// `Array.prototype.includes`: SameValueZero, holes read as undefined
fn includes(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    if len == 0 {
        return Ok(Value::from(false));
    }
    let n = ctx.to_integer(&arg(args, 1))?;
    let search = arg(args, 0);
    for k in relative_index(n, len)..len {
        let element = ctx.get(id, k)?;
        if same_value_zero(&search, &element) {
            return Ok(Value::from(true));
        }
    }
    Ok(Value::from(false))
}

/// What an iteration callback's result means to its method
#[derive(Clone, Copy, PartialEq, Eq)]
enum Iteration {
    Every,
    Some,
    ForEach,
    Map,
    Filter,
}

fn iterate(ctx: &mut Context, this: &Value, args: &[Value], mode: Iteration) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    let callback = arg(args, 0);
    require_callable(ctx, &callback)?;
    let this_arg = arg(args, 1);
    let this_value = Value::Object(id);

    let result = match mode {
        Iteration::Map => Some(ctx.array_create(len, None)?),
        Iteration::Filter => Some(ctx.array_create(0, None)?),
        _ => None,
    };
    let mut to: u64 = 0;
    for k in 0..len {
        if !ctx.has_property(id, &k.into())? {
            continue;
        }
        let value = ctx.get(id, k)?;
        let call_args = [value.clone(), Value::from(k as f64), this_value.clone()];
        let outcome = ctx.call(&callback, &this_arg, &call_args)?;
        match (mode, result) {
            (Iteration::Every, _) if !to_boolean(&outcome) => return Ok(Value::from(false)),
            (Iteration::Some, _) if to_boolean(&outcome) => return Ok(Value::from(true)),
            (Iteration::Map, Some(array)) => {
                ctx.create_data_property_or_throw(array, k, outcome)?;
            }
            (Iteration::Filter, Some(array)) if to_boolean(&outcome) => {
                ctx.create_data_property_or_throw(array, to, value)?;
                to += 1;
            }
            _ => {}
        }
    }
    Ok(match (mode, result) {
        (Iteration::Every, _) => Value::from(true),
        (Iteration::Some, _) => Value::from(false),
        (_, Some(array)) => Value::Object(array),
        _ => Value::undefined(),
    })
}

fn every(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    iterate(ctx, this, args, Iteration::Every)
}

fn some(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    iterate(ctx, this, args, Iteration::Some)
}

fn for_each(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    iterate(ctx, this, args, Iteration::ForEach)
}

fn map(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    iterate(ctx, this, args, Iteration::Map)
}

fn filter(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    iterate(ctx, this, args, Iteration::Filter)
}

fn fold(ctx: &mut Context, this: &Value, args: &[Value], from_right: bool) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    let callback = arg(args, 0);
    require_callable(ctx, &callback)?;
    let this_value = Value::Object(id);

    let mut indices: Box<dyn Iterator<Item = u64>> = if from_right {
        Box::new((0..len).rev())
    } else {
        Box::new(0..len)
    };
    let mut accumulator = match args.get(1) {
        Some(initial) => initial.clone(),
        None => loop {
            let Some(k) = indices.next() else {
                return Err(JsError::type_error("reduce of empty array with no initial value"));
            };
            if ctx.has_property(id, &k.into())? {
                break ctx.get(id, k)?;
            }
        },
    };
    for k in indices {
        if ctx.has_property(id, &k.into())? {
            let value = ctx.get(id, k)?;
            let call_args = [accumulator, value, Value::from(k as f64), this_value.clone()];
            accumulator = ctx.call(&callback, &Value::undefined(), &call_args)?;
        }
    }
    Ok(accumulator)
}

fn reduce(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    fold(ctx, this, args, false)
}

fn reduce_right(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    fold(ctx, this, args, true)
}

/// `Array.prototype.toLocaleString()`: `toLocaleString` of each element,
/// comma separated
fn to_locale_string(ctx: &mut Context, this: &Value, _args: &[Value]) -> JsResult<Value> {
    let (id, len) = this_with_length(ctx, this)?;
    let mut out: Vec<u16> = Vec::new();
    for k in 0..len {
        if k > 0 {
            out.push(u16::from(b','));
        }
        let element = ctx.get(id, k)?;
        if !element.is_nullish() {
            let text = ctx.invoke(&element, "toLocaleString", &[])?;
            out.extend_from_slice(ctx.to_string(&text)?.units());
        }
    }
    Ok(Value::String(JsString::from_units(out)))
}

/// `SortCompare(x, y)` for two defined values
fn sort_compare(ctx: &mut Context, comparator: &Value, x: &Value, y: &Value) -> JsResult<Ordering> {
    if comparator.is_undefined() {
        let x = ctx.to_string(x)?;
        let y = ctx.to_string(y)?;
        return Ok(x.units().cmp(y.units()));
    }
    let result = ctx.call(comparator, &Value::undefined(), &[x.clone(), y.clone()])?;
    let n = ctx.to_number(&result)?;
    Ok(n.partial_cmp(&0.0).unwrap_or(Ordering::Equal))
}

/// Stable bottom-up merge sort that stops at the first comparator error
fn merge_sort(ctx: &mut Context, comparator: &Value, mut items: Vec<Value>) -> JsResult<Vec<Value>> {
    let mut width = 1;
    while width < items.len() {
        let mut merged = Vec::with_capacity(items.len());
        let mut rest = items.into_iter().peekable();
        while rest.peek().is_some() {
            let left: Vec<Value> = rest.by_ref().take(width).collect();
            let right: Vec<Value> = rest.by_ref().take(width).collect();
            let (mut i, mut j) = (0, 0);
            while i < left.len() && j < right.len() {
                if sort_compare(ctx, comparator, &left[i], &right[j])? == Ordering::Greater {
                    merged.push(right[j].clone());
                    j += 1;
                } else {
                    merged.push(left[i].clone());
                    i += 1;
                }
            }
            merged.extend_from_slice(&left[i..]);
            merged.extend_from_slice(&right[j..]);
        }
        items = merged;
        width *= 2;
    }
    Ok(items)
}

/// `Array.prototype.sort(comparefn)`
///
/// Present elements are read first, sorted with undefined last, written
/// back from index 0, and the remaining indices below `length` deleted.
fn sort(ctx: &mut Context, this: &Value, args: &[Value]) -> JsResult<Value> {
    let comparator = arg(args, 0);
    if !comparator.is_undefined() {
        require_callable(ctx, &comparator)?;
    }
    let id = ctx.to_object(this)?;
    let len = ctx.length_of_array_like(id)?;
    ctx.check_list_length(len)?;

    let mut values = Vec::new();
    let mut undefined_count: u32 = 0;
    for k in 0..len {
        if ctx.has_property(id, &k.into())? {
            match ctx.get(id, k)? {
                Value::Undefined => undefined_count += 1,
                value => values.push(value),
            }
        }
    }
    let sorted = merge_sort(ctx, &comparator, values)?;

    let mut k: u32 = 0;
    for value in sorted {
        ctx.set(id, k, value, true)?;
        k += 1;
    }
    for _ in 0..undefined_count {
        ctx.set(id, k, Value::undefined(), true)?;
        k += 1;
    }
    for hole in k..len {
        ctx.delete_property_or_throw(id, hole)?;
    }
    Ok(Value::Object(id))
}

pub(crate) fn install(ctx: &mut Context) {
    let proto = ctx.intrinsics().array_prototype;
    let ctor = ctx.new_constructor("Array", 1, array_call, array_construct, proto);
    define_method(ctx, ctor, "isArray", 1, is_array);

    define_method(ctx, proto, "concat", 1, concat);
    define_method(ctx, proto, "join", 1, join);
    define_method(ctx, proto, "toString", 0, to_string);
    define_method(ctx, proto, "toLocaleString", 0, to_locale_string);
    define_method(ctx, proto, "push", 1, push);
    define_method(ctx, proto, "pop", 0, pop);
    define_method(ctx, proto, "shift", 0, shift);
    define_method(ctx, proto, "unshift", 1, unshift);
    define_method(ctx, proto, "reverse", 0, reverse);
    define_method(ctx, proto, "sort", 1, sort);
    define_method(ctx, proto, "slice", 2, slice);
    define_method(ctx, proto, "splice", 2, splice);
    define_method(ctx, proto, "indexOf", 1, index_of);
    define_method(ctx, proto, "lastIndexOf", 1, last_index_of);
    define_method(ctx, proto, "includes", 1, includes);
    define_method(ctx, proto, "every", 1, every);
    define_method(ctx, proto, "some", 1, some);
    define_method(ctx, proto, "forEach", 1, for_each);
    define_method(ctx, proto, "map", 1, map);
    define_method(ctx, proto, "filter", 1, filter);
    define_method(ctx, proto, "reduce", 1, reduce);
    define_method(ctx, proto, "reduceRight", 1, reduce_right);

    let global = ctx.global_object();
    define_hidden(ctx, global, "Array", Value::Object(ctor));
}
