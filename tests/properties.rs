//! Property-based checks for coercions and the property table

use jscore::runtime::equality::{same_value, same_value_zero};
use jscore::{Context, PropertyKey, Value};
use proptest::prelude::*;

fn primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::undefined()),
        Just(Value::null()),
        any::<bool>().prop_map(Value::from),
        any::<f64>().prop_map(Value::from),
        "[ -~]{0,12}".prop_map(|s: String| Value::from(s)),
    ]
}

proptest! {
    #[test]
    fn to_uint32_wraps_modulo_two_to_the_32(n in -(1i64 << 40)..(1i64 << 40)) {
        let mut ctx = Context::new();
        let expected = n.rem_euclid(1i64 << 32) as u32;
        prop_assert_eq!(ctx.to_uint32(&Value::from(n as f64)).unwrap(), expected);
    }

    #[test]
    fn number_to_string_round_trips(n in any::<f64>().prop_filter("finite", |n| n.is_finite())) {
        let mut ctx = Context::new();
        let text = ctx.to_string(&Value::from(n)).unwrap();
        let back = ctx.to_number(&Value::String(text)).unwrap();
        prop_assert_eq!(back, n);
    }

    #[test]
    fn coercions_are_fixed_points(v in primitive()) {
        let mut ctx = Context::new();
        let b = ctx.to_boolean(&v);
        prop_assert_eq!(ctx.to_boolean(&Value::from(b)), b);

        let n = ctx.to_number(&v).unwrap();
        let again = ctx.to_number(&Value::from(n)).unwrap();
        prop_assert!(same_value(&Value::from(again), &Value::from(n)));

        let s = ctx.to_string(&v).unwrap();
        let again = ctx.to_string(&Value::String(s.clone())).unwrap();
        prop_assert_eq!(again, s);
    }

    #[test]
    fn same_value_laws(a in primitive(), b in primitive()) {
        prop_assert!(same_value(&a, &a));
        prop_assert!(same_value_zero(&a, &a));
        prop_assert_eq!(same_value(&a, &b), same_value(&b, &a));
        if same_value(&a, &b) {
            prop_assert!(same_value_zero(&a, &b));
        }
    }

    #[test]
    fn own_keys_are_in_canonical_order(
        keys in proptest::collection::vec(
            prop_oneof![
                (0u32..1000).prop_map(|i| i.to_string()),
                "[a-z]{1,4}",
            ],
            0..24,
        )
    ) {
        let mut ctx = Context::new();
        let obj = ctx.new_object();
        for key in &keys {
            ctx.create_data_property_or_throw(obj, key.as_str(), Value::from(1)).unwrap();
        }

        let mut indices: Vec<u32> = keys.iter().filter_map(|k| k.parse().ok()).collect();
        indices.sort_unstable();
        indices.dedup();
        let mut expected: Vec<String> = indices.iter().map(u32::to_string).collect();
        for key in &keys {
            if key.parse::<u32>().is_err() && !expected.contains(key) {
                expected.push(key.clone());
            }
        }

        let actual: Vec<String> = ctx
            .own_property_keys(obj)
            .unwrap()
            .iter()
            .filter_map(PropertyKey::as_string)
            .map(|s| s.to_std_string_lossy())
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn descriptor_reads_are_idempotent(
        value in primitive(),
        writable in any::<bool>(),
        enumerable in any::<bool>(),
    ) {
        let mut ctx = Context::new();
        let obj = ctx.new_object();
        let desc = jscore::PropertyDescriptor::data(value, writable, enumerable, true);
        ctx.define_property_or_throw(obj, "k", &desc).unwrap();
        let key = PropertyKey::from("k");
        let first = ctx.get_own_property(obj, &key).unwrap().unwrap();
        let second = ctx.get_own_property(obj, &key).unwrap().unwrap();
        prop_assert!(same_value(
            first.value().unwrap_or(&Value::undefined()),
            second.value().unwrap_or(&Value::undefined()),
        ));
        prop_assert_eq!(first.writable(), Some(writable));
        prop_assert_eq!(second.enumerable, enumerable);
    }
}
