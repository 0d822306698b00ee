use crate::value::{TextMode, Value, canonical_cmp, casefold, strict_order_cmp, values_equal};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cmp::Ordering;

// ---- helpers -----------------------------------------------------------

fn v_f64(x: f64) -> Value {
    Value::float(x).expect("finite f64")
}
fn v_txt(s: &str) -> Value {
    Value::Text(s.to_string())
}
fn v_date(y: i32, m: u32, d: u32) -> Value {
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
}

// ---- comparison --------------------------------------------------------

#[test]
fn numeric_values_widen_across_variants() {
    assert!(values_equal(&Value::Int(2), &v_f64(2.0)));
    assert!(values_equal(&Value::Int(2), &Value::Decimal(Decimal::new(200, 2))));
    assert_eq!(
        strict_order_cmp(&Value::Int(1), &v_f64(1.5)),
        Some(Ordering::Less)
    );
    assert_eq!(
        strict_order_cmp(&Value::Decimal(Decimal::new(25, 1)), &Value::Int(2)),
        Some(Ordering::Greater)
    );
}

#[test]
fn int_float_comparison_is_exact_past_f64_precision() {
    let two_53 = 1_i64 << 53;
    let float = v_f64(9_007_199_254_740_992.0);

    assert_eq!(canonical_cmp(&Value::Int(two_53 + 1), &float), Ordering::Greater);
    assert_eq!(canonical_cmp(&float, &Value::Int(two_53 + 1)), Ordering::Less);
    assert!(values_equal(&Value::Int(two_53), &float));
    assert!(!values_equal(&Value::Int(two_53 + 1), &Value::Int(two_53)));

    // 2^63 is one past i64::MAX
    assert_eq!(
        canonical_cmp(&Value::Int(i64::MAX), &v_f64(9_223_372_036_854_775_808.0)),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::Int(i64::MIN), &v_f64(-9_223_372_036_854_775_808.0)),
        Ordering::Equal
    );
    assert_eq!(canonical_cmp(&Value::Int(3), &v_f64(3.5)), Ordering::Less);
    assert_eq!(canonical_cmp(&Value::Int(-3), &v_f64(-3.5)), Ordering::Greater);
    assert_eq!(canonical_cmp(&Value::Int(0), &v_f64(-0.0)), Ordering::Equal);
}

#[test]
fn decimal_float_comparison_is_exact() {
    let tenth = Value::Decimal(Decimal::new(1, 1));

    // the float 0.1 sits slightly above one tenth
    assert_eq!(canonical_cmp(&tenth, &v_f64(0.1)), Ordering::Less);
    assert!(values_equal(&Value::Decimal(Decimal::new(25, 2)), &v_f64(0.25)));
    assert_eq!(
        canonical_cmp(&Value::Decimal(Decimal::new(-15, 1)), &v_f64(-1.25)),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::Decimal(Decimal::MAX), &v_f64(1e300)),
        Ordering::Less
    );
    assert_eq!(
        canonical_cmp(&Value::Decimal(Decimal::new(1, 28)), &v_f64(1e-300)),
        Ordering::Greater
    );
    assert_eq!(
        canonical_cmp(&Value::Decimal(Decimal::ZERO), &v_f64(5e-324)),
        Ordering::Less
    );
}

#[test]
fn strict_order_is_undefined_across_families() {
    assert_eq!(strict_order_cmp(&Value::Int(1), &v_txt("1")), None);
    assert_eq!(strict_order_cmp(&Value::Null, &v_date(2020, 1, 1)), None);
    assert_eq!(strict_order_cmp(&Value::from_list([1]), &Value::from_list([1])), None);
}

#[test]
fn canonical_cmp_puts_null_first() {
    for other in [Value::Bool(false), Value::Int(-5), v_txt(""), v_date(1, 1, 1)] {
        assert_eq!(canonical_cmp(&Value::Null, &other), Ordering::Less);
        assert_eq!(canonical_cmp(&other, &Value::Null), Ordering::Greater);
    }
}

#[test]
fn canonical_cmp_is_total_for_mixed_variants() {
    let left = v_txt("x");
    let right = v_date(2024, 1, 2);

    assert_ne!(canonical_cmp(&left, &right), Ordering::Equal);
    assert_eq!(
        canonical_cmp(&left, &right),
        canonical_cmp(&right, &left).reverse()
    );
}

// ---- construction ------------------------------------------------------

#[test]
fn from_set_sorts_and_deduplicates() {
    let set = Value::from_set([3, 1, 2, 3, 1]);

    assert_eq!(
        set,
        Value::Set(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn option_none_becomes_null() {
    assert_eq!(Value::from(None::<i64>), Value::Null);
    assert_eq!(Value::from(Some("a")), v_txt("a"));
}

#[test]
fn float_rejects_non_finite() {
    assert!(Value::float(f64::NAN).is_none());
    assert!(Value::float(f64::INFINITY).is_none());
}

// ---- text --------------------------------------------------------------

#[test]
fn text_helpers_respect_mode() {
    let name = v_txt("Kakashi");

    assert_eq!(name.text_starts_with(&v_txt("kak"), TextMode::Cs), Some(false));
    assert_eq!(name.text_starts_with(&v_txt("kak"), TextMode::Ci), Some(true));
    assert_eq!(name.text_ends_with(&v_txt("SHI"), TextMode::Ci), Some(true));
    assert_eq!(name.text_contains(&v_txt("kash"), TextMode::Cs), Some(true));
    assert_eq!(name.text_eq(&v_txt("KAKASHI"), TextMode::Ci), Some(true));
}

#[test]
fn text_helpers_reject_non_text() {
    assert_eq!(Value::Int(1).text_eq(&v_txt("1"), TextMode::Cs), None);
    assert_eq!(v_txt("1").text_contains(&Value::Null, TextMode::Ci), None);
}

#[test]
fn casefold_lowercases_unicode_without_full_folding() {
    assert_eq!(casefold("ÉCOLE"), "école");
    assert_eq!(casefold("Straße"), "straße");
    assert_eq!(casefold("ABC"), "abc");
}
