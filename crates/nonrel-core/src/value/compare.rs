use crate::value::{EmbeddedValue, Value};
use rust_decimal::Decimal;
use std::cmp::Ordering;

/// Total canonical comparator used for in-memory ordering and set
/// normalization.
///
/// Ordering rules:
/// 1. Null sorts before everything else
/// 2. Numbers (int, float, decimal) compare numerically with each other
/// 3. Otherwise canonical variant rank, then variant-specific comparison
#[must_use]
pub fn canonical_cmp(left: &Value, right: &Value) -> Ordering {
    if let Some(ordering) = numeric_cmp(left, right) {
        return ordering;
    }

    let rank = canonical_rank(left).cmp(&canonical_rank(right));
    if rank != Ordering::Equal {
        return rank;
    }

    canonical_cmp_same_rank(left, right)
}

/// Strict comparator used by range operators (`lt`, `gte`, ...).
///
/// Returns `None` for mismatched or non-orderable variants; numbers widen
/// across int/float/decimal.
#[must_use]
pub fn strict_order_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    if let Some(ordering) = numeric_cmp(left, right) {
        return Some(ordering);
    }

    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
        (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Equality with numeric widening; every other pair compares structurally.
#[must_use]
pub fn values_equal(left: &Value, right: &Value) -> bool {
    if let Some(ordering) = numeric_cmp(left, right) {
        return ordering == Ordering::Equal;
    }

    left == right
}

// Compare two numeric values across int/float/decimal; `None` if either side
// is not numeric.
fn numeric_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => Some(a.cmp(b)),
        (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
        (Value::Int(a), Value::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
        (Value::Decimal(a), Value::Int(b)) => Some(a.cmp(&Decimal::from(*b))),
        (Value::Int(a), Value::Float(b)) => Some(decimal_float_cmp(Decimal::from(*a), b.get())),
        (Value::Float(a), Value::Int(b)) => {
            Some(decimal_float_cmp(Decimal::from(*b), a.get()).reverse())
        }
        (Value::Decimal(a), Value::Float(b)) => Some(decimal_float_cmp(*a, b.get())),
        (Value::Float(a), Value::Decimal(b)) => Some(decimal_float_cmp(*b, a.get()).reverse()),
        _ => None,
    }
}

// Exact `decimal <=> float`. With decimal = m / 10^s and float = k * 2^x,
// this compares m against k * 5^s * 2^(x + s), all in i128.
fn decimal_float_cmp(decimal: Decimal, float: f64) -> Ordering {
    let mantissa = decimal.mantissa();
    let scale = decimal.scale();
    let (fraction, exponent) = dyadic(float);

    // |k| <= 2^53 and 5^28 < 2^66
    let scaled = fraction * 5_i128.pow(scale);
    let shift = exponent + scale.cast_signed();

    if shift >= 0 {
        // an overflowing product already exceeds every 96-bit mantissa
        shifted(scaled, shift).map_or_else(|| scaled.cmp(&0).reverse(), |r| mantissa.cmp(&r))
    } else {
        shifted(mantissa, -shift).map_or_else(|| mantissa.cmp(&0), |l| l.cmp(&scaled))
    }
}

// `value * 2^shift`; `None` on i128 overflow.
fn shifted(value: i128, shift: i32) -> Option<i128> {
    if value == 0 {
        return Some(0);
    }

    let shift = u32::try_from(shift).ok().filter(|s| *s < 127)?;
    value.checked_mul(1_i128 << shift)
}

// Split a finite float into `fraction * 2^exponent` without rounding.
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn dyadic(value: f64) -> (i128, i32) {
    let bits = value.to_bits();
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = i128::from(bits & 0x000f_ffff_ffff_ffff);

    let (fraction, exponent) = if biased == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1 << 52), biased - 1075)
    };

    if value.is_sign_negative() {
        (-fraction, exponent)
    } else {
        (fraction, exponent)
    }
}

const fn canonical_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Int(_) | Value::Float(_) | Value::Decimal(_) => 2,
        Value::Text(_) => 3,
        Value::Bytes(_) => 4,
        Value::Date(_) => 5,
        Value::DateTime(_) => 6,
        Value::Time(_) => 7,
        Value::List(_) => 8,
        Value::Set(_) => 9,
        Value::Map(_) => 10,
        Value::Embedded(_) => 11,
    }
}

fn canonical_cmp_same_rank(left: &Value, right: &Value) -> Ordering {
    #[allow(clippy::match_same_arms)]
    match (left, right) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
        (Value::Time(a), Value::Time(b)) => a.cmp(b),
        (Value::List(a), Value::List(b)) | (Value::Set(a), Value::Set(b)) => cmp_list(a, b),
        (Value::Map(a), Value::Map(b)) => cmp_entries(a.iter(), b.iter(), a.len(), b.len()),
        (Value::Embedded(a), Value::Embedded(b)) => cmp_embedded(a, b),
        _ => Ordering::Equal,
    }
}

fn cmp_list(left: &[Value], right: &[Value]) -> Ordering {
    for (left, right) in left.iter().zip(right.iter()) {
        let cmp = canonical_cmp(left, right);
        if cmp != Ordering::Equal {
            return cmp;
        }
    }

    left.len().cmp(&right.len())
}

fn cmp_entries<'a>(
    left: impl Iterator<Item = (&'a String, &'a Value)>,
    right: impl Iterator<Item = (&'a String, &'a Value)>,
    left_len: usize,
    right_len: usize,
) -> Ordering {
    for ((left_key, left_value), (right_key, right_value)) in left.zip(right) {
        let key_cmp = left_key.cmp(right_key);
        if key_cmp != Ordering::Equal {
            return key_cmp;
        }

        let value_cmp = canonical_cmp(left_value, right_value);
        if value_cmp != Ordering::Equal {
            return value_cmp;
        }
    }

    left_len.cmp(&right_len)
}

fn cmp_embedded(left: &EmbeddedValue, right: &EmbeddedValue) -> Ordering {
    left.type_tag.cmp(&right.type_tag).then_with(|| {
        cmp_entries(
            left.fields.iter(),
            right.fields.iter(),
            left.fields.len(),
            right.fields.len(),
        )
    })
}
