use crate::{
    db::{
        predicate::{Connector, FilterChild, FilterLeaf, FilterNode, Lookup, NormalizedTree},
        record::Record,
    },
    error::{Error, ErrorOrigin},
    value::{TextMode, Value, strict_order_cmp, values_equal},
};
use chrono::{Datelike, NaiveDate};
use std::cmp::Ordering;

///
/// Evaluate a normalized filter tree against one stored record.
///
/// - an empty tree matches every record
/// - AND stops at the first non-match, OR at the first match
/// - a node's own negation inverts its combined result
///
/// A column missing from the record reads as NULL.
///
pub fn matches(record: &Record, tree: &NormalizedTree) -> Result<bool, Error> {
    eval_node(record, tree.root())
}

fn eval_node(record: &Record, node: &FilterNode) -> Result<bool, Error> {
    if node.children.is_empty() {
        return Ok(true);
    }

    let short_circuit_on = node.connector == Connector::Or;
    let mut result = !short_circuit_on;

    for child in &node.children {
        let matched = match child {
            FilterChild::Node(inner) => eval_node(record, inner)?,
            FilterChild::Leaf(leaf) => eval_leaf(record, leaf)?,
        };

        if matched == short_circuit_on {
            result = short_circuit_on;
            break;
        }
    }

    Ok(result != node.negated)
}

fn eval_leaf(record: &Record, leaf: &FilterLeaf) -> Result<bool, Error> {
    if !leaf.lookup.is_emulated() {
        return Err(Error::unsupported_query(
            ErrorOrigin::Eval,
            format!(
                "Lookup type {} isn't supported by in-memory filtering",
                leaf.lookup
            ),
        ));
    }

    let actual = record.get_or_null(&leaf.column);
    let expected = &leaf.value;

    if actual.is_null() {
        return Ok(null_matches(leaf.lookup, expected));
    }

    let cmp = || strict_order_cmp(actual, expected);

    Ok(match leaf.lookup {
        Lookup::Exact => exact(actual, expected),
        Lookup::IExact => actual.text_eq(expected, TextMode::Ci).unwrap_or(false),
        Lookup::Contains => actual.text_contains(expected, TextMode::Cs).unwrap_or(false),
        Lookup::IContains => actual.text_contains(expected, TextMode::Ci).unwrap_or(false),
        Lookup::StartsWith => actual.text_starts_with(expected, TextMode::Cs).unwrap_or(false),
        Lookup::IStartsWith => actual.text_starts_with(expected, TextMode::Ci).unwrap_or(false),
        Lookup::EndsWith => actual.text_ends_with(expected, TextMode::Cs).unwrap_or(false),
        Lookup::IEndsWith => actual.text_ends_with(expected, TextMode::Ci).unwrap_or(false),

        Lookup::Lt => cmp().is_some_and(Ordering::is_lt),
        Lookup::Lte => cmp().is_some_and(Ordering::is_le),
        Lookup::Gt => cmp().is_some_and(Ordering::is_gt),
        Lookup::Gte => cmp().is_some_and(Ordering::is_ge),

        Lookup::In => expected
            .as_elements()
            .is_some_and(|items| items.iter().any(|item| values_equal(actual, item))),
        Lookup::Range => within(actual, expected, Ordering::is_le),
        Lookup::Year => within(actual, expected, Ordering::is_lt),
        Lookup::Month => date_part_is(actual, NaiveDate::month, expected),
        Lookup::Day => date_part_is(actual, NaiveDate::day, expected),

        Lookup::IsNull => matches!(expected, Value::Bool(false)),

        // rejected above
        Lookup::Regex | Lookup::IRegex | Lookup::Search => false,
    })
}

// NULL sorts below any temporal bound and never matches a text pattern.
fn null_matches(lookup: Lookup, expected: &Value) -> bool {
    match lookup {
        Lookup::IsNull => matches!(expected, Value::Bool(true)),
        Lookup::Lt | Lookup::Lte => expected.is_temporal(),
        Lookup::Exact => expected.is_null(),
        _ => false,
    }
}

// Equality, or membership when the stored value is itself a collection.
fn exact(actual: &Value, expected: &Value) -> bool {
    match actual.as_elements() {
        Some(items) => items.iter().any(|item| values_equal(item, expected)),
        None => values_equal(actual, expected),
    }
}

// `lo <= actual` and `actual <upper> hi` for a two-element bound list.
fn within(actual: &Value, bounds: &Value, upper: fn(Ordering) -> bool) -> bool {
    let Some([lo, hi]) = bounds.as_elements() else {
        return false;
    };

    strict_order_cmp(actual, lo).is_some_and(Ordering::is_ge)
        && strict_order_cmp(actual, hi).is_some_and(upper)
}

// `month` / `day` lookups compare one calendar component against an integer.
fn date_part_is(value: &Value, part: fn(&NaiveDate) -> u32, expected: &Value) -> bool {
    let date = match value {
        Value::Date(d) => *d,
        Value::DateTime(dt) => dt.date(),
        _ => return false,
    };

    matches!(expected, Value::Int(n) if *n == i64::from(part(&date)))
}
