//! Typed comparison of field values
//!
//! Query parameters are untyped text while stored values are JSON. These
//! functions spell out the coercion rules instead of relying on implicit ones:
//!
//! | stored  | raw query text                          | equal when                    |
//! |---------|-----------------------------------------|-------------------------------|
//! | number  | parses as a number                      | numerically equal             |
//! | boolean | `true`/`false` (any case) or `1`/`0`    | same truth value              |
//! | string  | anything                                | byte-equal                    |
//! | array, object, null | anything                    | never                         |

use serde_json::Value;
use std::cmp::Ordering;

/// Loose equality between a stored value and raw query text
pub fn loose_eq(stored: &Value, raw: &str) -> bool {
    let raw = raw.trim();
    match stored {
        Value::Number(n) => {
            if let (Some(stored), Ok(query)) = (n.as_i64(), raw.parse::<i64>()) {
                return stored == query;
            }
            match (n.as_f64(), raw.parse::<f64>()) {
                (Some(stored), Ok(query)) => stored == query,
                _ => false,
            }
        }
        Value::Bool(b) => parse_bool(raw) == Some(*b),
        Value::String(s) => s == raw,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") || raw == "1" {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw == "0" {
        Some(false)
    } else {
        None
    }
}

/// Relational ordering between two stored values
///
/// Values of the same type compare naturally; values of different types are
/// ordered by type rank. The result is a total order.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
