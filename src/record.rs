//! Record shape, id extraction, merging, and the two id comparisons.
//!
//! Update and Delete deliberately compare ids differently: Update wants the
//! body's `id` to be the same JSON value as the stored one, Delete gets its
//! id as raw query text and coerces. Keep them separate.

use serde_json::{Map, Value};

/// One stored item: arbitrary fields plus an `id`.
pub type Record = Map<String, Value>;

/// Field name that carries the record id.
pub const ID_FIELD: &str = "id";

/// Numeric reading of `record`'s id, the way it takes part in id
/// assignment. Numbers count as-is and numeric strings are coerced (`"5"`
/// reads as 5). Anything that doesn't read as a finite number is `None`.
#[must_use]
pub fn record_id(record: &Record) -> Option<f64> {
    let n = match record.get(ID_FIELD)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => coerce_number(s),
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Copy of `base` with every field of `incoming` written over it. Nested
/// values are replaced, never merged.
#[must_use]
pub fn shallow_merge(base: &Record, incoming: &Record) -> Record {
    let mut merged = base.clone();
    for (k, v) in incoming {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

/// Same-value comparison used by Update.
///
/// Two absent ids match. Numbers compare numerically, so `1` and `1.0` are
/// equal. Arrays and objects are never equal to anything.
#[must_use]
pub fn strict_id_eq(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(Value::Null), Some(Value::Null)) => true,
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x == y,
        (Some(Value::String(x)), Some(Value::String(y))) => x == y,
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
        _ => false,
    }
}

/// Coercing comparison used by Delete: `id` against the raw query token.
#[must_use]
pub fn loose_id_eq(id: Option<&Value>, token: &str) -> bool {
    match id {
        Some(Value::String(s)) => s == token,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(n) => coerce_number(token) == n,
            None => false,
        },
        Some(Value::Bool(b)) => coerce_number(token) == if *b { 1.0 } else { 0.0 },
        _ => false,
    }
}

/// Numeric reading of a text token. Unparseable text yields NaN, which
/// compares unequal to everything.
fn coerce_number(token: &str) -> f64 {
    let t = token.trim();
    if t.is_empty() {
        return 0.0;
    }
    match t {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = t.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix)
                .map(|n| n as f64)
                .unwrap_or(f64::NAN);
        }
    }
    // f64::from_str also takes "inf" and "nan", which must stay NaN here.
    if !t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return f64::NAN;
    }
    t.parse::<f64>().unwrap_or(f64::NAN)
}
