//! Order-independent document form
//!
//! Mappings become key-sorted pairs, sequences become sorted sequences, and
//! scalars pass through. Two documents that differ only in key or array order
//! canonicalize to the same value.

use serde_json::Value;
use std::cmp::Ordering;

/// Canonical form of a JSON document
///
/// Kinds order as null < bool < number < text < sequence < mapping, so
/// sequences with mixed element kinds still sort deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Canonical {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    Sequence(Vec<Canonical>),
    Mapping(Vec<(String, Canonical)>),
}

/// Totally ordered number
///
/// Integers keep their exact value, so neighbours above 2^53 stay distinct.
/// Integers and floats compare by numeric value, and `-0.0` equals `0.0`.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    Int(i128),
    Float(f64),
}

impl Number {
    pub fn from_json(number: &serde_json::Number) -> Self {
        if let Some(i) = number.as_i64() {
            Number::Int(i.into())
        } else if let Some(u) = number.as_u64() {
            Number::Int(u.into())
        } else {
            Number::float(number.as_f64().unwrap_or_default())
        }
    }

    fn float(value: f64) -> Self {
        // Folds -0.0 into 0.0
        Number::Float(if value == 0.0 { 0.0 } else { value })
    }

    /// Nearest `f64`; lossy for integers beyond 2^53
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

/// Exact ordering of an integer against a float
fn cmp_int_float(int: i128, float: f64) -> Ordering {
    if float.is_nan() {
        return Ordering::Less;
    }
    let bound = 2f64.powi(127);
    if float >= bound {
        return Ordering::Less;
    }
    if float < -bound {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => 0.0f64.total_cmp(&(float - whole)),
        unequal => unequal,
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(b),
            (Number::Float(a), Number::Float(b)) => a.total_cmp(b),
            (Number::Int(a), Number::Float(b)) => cmp_int_float(*a, *b),
            (Number::Float(a), Number::Int(b)) => cmp_int_float(*b, *a).reverse(),
        }
    }
}

/// Canonical form of `value`
pub fn canonicalize(value: &Value) -> Canonical {
    match value {
        Value::Null => Canonical::Null,
        Value::Bool(b) => Canonical::Bool(*b),
        Value::Number(n) => Canonical::Number(Number::from_json(n)),
        Value::String(s) => Canonical::Text(s.clone()),
        Value::Array(items) => {
            let mut items: Vec<Canonical> = items.iter().map(canonicalize).collect();
            items.sort();
            Canonical::Sequence(items)
        }
        Value::Object(map) => {
            let mut pairs: Vec<(String, Canonical)> = map
                .iter()
                .map(|(key, value)| (key.clone(), canonicalize(value)))
                .collect();
            pairs.sort();
            Canonical::Mapping(pairs)
        }
    }
}

impl Canonical {
    /// Re-apply the ordering; a no-op on anything built by [`canonicalize`]
    pub fn canonicalize(self) -> Canonical {
        match self {
            Canonical::Sequence(items) => {
                let mut items: Vec<Canonical> =
                    items.into_iter().map(Canonical::canonicalize).collect();
                items.sort();
                Canonical::Sequence(items)
            }
            Canonical::Mapping(pairs) => {
                let mut pairs: Vec<(String, Canonical)> = pairs
                    .into_iter()
                    .map(|(key, value)| (key, value.canonicalize()))
                    .collect();
                pairs.sort();
                Canonical::Mapping(pairs)
            }
            scalar => scalar,
        }
    }
}

impl From<&Value> for Canonical {
    fn from(value: &Value) -> Self {
        canonicalize(value)
    }
}

/// Whether two documents are equal up to key and array order
pub fn equivalent(a: &Value, b: &Value) -> bool {
    canonicalize(a) == canonicalize(b)
}
