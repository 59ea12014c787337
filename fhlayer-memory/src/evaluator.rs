//! Filter evaluation for in-memory listings.
//!
//! This module evaluates the operator blocks of a `list` request
//! (`{ eq: { name: "derp" }, gt: { age: 18 } }`) against stored fields. Every
//! condition of every block must hold for a record to match.

use std::{cmp::Ordering, collections::HashMap};
use bson::{Bson, Document, datetime::DateTime};
use tracing::trace;

use fhlayer_core::query::FilterOp;


/// Comparable representation of BSON values.
///
/// Numeric types are normalized to f64 so that `Int32(22)` equals
/// `Int64(22)` and `Double(22.0)`.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    DateTime(DateTime),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            _ => Comparable::Null, // Other types are not comparable
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => a.partial_cmp(b),
            (Comparable::Number(a), Comparable::Number(b)) => a.partial_cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.partial_cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}


/// Matches stored fields against the operator blocks of a listing.
pub(crate) struct RecordFilter<'a> {
    filter: &'a Document,
}

impl<'a> RecordFilter<'a> {
    pub fn new(filter: &'a Document) -> Self {
        Self { filter }
    }

    /// Returns `true` if `fields` satisfies every condition. Operator blocks
    /// this store does not understand are ignored.
    pub fn matches(&self, fields: &Document) -> bool {
        self.filter.iter().all(|(name, block)| {
            let (Some(op), Bson::Document(conditions)) = (FilterOp::from_name(name), block) else {
                trace!(operator = %name, "ignoring unsupported filter block");
                return true;
            };

            conditions
                .iter()
                .all(|(field, value)| Self::check(op, fields.get(field), value))
        })
    }

    fn check(op: FilterOp, field_value: Option<&Bson>, value: &Bson) -> bool {
        let Some(field_value) = field_value else {
            // Only "not equal" holds for a field the record does not have.
            return op == FilterOp::Ne;
        };

        match op {
            FilterOp::Eq => Comparable::from(field_value) == Comparable::from(value),
            FilterOp::Ne => Comparable::from(field_value) != Comparable::from(value),
            FilterOp::Lt | FilterOp::Le | FilterOp::Gt | FilterOp::Ge => {
                match Comparable::from(field_value).partial_cmp(&Comparable::from(value)) {
                    Some(ordering) => match op {
                        FilterOp::Lt => ordering == Ordering::Less,
                        FilterOp::Le => ordering != Ordering::Greater,
                        FilterOp::Gt => ordering == Ordering::Greater,
                        _ => ordering != Ordering::Less,
                    },
                    None => false,
                }
            },
            FilterOp::Like => match (Comparable::from(field_value), Comparable::from(value)) {
                (Comparable::String(left), Comparable::String(right)) => left.contains(right),
                _ => false,
            },
            FilterOp::In => match (Comparable::from(field_value), Comparable::from(value)) {
                (Comparable::Array(array), Comparable::Array(values)) => {
                    values.iter().any(|val| array.contains(val))
                },
                (single_value, Comparable::Array(values)) => values.contains(&single_value),
                (left, right) => left == right,
            },
        }
    }
}
