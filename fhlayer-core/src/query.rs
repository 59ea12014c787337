//! Query construction for collection listings.
//!
//! A [`Query`] is the filter part of a `list` request. The data API expects
//! operator blocks at the top level of the request, each mapping field names to
//! the value to compare against:
//!
//! ```ignore
//! use fhlayer::query::Query;
//!
//! // { eq: { name: "Alice" }, gt: { age: 18 } }
//! let query = Query::new()
//!     .eq("name", "Alice")
//!     .gt("age", 18);
//! ```
//!
//! The keys `act` and `type` route the request and are filled in by the layer.
//! A query can never carry them: building one from a raw document that does is
//! rejected with [`LayerError::ReservedQueryKey`] before anything is sent.

use bson::{Bson, Document};

use crate::error::{LayerError, LayerResult};

/// Request keys owned by the layer.
pub const RESERVED_KEYS: [&str; 2] = ["act", "type"];

/// Comparison operators understood by the data API's `list` action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Equal to.
    Eq,
    /// Not equal to.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal to.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal to.
    Ge,
    /// String pattern match.
    Like,
    /// Field value is one of the given values.
    In,
}

impl FilterOp {
    /// All operators, in wire order.
    pub const ALL: [FilterOp; 8] = [
        FilterOp::Eq,
        FilterOp::Ne,
        FilterOp::Lt,
        FilterOp::Le,
        FilterOp::Gt,
        FilterOp::Ge,
        FilterOp::Like,
        FilterOp::In,
    ];

    /// Returns the wire name of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Ne => "ne",
            FilterOp::Lt => "lt",
            FilterOp::Le => "le",
            FilterOp::Gt => "gt",
            FilterOp::Ge => "ge",
            FilterOp::Like => "like",
            FilterOp::In => "in",
        }
    }

    /// Looks up an operator by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == name)
    }
}

/// Filter conditions for a listing.
///
/// An empty query lists the whole collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filter: Document,
}

impl Query {
    /// Creates an empty query matching every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches records where `field` equals `value`.
    pub fn eq(self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.with(FilterOp::Eq, field.into(), value.into())
    }

    /// Matches records where `field` does not equal `value`.
    pub fn ne(self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.with(FilterOp::Ne, field.into(), value.into())
    }

    /// Matches records where `field` is less than `value`.
    pub fn lt(self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.with(FilterOp::Lt, field.into(), value.into())
    }

    /// Matches records where `field` is less than or equal to `value`.
    pub fn le(self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.with(FilterOp::Le, field.into(), value.into())
    }

    /// Matches records where `field` is greater than `value`.
    pub fn gt(self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.with(FilterOp::Gt, field.into(), value.into())
    }

    /// Matches records where `field` is greater than or equal to `value`.
    pub fn ge(self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.with(FilterOp::Ge, field.into(), value.into())
    }

    /// Matches records where the string `field` matches `pattern`.
    pub fn like(self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.with(FilterOp::Like, field.into(), Bson::String(pattern.into()))
    }

    /// Matches records where `field` is one of `values`.
    pub fn in_<V: Into<Bson>>(self, field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        self.with(
            FilterOp::In,
            field.into(),
            Bson::Array(values.into_iter().map(Into::into).collect()),
        )
    }

    /// Adds a raw operator block, for operators the builder does not cover.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::ReservedQueryKey`] if `key` is `act` or `type`.
    pub fn filter(mut self, key: &str, block: impl Into<Bson>) -> LayerResult<Self> {
        check_key(key)?;
        self.filter.insert(key, block.into());

        Ok(self)
    }

    /// Returns `true` if the query has no conditions.
    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
    }

    /// Returns the operator blocks of this query.
    pub fn as_filter(&self) -> &Document {
        &self.filter
    }

    /// Consumes the query, returning its operator blocks.
    pub fn into_filter(self) -> Document {
        self.filter
    }

    fn with(mut self, op: FilterOp, field: String, value: Bson) -> Self {
        match self.filter.get_mut(op.as_str()) {
            Some(Bson::Document(block)) => {
                block.insert(field, value);
            }
            _ => {
                let mut block = Document::new();
                block.insert(field, value);
                self.filter.insert(op.as_str(), block);
            }
        }

        self
    }
}

impl TryFrom<Document> for Query {
    type Error = LayerError;

    /// Validates a raw filter document.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::ReservedQueryKey`] if the document sets `act` or `type`.
    fn try_from(filter: Document) -> LayerResult<Self> {
        for key in filter.keys() {
            check_key(key)?;
        }

        Ok(Self { filter })
    }
}

fn check_key(key: &str) -> LayerResult<()> {
    if RESERVED_KEYS.contains(&key) {
        return Err(LayerError::ReservedQueryKey(key.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use pretty_assertions::assert_eq;

    #[test]
    fn builder_merges_conditions_per_operator() {
        let query = Query::new()
            .eq("name", "derp")
            .eq("age", 22)
            .gt("score", 10);

        assert_eq!(
            query.into_filter(),
            doc! { "eq": { "name": "derp", "age": 22 }, "gt": { "score": 10 } }
        );
    }

    #[test]
    fn in_collects_values_into_array() {
        let query = Query::new().in_("name", ["a", "b"]);

        assert_eq!(query.into_filter(), doc! { "in": { "name": ["a", "b"] } });
    }

    #[test]
    fn raw_document_with_reserved_key_is_rejected() {
        for key in RESERVED_KEYS {
            let mut filter = Document::new();
            filter.insert(key, "x");

            match Query::try_from(filter) {
                Err(LayerError::ReservedQueryKey(found)) => assert_eq!(found, key),
                other => panic!("expected reserved key error, got {other:?}"),
            }
        }
    }

    #[test]
    fn reserved_names_are_fine_inside_operator_blocks() {
        let query = Query::try_from(doc! { "eq": { "act": "x", "type": "y" } }).unwrap();

        assert!(!query.is_empty());
    }

    #[test]
    fn raw_block_rejects_reserved_key() {
        assert!(matches!(
            Query::new().filter("type", doc! {}),
            Err(LayerError::ReservedQueryKey(_))
        ));
        assert!(Query::new().filter("geo", doc! { "loc": [1, 2] }).is_ok());
    }

    #[test]
    fn operator_names_round_trip() {
        for op in FilterOp::ALL {
            assert_eq!(FilterOp::from_name(op.as_str()), Some(op));
        }
        assert_eq!(FilterOp::from_name("between"), None);
    }
}
