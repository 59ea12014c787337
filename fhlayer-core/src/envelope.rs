//! Reply envelopes returned by the data API, and their normalization.
//!
//! The data API is not consistent about the shape of its replies:
//!
//! - a single record comes back wrapped as `{ guid, type, fields }`,
//! - a listing comes back as `{ count, list: [record envelope, ...] }`,
//! - bulk writes report `{ count }`, `{ Count }` or `{ status, count }`,
//! - a record that does not exist comes back as an empty object `{}`.
//!
//! [`Envelope`] accepts all of these, and the `into_*` methods reduce them to
//! the layer's contract: flattened records, `None` for "not there", and plain
//! counts.

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::record::GUID_KEY;

/// A raw reply from the data API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Id of the record this envelope wraps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Collection of the wrapped record.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    /// Fields of the wrapped record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Document>,
    /// Record envelopes of a listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<Envelope>>,
    /// Number of records listed or affected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    /// Number of records affected, as batch creates report it.
    #[serde(rename = "Count", default, skip_serializing_if = "Option::is_none")]
    pub batch_count: Option<i64>,
    /// Status marker of bulk writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Status marker of batch creates.
    #[serde(rename = "Status", default, skip_serializing_if = "Option::is_none")]
    pub batch_status: Option<String>,
}

impl Envelope {
    /// The "no such record" reply.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wraps a single record.
    pub fn record(collection: &str, guid: impl Into<String>, fields: Document) -> Self {
        Self {
            guid: Some(guid.into()),
            collection: Some(collection.to_string()),
            fields: Some(fields),
            ..Self::default()
        }
    }

    /// Wraps a listing of record envelopes.
    pub fn listing(list: Vec<Envelope>) -> Self {
        Self {
            count: Some(list.len() as i64),
            list: Some(list),
            ..Self::default()
        }
    }

    /// A bulk write result.
    pub fn counted(status: impl Into<String>, count: u64) -> Self {
        Self {
            status: Some(status.into()),
            count: Some(count as i64),
            ..Self::default()
        }
    }

    /// Returns `true` if the reply wraps a single record.
    pub fn has_record(&self) -> bool {
        self.guid.is_some() && self.fields.is_some()
    }

    /// Returns `true` for the `{}` reply.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The reported count, or zero when the reply has none.
    ///
    /// `count` is preferred, and `Count` is used when `count` is missing or
    /// zero. Negative counts are treated as zero.
    pub fn count_or_zero(&self) -> u64 {
        self.count
            .into_iter()
            .chain(self.batch_count)
            .filter_map(|count| u64::try_from(count).ok())
            .find(|count| *count > 0)
            .unwrap_or(0)
    }

    /// The status marker of a bulk write, in either casing.
    pub fn status(&self) -> Option<&str> {
        self.status
            .as_deref()
            .or(self.batch_status.as_deref())
    }

    /// Flattens a single-record reply: the record's `guid` is copied into its
    /// fields. Replies that do not wrap a record (including `{}`) yield `None`.
    pub fn into_record(self) -> Option<Document> {
        match (self.guid, self.fields) {
            (Some(guid), Some(fields)) => Some(flatten(guid, fields)),
            _ => None,
        }
    }

    /// Flattens every record of a listing, keeping the reply's order. A
    /// reply without a list is an empty listing.
    ///
    /// Items without fields are kept as records carrying only their guid, and
    /// items without a guid as records carrying only their fields. Items with
    /// neither are skipped.
    pub fn into_records(self) -> Vec<Document> {
        self.list
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match (item.guid, item.fields) {
                (Some(guid), fields) => Some(flatten(guid, fields.unwrap_or_default())),
                (None, Some(fields)) => {
                    debug!(index, "listed record has no guid");
                    Some(fields)
                },
                (None, None) => {
                    debug!(index, "skipping listed item without guid or fields");
                    None
                },
            })
            .collect()
    }
}

fn flatten(guid: String, mut fields: Document) -> Document {
    fields.insert(GUID_KEY, Bson::String(guid));
    fields
}
