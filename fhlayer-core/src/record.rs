//! Records and conversions between typed values and field mappings.
//!
//! A record is a [`Document`] holding the stored fields plus the `guid` the
//! data API assigned to it. Records written through a
//! [`CollectionHandle`](crate::collection::CollectionHandle) also carry
//! `createDate` and/or `lastUpdate` in epoch milliseconds.

use bson::{Bson, Document, de::deserialize_from_bson, ser::serialize_to_bson};
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::{LayerError, LayerResult};

/// Key of the record id in a flattened record.
pub const GUID_KEY: &str = "guid";
/// Key stamped on records at creation.
pub const CREATE_DATE_KEY: &str = "createDate";
/// Key stamped on records at every update.
pub const LAST_UPDATE_KEY: &str = "lastUpdate";

/// Accessors for flattened records.
pub trait RecordExt {
    /// Returns the record's guid, if it has one.
    fn guid(&self) -> Option<&str>;

    /// Returns the creation stamp in epoch milliseconds, if present.
    fn create_date(&self) -> Option<i64>;

    /// Returns the last update stamp in epoch milliseconds, if present.
    fn last_update(&self) -> Option<i64>;
}

impl RecordExt for Document {
    fn guid(&self) -> Option<&str> {
        self.get_str(GUID_KEY).ok()
    }

    fn create_date(&self) -> Option<i64> {
        millis(self.get(CREATE_DATE_KEY))
    }

    fn last_update(&self) -> Option<i64> {
        millis(self.get(LAST_UPDATE_KEY))
    }
}

fn millis(value: Option<&Bson>) -> Option<i64> {
    match value? {
        Bson::Int64(value) => Some(*value),
        Bson::Int32(value) => Some(*value as i64),
        Bson::Double(value) => Some(*value as i64),
        _ => None,
    }
}

/// Current time in epoch milliseconds, as stamped on writes.
pub fn now_millis() -> Bson {
    Bson::Int64(Utc::now().timestamp_millis())
}

/// Serializes a typed value into a field mapping.
///
/// # Errors
///
/// Returns an error if serialization fails or the value is not a map-like type.
pub fn to_fields<T: Serialize>(value: &T) -> LayerResult<Document> {
    match serialize_to_bson(value)? {
        Bson::Document(fields) => Ok(fields),
        other => Err(LayerError::InvalidDocument(format!(
            "expected a document, got {:?}",
            other.element_type()
        ))),
    }
}

/// Splits a flattened record into its guid and a typed value.
///
/// Keys the type does not declare, such as the timestamp stamps, are ignored
/// by serde unless the type opts into denying unknown fields.
///
/// # Errors
///
/// Returns an error if the record has no guid or does not deserialize into `T`.
pub fn from_record<T: DeserializeOwned>(mut record: Document) -> LayerResult<(String, T)> {
    let guid = match record.remove(GUID_KEY) {
        Some(Bson::String(guid)) => guid,
        _ => return Err(LayerError::InvalidDocument("record has no guid".into())),
    };

    Ok((guid, deserialize_from_bson(Bson::Document(record))?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: i32,
    }

    #[test]
    fn typed_value_round_trips_through_record() {
        let mut fields = to_fields(&User { name: "derp".into(), age: 22 }).unwrap();
        fields.insert(GUID_KEY, "abc");
        fields.insert(CREATE_DATE_KEY, 1_700_000_000_000i64);

        let (guid, user) = from_record::<User>(fields).unwrap();

        assert_eq!(guid, "abc");
        assert_eq!(user, User { name: "derp".into(), age: 22 });
    }

    #[test]
    fn non_map_value_is_not_a_document() {
        assert!(matches!(to_fields(&42), Err(LayerError::InvalidDocument(_))));
    }

    #[test]
    fn record_accessors_read_stamps() {
        let record = doc! { "guid": "abc", "createDate": 5i64, "lastUpdate": 7 };

        assert_eq!(record.guid(), Some("abc"));
        assert_eq!(record.create_date(), Some(5));
        assert_eq!(record.last_update(), Some(7));
        assert!(now_millis().as_i64().unwrap() > 0);
    }
}
