//! Requests understood by the hosted data API.
//!
//! A [`DbRequest`] is the single options mapping the data API accepts: an
//! action, the collection (`type` on the wire), an optional record id, an
//! optional field payload and, for listings, filter operator blocks that sit
//! at the top level of the mapping.

use bson::Document;
use serde::Serialize;
use std::fmt;

use crate::query::Query;

/// The action a request asks the data API to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Act {
    /// Insert one record or a batch of records.
    Create,
    /// Fetch one record by guid.
    Read,
    /// Replace the fields of one record.
    Update,
    /// Delete one record by guid.
    Delete,
    /// Delete every record in the collection.
    DeleteAll,
    /// List records, optionally filtered.
    List,
}

impl Act {
    /// Returns the wire name of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Act::Create => "create",
            Act::Read => "read",
            Act::Update => "update",
            Act::Delete => "delete",
            Act::DeleteAll => "deleteall",
            Act::List => "list",
        }
    }
}

impl fmt::Display for Act {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field payload of a write request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// A single record's fields.
    One(Document),
    /// A batch of records, only valid for [`Act::Create`].
    Many(Vec<Document>),
}

/// One request to the data API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbRequest {
    /// What to do.
    pub act: Act,
    /// The collection the request targets.
    #[serde(rename = "type")]
    pub collection: String,
    /// Record id for `read`, `update` and `delete`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Record fields for `create` and `update`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Payload>,
    /// Filter operator blocks for `list`, flattened into the request.
    #[serde(flatten)]
    pub filter: Document,
}

impl DbRequest {
    fn new(act: Act, collection: &str) -> Self {
        Self {
            act,
            collection: collection.to_string(),
            guid: None,
            fields: None,
            filter: Document::new(),
        }
    }

    pub fn create(collection: &str, payload: Payload) -> Self {
        Self {
            fields: Some(payload),
            ..Self::new(Act::Create, collection)
        }
    }

    pub fn read(collection: &str, guid: &str) -> Self {
        Self {
            guid: Some(guid.to_string()),
            ..Self::new(Act::Read, collection)
        }
    }

    pub fn update(collection: &str, guid: &str, fields: Document) -> Self {
        Self {
            guid: Some(guid.to_string()),
            fields: Some(Payload::One(fields)),
            ..Self::new(Act::Update, collection)
        }
    }

    pub fn delete(collection: &str, guid: &str) -> Self {
        Self {
            guid: Some(guid.to_string()),
            ..Self::new(Act::Delete, collection)
        }
    }

    pub fn delete_all(collection: &str) -> Self {
        Self::new(Act::DeleteAll, collection)
    }

    /// Builds a listing request. The query cannot carry `act` or `type`, so
    /// the routing keys set here are never overridden by the filter.
    pub fn list(collection: &str, query: Query) -> Self {
        Self {
            filter: query.into_filter(),
            ..Self::new(Act::List, collection)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde_json::json;

    #[test]
    fn list_request_flattens_filter_next_to_routing_keys() {
        let request = DbRequest::list("users", Query::new().eq("name", "derp"));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({ "act": "list", "type": "users", "eq": { "name": "derp" } })
        );
    }

    #[test]
    fn batch_create_serializes_fields_as_array() {
        let request = DbRequest::create(
            "users",
            Payload::Many(vec![doc! { "name": "a" }, doc! { "name": "b" }]),
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["act"], json!("create"));
        assert_eq!(value["fields"], json!([{ "name": "a" }, { "name": "b" }]));
        assert!(value.get("guid").is_none());
    }

    #[test]
    fn delete_all_uses_wire_name() {
        assert_eq!(Act::DeleteAll.to_string(), "deleteall");
    }
}
