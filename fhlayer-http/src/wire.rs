//! JSON encoding of requests and decoding of replies.
//!
//! The data API takes the request options as one flat JSON object and answers
//! with a JSON envelope. An empty body is treated like the `{}` reply.

use serde_json::Value;

use fhlayer_core::{envelope::Envelope, error::LayerResult, request::DbRequest};

pub(crate) fn encode_request(request: &DbRequest) -> LayerResult<Value> {
    Ok(serde_json::to_value(request)?)
}

pub(crate) fn decode_reply(body: &str) -> LayerResult<Envelope> {
    if body.trim().is_empty() {
        return Ok(Envelope::empty());
    }

    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use fhlayer_core::{error::LayerError, query::Query, request::Payload};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn update_request_is_flat_json() {
        let request = DbRequest::update("users", "g1", doc! { "name": "newName", "age": 22 });

        assert_eq!(
            encode_request(&request).unwrap(),
            json!({
                "act": "update",
                "type": "users",
                "guid": "g1",
                "fields": { "name": "newName", "age": 22 }
            })
        );
    }

    #[test]
    fn list_request_carries_operator_blocks() {
        let request = DbRequest::list("users", Query::new().eq("name", "derp").in_("age", [21, 22]));

        assert_eq!(
            encode_request(&request).unwrap(),
            json!({
                "act": "list",
                "type": "users",
                "eq": { "name": "derp" },
                "in": { "age": [21, 22] }
            })
        );
    }

    #[test]
    fn create_request_without_guid() {
        let request = DbRequest::create("users", Payload::One(doc! { "name": "derp" }));
        let value = encode_request(&request).unwrap();

        assert!(value.get("guid").is_none());
        assert_eq!(value["fields"], json!({ "name": "derp" }));
    }

    #[test]
    fn empty_body_is_empty_reply() {
        assert!(decode_reply("").unwrap().is_empty());
        assert!(decode_reply("{}").unwrap().is_empty());
    }

    #[test]
    fn capitalized_count_is_decoded() {
        let reply = decode_reply(r#"{"Status":"OK","Count":3}"#).unwrap();

        assert_eq!(reply.count_or_zero(), 3);
    }

    #[test]
    fn count_in_both_casings_is_decoded() {
        let reply = decode_reply(r#"{"count":2,"Count":2}"#).unwrap();

        assert_eq!(reply.count_or_zero(), 2);
    }

    #[test]
    fn listing_is_decoded() {
        let reply = decode_reply(
            r#"{"count":1,"list":[{"guid":"g1","type":"users","fields":{"name":"derp"}}]}"#,
        )
        .unwrap();

        assert_eq!(reply.into_records(), vec![doc! { "name": "derp", "guid": "g1" }]);
    }

    #[test]
    fn malformed_body_is_serialization_error() {
        assert!(matches!(decode_reply("<html>"), Err(LayerError::Serialization(_))));
    }
}
