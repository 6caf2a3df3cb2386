//! JSON-RPC 2.0 envelope representations and request validation
//!
//! Requests arrive as arbitrary decoded JSON and are only promoted to a
//! [`Request`] once [`validate`] accepts their structure. Responses are typed
//! so that exactly one of `result` or `error` is ever serialized.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::{ErrorObject, RpcError};

pub const JSONRPC_VERSION: &str = "2.0";

/// A structurally valid request. `params` has not been interpreted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub params: Option<Value>,
    pub id: RequestId,
}

/// Whether the inbound envelope carried an `id` key, and its exact value.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestId {
    /// No `id` key at all: a notification.
    Absent,
    /// An `id` key was present; the value is echoed verbatim, `null` included.
    Present(Value),
}

impl RequestId {
    fn from_envelope(object: &Map<String, Value>) -> Self {
        match object.get("id") {
            Some(value) => Self::Present(value.clone()),
            None => Self::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// The value to place in a response, if one is owed.
    pub fn response_id(&self) -> Option<Value> {
        match self {
            Self::Present(value) => Some(value.clone()),
            Self::Absent => None,
        }
    }
}

/// A rejected envelope together with whatever id could be salvaged from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub error: RpcError,
    pub id: Salvaged,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Salvaged {
    /// The input was not an object, so no id could be read. Answered with `id: null`.
    Unknown,
    Id(RequestId),
}

/// Checks a decoded value against the request rules. First failure wins.
pub fn validate(payload: Value) -> Result<Request, Rejection> {
    let Value::Object(mut object) = payload else {
        return Err(Rejection {
            error: RpcError::invalid_request("Invalid Request"),
            id: Salvaged::Unknown,
        });
    };

    let id = RequestId::from_envelope(&object);

    if object.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return Err(Rejection {
            error: RpcError::invalid_request("Invalid Request: jsonrpc must be '2.0'"),
            id: Salvaged::Id(id),
        });
    }

    let method = match object.remove("method") {
        Some(Value::String(method)) => method,
        _ => {
            return Err(Rejection {
                error: RpcError::invalid_request("Invalid Request: method must be a string"),
                id: Salvaged::Id(id),
            })
        }
    };

    Ok(Request {
        method,
        params: object.remove("params"),
        id,
    })
}

/// A response envelope. Field order matches the wire layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub jsonrpc: &'static str,
    #[serde(flatten)]
    pub payload: ResponsePayload,
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponsePayload {
    Result(Value),
    Error(ErrorObject),
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            payload: ResponsePayload::Result(result),
            id,
        }
    }

    pub fn failure(id: Value, error: &RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            payload: ResponsePayload::Error(error.to_error_object()),
            id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, ResponsePayload::Error(_))
    }

    pub fn failure_code(&self) -> Option<i64> {
        match &self.payload {
            ResponsePayload::Error(error) => Some(error.code),
            ResponsePayload::Result(_) => None,
        }
    }

    /// Compact JSON encoding, no trailing newline.
    pub fn to_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_minimal_request() {
        let request = validate(json!({"jsonrpc": "2.0", "method": "sum", "id": 7}))
            .expect("valid request");

        assert_eq!(request.method, "sum");
        assert_eq!(request.params, None);
        assert_eq!(request.id, RequestId::Present(json!(7)));
    }

    #[test]
    fn null_id_is_still_present() {
        let request = validate(json!({"jsonrpc": "2.0", "method": "sum", "id": null}))
            .expect("valid request");
        assert!(request.id.is_present());
        assert_eq!(request.id.response_id(), Some(Value::Null));
    }

    #[test]
    fn missing_id_marks_notification() {
        let request =
            validate(json!({"jsonrpc": "2.0", "method": "sum"})).expect("valid request");
        assert_eq!(request.id, RequestId::Absent);
        assert_eq!(request.id.response_id(), None);
    }

    #[test]
    fn rejects_non_object_without_id() {
        let rejection = validate(json!([1, 2, 3])).expect_err("array is not a request");
        assert_eq!(rejection.id, Salvaged::Unknown);
        assert_eq!(rejection.error.to_string(), "Invalid Request");
    }

    #[test]
    fn rejects_wrong_version_keeping_id() {
        let rejection = validate(json!({"jsonrpc": "1.0", "method": "sum", "id": "abc"}))
            .expect_err("wrong version");
        assert_eq!(rejection.id, Salvaged::Id(RequestId::Present(json!("abc"))));
        assert_eq!(
            rejection.error.to_string(),
            "Invalid Request: jsonrpc must be '2.0'"
        );
    }

    #[test]
    fn version_check_precedes_method_check() {
        let rejection = validate(json!({"method": 5, "id": 1})).expect_err("missing version");
        assert_eq!(
            rejection.error.to_string(),
            "Invalid Request: jsonrpc must be '2.0'"
        );
    }

    #[test]
    fn rejects_non_string_method() {
        let rejection = validate(json!({"jsonrpc": "2.0", "method": 5, "id": 1}))
            .expect_err("numeric method");
        assert_eq!(
            rejection.error.to_string(),
            "Invalid Request: method must be a string"
        );
    }

    #[test]
    fn success_serializes_in_wire_order() {
        let response = Response::success(json!(1), json!(6));
        let encoded = String::from_utf8(response.to_vec().expect("encode")).expect("utf8");
        assert_eq!(encoded, r#"{"jsonrpc":"2.0","result":6,"id":1}"#);
    }

    #[test]
    fn failure_serializes_in_wire_order() {
        let response = Response::failure(Value::Null, &RpcError::ParseError);
        let encoded = String::from_utf8(response.to_vec().expect("encode")).expect("utf8");
        assert_eq!(
            encoded,
            r#"{"jsonrpc":"2.0","error":{"code":-32700,"message":"Parse error"},"id":null}"#
        );
        assert!(response.is_error());
    }
}
