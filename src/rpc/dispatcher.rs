//! The request state machine shared by every transport
//!
//! Each call ends in exactly one [`Outcome`]. Nothing is retained between
//! calls: the registry is the only state and it is read-only.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::RpcError;
use crate::rpc::envelope::{validate, Rejection, Request, RequestId, Response, Salvaged};
use crate::rpc::registry::{HandlerResult, MethodRegistry, Params};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Respond(Response),
    NoResponse,
}

impl Outcome {
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Respond(response) => Some(response),
            Self::NoResponse => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<MethodRegistry>,
}

impl Dispatcher {
    pub fn new(registry: MethodRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Decodes raw request bytes and dispatches them. Undecodable input is
    /// always answered, with `id: null`, since no id can be recovered.
    pub fn dispatch_slice(&self, body: &[u8]) -> Outcome {
        match serde_json::from_slice::<Value>(body) {
            Ok(payload) => self.dispatch(payload),
            Err(err) => {
                warn!(error = %err, "request body is not valid json");
                Outcome::Respond(Response::failure(Value::Null, &RpcError::ParseError))
            }
        }
    }

    pub fn dispatch(&self, payload: Value) -> Outcome {
        let Request { method, params, id } = match validate(payload) {
            Ok(request) => request,
            Err(Rejection { error, id }) => {
                warn!(error = %error, "invalid request envelope");
                return match id {
                    Salvaged::Unknown => {
                        Outcome::Respond(Response::failure(Value::Null, &error))
                    }
                    Salvaged::Id(id) => finish(&id, Err(error)),
                };
            }
        };

        let result = match self.registry.lookup(&method) {
            Some(handler) => Params::from_value(params).and_then(|params| handler.call(params)),
            None => Err(RpcError::MethodNotFound),
        };

        debug!(
            method = %method,
            notification = !id.is_present(),
            outcome = if result.is_ok() { "success" } else { "failure" },
            "request dispatched"
        );

        finish(&id, result)
    }
}

fn finish(id: &RequestId, result: HandlerResult) -> Outcome {
    let Some(id) = id.response_id() else {
        return Outcome::NoResponse;
    };

    match result {
        Ok(value) => Outcome::Respond(Response::success(id, value)),
        Err(error) => Outcome::Respond(Response::failure(id, &error)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::methods::default_registry;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(default_registry())
    }

    fn encoded(outcome: &Outcome) -> String {
        let response = outcome.response().expect("a response");
        String::from_utf8(response.to_vec().expect("encode")).expect("utf8")
    }

    #[test]
    fn malformed_json_yields_parse_error() {
        let outcome = dispatcher().dispatch_slice(br#"{"jsonrpc":"2.0","method":"sum""#);
        assert_eq!(
            encoded(&outcome),
            r#"{"jsonrpc":"2.0","error":{"code":-32700,"message":"Parse error"},"id":null}"#
        );
    }

    #[test]
    fn empty_input_yields_parse_error() {
        let outcome = dispatcher().dispatch_slice(b"");
        assert_eq!(
            outcome.response().map(Response::is_error),
            Some(true)
        );
    }

    #[test]
    fn sum_of_integers_stays_integral() {
        let outcome = dispatcher()
            .dispatch_slice(br#"{"jsonrpc":"2.0","method":"sum","params":[1,2,3],"id":1}"#);
        assert_eq!(encoded(&outcome), r#"{"jsonrpc":"2.0","result":6,"id":1}"#);
    }

    #[test]
    fn sum_with_fraction_is_float() {
        let outcome = dispatcher()
            .dispatch_slice(br#"{"jsonrpc":"2.0","method":"sum","params":[1.5,2],"id":2}"#);
        assert_eq!(encoded(&outcome), r#"{"jsonrpc":"2.0","result":3.5,"id":2}"#);
    }

    #[test]
    fn divide_by_zero_is_invalid_params() {
        let outcome = dispatcher()
            .dispatch_slice(br#"{"jsonrpc":"2.0","method":"divide","params":[10,0],"id":3}"#);
        assert_eq!(
            encoded(&outcome),
            r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params: division by zero"},"id":3}"#
        );
    }

    #[test]
    fn unknown_method_is_not_found() {
        let outcome =
            dispatcher().dispatch_slice(br#"{"jsonrpc":"2.0","method":"unknown","id":4}"#);
        assert_eq!(
            encoded(&outcome),
            r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":4}"#
        );
    }

    #[test]
    fn unknown_method_wins_over_bad_params() {
        let outcome = dispatcher()
            .dispatch(json!({"jsonrpc": "2.0", "method": "unknown", "params": 5, "id": 9}));
        let response = outcome.response().expect("a response");
        assert_eq!(response.failure_code(), Some(-32601));
    }

    #[test]
    fn echoes_every_kind_of_id() {
        for id in [json!(null), json!(42), json!("req-1"), json!(1.5)] {
            let outcome = dispatcher().dispatch(
                json!({"jsonrpc": "2.0", "method": "sum", "params": [1], "id": id.clone()}),
            );
            let response = outcome.response().expect("a response");
            assert_eq!(response.id, id);
        }
    }

    #[test]
    fn notifications_never_respond() {
        let dispatcher = dispatcher();
        let notifications = [
            json!({"jsonrpc": "2.0", "method": "sum", "params": [1, 2]}),
            json!({"jsonrpc": "2.0", "method": "sum", "params": ["x"]}),
            json!({"jsonrpc": "2.0", "method": "divide", "params": [1, 0]}),
            json!({"jsonrpc": "2.0", "method": "unknown"}),
            json!({"jsonrpc": "1.0", "method": "sum"}),
            json!({"jsonrpc": "2.0", "method": 12}),
            json!({}),
        ];

        for payload in notifications {
            assert_eq!(dispatcher.dispatch(payload), Outcome::NoResponse);
        }
    }

    #[test]
    fn non_object_request_is_answered_with_null_id() {
        let outcome = dispatcher().dispatch_slice(b"[]");
        assert_eq!(
            encoded(&outcome),
            r#"{"jsonrpc":"2.0","error":{"code":-32600,"message":"Invalid Request"},"id":null}"#
        );
    }

    #[test]
    fn invalid_version_keeps_salvaged_id() {
        let outcome = dispatcher().dispatch(json!({"jsonrpc": "1.0", "method": "sum", "id": "a"}));
        assert_eq!(
            encoded(&outcome),
            r#"{"jsonrpc":"2.0","error":{"code":-32600,"message":"Invalid Request: jsonrpc must be '2.0'"},"id":"a"}"#
        );
    }

    #[test]
    fn dispatch_is_idempotent() {
        let dispatcher = dispatcher();
        let body = br#"{"jsonrpc":"2.0","method":"multiply","params":{"values":[2,2.5]},"id":"x"}"#;

        let first = encoded(&dispatcher.dispatch_slice(body));
        let second = encoded(&dispatcher.dispatch_slice(body));
        assert_eq!(first, second);
        assert_eq!(first, r#"{"jsonrpc":"2.0","result":5.0,"id":"x"}"#);
    }
}
