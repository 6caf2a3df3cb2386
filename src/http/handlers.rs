//! Axum HTTP handler for the JSON-RPC endpoint
//!
//! Every accepted request gets exactly one reply: a JSON-RPC response with
//! status 200, or an empty 204 for notifications.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::errors::AppError;
use crate::rpc::dispatcher::Outcome;
use crate::AppState;

pub async fn rpc_endpoint(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    match state.dispatcher.dispatch_slice(&body) {
        Outcome::Respond(response) => {
            let payload = response.to_vec()?;
            let content_length = payload.len();

            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/json".to_string()),
                    (header::CONTENT_LENGTH, content_length.to_string()),
                ],
                Body::from(payload),
            )
                .into_response())
        }
        Outcome::NoResponse => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
