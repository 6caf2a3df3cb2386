use std::time::Instant;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Logs go to stderr; stdout is reserved for the stdio response line.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// How an HTTP exchange ended, from the caller's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exchange {
    /// A JSON-RPC response (result or error object) was sent.
    Answered,
    /// The body was a notification; nothing was sent back.
    Notification,
    /// Routing refused the request before it reached the dispatcher.
    Refused,
    /// The server failed to produce a response.
    Failed,
}

impl Exchange {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::OK => Self::Answered,
            StatusCode::NO_CONTENT => Self::Notification,
            status if status.is_server_error() => Self::Failed,
            _ => Self::Refused,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Answered => "answered",
            Self::Notification => "notification",
            Self::Refused => "refused",
            Self::Failed => "failed",
        }
    }
}

/// Emits one `rpc exchange finished` event per HTTP request, classified by [`Exchange`].
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let http_method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;
    let status = response.status().as_u16();
    let exchange = Exchange::from_status(response.status());
    let response_bytes = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(0);

    info!(
        http_method = %http_method,
        path = %path,
        exchange = exchange.as_str(),
        status,
        response_bytes,
        duration_ms = started_at.elapsed().as_millis(),
        "rpc exchange finished"
    );

    match exchange {
        Exchange::Refused => warn!(
            http_method = %http_method,
            path = %path,
            status,
            "request never reached the dispatcher"
        ),
        Exchange::Failed => warn!(path = %path, "server failed to encode or write a response"),
        Exchange::Answered | Exchange::Notification => {}
    }

    response
}
