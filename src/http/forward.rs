//! Failover forwarding of query requests to broker candidates.
//!
//! # Responsibilities
//! - Try candidates strictly in priority order
//! - Move to the next candidate only when a connection cannot be
//!   established; errors on an established connection surface as-is
//! - Stream the winning candidate's response back verbatim

use axum::body::{Body, Bytes};
use axum::http::request::Parts;
use axum::http::uri::Scheme;
use axum::http::{header, Request, Response, Uri};
use thiserror::Error;

use crate::routing::table::RouteCandidates;

/// Path of the broker query endpoint forwarded requests are rewritten to.
pub const QUERY_PATH: &str = "/query/sql";

/// Failure to deliver a query to any broker candidate.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Every candidate refused the connection. The attempted addresses are
    /// kept for diagnosis.
    #[error("no broker candidate accepted a connection (tried {attempted:?})")]
    Exhausted { attempted: Vec<String> },

    /// A candidate connected but the request itself failed.
    #[error("broker request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("failed to build broker request: {0}")]
    Request(#[from] axum::http::Error),
}

/// Forward a buffered query request to the first candidate that accepts a
/// connection.
pub async fn forward_query(
    candidates: &RouteCandidates,
    parts: &Parts,
    body: &Bytes,
) -> Result<Response<Body>, ForwardError> {
    let mut attempted = Vec::new();

    for target in candidates.targets() {
        tracing::debug!(addr = %target.addr(), "Dialing broker candidate");
        let request = broker_request(target.addr(), parts, body)?;

        match target.client().request(request).await {
            Ok(response) => {
                let (parts, body) = response.into_parts();
                return Ok(Response::from_parts(parts, Body::new(body)));
            }
            Err(e) if e.is_connect() => {
                tracing::warn!(
                    addr = %target.addr(),
                    error = %e,
                    "Failed to connect to broker, trying next candidate"
                );
                attempted.push(target.addr().to_string());
            }
            Err(e) => return Err(ForwardError::Upstream(e)),
        }
    }

    Err(ForwardError::Exhausted { attempted })
}

/// Rebuild the inbound request against a candidate's query endpoint,
/// keeping the original method, headers and body.
fn broker_request(addr: &str, parts: &Parts, body: &Bytes) -> Result<Request<Body>, axum::http::Error> {
    let uri = Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(addr)
        .path_and_query(QUERY_PATH)
        .build()?;

    let mut request = Request::builder()
        .method(parts.method.clone())
        .uri(uri)
        .body(Body::from(body.clone()))?;

    // The host header follows the target authority; the client fills it in.
    for (name, value) in parts.headers.iter() {
        if name != header::HOST {
            request.headers_mut().insert(name.clone(), value.clone());
        }
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    fn parts() -> Parts {
        let (parts, _) = Request::builder()
            .method(Method::POST)
            .uri("http://gateway/query/sql")
            .header("host", "gateway")
            .header("content-type", "application/json")
            .header("x-request-id", "req-1")
            .body(Body::empty())
            .unwrap()
            .into_parts();
        parts
    }

    #[test]
    fn rewrites_only_scheme_host_and_path() {
        let body = Bytes::from_static(br#"{"sql": "SELECT * FROM foo"}"#);
        let request = broker_request("10.0.0.1:8099", &parts(), &body).unwrap();

        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.uri().to_string(), "http://10.0.0.1:8099/query/sql");
        assert_eq!(
            request.headers().get("content-type").unwrap(),
            "application/json"
        );
        assert_eq!(request.headers().get("x-request-id").unwrap(), "req-1");
    }

    #[test]
    fn drops_the_inbound_host_header() {
        let body = Bytes::new();
        let request = broker_request("10.0.0.1:8099", &parts(), &body).unwrap();
        assert!(request.headers().get(header::HOST).is_none());
    }
}
