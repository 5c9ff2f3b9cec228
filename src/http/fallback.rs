//! Transparent forwarding of non-query requests to the control plane.
//!
//! Requests that carry no routing key (anything outside the query endpoint)
//! are proxied to the controller unconditionally: no retry, no routing
//! table involvement.

use std::str::FromStr;

use axum::body::Body;
use axum::http::uri::{Authority, InvalidUri, PathAndQuery, Scheme};
use axum::http::{header, Request, Response, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use url::Url;

/// The controller base URL cannot be used as a proxy target. Fatal at
/// startup.
#[derive(Debug, Error)]
pub enum ControllerUrlError {
    #[error("unable to parse controller URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("controller URL has no host")]
    MissingHost,

    #[error("controller URL is not a valid authority: {0}")]
    Authority(#[from] InvalidUri),
}

/// Reverse proxy for requests addressed to the controller.
pub struct ControllerProxy {
    client: Client<HttpConnector, Body>,
    scheme: Scheme,
    authority: Authority,
}

impl ControllerProxy {
    pub fn new(base_url: &str) -> Result<Self, ControllerUrlError> {
        let url = Url::parse(base_url)?;
        let host = url.host_str().ok_or(ControllerUrlError::MissingHost)?;
        let authority = match url.port() {
            Some(port) => Authority::from_str(&format!("{}:{}", host, port))?,
            None => Authority::from_str(host)?,
        };
        let scheme = if url.scheme() == "https" {
            Scheme::HTTPS
        } else {
            Scheme::HTTP
        };
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            scheme,
            authority,
        })
    }

    /// The authority requests are rewritten to.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Forward a request to the controller, preserving method, path, query
    /// and body; the response streams back unchanged.
    pub async fn forward(
        &self,
        mut request: Request<Body>,
    ) -> Result<Response<Body>, hyper_util::client::legacy::Error> {
        let mut uri_parts = request.uri().clone().into_parts();
        uri_parts.scheme = Some(self.scheme.clone());
        uri_parts.authority = Some(self.authority.clone());
        if uri_parts.path_and_query.is_none() {
            uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        let uri = Uri::from_parts(uri_parts).unwrap_or_else(|_| request.uri().clone());
        *request.uri_mut() = uri;
        request.headers_mut().remove(header::HOST);

        let response = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_explicit_port() {
        let proxy = ControllerProxy::new("http://127.0.0.1:9000").unwrap();
        assert_eq!(proxy.authority().as_str(), "127.0.0.1:9000");
    }

    #[test]
    fn accepts_url_without_port() {
        let proxy = ControllerProxy::new("http://controller.internal").unwrap();
        assert_eq!(proxy.authority().as_str(), "controller.internal");
    }

    #[test]
    fn rejects_unparsable_url() {
        assert!(matches!(
            ControllerProxy::new("not a url"),
            Err(ControllerUrlError::Parse(_))
        ));
    }
}
