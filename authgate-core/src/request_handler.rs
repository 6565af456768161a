//! Request handling: the authentication gate and the forwarder.
//!
//! This module contains the per-request pipeline of the gateway:
//!
//! 1. Resolve the prefix rule governing the request path
//! 2. Decode Basic credentials, then strip the `Authorization` header so the
//!    origin never sees client-supplied credentials
//! 3. Run the gate: open rules forward unconditionally, protected rules
//!    answer 401 (no credentials) or 403 (wrong credentials)
//! 4. Forward authorized requests to the origin, rewriting host and scheme
//!
//! The rule set and origin are built once at startup and shared read-only;
//! nothing here carries state across requests. The [`reqwest::Client`] is
//! supplied by the caller and pools connections internally.

use http_body_util::{BodyExt, Full};
use hyper::{Request, Response, StatusCode, body::Incoming};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{self, AuthOutcome};
use crate::error::GateError;
use crate::headers;
use crate::rules::RuleSet;
use crate::types::Origin;

/// Handles one incoming HTTP request through the gate.
///
/// This is the request-handling entry point wired into the server's
/// `service_fn`. It always returns `Ok`, either with a rejection response
/// (401, 403, 404) or with whatever the origin answered (mapped to 502/504
/// when the origin is unreachable).
///
/// The client's `Authorization` header is removed before any forwarding
/// occurs, on every path including open rules.
pub async fn handle_request(
    req: Request<Incoming>,
    rules: Arc<RuleSet>,
    origin: Arc<Origin>,
    http_client: reqwest::Client,
) -> Result<Response<Full<bytes::Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let Some(rule) = rules.resolve(&path) else {
        return Ok(create_error_response(
            StatusCode::NOT_FOUND,
            "404 page not found",
        ));
    };

    let credentials = req
        .headers()
        .get(headers::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(auth::decode_basic);

    // The origin must never see client-supplied credentials, even when the
    // rule is open.
    let mut req = req;
    req.headers_mut().remove(headers::AUTHORIZATION);

    match auth::authorize(rule, credentials.as_ref()) {
        AuthOutcome::Forward => {}
        AuthOutcome::Unauthorized => {
            debug!(path = %path, prefix = %rule.prefix(), "missing credentials");
            return Ok(unauthorized_response(rule.username()));
        }
        AuthOutcome::Forbidden => {
            debug!(path = %path, prefix = %rule.prefix(), "credential mismatch");
            return Ok(create_error_response(
                StatusCode::FORBIDDEN,
                "wrong username / password",
            ));
        }
    }

    forward_request(req, origin.as_ref(), &http_client).await
}

/// Forward an authorized, credential-stripped request to the origin.
async fn forward_request(
    req: Request<Incoming>,
    origin: &Origin,
    http_client: &reqwest::Client,
) -> Result<Response<Full<bytes::Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body_bytes = match body.collect().await {
        Ok(bytes) => bytes.to_bytes(),
        Err(err) => {
            let err = GateError::BodyReadError(err.to_string());
            return Ok(create_error_response(err.status_code(), err.user_message()));
        }
    };

    forward_with_reqwest(parts, body_bytes, origin, http_client).await
}

/// Forwarding via reqwest: host and scheme substituted, everything else
/// relayed as-is.
async fn forward_with_reqwest(
    parts: hyper::http::request::Parts,
    body_bytes: bytes::Bytes,
    origin: &Origin,
    client: &reqwest::Client,
) -> Result<Response<Full<bytes::Bytes>>, Infallible> {
    let destination = origin.forward_url(
        parts
            .uri
            .path_and_query()
            .map_or("", |pq| pq.as_str()),
    );

    let method = match reqwest::Method::from_bytes(parts.method.as_str().as_bytes()) {
        Ok(method) => method,
        Err(_) => {
            return Ok(create_error_response(
                StatusCode::METHOD_NOT_ALLOWED,
                "HTTP method not supported",
            ));
        }
    };

    let mut req_builder = client.request(method, &destination);

    // Copy request headers. Host is derived from the rewritten URL;
    // content-length from the body.
    for (name, value) in parts.headers.iter() {
        if name != headers::HOST
            && name != headers::CONTENT_LENGTH
            && let Ok(header_value) = value.to_str()
        {
            req_builder = req_builder.header(name.as_str(), header_value);
        }
    }

    if !body_bytes.is_empty() {
        req_builder = req_builder.body(body_bytes.to_vec());
    }

    match req_builder.send().await {
        Ok(response) => {
            let status = response.status();
            let response_headers = response.headers().clone();

            match response.bytes().await {
                Ok(body_bytes) => {
                    let mut hyper_response = match Response::builder()
                        .status(status.as_u16())
                        .body(Full::new(body_bytes))
                    {
                        Ok(resp) => resp,
                        Err(_) => {
                            return Ok(create_error_response(
                                StatusCode::INTERNAL_SERVER_ERROR,
                                "failed to build response",
                            ));
                        }
                    };

                    for (name, value) in response_headers.iter() {
                        let header_name = name.as_str().to_lowercase();
                        if !headers::is_hop_by_hop(&header_name)
                            && let (Ok(hyper_name), Ok(hyper_value)) = (
                                hyper::header::HeaderName::from_bytes(name.as_str().as_bytes()),
                                hyper::header::HeaderValue::from_bytes(value.as_bytes()),
                            )
                        {
                            hyper_response.headers_mut().insert(hyper_name, hyper_value);
                        }
                    }

                    Ok(hyper_response)
                }
                Err(err) => {
                    warn!(destination = %destination, error = %err, "failed to read origin response");
                    Ok(create_error_response(
                        StatusCode::BAD_GATEWAY,
                        "failed to read origin response",
                    ))
                }
            }
        }
        Err(err) => {
            let err = if err.is_timeout() {
                GateError::UpstreamTimeout(err.to_string())
            } else if err.is_connect() {
                GateError::UpstreamConnectionFailed(err.to_string())
            } else {
                GateError::HttpClientError(err)
            };
            warn!(destination = %destination, error = %err, "forwarding failed");
            Ok(create_error_response(err.status_code(), err.user_message()))
        }
    }
}

/// Builds the 401 challenge response for a protected prefix.
///
/// The realm names the rule's configured username so the browser prompt
/// tells the operator which account the prefix expects.
pub fn unauthorized_response(username: &str) -> Response<Full<bytes::Bytes>> {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(headers::CONTENT_TYPE, "text/plain")
        .header(headers::WWW_AUTHENTICATE, format!("Basic realm=user:{username}"))
        .body(Full::new(bytes::Bytes::from_static(
            b"authentication required",
        )))
        .unwrap_or_else(|_| {
            // Only reachable with a username that is not a valid header
            // value; challenge without the realm rather than crash
            create_error_response(StatusCode::UNAUTHORIZED, "authentication required")
        })
}

/// Creates a plain-text error response.
///
/// # Example
///
/// ```
/// use authgate_core::request_handler::create_error_response;
/// use hyper::StatusCode;
///
/// let response = create_error_response(StatusCode::FORBIDDEN, "wrong username / password");
/// assert_eq!(response.status(), StatusCode::FORBIDDEN);
/// ```
pub fn create_error_response(status: StatusCode, message: &str) -> Response<Full<bytes::Bytes>> {
    Response::builder()
        .status(status)
        .header(headers::CONTENT_TYPE, "text/plain")
        .body(Full::new(bytes::Bytes::from(message.to_string())))
        .unwrap_or_else(|_| {
            // Fallback response if builder fails (extremely unlikely)
            Response::new(Full::new(bytes::Bytes::from("Internal Server Error")))
        })
}
