//! Core value types for authgate.

use std::fmt;

use url::Url;

use crate::error::{GateError, Result};

/// The single upstream origin all authorized requests are forwarded to.
///
/// Parsed once at startup from an absolute URL; immutable afterwards.
/// Forwarding rewrites only the destination host and scheme -- the request
/// path and query reach the origin untouched.
///
/// # Example
///
/// ```
/// use authgate_core::types::Origin;
///
/// let origin = Origin::parse("http://backend.internal:8080").unwrap();
/// assert_eq!(origin.forward_url("/api/users?page=2"),
///            "http://backend.internal:8080/api/users?page=2");
/// ```
#[derive(Debug, Clone)]
pub struct Origin {
    scheme: String,
    authority: String,
}

impl Origin {
    /// Parses an origin from an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// [`GateError::InvalidOrigin`] when the URL does not parse or has no
    /// host, [`GateError::UnsupportedScheme`] for schemes other than http
    /// and https. Both are fatal at startup.
    pub fn parse(raw: &str) -> Result<Self> {
        let url =
            Url::parse(raw).map_err(|err| GateError::InvalidOrigin(format!("{raw}: {err}")))?;

        match url.scheme() {
            "http" | "https" => {}
            other => return Err(GateError::UnsupportedScheme(format!("{other} in {raw}"))),
        }

        let host = url
            .host_str()
            .ok_or_else(|| GateError::InvalidOrigin(format!("{raw}: missing host")))?;

        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self {
            scheme: url.scheme().to_string(),
            authority,
        })
    }

    /// Returns the origin's URL scheme.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the origin's host, including the port when one was given.
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// Builds the rewritten destination URL for a request path and query.
    pub fn forward_url(&self, path_and_query: &str) -> String {
        format!("{}://{}{}", self.scheme, self.authority, path_and_query)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority)
    }
}
