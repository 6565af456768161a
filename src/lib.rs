//! authgate - a reverse proxying gateway with per-prefix Basic Auth
//!
//! authgate exposes one backend through one externally reachable address,
//! with different access rules for different URL subtrees: an open public
//! subtree and a credential-gated admin subtree can share one origin
//! without touching the backend.
//!
//! # Overview
//!
//! - Prefix rules (`path:username:password`), longest matching prefix wins
//! - HTTP Basic Authentication checked before anything reaches the origin
//! - Client credentials are stripped from forwarded requests
//! - TLS by default; plaintext only behind a deliberately unwieldy flag
//!
//! # Example
//!
//! ```rust,no_run
//! use authgate::rules::RuleSet;
//! use authgate::types::Origin;
//!
//! let rules = RuleSet::parse("/::,/admin/:admin:secret").unwrap();
//! let origin = Origin::parse("http://127.0.0.1:9000").unwrap();
//! ```
//!
//! # Modules
//!
//! - [`args`] - Command line argument parsing
//! - [`server`] - Startup output and the accept loops
//! - [`tls`] - TLS certificate/key loading
//!
//! # Re-exports from authgate-core
//!
//! Core functionality is provided by the `authgate-core` crate:
//! - [`rules`] - Prefix rule parsing and longest-prefix-match resolution
//! - [`auth`] - Basic Auth decoding and the gate decision
//! - [`request_handler`] - HTTP request processing and forwarding
//! - [`types`] - The upstream origin

#![forbid(unsafe_code)]

pub mod args;
pub mod server;
pub mod tls;

// Re-export authgate-core modules
pub use authgate_core::auth;
pub use authgate_core::error;
pub use authgate_core::headers;
pub use authgate_core::request_handler;
pub use authgate_core::rules;
pub use authgate_core::types;

// Re-export commonly used items at crate root
pub use authgate_core::{AuthOutcome, GateError, Origin, Rule, RuleSet};
