//! authgate-core - Reusable components of the authgate reverse proxy
//!
//! This crate provides the access-control routing layer of authgate:
//! - Prefix rules (`prefix:username:password`) with longest-prefix-match
//!   resolution
//! - The HTTP Basic Authentication gate run before any forwarding
//! - Request forwarding to a single upstream origin with host/scheme rewrite
//!
//! # Overview
//!
//! A [`RuleSet`] is built once from the configuration string and shared
//! read-only across request tasks. Each request resolves to the single
//! longest registered prefix matching its path; the resolved [`Rule`]
//! decides whether the request is forwarded as-is (open rule) or gated
//! behind an exact username/password match (protected rule). Client
//! credentials are stripped before the request reaches the origin.
//!
//! # Example
//!
//! ```
//! use authgate_core::{RuleSet, Origin};
//!
//! let rules = RuleSet::parse("/::,/admin/:admin:secret").unwrap();
//! let origin = Origin::parse("http://127.0.0.1:9000").unwrap();
//!
//! assert!(rules.resolve("/admin/panel").unwrap().is_protected());
//! assert_eq!(origin.forward_url("/admin/panel"), "http://127.0.0.1:9000/admin/panel");
//! ```
//!
//! # Modules
//!
//! - [`rules`] - Prefix rule parsing and longest-prefix-match resolution
//! - [`auth`] - Basic Auth decoding and the per-request gate decision
//! - [`request_handler`] - HTTP request processing and forwarding
//! - [`types`] - The upstream [`Origin`]
//! - [`error`] - Error types and result aliases
//! - [`headers`] - HTTP header constants

#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod headers;
pub mod request_handler;
pub mod rules;
pub mod types;

// Re-export commonly used items at crate root
pub use auth::AuthOutcome;
pub use error::{GateError, Result};
pub use rules::{Rule, RuleSet};
pub use types::Origin;
