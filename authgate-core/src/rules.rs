//! Prefix rules: the access-control model of the gateway.
//!
//! A [`Rule`] maps one URL path prefix to an access policy: open (no
//! credentials) or protected (exact username/password via Basic Auth). A
//! [`RuleSet`] is the ordered collection built once from the configuration
//! string; it is immutable afterwards and shared read-only across request
//! tasks.
//!
//! # Matching semantics
//!
//! A prefix that ends in `/` guards that path and everything under it; any
//! other prefix matches its exact path only. When several rules match a
//! request path, the longest prefix wins, so an exact rule always beats a
//! subtree rule for its own path, and a deeper subtree rule overrides a
//! shallower one.

use std::collections::HashSet;
use std::fmt;

use crate::error::{GateError, Result};

/// Access policy for one URL path prefix.
///
/// Immutable once constructed. `protected` is derived from the password
/// field alone: a rule with a username but an empty password is open, and
/// the username is irrelevant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    prefix: String,
    username: String,
    password: String,
    protected: bool,
}

impl Rule {
    /// Parses a rule from a string in the format `<prefix>:<username>:<password>`.
    ///
    /// Exactly three `:`-delimited fields are required; empty username and
    /// password fields are allowed. The prefix must be non-empty.
    ///
    /// # Errors
    ///
    /// [`GateError::MalformedRule`] on any other field count,
    /// [`GateError::EmptyPrefix`] when the prefix field is empty. Both are
    /// startup-time configuration errors.
    pub fn parse(value: &str) -> Result<Self> {
        let fields: Vec<&str> = value.split(':').collect();
        if fields.len() != 3 {
            return Err(GateError::MalformedRule(value.to_string()));
        }
        if fields[0].is_empty() {
            return Err(GateError::EmptyPrefix(value.to_string()));
        }

        Ok(Self {
            prefix: fields[0].to_string(),
            username: fields[1].to_string(),
            password: fields[2].to_string(),
            protected: !fields[2].is_empty(),
        })
    }

    /// Returns the path prefix this rule guards.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the expected username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the expected password.
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns true if this rule requires credentials.
    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// Returns true if this rule guards a subtree rather than an exact path.
    pub fn is_subtree(&self) -> bool {
        self.prefix.ends_with('/')
    }

    /// Returns true if this rule applies to the given request path.
    ///
    /// Subtree rules match the prefix itself and everything under it; exact
    /// rules match only their own path.
    pub fn matches(&self, path: &str) -> bool {
        if self.is_subtree() {
            path.starts_with(&self.prefix)
        } else {
            path == self.prefix
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.protected {
            write!(
                f,
                "{:<30} (user: {}, password: ******)",
                self.prefix, self.username
            )
        } else {
            write!(f, "{:<30} (no username/password required)", self.prefix)
        }
    }
}

/// Ordered collection of prefix rules with longest-prefix-match resolution.
///
/// Built once before the listener starts; read-only thereafter.
///
/// # Example
///
/// ```
/// use authgate_core::rules::RuleSet;
///
/// let rules = RuleSet::parse("/::,/admin/:admin:secret").unwrap();
/// assert!(rules.resolve("/admin/users").unwrap().is_protected());
/// assert!(!rules.resolve("/index.html").unwrap().is_protected());
/// ```
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Parses a rule set from a comma-separated list of rule strings.
    ///
    /// Order is preserved. Duplicate prefixes are rejected: two rules for
    /// the same prefix would make resolution ambiguous.
    ///
    /// # Errors
    ///
    /// Any error from [`Rule::parse`], or [`GateError::DuplicatePrefix`].
    pub fn parse(config: &str) -> Result<Self> {
        let rules = config
            .split(',')
            .map(Rule::parse)
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.prefix()) {
                return Err(GateError::DuplicatePrefix(rule.prefix().to_string()));
            }
        }

        Ok(Self { rules })
    }

    /// Resolves the rule governing the given request path.
    ///
    /// Exact match beats prefix match; among prefix matches the longest
    /// registered prefix wins. Returns `None` when no rule applies (only
    /// possible without a `/` catch-all rule).
    pub fn resolve(&self, path: &str) -> Option<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(path))
            .max_by_key(|rule| rule.prefix().len())
    }

    /// Returns the rules in configuration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the set contains no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
