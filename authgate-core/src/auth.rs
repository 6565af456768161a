//! HTTP Basic Authentication (RFC 7617) for the gate.
//!
//! Provides credential decoding from the `Authorization` header and the
//! per-request authorization decision against a resolved [`Rule`].

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::rules::Rule;

/// Outcome of the authentication gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Request is authorized; hand it to the forwarder.
    Forward,
    /// Protected rule, no credentials supplied: respond 401 with a challenge.
    Unauthorized,
    /// Protected rule, credentials supplied but wrong: respond 403.
    Forbidden,
}

/// Decodes Basic credentials from an `Authorization` header value.
///
/// Expects `Basic {base64(username:password)}` per RFC 7617. Returns `None`
/// for any other scheme or a value that does not decode to a
/// colon-separated UTF-8 pair. The user-id cannot contain colons; the
/// password may.
pub fn decode_basic(auth_header: &str) -> Option<(String, String)> {
    let encoded = auth_header.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded_str = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded_str.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Decides the fate of a request under the given rule.
///
/// Open rules forward unconditionally, whether or not credentials were
/// supplied. Protected rules require an exact, case-sensitive match of both
/// username and password; the comparison is constant-time.
pub fn authorize(rule: &Rule, credentials: Option<&(String, String)>) -> AuthOutcome {
    if !rule.is_protected() {
        return AuthOutcome::Forward;
    }

    match credentials {
        None => AuthOutcome::Unauthorized,
        Some((username, password)) => {
            let user_match = constant_time_eq(username.as_bytes(), rule.username().as_bytes());
            let pass_match = constant_time_eq(password.as_bytes(), rule.password().as_bytes());
            if user_match && pass_match {
                AuthOutcome::Forward
            } else {
                AuthOutcome::Forbidden
            }
        }
    }
}

/// Constant-time byte-slice comparison.
///
/// Comparison time depends only on the input lengths, never on where the
/// first mismatch occurs.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Rule;

    fn basic_header(user: &str, pass: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{user}:{pass}")))
    }

    // ===========================================
    // decode_basic tests
    // ===========================================

    #[test]
    fn test_decode_valid() {
        let (user, pass) = decode_basic(&basic_header("admin", "secret")).unwrap();
        assert_eq!(user, "admin");
        assert_eq!(pass, "secret");
    }

    #[test]
    fn test_decode_password_with_colon() {
        let (user, pass) = decode_basic(&basic_header("admin", "se:cret")).unwrap();
        assert_eq!(user, "admin");
        assert_eq!(pass, "se:cret");
    }

    #[test]
    fn test_decode_empty_credentials() {
        let (user, pass) = decode_basic(&basic_header("", "")).unwrap();
        assert_eq!(user, "");
        assert_eq!(pass, "");
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(decode_basic("Basic not-valid-base64!!!").is_none());
    }

    #[test]
    fn test_decode_non_basic_scheme() {
        assert!(decode_basic("Bearer some-token").is_none());
    }

    #[test]
    fn test_decode_missing_colon() {
        let header = format!("Basic {}", STANDARD.encode("no-colon-here"));
        assert!(decode_basic(&header).is_none());
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let header = format!("Basic {}", STANDARD.encode([0xff, 0xfe, b':', b'x']));
        assert!(decode_basic(&header).is_none());
    }

    // ===========================================
    // authorize tests
    // ===========================================

    fn protected_rule() -> Rule {
        Rule::parse("/admin/:admin:secret").unwrap()
    }

    #[test]
    fn test_authorize_open_rule_without_credentials() {
        let rule = Rule::parse("/::").unwrap();
        assert_eq!(authorize(&rule, None), AuthOutcome::Forward);
    }

    #[test]
    fn test_authorize_open_rule_ignores_credentials() {
        // Whatever the client sends, an open rule forwards
        let rule = Rule::parse("/::").unwrap();
        let creds = ("anyone".to_string(), "anything".to_string());
        assert_eq!(authorize(&rule, Some(&creds)), AuthOutcome::Forward);
    }

    #[test]
    fn test_authorize_protected_without_credentials() {
        assert_eq!(authorize(&protected_rule(), None), AuthOutcome::Unauthorized);
    }

    #[test]
    fn test_authorize_protected_wrong_password() {
        let creds = ("admin".to_string(), "wrong".to_string());
        assert_eq!(
            authorize(&protected_rule(), Some(&creds)),
            AuthOutcome::Forbidden
        );
    }

    #[test]
    fn test_authorize_protected_wrong_username() {
        let creds = ("intruder".to_string(), "secret".to_string());
        assert_eq!(
            authorize(&protected_rule(), Some(&creds)),
            AuthOutcome::Forbidden
        );
    }

    #[test]
    fn test_authorize_protected_exact_match() {
        let creds = ("admin".to_string(), "secret".to_string());
        assert_eq!(
            authorize(&protected_rule(), Some(&creds)),
            AuthOutcome::Forward
        );
    }

    #[test]
    fn test_authorize_is_case_sensitive() {
        let creds = ("Admin".to_string(), "secret".to_string());
        assert_eq!(
            authorize(&protected_rule(), Some(&creds)),
            AuthOutcome::Forbidden
        );

        let creds = ("admin".to_string(), "SECRET".to_string());
        assert_eq!(
            authorize(&protected_rule(), Some(&creds)),
            AuthOutcome::Forbidden
        );
    }

    #[test]
    fn test_authorize_empty_supplied_credentials() {
        let creds = (String::new(), String::new());
        assert_eq!(
            authorize(&protected_rule(), Some(&creds)),
            AuthOutcome::Forbidden
        );
    }

    // ===========================================
    // constant_time_eq tests
    // ===========================================

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"secret", b"secret"));
        assert!(!constant_time_eq(b"secret", b"secres"));
        assert!(!constant_time_eq(b"secret", b"secre"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }
}
