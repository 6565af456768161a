//! TLS material loading for the listener.
//!
//! Reads a PEM certificate chain and private key from disk and builds the
//! rustls server configuration. Failures here are fatal at startup: the
//! gateway refuses to serve with broken TLS material rather than fall back
//! to plaintext.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;

use rustls_pemfile::{certs, private_key};
use tokio_rustls::rustls::ServerConfig;

/// Loads a rustls server configuration from PEM certificate and key files.
pub fn load_tls_config(cert_path: &Path, key_path: &Path) -> io::Result<Arc<ServerConfig>> {
    let cert_file = File::open(cert_path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("certificate file {}: {err}", cert_path.display()),
        )
    })?;
    let key_file = File::open(key_path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("private key file {}: {err}", key_path.display()),
        )
    })?;

    let mut cert_reader = BufReader::new(cert_file);
    let cert_chain = certs(&mut cert_reader).collect::<Result<Vec<_>, _>>()?;
    if cert_chain.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("no certificates found in {}", cert_path.display()),
        ));
    }

    let mut key_reader = BufReader::new(key_file);
    let key = private_key(&mut key_reader)?.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("no private key found in {}", key_path.display()),
        )
    })?;

    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, key)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_certificate_file() {
        let err = load_tls_config(
            Path::new("/nonexistent/tls.crt"),
            Path::new("/nonexistent/tls.key"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("/nonexistent/tls.crt"));
    }

    #[test]
    fn test_empty_pem_files() {
        let dir = std::env::temp_dir();
        let cert_path = dir.join("authgate-test-empty.crt");
        let key_path = dir.join("authgate-test-empty.key");
        File::create(&cert_path).unwrap();
        File::create(&key_path).unwrap();

        let err = load_tls_config(&cert_path, &key_path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let _ = std::fs::remove_file(cert_path);
        let _ = std::fs::remove_file(key_path);
    }

    #[test]
    fn test_garbage_pem_files() {
        let dir = std::env::temp_dir();
        let cert_path = dir.join("authgate-test-garbage.crt");
        let key_path = dir.join("authgate-test-garbage.key");
        File::create(&cert_path)
            .unwrap()
            .write_all(b"this is not a certificate")
            .unwrap();
        File::create(&key_path)
            .unwrap()
            .write_all(b"this is not a key")
            .unwrap();

        assert!(load_tls_config(&cert_path, &key_path).is_err());

        let _ = std::fs::remove_file(cert_path);
        let _ = std::fs::remove_file(key_path);
    }
}
