//! Server utilities: startup output and the accept loops.
//!
//! The accept loops are public so integration tests can drive a real
//! gateway instance on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

use authgate_core::request_handler;
use authgate_core::rules::RuleSet;
use authgate_core::types::Origin;

use crate::args::Args;

/// Print startup banner with configuration
pub fn print_startup_info(args: &Args, rules: &RuleSet, origin: &Origin) {
    println!("🛡️  {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    println!("   {}", env!("CARGO_PKG_DESCRIPTION"));
    println!();
    println!("📡 Network Configuration:");
    println!("   Listen Address: {} ({})", args.addr, if args.http_mode { "http" } else { "https" });
    println!("   Origin:         {origin}");
    println!();
    println!("🔒 Prefix Rules:");
    for rule in rules.rules() {
        println!("   {rule}");
    }
    println!();
    println!("🚀 Server starting...");
}

/// Print the worked prefix-config example shown when no origin is given.
pub fn print_usage_examples() {
    print!(
        r#"
You can gate multiple paths for multiple users via the --prefix-config parameter.
If a path ends with a '/', it guards that subtree, otherwise it matches exactly:
Calling with prefix-config set to:

	--prefix-config "/::,/foo:foo:foo,/foo/:foo2:foo2,/foo/bar/:bar:bar,/foo/baz::"

/::               -> no username / password for all paths that don't match any other rule (because "/" matches all paths)
/foo:foo:foo      -> basic auth with foo/foo necessary for the path '/foo'
/foo/:foo2:foo2   -> basic auth with foo2/foo2 for path '/foo/' and all its sub paths
/foo/bar/:bar:bar -> basic auth with bar/bar for path '/foo/bar/' and all sub paths (overrides the /foo/ rule for these paths)
/foo/baz::        -> no username/password required for the exact path '/foo/baz' (overrides the /foo/ rule for this path)

"#
    );
}

/// Accept loop for plaintext mode.
///
/// Never returns under normal operation; accept failures are logged and the
/// loop continues.
pub async fn serve_plain(
    listener: TcpListener,
    rules: Arc<RuleSet>,
    origin: Arc<Origin>,
    http_client: reqwest::Client,
) {
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                eprintln!("⚠️  Failed to accept connection: {err}");
                continue;
            }
        };

        let rules = rules.clone();
        let origin = origin.clone();
        let http_client = http_client.clone();

        tokio::task::spawn(serve_connection(stream, rules, origin, http_client, addr));
    }
}

/// Accept loop for TLS mode.
///
/// Handshake failures are per-connection: logged, dropped, never fatal.
pub async fn serve_tls(
    listener: TcpListener,
    acceptor: TlsAcceptor,
    rules: Arc<RuleSet>,
    origin: Arc<Origin>,
    http_client: reqwest::Client,
) {
    loop {
        let (stream, addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                eprintln!("⚠️  Failed to accept connection: {err}");
                continue;
            }
        };

        let acceptor = acceptor.clone();
        let rules = rules.clone();
        let origin = origin.clone();
        let http_client = http_client.clone();

        tokio::task::spawn(async move {
            let stream = match acceptor.accept(stream).await {
                Ok(stream) => stream,
                Err(err) => {
                    eprintln!("⚠️  TLS handshake error from {addr}: {err}");
                    return;
                }
            };

            serve_connection(stream, rules, origin, http_client, addr).await;
        });
    }
}

/// Serve HTTP/1 on one accepted (and, in TLS mode, handshaken) stream.
async fn serve_connection<S>(
    stream: S,
    rules: Arc<RuleSet>,
    origin: Arc<Origin>,
    http_client: reqwest::Client,
    addr: SocketAddr,
) where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let io = TokioIo::new(stream);
    let service = service_fn(move |req| {
        request_handler::handle_request(req, rules.clone(), origin.clone(), http_client.clone())
    });

    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
        eprintln!("⚠️  Connection error from {addr}: {err}");
    }
}
