use std::process;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;
use tracing_subscriber::EnvFilter;

use authgate::args::Args;
use authgate::rules::RuleSet;
use authgate::types::Origin;
use authgate::{server, tls};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Without an origin there is nothing to proxy to: print the flag
    // documentation plus a worked rule example and bail out.
    let Some(origin_url) = args.origin.clone() else {
        let _ = Args::command().print_long_help();
        server::print_usage_examples();
        process::exit(1);
    };

    if let Err(err) = args.validate() {
        eprintln!("❌ Configuration error: {err}");
        process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let origin = match Origin::parse(&origin_url) {
        Ok(origin) => Arc::new(origin),
        Err(err) => {
            eprintln!("❌ Configuration error: {err}");
            process::exit(1);
        }
    };

    let rules = match RuleSet::parse(&args.prefix_config) {
        Ok(rules) => Arc::new(rules),
        Err(err) => {
            eprintln!("❌ Configuration error: {err}");
            process::exit(1);
        }
    };

    server::print_startup_info(&args, &rules, &origin);

    // Redirects from the origin are relayed to the client, not followed.
    let http_client = match reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            eprintln!("❌ Failed to build HTTP client: {err}");
            process::exit(1);
        }
    };

    // Bind to address
    let listener = match TcpListener::bind(&args.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("❌ Failed to bind to {}: {err}", args.addr);
            process::exit(1);
        }
    };

    println!("✅ authgate is running on {}", args.addr);

    if args.http_mode {
        println!("⚠️  RUNNING IN HTTP-MODE -- DON'T DO THIS!");
        server::serve_plain(listener, rules, origin, http_client).await;
    } else {
        // A process-wide crypto provider may already be installed (reqwest
        // also links rustls); a second install attempt is fine to ignore.
        let _ = tokio_rustls::rustls::crypto::aws_lc_rs::default_provider().install_default();

        let tls_config = match tls::load_tls_config(&args.tls_cert, &args.tls_key) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("❌ Failed to load TLS material: {err}");
                process::exit(1);
            }
        };

        let acceptor = TlsAcceptor::from(tls_config);
        server::serve_tls(listener, acceptor, rules, origin, http_client).await;
    }
}
