//! Command line argument parsing for authgate.
//!
//! This module defines the CLI interface using [`clap`] for argument
//! parsing: listen address, origin URL, the prefix-rule configuration
//! string, and TLS material paths.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for authgate.
///
/// TLS is the default; plain HTTP hides behind a flag that is deliberately
/// unpleasant to type.
///
/// # Example
///
/// ```no_run
/// use authgate::args::Args;
/// use clap::Parser;
///
/// let args = Args::parse();
/// if let Err(e) = args.validate() {
///     eprintln!("Configuration error: {}", e);
///     std::process::exit(1);
/// }
/// ```
#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    long_about = "A reverse proxying gateway that forwards requests to a single origin,\nenforcing HTTP Basic Authentication per path prefix\n\nExample usage:\n  authgate --origin http://127.0.0.1:9000 --prefix-config \"/::,/admin/:admin:secret\"\n  authgate --origin http://127.0.0.1:9000 --tls-cert my.crt --tls-key my.key"
)]
#[command(
    after_help = "Each prefix rule has the form '<prefix>:<username>:<password>'.\nAn empty password makes the rule open (no credentials required).\nA prefix ending in '/' guards that subtree; any other prefix matches exactly.\nRun without --origin for a worked example."
)]
pub struct Args {
    /// Address to listen on for incoming connections
    #[arg(
        long,
        help = "Where to listen for connections",
        value_name = "HOST:PORT",
        default_value = "0.0.0.0:8443"
    )]
    pub addr: String,

    /// Origin server all authorized requests are forwarded to
    #[arg(long, help = "Target origin to proxy to", value_name = "URL")]
    pub origin: Option<String>,

    /// Access rules, one per path prefix
    #[arg(
        long,
        help = "Prefix rules in the form 'path:username:password' -- set multiple via comma separated rules",
        value_name = "RULES",
        default_value = "/::"
    )]
    pub prefix_config: String,

    /// TLS certificate path
    #[arg(
        long,
        help = "HTTPS TLS certificate (only necessary when running in https mode)",
        value_name = "PATH",
        default_value = "tls.crt"
    )]
    pub tls_cert: PathBuf,

    /// TLS private key path
    #[arg(
        long,
        help = "HTTPS private key (only necessary when running in https mode)",
        value_name = "PATH",
        default_value = "tls.key"
    )]
    pub tls_key: PathBuf,

    /// Serve plain HTTP instead of TLS. The flag name is the warning.
    #[arg(
        long = "run-in-http-mode-although-i-know-i-shouldnt-do-this",
        help = "Run in http mode -- you should never do this unless testing locally"
    )]
    pub http_mode: bool,
}

impl Args {
    /// Validates the parsed command line arguments.
    ///
    /// The listen address must have the shape `host:port` with a non-zero
    /// port. Origin and rule validation happens in their own constructors;
    /// this only covers what clap cannot express.
    ///
    /// # Example
    ///
    /// ```
    /// use authgate::args::Args;
    /// use clap::Parser;
    ///
    /// let args = Args::try_parse_from(["authgate", "--addr", "127.0.0.1:8443"]).unwrap();
    /// assert!(args.validate().is_ok());
    ///
    /// let args = Args::try_parse_from(["authgate", "--addr", "no-port"]).unwrap();
    /// assert!(args.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        let Some((host, port)) = self.addr.rsplit_once(':') else {
            return Err(format!(
                "Invalid listen address '{}': expected HOST:PORT",
                self.addr
            ));
        };

        if host.is_empty() {
            return Err(format!("Invalid listen address '{}': empty host", self.addr));
        }

        match port.parse::<u16>() {
            Ok(0) => Err(format!("Invalid listen address '{}': port must be greater than 0", self.addr)),
            Ok(_) => Ok(()),
            Err(_) => Err(format!("Invalid listen address '{}': bad port '{port}'", self.addr)),
        }
    }
}
