//! Command-line argument definitions using clap.

use clap::Parser;
use tls_rotate_client::DEFAULT_NAMESPACE;

/// Secret updated when no name is given
pub const DEFAULT_SECRET_NAME: &str = "foobar-tls";

/// Rotate a self-signed TLS certificate stored in a Kubernetes secret
///
/// Generates a random hostname and a fresh P-256 key, issues a self-signed
/// certificate valid for 100 days, and writes it to the secret's `tls.crt`
/// and `tls.key` entries. Other entries in the secret are left alone.
///
/// Runs inside a pod and authenticates with its service account.
#[derive(Parser, Debug)]
#[command(name = "tls-rotate")]
#[command(author, version, about)]
pub struct Cli {
    /// Name of the secret to update
    #[arg(
        long = "secret-name",
        visible_alias = "secName",
        env = "TLS_ROTATE_SECRET_NAME",
        default_value = DEFAULT_SECRET_NAME
    )]
    pub secret_name: String,

    /// Namespace holding the secret
    #[arg(short, long, env = "TLS_ROTATE_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Increase verbosity
    #[arg(short, long)]
    pub verbose: bool,
}
