//! # tls-rotate-cli
//!
//! One-shot rotation of a development TLS certificate kept in a Kubernetes
//! secret.
//!
//! ## Flow
//!
//! 1. Fetch the secret named by `--secret-name` (default `foobar-tls`)
//! 2. Generate a random 16-hex-character hostname and a P-256 key
//! 3. Issue a self-signed server certificate valid for 100 days
//! 4. Write `tls.crt` and `tls.key` back, keeping the secret's other entries
//!
//! Any failure stops the run before the secret is written.

pub mod cli;
pub mod rotate;

pub use cli::run;
pub use rotate::{rotate, RotateError};
