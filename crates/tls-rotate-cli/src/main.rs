//! tls-rotate - replace a self-signed TLS certificate in a Kubernetes secret

use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match tls_rotate_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Pipeline errors were already logged with their stage
            if e.downcast_ref::<tls_rotate_cli::RotateError>().is_none() {
                tracing::error!("{e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
