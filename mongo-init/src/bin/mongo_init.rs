//! MongoDB bootstrap entrypoint
//!
//! Runs ONCE when a fresh environment is provisioned. Creates the flow.ci
//! application users and exits; any failure stops the run with status 1 and
//! is left for the operator to resolve.

use anyhow::Result;
use common::init_logging;
use mongo_init::{run_bootstrap, verify, Config, MongoshAdmin, CREDENTIALS};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_logging("mongo-init");

    let config = Config::from_env();
    let admin = MongoshAdmin::from_config(&config);

    info!(
        uri = %config.redacted_uri(),
        shell = %config.shell_bin,
        users = CREDENTIALS.len(),
        "mongo-init starting..."
    );

    match admin.version().await {
        Ok(version) => info!(version = %version, "Using mongosh"),
        Err(e) => warn!(error = %e, "Could not determine mongosh version"),
    }

    let report = match run_bootstrap(&admin, &CREDENTIALS).await {
        Ok(report) => report,
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Bootstrap failed");
            std::process::exit(1);
        }
    };

    if config.verify {
        if let Err(e) = verify(&admin, &CREDENTIALS).await {
            error!(phase = "verify", kind = e.kind(), error = %e, "Verification failed");
            std::process::exit(1);
        }
    }

    info!(
        users_created = ?report.users_created,
        duration_ms = report.duration_ms,
        "mongo-init completed"
    );

    Ok(())
}
