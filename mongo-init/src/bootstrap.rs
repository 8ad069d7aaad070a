//! The bootstrap sequence
//!
//! Ping, then create each user in table order. The first failure ends the
//! run; users created before it stay in place.

use crate::admin::{NewUser, UserAdmin};
use crate::credentials::{validate_table, CredentialRecord};
use crate::error::BootstrapError;
use std::time::Instant;
use tracing::{error, info};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub users_created: Vec<String>,
    pub duration_ms: u64,
}

/// Create every user in `records`, in order, stopping at the first error.
pub async fn run_bootstrap<A: UserAdmin>(
    admin: &A,
    records: &[CredentialRecord],
) -> Result<BootstrapReport, BootstrapError> {
    let start = Instant::now();

    validate_table(records)?;

    if let Err(e) = admin.ping().await {
        error!(phase = "ping", error = %e, "Server not reachable");
        return Err(e);
    }

    let mut users_created = Vec::with_capacity(records.len());

    for record in records {
        info!(
            database = %record.database,
            user = %record.username,
            role = %record.role,
            "Creating user"
        );

        if let Err(e) = admin.create_user(record.database, &NewUser::from(record)).await {
            error!(
                phase = "create_user",
                database = %record.database,
                user = %record.username,
                kind = e.kind(),
                error = %e,
                "Failed to create user"
            );
            return Err(e);
        }

        users_created.push(record.username.to_string());
    }

    Ok(BootstrapReport {
        users_created,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Check each record's user exists with exactly its one role binding.
///
/// Read-only.
pub async fn verify<A: UserAdmin>(
    admin: &A,
    records: &[CredentialRecord],
) -> Result<(), BootstrapError> {
    for record in records {
        let users = admin.users_info(record.database).await?;

        let user = users
            .iter()
            .find(|u| u.user == record.username)
            .ok_or_else(|| {
                BootstrapError::VerificationFailed(format!(
                    "user {} not found in {}",
                    record.username, record.database
                ))
            })?;

        let expected = record.binding();
        if user.roles != [expected.clone()] {
            let actual: Vec<String> = user.roles.iter().map(ToString::to_string).collect();
            return Err(BootstrapError::VerificationFailed(format!(
                "user {} has roles [{}], expected [{}]",
                record.username,
                actual.join(", "),
                expected
            )));
        }

        info!(database = %record.database, user = %record.username, "Verified role binding");
    }

    Ok(())
}
