//! The fixed credential table
//!
//! Each record names a logical database and the single application user
//! provisioned for it. The role scope is always the record's own database.

use crate::error::BootstrapError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Built-in MongoDB database roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Read,
    ReadWrite,
    DbAdmin,
    DbOwner,
    UserAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::ReadWrite => "readWrite",
            Self::DbAdmin => "dbAdmin",
            Self::DbOwner => "dbOwner",
            Self::UserAdmin => "userAdmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role granted on one database, as the server stores it.
///
/// `role` stays a string so bindings read back from the server may carry
/// roles outside [`Role`] (e.g. `root`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleBinding {
    pub role: String,
    pub db: String,
}

impl RoleBinding {
    pub fn new(role: Role, db: &str) -> Self {
        Self {
            role: role.as_str().to_string(),
            db: db.to_string(),
        }
    }
}

impl fmt::Display for RoleBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.role, self.db)
    }
}

/// Secret that never prints.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Password(&'static str);

impl Password {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &'static str {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// One application user and the database it may read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialRecord {
    pub database: &'static str,
    pub username: &'static str,
    pub password: Password,
    pub role: Role,
}

impl CredentialRecord {
    /// The record's only role binding, scoped to its own database.
    pub fn binding(&self) -> RoleBinding {
        RoleBinding::new(self.role, self.database)
    }

    pub fn validate(&self) -> Result<(), BootstrapError> {
        if self.database.is_empty() {
            return Err(BootstrapError::InvalidRecord(
                "database name is empty".to_string(),
            ));
        }
        if self.username.is_empty() {
            return Err(BootstrapError::InvalidRecord(format!(
                "username is empty for database {}",
                self.database
            )));
        }
        if self.password.is_empty() {
            return Err(BootstrapError::InvalidRecord(format!(
                "password is empty for user {}",
                self.username
            )));
        }
        Ok(())
    }
}

/// Provisioned in this order.
pub const CREDENTIALS: [CredentialRecord; 2] = [
    CredentialRecord {
        database: "flow_db",
        username: "flowci",
        password: Password::new("flowci"),
        role: Role::ReadWrite,
    },
    CredentialRecord {
        database: "flow_db_ut",
        username: "flowci_ut",
        password: Password::new("flowci_ut"),
        role: Role::ReadWrite,
    },
];

/// Check every record and that no database appears twice.
pub fn validate_table(records: &[CredentialRecord]) -> Result<(), BootstrapError> {
    let mut seen = HashSet::new();
    for record in records {
        record.validate()?;
        if !seen.insert(record.database) {
            return Err(BootstrapError::InvalidRecord(format!(
                "database {} listed more than once",
                record.database
            )));
        }
    }
    Ok(())
}
