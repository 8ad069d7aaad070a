//! Server administration seam
//!
//! The bootstrap only needs three things from a server: a liveness probe,
//! user creation inside a selected database, and a read-back of that
//! database's users.

use crate::credentials::{CredentialRecord, RoleBinding};
use crate::error::BootstrapError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Arguments of the server's `createUser` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub user: String,
    #[serde(rename = "pwd")]
    pub password: String,
    pub roles: Vec<RoleBinding>,
}

impl NewUser {
    /// Command document run against the selected database.
    pub fn command(&self) -> Value {
        json!({
            "createUser": self.user,
            "pwd": self.password,
            "roles": self.roles,
        })
    }
}

impl From<&CredentialRecord> for NewUser {
    fn from(record: &CredentialRecord) -> Self {
        Self {
            user: record.username.to_string(),
            password: record.password.expose().to_string(),
            roles: vec![record.binding()],
        }
    }
}

/// A user as reported by `usersInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    pub user: String,
    pub db: String,
    #[serde(default)]
    pub roles: Vec<RoleBinding>,
}

#[allow(async_fn_in_trait)]
pub trait UserAdmin {
    /// Fails with [`BootstrapError::Connection`] when the server is unreachable.
    async fn ping(&self) -> Result<(), BootstrapError>;

    /// Select `database` and create `user` in it.
    async fn create_user(&self, database: &str, user: &NewUser) -> Result<(), BootstrapError>;

    async fn users_info(&self, database: &str) -> Result<Vec<UserInfo>, BootstrapError>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory server used by the bootstrap tests.

    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct FakeServer {
        pub unreachable: bool,
        pub unauthorized: bool,
        /// (database, user) -> roles
        pub users: Mutex<BTreeMap<(String, String), Vec<RoleBinding>>>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeServer {
        pub fn with_user(self, db: &str, user: &str, roles: Vec<RoleBinding>) -> Self {
            self.users
                .lock()
                .unwrap()
                .insert((db.to_string(), user.to_string()), roles);
            self
        }

        pub fn roles_of(&self, db: &str, user: &str) -> Option<Vec<RoleBinding>> {
            self.users
                .lock()
                .unwrap()
                .get(&(db.to_string(), user.to_string()))
                .cloned()
        }

        pub fn usernames(&self) -> Vec<String> {
            self.users
                .lock()
                .unwrap()
                .keys()
                .map(|(_, user)| user.clone())
                .collect()
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) -> Result<(), BootstrapError> {
            self.calls.lock().unwrap().push(call);
            if self.unreachable {
                return Err(BootstrapError::Connection(
                    "connect ECONNREFUSED 127.0.0.1:27017".to_string(),
                ));
            }
            Ok(())
        }
    }

    impl UserAdmin for FakeServer {
        async fn ping(&self) -> Result<(), BootstrapError> {
            self.record("ping".to_string())
        }

        async fn create_user(&self, database: &str, user: &NewUser) -> Result<(), BootstrapError> {
            self.record(format!("createUser {}@{}", user.user, database))?;
            if self.unauthorized {
                return Err(BootstrapError::Authorization(format!(
                    "not authorized on {} to execute command createUser",
                    database
                )));
            }
            let mut users = self.users.lock().unwrap();
            let key = (database.to_string(), user.user.clone());
            if users.contains_key(&key) {
                return Err(BootstrapError::UserAlreadyExists {
                    user: user.user.clone(),
                    db: database.to_string(),
                });
            }
            users.insert(key, user.roles.clone());
            Ok(())
        }

        async fn users_info(&self, database: &str) -> Result<Vec<UserInfo>, BootstrapError> {
            self.record(format!("usersInfo {}", database))?;
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .filter(|((db, _), _)| db == database)
                .map(|((db, user), roles)| UserInfo {
                    user: user.clone(),
                    db: db.clone(),
                    roles: roles.clone(),
                })
                .collect())
        }
    }
}
