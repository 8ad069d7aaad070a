//! MongoDB bootstrap for flow.ci environments
//!
//! Provisions the application credentials a fresh MongoDB server needs:
//! one user per logical database, each holding a single `readWrite` role
//! on its own database. The run is one-shot and sequential; the first
//! failure stops it and is surfaced to the operator unchanged.

pub mod admin;
pub mod bootstrap;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mongosh;

pub use admin::{NewUser, UserAdmin, UserInfo};
pub use bootstrap::{run_bootstrap, verify, BootstrapReport};
pub use config::Config;
pub use credentials::{validate_table, CredentialRecord, Password, Role, RoleBinding, CREDENTIALS};
pub use error::BootstrapError;
pub use mongosh::MongoshAdmin;
