//! `UserAdmin` backed by the MongoDB shell
//!
//! Each operation pipes a short script to `mongosh`. The script selects the
//! target database, runs one command, and prints the server reply as a
//! single tagged JSON line, which is then classified here.

use crate::admin::{NewUser, UserAdmin, UserInfo};
use crate::config::Config;
use crate::error::BootstrapError;
use common::CommandOutput;
use serde_json::{json, Value};
use tracing::debug;

const REPLY_TAG: &str = "MONGO_INIT_REPLY ";

const DUPLICATE_USER: i32 = 51003;
const DUPLICATE_KEY: i32 = 11000;
const UNAUTHORIZED: i32 = 13;
const AUTHENTICATION_FAILED: i32 = 18;
const HOST_UNREACHABLE: i32 = 6;
const HOST_NOT_FOUND: i32 = 7;
const NETWORK_TIMEOUT: i32 = 89;

const CONNECTION_MARKERS: &[&str] = &[
    "MongoNetworkError",
    "MongoServerSelectionError",
    "ECONNREFUSED",
    "ETIMEDOUT",
    "ENOTFOUND",
    "getaddrinfo",
];

const AUTH_MARKERS: &[&str] = &["Authentication failed", "not authorized", "Unauthorized"];

pub struct MongoshAdmin {
    bin: String,
    uri: String,
}

impl MongoshAdmin {
    pub fn new(bin: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            uri: uri.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.shell_bin.clone(), config.uri.clone())
    }

    /// Reported version of the shell binary.
    pub async fn version(&self) -> Result<String, BootstrapError> {
        common::command::run_checked(&self.bin, &["--version"])
            .await
            .map_err(|e| BootstrapError::Shell(format!("{:#}", e)))
    }

    /// Run `command` against `database` and return the successful reply.
    ///
    /// `subject` names the user a duplicate-user failure refers to.
    async fn exec(
        &self,
        database: &str,
        command: &Value,
        subject: Option<&str>,
    ) -> Result<Value, BootstrapError> {
        let script = command_script(database, command);
        let output = common::mongosh(&self.bin, &self.uri, &script)
            .await
            .map_err(|e| BootstrapError::Shell(format!("{:#}", e)))?;

        debug!(
            database,
            exit = %output.code_display(),
            "mongosh finished"
        );

        let reply = match find_reply(&output.stdout) {
            Some(reply) => reply?,
            None => return Err(classify_shell_failure(&output)),
        };

        check_reply(reply, database, subject)
    }
}

impl UserAdmin for MongoshAdmin {
    async fn ping(&self) -> Result<(), BootstrapError> {
        self.exec("admin", &json!({ "ping": 1 }), None).await?;
        Ok(())
    }

    async fn create_user(&self, database: &str, user: &NewUser) -> Result<(), BootstrapError> {
        self.exec(database, &user.command(), Some(user.user.as_str()))
            .await?;
        Ok(())
    }

    async fn users_info(&self, database: &str) -> Result<Vec<UserInfo>, BootstrapError> {
        let reply = self
            .exec(database, &json!({ "usersInfo": 1 }), None)
            .await?;
        parse_users(reply)
    }
}

/// Script that runs one command on one database and prints the tagged reply.
///
/// Server errors thrown by the shell are folded into an `ok: 0` reply so
/// both failure styles come back the same way.
pub(crate) fn command_script(database: &str, command: &Value) -> String {
    let database = Value::String(database.to_string());
    format!(
        r#"const target = db.getSiblingDB({database});
let reply;
try {{
    reply = target.runCommand({command});
}} catch (e) {{
    reply = {{ ok: 0, code: e.code, codeName: e.codeName, errmsg: e.message }};
}}
print("{tag}" + EJSON.stringify(reply));
"#,
        database = database,
        command = command,
        tag = REPLY_TAG,
    )
}

/// Last tagged line of the shell output, parsed.
///
/// The tag may follow a prompt echoed by the shell when reading stdin.
fn find_reply(stdout: &str) -> Option<Result<Value, BootstrapError>> {
    stdout
        .lines()
        .rev()
        .find_map(|line| line.find(REPLY_TAG).map(|at| &line[at + REPLY_TAG.len()..]))
        .map(|json| {
            serde_json::from_str(json)
                .map_err(|e| BootstrapError::Shell(format!("unparseable reply: {}", e)))
        })
}

fn check_reply(
    reply: Value,
    database: &str,
    subject: Option<&str>,
) -> Result<Value, BootstrapError> {
    let ok = reply.get("ok").and_then(Value::as_f64).unwrap_or(0.0);
    if ok == 1.0 {
        return Ok(reply);
    }

    let code = reply
        .get("code")
        .and_then(Value::as_i64)
        .map(|c| c as i32)
        .unwrap_or(0);
    let code_name = reply
        .get("codeName")
        .and_then(Value::as_str)
        .unwrap_or("Unknown")
        .to_string();
    let message = reply
        .get("errmsg")
        .and_then(Value::as_str)
        .unwrap_or("command failed")
        .to_string();

    Err(classify_server_failure(
        code, code_name, message, database, subject,
    ))
}

fn classify_server_failure(
    code: i32,
    code_name: String,
    message: String,
    database: &str,
    subject: Option<&str>,
) -> BootstrapError {
    match (code, subject) {
        (DUPLICATE_USER | DUPLICATE_KEY, Some(user)) => BootstrapError::UserAlreadyExists {
            user: user.to_string(),
            db: database.to_string(),
        },
        (UNAUTHORIZED | AUTHENTICATION_FAILED, _) => BootstrapError::Authorization(message),
        (HOST_UNREACHABLE | HOST_NOT_FOUND | NETWORK_TIMEOUT, _) => {
            BootstrapError::Connection(message)
        }
        // Shell-side driver errors carry no server code.
        (0, _) if contains_any(&message, CONNECTION_MARKERS) => {
            BootstrapError::Connection(message)
        }
        _ => BootstrapError::CommandFailed {
            code,
            code_name,
            message,
        },
    }
}

/// The shell exited without printing a reply, e.g. it never connected.
fn classify_shell_failure(output: &CommandOutput) -> BootstrapError {
    let text = if output.stderr.is_empty() {
        output.stdout.as_str()
    } else {
        output.stderr.as_str()
    };
    let message = text.lines().last().unwrap_or_default().to_string();

    if contains_any(text, CONNECTION_MARKERS) {
        BootstrapError::Connection(message)
    } else if contains_any(text, AUTH_MARKERS) {
        BootstrapError::Authorization(message)
    } else {
        BootstrapError::Shell(format!(
            "mongosh exited {} without a reply: {}",
            output.code_display(),
            message
        ))
    }
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

fn parse_users(mut reply: Value) -> Result<Vec<UserInfo>, BootstrapError> {
    let users = reply
        .get_mut("users")
        .map(Value::take)
        .unwrap_or_else(|| Value::Array(Vec::new()));
    serde_json::from_value(users)
        .map_err(|e| BootstrapError::Shell(format!("unexpected usersInfo reply: {}", e)))
}
