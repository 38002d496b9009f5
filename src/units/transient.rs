//! Transient service definitions
//!
//! A transient unit has no file on disk. It is described entirely by the
//! property list handed to `StartTransientUnit` and disappears once stopped.

use chrono::Utc;
use rand::Rng;
use zbus::zvariant::Value;

/// Prefix of every generated unit name
pub const UNIT_NAME_PREFIX: &str = "myservice";

/// Description attached to every launched unit
pub const DEFAULT_DESCRIPTION: &str = "Example of transient unit";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("Invalid shell quoting in: {0}")]
    Quoting(String),

    #[error("Command line is empty")]
    Empty,
}

/// One ExecStart= entry, sent on the bus as `(sasb)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCommand {
    pub path: String,
    /// Full argument vector, argv[0] included
    pub argv: Vec<String>,
    /// When false a non-zero exit marks the unit failed
    pub ignore_failure: bool,
}

impl ExecCommand {
    pub fn new(argv: Vec<String>) -> Result<Self, TokenizeError> {
        let path = argv.first().cloned().ok_or(TokenizeError::Empty)?;
        Ok(Self {
            path,
            argv,
            ignore_failure: false,
        })
    }

    fn to_value(&self) -> (String, Vec<String>, bool) {
        (self.path.clone(), self.argv.clone(), self.ignore_failure)
    }
}

/// Definition of a transient service, consumed by a single start call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSpec {
    pub name: String,
    pub description: String,
    pub exec_start: Vec<ExecCommand>,
    pub remain_after_exit: bool,
}

impl UnitSpec {
    /// Build a uniquely named service running `cmd`
    pub fn from_command_line(cmd: &str) -> Result<Self, TokenizeError> {
        let argv = tokenize(cmd)?;
        Ok(Self {
            name: generate_unit_name(),
            description: DEFAULT_DESCRIPTION.to_string(),
            exec_start: vec![ExecCommand::new(argv)?],
            // Keep the unit around after exit so ExecMainStatus stays readable
            remain_after_exit: true,
        })
    }

    /// Property list for StartTransientUnit, signature `a(sv)`
    pub fn properties(&self) -> Vec<(&'static str, Value<'static>)> {
        let exec_start: Vec<(String, Vec<String>, bool)> =
            self.exec_start.iter().map(ExecCommand::to_value).collect();

        vec![
            ("Description", Value::from(self.description.clone())),
            ("ExecStart", Value::from(exec_start)),
            ("RemainAfterExit", Value::from(self.remain_after_exit)),
        ]
    }

    /// The command line as it would appear in a unit file
    pub fn command_line(&self) -> String {
        self.exec_start
            .first()
            .map(|exec| shlex::try_join(exec.argv.iter().map(String::as_str)).unwrap_or_default())
            .unwrap_or_default()
    }
}

/// Split a command line using shell quoting rules
pub fn tokenize(cmd: &str) -> Result<Vec<String>, TokenizeError> {
    let parts = shlex::split(cmd).ok_or_else(|| TokenizeError::Quoting(cmd.to_string()))?;
    if parts.is_empty() {
        return Err(TokenizeError::Empty);
    }
    Ok(parts)
}

/// `<prefix>.<random>.<unix seconds>.<microseconds>.service`
pub fn generate_unit_name() -> String {
    let now = Utc::now();
    let nonce: u32 = rand::thread_rng().gen();
    format!(
        "{}.{}.{}.{:06}.service",
        UNIT_NAME_PREFIX,
        nonce,
        now.timestamp(),
        now.timestamp_subsec_micros()
    )
}

/// Command run by the CLI inside the transient unit
pub fn sleep_command(seconds: u64) -> String {
    format!("/bin/sleep {}", seconds)
}
