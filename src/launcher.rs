//! Run a command as a transient service and watch it until its main process exits
//!
//! ```text
//!   tokenize ──► StartTransientUnit(fail) ──► poll MainPID ──► Stop(replace)
//!                                               │     ▲
//!                                               └─────┘ MainPID != 0, sleep
//! ```
//!
//! The manager and the unit sit behind traits so the protocol can be driven
//! against something other than a live systemd.

use std::io::Write;
use std::time::Duration;

use crate::units::{JobMode, ServiceResult, TokenizeError, UnitSpec};

/// Interval between MainPID reads
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Something that can create transient units and hand out handles to them
#[allow(async_fn_in_trait)]
pub trait ServiceManager {
    type Unit: TransientUnit;

    async fn start_transient_unit(&self, spec: &UnitSpec, mode: JobMode) -> zbus::Result<()>;

    async fn unit(&self, name: &str) -> zbus::Result<Self::Unit>;
}

/// Live properties and control of a started service
#[allow(async_fn_in_trait)]
pub trait TransientUnit {
    /// 0 when no main process is running
    async fn main_pid(&self) -> zbus::Result<u32>;

    async fn exec_main_status(&self) -> zbus::Result<i32>;

    async fn result(&self) -> zbus::Result<ServiceResult>;

    async fn stop(&self, mode: JobMode) -> zbus::Result<()>;
}

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub poll_interval: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// How a launched unit ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub unit_name: String,
    pub exec_main_status: i32,
    pub result: ServiceResult,
    /// Number of MainPID reads, the final one included
    pub polls: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("Invalid command: {0}")]
    Command(#[from] TokenizeError),

    #[error("Failed to start {unit}: {source}")]
    Start {
        unit: String,
        #[source]
        source: zbus::Error,
    },

    #[error("Failed to watch {unit}: {source}")]
    Watch {
        unit: String,
        #[source]
        source: zbus::Error,
    },

    #[error("Failed to stop {unit}: {source}")]
    Stop {
        unit: String,
        #[source]
        source: zbus::Error,
    },

    #[error("Failed to connect to the system bus: {0}")]
    Connect(#[source] zbus::Error),

    #[error("Failed to write status: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Launcher<M> {
    manager: M,
    options: LaunchOptions,
}

impl<M: ServiceManager> Launcher<M> {
    pub fn new(manager: M) -> Self {
        Self::with_options(manager, LaunchOptions::default())
    }

    pub fn with_options(manager: M, options: LaunchOptions) -> Self {
        Self { manager, options }
    }

    pub fn manager(&self) -> &M {
        &self.manager
    }

    /// Run `cmd` as a fresh transient service, writing progress to `out`
    pub async fn launch<W: Write>(&self, cmd: &str, out: &mut W) -> Result<Outcome, LaunchError> {
        let spec = UnitSpec::from_command_line(cmd)?;
        self.run(&spec, out).await
    }

    /// Start `spec`, poll until its main process is gone, then stop it
    pub async fn run<W: Write>(&self, spec: &UnitSpec, out: &mut W) -> Result<Outcome, LaunchError> {
        let name = spec.name.as_str();
        let cmd = spec.command_line();

        log::info!("Starting transient unit {} for `{}`", name, cmd);
        self.manager
            .start_transient_unit(spec, JobMode::Fail)
            .await
            .map_err(|source| LaunchError::Start {
                unit: name.to_string(),
                source,
            })?;

        let watch_err = |source: zbus::Error| LaunchError::Watch {
            unit: name.to_string(),
            source,
        };

        // Unit handle lives for the loop only
        let unit = self.manager.unit(name).await.map_err(watch_err)?;
        let mut polls = 0u32;

        loop {
            let main_pid = unit.main_pid().await.map_err(watch_err)?;
            polls += 1;
            log::debug!("{} MainPID={} (poll {})", name, main_pid, polls);

            writeln!(out, "service `{}` (name={}) has MainPID {}", cmd, name, main_pid)?;

            if main_pid == 0 {
                let exec_main_status = unit.exec_main_status().await.map_err(watch_err)?;
                let result = unit.result().await.map_err(watch_err)?;

                writeln!(
                    out,
                    "service finished with {}/{} will stop it and then... bye",
                    exec_main_status, result
                )?;

                unit.stop(JobMode::Replace)
                    .await
                    .map_err(|source| LaunchError::Stop {
                        unit: name.to_string(),
                        source,
                    })?;
                log::info!("Stopped {} ({})", name, result);

                return Ok(Outcome {
                    unit_name: spec.name.clone(),
                    exec_main_status,
                    result,
                    polls,
                });
            }

            writeln!(
                out,
                "service still running, sleeping by {} seconds",
                self.options.poll_interval.as_secs()
            )?;
            out.flush()?;
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }
}

/// Launch `cmd` on the system bus's service manager, reporting to stdout
///
/// The bus connection is dropped before this returns, whether or not the
/// launch succeeded.
pub async fn launch(cmd: &str) -> Result<Outcome, LaunchError> {
    let spec = UnitSpec::from_command_line(cmd)?;
    let manager = crate::dbus::SystemdManager::system()
        .await
        .map_err(LaunchError::Connect)?;
    let launcher = Launcher::new(manager);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    launcher.run(&spec, &mut out).await
}
