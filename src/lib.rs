//! sdlaunch - run a command as a transient systemd service
//!
//! Asks the service manager over D-Bus to start a uniquely named, file-less
//! service, polls its main PID until the process exits, then stops the unit.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                    sdlaunch                      │
//! ├─────────────────────────────────────────────────┤
//! │    UnitSpec     │     Launcher     │  D-Bus API  │
//! ├─────────────────────────────────────────────────┤
//! │          org.freedesktop.systemd1 (zbus)         │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod dbus;
pub mod launcher;
pub mod units;

pub use launcher::{launch, LaunchError, LaunchOptions, Launcher, Outcome};
pub use units::{sleep_command, JobMode, ServiceResult, UnitSpec};
