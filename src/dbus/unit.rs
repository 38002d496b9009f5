//! org.freedesktop.systemd1.Unit and org.freedesktop.systemd1.Service clients
//!
//! Both interfaces live on the same object path, one per loaded unit.

use zbus::{proxy, zvariant::OwnedObjectPath};

#[proxy(
    interface = "org.freedesktop.systemd1.Unit",
    default_service = "org.freedesktop.systemd1"
)]
pub trait Unit {
    /// Enqueue a stop job for this unit
    #[zbus(allow_interactive_auth)]
    fn stop(&self, mode: &str) -> zbus::Result<OwnedObjectPath>;
}

#[proxy(
    interface = "org.freedesktop.systemd1.Service",
    default_service = "org.freedesktop.systemd1"
)]
pub trait Service {
    /// PID of the main process, 0 once it has exited
    #[zbus(property, name = "MainPID")]
    fn main_pid(&self) -> zbus::Result<u32>;

    /// Exit status (or signal number) of the main process
    #[zbus(property)]
    fn exec_main_status(&self) -> zbus::Result<i32>;

    /// "success", "exit-code", "signal", ...
    #[zbus(property)]
    fn result(&self) -> zbus::Result<String>;
}
