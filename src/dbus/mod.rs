//! D-Bus client for the systemd service manager
//!
//! Talks to org.freedesktop.systemd1 on the system bus. The wire protocol is
//! zbus's business; this module only declares the calls we make and binds
//! them to the launcher's [`ServiceManager`] / [`TransientUnit`] seams.
//!
//! Key interfaces:
//! - Manager: StartTransientUnit
//! - Unit: Stop
//! - Service: MainPID, ExecMainStatus, Result

mod manager;
mod unit;

pub use manager::ManagerProxy;
pub use unit::{ServiceProxy, UnitProxy};

use zbus::{proxy::CacheProperties, Connection};

use crate::launcher::{ServiceManager, TransientUnit};
use crate::units::{JobMode, ServiceResult, UnitSpec};

/// Service manager reached over a system bus connection
///
/// The connection is owned here and closed when the last handle derived from
/// it is dropped.
pub struct SystemdManager {
    connection: Connection,
    manager: ManagerProxy<'static>,
}

impl SystemdManager {
    /// Connect to the system bus
    pub async fn system() -> zbus::Result<Self> {
        let connection = Connection::system().await?;
        Self::with_connection(connection).await
    }

    /// Use an already established connection (e.g. the session bus, to reach a user manager)
    pub async fn with_connection(connection: Connection) -> zbus::Result<Self> {
        let manager = ManagerProxy::new(&connection).await?;
        log::debug!(
            "Connected to service manager as {:?}",
            connection.unique_name()
        );
        Ok(Self {
            connection,
            manager,
        })
    }
}

impl ServiceManager for SystemdManager {
    type Unit = SystemdUnit;

    async fn start_transient_unit(&self, spec: &UnitSpec, mode: JobMode) -> zbus::Result<()> {
        let properties = spec.properties();
        log::debug!(
            "StartTransientUnit: name={} mode={} properties={:?}",
            spec.name,
            mode,
            properties
        );
        let job = self
            .manager
            .start_transient_unit(&spec.name, mode.as_str(), &properties, &[])
            .await?;
        log::debug!("StartTransientUnit {} queued job {}", spec.name, job.as_str());
        Ok(())
    }

    async fn unit(&self, name: &str) -> zbus::Result<SystemdUnit> {
        let path = unit_object_path(name);
        log::debug!("Watching {} at {}", name, path);

        // Uncached so that each poll asks the manager again
        let unit = UnitProxy::builder(&self.connection)
            .path(path.clone())?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;
        let service = ServiceProxy::builder(&self.connection)
            .path(path)?
            .cache_properties(CacheProperties::No)
            .build()
            .await?;

        Ok(SystemdUnit { unit, service })
    }
}

/// Live view of one loaded service unit
pub struct SystemdUnit {
    unit: UnitProxy<'static>,
    service: ServiceProxy<'static>,
}

impl TransientUnit for SystemdUnit {
    async fn main_pid(&self) -> zbus::Result<u32> {
        self.service.main_pid().await
    }

    async fn exec_main_status(&self) -> zbus::Result<i32> {
        self.service.exec_main_status().await
    }

    async fn result(&self) -> zbus::Result<ServiceResult> {
        let raw = self.service.result().await?;
        Ok(ServiceResult::parse(&raw))
    }

    async fn stop(&self, mode: JobMode) -> zbus::Result<()> {
        let job = self.unit.stop(mode.as_str()).await?;
        log::debug!("Stop queued job {}", job.as_str());
        Ok(())
    }
}

/// Convert unit name to D-Bus object path string
/// e.g., "docker.service" -> "/org/freedesktop/systemd1/unit/docker_2eservice"
///
/// Letters pass through, digits too unless they lead the label, everything
/// else becomes `_xx`.
pub fn unit_object_path(unit_id: &str) -> String {
    let mut escaped = String::with_capacity(unit_id.len());

    if unit_id.is_empty() {
        escaped.push('_');
    }

    for (i, b) in unit_id.bytes().enumerate() {
        if b.is_ascii_alphabetic() || (i > 0 && b.is_ascii_digit()) {
            escaped.push(b as char);
        } else {
            escaped.push_str(&format!("_{:02x}", b));
        }
    }

    format!("/org/freedesktop/systemd1/unit/{}", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zbus::zvariant::ObjectPath;

    #[test]
    fn test_unit_object_path() {
        assert_eq!(
            unit_object_path("docker.service"),
            "/org/freedesktop/systemd1/unit/docker_2eservice"
        );
        assert_eq!(
            unit_object_path("user@1000.service"),
            "/org/freedesktop/systemd1/unit/user_401000_2eservice"
        );
        assert_eq!(
            unit_object_path("session-1.scope"),
            "/org/freedesktop/systemd1/unit/session_2d1_2escope"
        );
    }

    #[test]
    fn test_unit_object_path_escapes_underscore_and_leading_digit() {
        assert_eq!(
            unit_object_path("my_unit.service"),
            "/org/freedesktop/systemd1/unit/my_5funit_2eservice"
        );
        assert_eq!(
            unit_object_path("1.service"),
            "/org/freedesktop/systemd1/unit/_31_2eservice"
        );
        assert_eq!(unit_object_path(""), "/org/freedesktop/systemd1/unit/_");
    }

    #[test]
    fn test_generated_names_map_to_valid_paths() {
        let spec = UnitSpec::from_command_line("/bin/sleep 0").unwrap();
        let path = unit_object_path(&spec.name);
        assert!(path.starts_with("/org/freedesktop/systemd1/unit/myservice_2e"));
        assert!(ObjectPath::try_from(path.as_str()).is_ok());
    }
}
