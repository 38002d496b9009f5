//! End-to-end test against the host's systemd
//!
//! Needs a system bus, a running systemd and the right to create units
//! (root, or a polkit agent that will answer the prompt).
//!
//! Run with: cargo test --test systemd_live -- --ignored

use std::time::Duration;

use sdlaunch::dbus::SystemdManager;
use sdlaunch::{LaunchOptions, Launcher, ServiceResult};

#[tokio::test]
#[ignore] // Requires systemd and privileges
async fn test_sleep_one_on_real_systemd() {
    let manager = SystemdManager::system()
        .await
        .expect("system bus not reachable");
    let launcher = Launcher::with_options(
        manager,
        LaunchOptions {
            poll_interval: Duration::from_millis(500),
        },
    );
    let mut out = Vec::new();

    let outcome = launcher
        .launch(&sdlaunch::sleep_command(1), &mut out)
        .await
        .expect("launch failed");

    let text = String::from_utf8(out).unwrap();
    println!("{}", text);

    assert!(text.contains("service still running"));
    assert!(text.contains("service finished with 0/success"));
    assert_eq!(outcome.exec_main_status, 0);
    assert_eq!(outcome.result, ServiceResult::Success);
    assert!(outcome.polls >= 2);
}

#[tokio::test]
#[ignore] // Requires systemd and privileges
async fn test_missing_executable_is_reported_by_manager() {
    let manager = SystemdManager::system()
        .await
        .expect("system bus not reachable");
    let launcher = Launcher::with_options(
        manager,
        LaunchOptions {
            poll_interval: Duration::from_millis(200),
        },
    );
    let mut out = Vec::new();

    // No local existence check: the manager starts the unit and it fails to exec
    let outcome = launcher
        .launch("/nonexistent/sdlaunch-binary", &mut out)
        .await
        .expect("launch failed");

    assert!(!outcome.result.is_success());
}
