//! SysV driver lifecycle against a temp root.

mod support;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::sync::Arc;

use rcwarden_core::{Flavor, LifecycleOutcome};
use rcwarden_service::{Host, Service, ServiceError, SystemRunner};
use rstest::rstest;

use support::{failure, host_root, sample, service, touch, FakeRunner};

// ---------------------------------------------------------------------------
// install
// ---------------------------------------------------------------------------

#[test]
fn install_writes_executable_control_script() {
    let root = host_root(Flavor::SysV);
    let runner = FakeRunner::new();
    let svc = service(root.path(), Flavor::SysV, runner.clone());

    assert_eq!(svc.install().unwrap(), LifecycleOutcome::Installed);

    let script_path = root.path().join("etc/init.d/sample");
    let script = fs::read_to_string(&script_path).expect("control script");
    assert!(script.contains("Provides:          sample"));
    assert!(script.contains(r#"-f "/opt/sample/run.js""#));
    let mode = fs::metadata(&script_path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o755);
    assert!(runner.calls().is_empty(), "no registration tooling present");
}

#[test]
fn second_install_reports_already_installed_and_leaves_file_alone() {
    let root = host_root(Flavor::SysV);
    let runner = FakeRunner::new();
    let svc = service(root.path(), Flavor::SysV, runner.clone());
    let script_path = root.path().join("etc/init.d/sample");

    assert_eq!(svc.install().unwrap(), LifecycleOutcome::Installed);
    let before = fs::read(&script_path).unwrap();

    assert_eq!(svc.install().unwrap(), LifecycleOutcome::AlreadyInstalled);
    assert_eq!(fs::read(&script_path).unwrap(), before);
    assert!(runner.calls().is_empty());
}

#[test]
fn install_registers_with_insserv_when_present() {
    let root = host_root(Flavor::SysV);
    touch(root.path(), "sbin/insserv");
    touch(root.path(), "sbin/chkconfig");
    let runner = FakeRunner::new();
    let svc = service(root.path(), Flavor::SysV, runner.clone());

    assert_eq!(svc.install().unwrap(), LifecycleOutcome::Installed);
    assert_eq!(
        runner.calls(),
        vec![format!("{}/sbin/insserv sample", root.path().display())]
    );
}

#[test]
fn install_falls_back_to_chkconfig_add_then_on() {
    let root = host_root(Flavor::SysV);
    touch(root.path(), "sbin/chkconfig");
    let runner = FakeRunner::new();
    let svc = service(root.path(), Flavor::SysV, runner.clone());

    assert_eq!(svc.install().unwrap(), LifecycleOutcome::Installed);
    let chkconfig = root.path().join("sbin/chkconfig");
    assert_eq!(
        runner.calls(),
        vec![
            format!("{} --add sample", chkconfig.display()),
            format!("{} sample on", chkconfig.display()),
        ]
    );
}

#[test]
fn registration_failure_is_reported_without_rollback() {
    let root = host_root(Flavor::SysV);
    touch(root.path(), "sbin/chkconfig");
    let chkconfig = root.path().join("sbin/chkconfig");
    let runner = FakeRunner::new();
    let add = format!("{} --add sample", chkconfig.display());
    runner.respond(add.clone(), failure(1, "", "service sample does not support chkconfig\n"));
    let svc = service(root.path(), Flavor::SysV, runner.clone());

    let outcome = svc.install().unwrap();
    assert_eq!(
        outcome,
        LifecycleOutcome::Failed(format!(
            "`{add}` failed: service sample does not support chkconfig"
        ))
    );
    assert_eq!(runner.calls(), vec![add], "`on` must not run after `--add` failed");
    assert!(svc.installed().unwrap(), "control script stays in place");
}

// ---------------------------------------------------------------------------
// missing host directories
// ---------------------------------------------------------------------------

#[rstest]
#[case("install")]
#[case("uninstall")]
#[case("installed")]
#[case("start")]
#[case("stop")]
#[case("restart")]
fn missing_init_dir_fails_before_any_side_effect(#[case] op: &str) {
    let root = tempfile::TempDir::new().unwrap();
    fs::create_dir_all(root.path().join("var/run")).unwrap();
    fs::create_dir_all(root.path().join("var/log")).unwrap();
    let runner = FakeRunner::new();
    let svc = service(root.path(), Flavor::SysV, runner.clone());

    let err = match op {
        "install" => svc.install().unwrap_err(),
        "uninstall" => svc.uninstall().unwrap_err(),
        "installed" => svc.installed().unwrap_err(),
        "start" => svc.start().unwrap_err(),
        "stop" => svc.stop().unwrap_err(),
        "restart" => svc.restart().unwrap_err(),
        other => unreachable!("{other}"),
    };

    match err {
        ServiceError::Environment { flavor, dir } => {
            assert_eq!(flavor, Flavor::SysV);
            assert_eq!(dir, root.path().join("etc/init.d"));
        }
        other => panic!("expected environment error, got {other:?}"),
    }
    assert!(runner.calls().is_empty());
    assert!(!root.path().join("etc").exists(), "nothing may be written");
}

// ---------------------------------------------------------------------------
// uninstall
// ---------------------------------------------------------------------------

#[test]
fn uninstall_of_never_installed_service_succeeds_twice() {
    let root = host_root(Flavor::SysV);
    touch(root.path(), "sbin/insserv");
    let runner = FakeRunner::new();
    let svc = service(root.path(), Flavor::SysV, runner.clone());

    assert_eq!(svc.uninstall().unwrap(), LifecycleOutcome::Uninstalled);
    assert_eq!(svc.uninstall().unwrap(), LifecycleOutcome::Uninstalled);
    assert!(runner.calls().is_empty());
}

#[test]
fn uninstall_stops_deregisters_and_removes_artifacts() {
    let root = host_root(Flavor::SysV);
    touch(root.path(), "sbin/chkconfig");
    let runner = FakeRunner::new();
    let svc = service(root.path(), Flavor::SysV, runner.clone());
    assert_eq!(svc.install().unwrap(), LifecycleOutcome::Installed);

    let pid = touch(root.path(), "var/run/sample.pid");
    let out = touch(root.path(), "var/log/sample-out.log");
    let err = touch(root.path(), "var/log/sample-err.log");
    let script = root.path().join("etc/init.d/sample");
    let chkconfig = root.path().join("sbin/chkconfig");

    assert_eq!(svc.uninstall().unwrap(), LifecycleOutcome::Uninstalled);
    assert_eq!(
        runner.calls()[2..],
        [
            format!("{} stop", script.display()),
            format!("{} sample off", chkconfig.display()),
            format!("{} --del sample", chkconfig.display()),
        ]
    );
    for path in [script, pid, out, err] {
        assert!(!path.exists(), "{} should be removed", path.display());
    }
}

#[test]
fn uninstall_swallows_stop_failure() {
    let root = host_root(Flavor::SysV);
    let runner = FakeRunner::new();
    let svc = service(root.path(), Flavor::SysV, runner.clone());
    assert_eq!(svc.install().unwrap(), LifecycleOutcome::Installed);

    let stop = format!("{} stop", root.path().join("etc/init.d/sample").display());
    runner.respond(stop.clone(), failure(1, "sample: ERROR: cannot stop -- not running\n", ""));

    assert_eq!(svc.uninstall().unwrap(), LifecycleOutcome::Uninstalled);
    assert_eq!(runner.calls(), vec![stop]);
    assert!(!svc.installed().unwrap());
}

#[test]
fn deregistration_failure_is_reported_but_artifacts_are_cleared() {
    let root = host_root(Flavor::SysV);
    touch(root.path(), "sbin/insserv");
    let runner = FakeRunner::new();
    let svc = service(root.path(), Flavor::SysV, runner.clone());
    assert_eq!(svc.install().unwrap(), LifecycleOutcome::Installed);

    let remove = format!("{} -r sample", root.path().join("sbin/insserv").display());
    runner.respond(remove.clone(), failure(1, "", "insserv: script sample not registered\n"));

    assert_eq!(
        svc.uninstall().unwrap(),
        LifecycleOutcome::Failed(format!(
            "`{remove}` failed: insserv: script sample not registered"
        ))
    );
    assert!(!svc.installed().unwrap());
    assert_eq!(svc.uninstall().unwrap(), LifecycleOutcome::Uninstalled);
}

// ---------------------------------------------------------------------------
// start / stop
// ---------------------------------------------------------------------------

#[test]
fn start_and_stop_drive_the_control_script() {
    let root = host_root(Flavor::SysV);
    let runner = FakeRunner::new();
    let svc = service(root.path(), Flavor::SysV, runner.clone());
    let script = root.path().join("etc/init.d/sample");

    assert_eq!(svc.start().unwrap(), LifecycleOutcome::Started);
    assert_eq!(svc.stop().unwrap(), LifecycleOutcome::Stopped);
    assert_eq!(
        runner.calls(),
        vec![
            format!("{} start", script.display()),
            format!("{} stop", script.display()),
        ]
    );
}

#[test]
fn supervisor_status_lines_become_expected_conditions() {
    let root = host_root(Flavor::SysV);
    let runner = FakeRunner::new();
    let script = root.path().join("etc/init.d/sample");
    runner.respond(
        format!("{} start", script.display()),
        failure(1, "sample: ERROR: cannot start -- already running\n", ""),
    );
    runner.respond(
        format!("{} stop", script.display()),
        failure(1, "sample: ERROR: cannot stop -- not running\n", ""),
    );
    let svc = service(root.path(), Flavor::SysV, runner);

    assert_eq!(svc.start().unwrap(), LifecycleOutcome::AlreadyRunning);
    assert_eq!(svc.stop().unwrap(), LifecycleOutcome::NotRunning);
}

#[test]
fn restart_runs_stop_before_start() {
    let root = host_root(Flavor::SysV);
    let runner = FakeRunner::new();
    let script = root.path().join("etc/init.d/sample");
    runner.respond(format!("{} stop", script.display()), failure(1, "", "boom\n"));
    let svc = service(root.path(), Flavor::SysV, runner.clone());

    assert_eq!(svc.restart().unwrap(), LifecycleOutcome::Started);
    assert_eq!(
        runner.calls(),
        vec![
            format!("{} stop", script.display()),
            format!("{} start", script.display()),
        ]
    );
}

#[test]
fn failing_start_action_reports_its_stderr() {
    let root = host_root(Flavor::SysV);
    let script = root.path().join("etc/init.d/sample");
    fs::write(&script, "#!/bin/sh\necho \"already running\" >&2\nexit 1\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let host = Host::system()
        .with_root(root.path())
        .with_os("linux")
        .with_runner(Arc::new(SystemRunner));
    let svc = Service::with_host(sample(), host).unwrap();

    assert_eq!(
        svc.start().unwrap(),
        LifecycleOutcome::Failed("already running".to_string())
    );
}

#[test]
fn supervisor_error_line_on_stdout_becomes_the_detail() {
    let root = host_root(Flavor::SysV);
    let script = root.path().join("etc/init.d/sample");
    fs::write(
        &script,
        "#!/bin/sh\necho \"sample: ERROR: cannot spawn /opt/sample/run.js: Permission denied (os error 13)\"\nexit 1\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let host = Host::system()
        .with_root(root.path())
        .with_flavor(Flavor::SysV)
        .with_runner(Arc::new(SystemRunner));
    let svc = Service::with_host(sample(), host).unwrap();

    assert_eq!(
        svc.start().unwrap(),
        LifecycleOutcome::Failed(
            "sample: ERROR: cannot spawn /opt/sample/run.js: Permission denied (os error 13)"
                .to_string()
        )
    );
}

#[test]
fn start_without_control_script_fails_on_sysv() {
    let root = host_root(Flavor::SysV);
    let host = Host::system()
        .with_root(root.path())
        .with_flavor(Flavor::SysV)
        .with_runner(Arc::new(SystemRunner));
    let svc = Service::with_host(sample(), host).unwrap();

    match svc.start().unwrap() {
        LifecycleOutcome::Failed(detail) => assert!(detail.contains("failed to execute"), "{detail}"),
        other => panic!("expected failure, got {other:?}"),
    }
}
