//! Shared fixtures: a recording command runner and temp-root hosts.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rcwarden_core::{Flavor, HostDefaults, ServiceDescriptor};
use rcwarden_service::{CommandOutput, CommandRunner, Host, Service, ShellCommand};
use tempfile::TempDir;

/// Records every command and answers from a script of canned outputs.
/// Unscripted commands succeed with empty output.
#[derive(Default)]
pub struct FakeRunner {
    calls: Mutex<Vec<String>>,
    responses: Mutex<HashMap<String, CommandOutput>>,
}

impl FakeRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, command: impl Into<String>, output: CommandOutput) {
        self.responses.lock().unwrap().insert(command.into(), output);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, cmd: &ShellCommand) -> io::Result<CommandOutput> {
        let key = cmd.to_string();
        self.calls.lock().unwrap().push(key.clone());
        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or(CommandOutput {
                status: Some(0),
                ..CommandOutput::default()
            }))
    }
}

pub fn failure(status: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        status: Some(status),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

pub fn defaults() -> HostDefaults {
    HostDefaults {
        user: "0".to_string(),
        group: "0".to_string(),
        working_directory: PathBuf::from("/"),
        supervisor: PathBuf::from("/usr/local/bin/rcwarden-supervise"),
    }
}

pub fn sample() -> ServiceDescriptor {
    ServiceDescriptor::builder("sample", "/opt/sample/run.js")
        .description("Sample Service")
        .build(&defaults())
        .expect("descriptor")
}

/// Temp root with the flavor's init, pid and log directories.
pub fn host_root(flavor: Flavor) -> TempDir {
    let root = TempDir::new().expect("tempdir");
    let script_dir = match flavor {
        Flavor::SysV => "etc/init.d",
        Flavor::BsdRc => "etc/rc.d",
    };
    for dir in [script_dir, "var/run", "var/log"] {
        fs::create_dir_all(root.path().join(dir)).expect("mkdir");
    }
    root
}

pub fn touch(root: &Path, rel: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(&path, "").expect("touch");
    path
}

pub fn service(root: &Path, flavor: Flavor, runner: Arc<FakeRunner>) -> Service {
    let host = Host::system()
        .with_root(root)
        .with_flavor(flavor)
        .with_runner(runner);
    Service::with_host(sample(), host).expect("service")
}
