//! Liveness probing and signal escalation.

use std::thread::sleep;
use std::time::{Duration, Instant};

use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;

use crate::error::SupervisorError;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Minimum wait after SIGKILL, even when the timeout is already spent.
const KILL_SETTLE: Duration = Duration::from_millis(200);

/// Whether `pid` names a live process. Zombies are dead.
pub fn is_alive(pid: Pid) -> Result<bool, SupervisorError> {
    if pid.as_raw() <= 0 {
        return Ok(false);
    }
    match kill(pid, None) {
        Ok(()) | Err(Errno::EPERM) => Ok(!is_zombie(pid)),
        Err(Errno::ESRCH) => Ok(false),
        Err(source) => Err(SupervisorError::Probe {
            pid: pid.as_raw(),
            source,
        }),
    }
}

#[cfg(target_os = "linux")]
fn is_zombie(pid: Pid) -> bool {
    std::fs::read_to_string(format!("/proc/{pid}/stat"))
        .ok()
        .and_then(|stat| state_from_stat(&stat))
        .is_some_and(|state| state == 'Z')
}

#[cfg(not(target_os = "linux"))]
fn is_zombie(pid: Pid) -> bool {
    std::process::Command::new("ps")
        .args(["-o", "stat=", "-p", &pid.to_string()])
        .output()
        .ok()
        .is_some_and(|out| String::from_utf8_lossy(&out.stdout).trim_start().starts_with('Z'))
}

/// Process state letter from a `/proc/<pid>/stat` line. The command name is
/// parenthesised and may itself contain `)`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn state_from_stat(stat: &str) -> Option<char> {
    stat.rsplit_once(')')?.1.trim_start().chars().next()
}

/// SIGTERM, wait up to half of `timeout`, then SIGKILL and wait out the rest.
///
/// Returns `true` once the process is gone.
pub fn terminate(pid: Pid, timeout: Duration) -> Result<bool, SupervisorError> {
    let grace = timeout / 2;
    send(pid, Signal::SIGTERM)?;
    if wait_for_exit(pid, grace)? {
        return Ok(true);
    }
    tracing::warn!(pid = pid.as_raw(), ?grace, "process ignored SIGTERM, sending SIGKILL");
    send(pid, Signal::SIGKILL)?;
    wait_for_exit(pid, (timeout - grace).max(KILL_SETTLE))
}

fn send(pid: Pid, signal: Signal) -> Result<(), SupervisorError> {
    match kill(pid, signal) {
        Ok(()) | Err(Errno::ESRCH) => {
            tracing::debug!(pid = pid.as_raw(), signal = signal.as_str(), "signal sent");
            Ok(())
        }
        Err(source) => Err(SupervisorError::Signal {
            pid: pid.as_raw(),
            source,
        }),
    }
}

fn wait_for_exit(pid: Pid, within: Duration) -> Result<bool, SupervisorError> {
    let deadline = Instant::now() + within;
    loop {
        if !is_alive(pid)? {
            return Ok(true);
        }
        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        sleep(POLL_INTERVAL.min(deadline - now));
    }
}
