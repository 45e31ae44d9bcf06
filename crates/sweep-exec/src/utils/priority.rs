//! Scheduling priority for engine processes.
//!
//! ## Overview
//!
//! The priority label of a batch maps onto what the host OS offers:
//! - On **Unix platforms** the label becomes a nice value, applied inside a `pre_exec` hook that runs in the
//!   child after `fork()` and right before `execve()`. Raising priority above normal usually needs privileges;
//!   when `setpriority` is refused the child keeps the inherited value instead of failing to start.
//! - On **Windows** the label becomes a process creation priority class flag.
use sweep_model::Priority;
use tokio::process::Command;

/// Nice value used for `priority` on Unix (`-20` highest, `19` lowest).
pub fn nice_value(priority: Priority) -> i32 {
    match priority {
        Priority::Low => 19,
        Priority::BelowNormal => 10,
        Priority::Normal => 0,
        Priority::AboveNormal => -5,
        Priority::High => -10,
        Priority::Realtime => -20,
    }
}

/// Windows process creation flag for `priority`.
pub fn priority_class(priority: Priority) -> u32 {
    match priority {
        Priority::Low => 0x0000_0040,         // IDLE_PRIORITY_CLASS
        Priority::BelowNormal => 0x0000_4000, // BELOW_NORMAL_PRIORITY_CLASS
        Priority::Normal => 0x0000_0020,      // NORMAL_PRIORITY_CLASS
        Priority::AboveNormal => 0x0000_8000, // ABOVE_NORMAL_PRIORITY_CLASS
        Priority::High => 0x0000_0080,        // HIGH_PRIORITY_CLASS
        Priority::Realtime => 0x0000_0100,    // REALTIME_PRIORITY_CLASS
    }
}

/// Attach `priority` to a `tokio::process::Command`.
///
/// `Normal` is a no-op on every platform.
pub fn attach_priority(cmd: &mut Command, priority: Priority) {
    if priority == Priority::Normal {
        return;
    }

    cfg_if::cfg_if! {
        if #[cfg(unix)] {
            unix_impl::attach_nice(cmd, nice_value(priority));
        } else if #[cfg(windows)] {
            cmd.creation_flags(priority_class(priority));
        } else {
            tracing::warn!(
                target: "sweep.exec.priority",
                %priority,
                "process priority is not supported on this OS; ignored"
            );
        }
    }
}

#[cfg(unix)]
mod unix_impl {
    use tokio::process::Command;

    pub fn attach_nice(cmd: &mut Command, nice: i32) {
        unsafe {
            cmd.pre_exec(move || {
                // Refusal (EACCES/EPERM for negative values) leaves the inherited priority.
                let _ = libc::setpriority(libc::PRIO_PROCESS as _, 0, nice);
                Ok(())
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
