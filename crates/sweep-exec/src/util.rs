use tokio::process::{Child, Command};

pub fn cmd_program(program: &str, args: &[String]) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|s| s.as_str()));
    cmd
}

/// Send SIGTERM, then kill at once; the engine gets no grace period.
#[cfg(target_family = "unix")]
pub async fn kill_graceful(child: &mut Child) -> std::io::Result<()> {
    if let Some(id) = child.id()
        && let Ok(pid) = libc::pid_t::try_from(id)
    {
        // SAFETY: plain syscall on a pid we spawned and have not reaped yet.
        unsafe {
            libc::kill(pid, libc::SIGTERM);
        }
    }
    child.kill().await
}

#[cfg(target_family = "windows")]
pub async fn kill_graceful(child: &mut Child) -> std::io::Result<()> {
    child.kill().await
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    #[tokio::test]
    async fn kill_does_not_wait_for_the_child() {
        // `trap` makes the shell ignore SIGTERM, so only the hard kill can end it.
        let mut child = cmd_program("sh", &["-c".into(), "trap '' TERM; exec sleep 30".into()])
            .spawn()
            .unwrap();

        let started = Instant::now();
        kill_graceful(&mut child).await.unwrap();
        let status = tokio::time::timeout(Duration::from_secs(5), child.wait())
            .await
            .expect("child should be gone")
            .unwrap();

        assert!(status.code().is_none());
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
