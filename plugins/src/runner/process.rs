use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use cisrun_core::runner::{ExitInfo, RunnerPlugin, RunnerSession, RunnerStartArgs, Signal};
use tokio::io::AsyncRead;
use tokio::process::{Child, Command};

/// Runs each script as a real child process.
///
/// stdin is closed so a script waiting for input sees EOF instead of hanging the batch.
/// On unix every script leads its own process group, and a kill takes the whole group
/// down so nothing the script started outlives a timeout.
pub struct ProcessRunnerPlugin {}

impl ProcessRunnerPlugin {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ProcessRunnerPlugin {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RunnerPlugin for ProcessRunnerPlugin {
    fn name(&self) -> &str {
        "process"
    }

    async fn start_session(&self, args: &RunnerStartArgs) -> io::Result<Box<dyn RunnerSession>> {
        let mut cmd = Command::new(&args.cmd);
        cmd.args(&args.args)
            .envs(&args.envs)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &args.workdir {
            cmd.current_dir(dir);
        }
        #[cfg(unix)]
        cmd.process_group(0);

        let child = cmd.spawn()?;
        let pgid = child.id();
        tracing::debug!(pid = ?pgid, cmd = %args.cmd, "child spawned");
        Ok(Box::new(ProcessRunnerSession { child, pgid }))
    }
}

struct ProcessRunnerSession {
    child: Child,
    /// Process group led by the child; same as its pid.
    pgid: Option<u32>,
}

impl ProcessRunnerSession {
    #[cfg(unix)]
    fn signal_group(&self, signal: Signal) -> io::Result<()> {
        use nix::errno::Errno;
        use nix::sys::signal::{killpg, Signal as Sig};
        use nix::unistd::Pid;

        let Some(pgid) = self.pgid else {
            return Ok(());
        };
        let sig = match signal {
            Signal::Term => Sig::SIGTERM,
            Signal::Kill => Sig::SIGKILL,
        };
        match killpg(Pid::from_raw(pgid as i32), sig) {
            // Group already gone.
            Ok(()) | Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(io::Error::from(e)),
        }
    }

    #[cfg(not(unix))]
    fn signal_group(&self, _signal: Signal) -> io::Result<()> {
        Ok(())
    }
}

#[async_trait]
impl RunnerSession for ProcessRunnerSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stdout
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.child
            .stderr
            .take()
            .map(|s| Box::new(s) as Box<dyn AsyncRead + Unpin + Send>)
    }

    async fn signal(&mut self, signal: Signal) -> io::Result<()> {
        tracing::debug!(?signal, pid = ?self.child.id(), "stopping child and its process group");
        self.signal_group(signal)?;
        if signal == Signal::Term {
            return Ok(());
        }
        match self.child.start_kill() {
            Ok(()) => Ok(()),
            // Already exited.
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn wait(&mut self) -> io::Result<ExitInfo> {
        let status = self.child.wait().await?;
        Ok(ExitInfo::from(status))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::ffi::OsString;
    use tokio::io::AsyncReadExt;

    fn args(cmd: &str, argv: &[&str]) -> RunnerStartArgs {
        RunnerStartArgs {
            cmd: cmd.to_string(),
            args: argv.iter().map(OsString::from).collect(),
            envs: HashMap::new(),
            workdir: None,
        }
    }

    #[tokio::test]
    async fn runs_a_command_and_reports_exit_code() {
        let runner = ProcessRunnerPlugin::new();
        let mut session = runner
            .start_session(&args("sh", &["-c", "echo hello; exit 3"]))
            .await
            .unwrap();

        let mut out = String::new();
        session.stdout().unwrap().read_to_string(&mut out).await.unwrap();
        let exit = session.wait().await.unwrap();

        assert_eq!(out, "hello\n");
        assert_eq!(exit.code, Some(3));
    }

    #[tokio::test]
    async fn missing_program_fails_to_start() {
        let runner = ProcessRunnerPlugin::new();
        let err = runner
            .start_session(&args("cisrun-no-such-interpreter", &[]))
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn kill_ends_a_running_child() {
        let runner = ProcessRunnerPlugin::new();
        let mut session = runner.start_session(&args("sleep", &["30"])).await.unwrap();
        session.signal(Signal::Kill).await.unwrap();
        let exit = session.wait().await.unwrap();
        assert!(!exit.success());
    }

    #[tokio::test]
    async fn kill_after_exit_is_not_an_error() {
        let runner = ProcessRunnerPlugin::new();
        let mut session = runner.start_session(&args("true", &[])).await.unwrap();
        session.wait().await.unwrap();
        session.signal(Signal::Kill).await.unwrap();
    }
}
