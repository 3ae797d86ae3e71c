//! In-memory runner used by unit tests. Scripts never touch a real process.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWriteExt};

use crate::runner::{ExitInfo, RunnerPlugin, RunnerSession, RunnerStartArgs, Signal};

#[derive(Debug, Clone, Default)]
pub(crate) struct Scripted {
    stdout: String,
    stderr: String,
    exit_code: Option<i32>,
    delay: Duration,
    wait_fails: bool,
}

impl Scripted {
    pub(crate) fn exits(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Self::default()
        }
    }

    pub(crate) fn stdout(mut self, text: &str) -> Self {
        self.stdout = text.to_string();
        self
    }

    pub(crate) fn stdout_owned(mut self, text: String) -> Self {
        self.stdout = text;
        self
    }

    pub(crate) fn stderr(mut self, text: &str) -> Self {
        self.stderr = text.to_string();
        self
    }

    pub(crate) fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// `wait` errors after the output has been written.
    pub(crate) fn wait_fails(mut self) -> Self {
        self.wait_fails = true;
        self
    }
}

#[derive(Default)]
struct Counters {
    running: AtomicUsize,
    peak: AtomicUsize,
}

#[derive(Default)]
pub(crate) struct FakeRunner {
    scripts: HashMap<String, Scripted>,
    missing: HashSet<String>,
    started: Mutex<Vec<String>>,
    counters: Arc<Counters>,
}

impl FakeRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Behaviour for the script whose file name is `name`. Unknown scripts exit 0 silently.
    pub(crate) fn script(mut self, name: &str, behaviour: Scripted) -> Self {
        self.scripts.insert(name.to_string(), behaviour);
        self
    }

    pub(crate) fn missing_interpreter(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// File names in launch order.
    pub(crate) fn started(&self) -> Vec<String> {
        self.started.lock().map(|s| s.clone()).unwrap_or_default()
    }

    pub(crate) fn peak(&self) -> usize {
        self.counters.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RunnerPlugin for FakeRunner {
    fn name(&self) -> &str {
        "fake"
    }

    async fn start_session(&self, args: &RunnerStartArgs) -> io::Result<Box<dyn RunnerSession>> {
        if self.missing.contains(&args.cmd) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such file"));
        }

        let name = args
            .args
            .last()
            .and_then(|p| Path::new(p).file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let behaviour = self.scripts.get(&name).cloned().unwrap_or_else(|| Scripted::exits(0));

        if let Ok(mut started) = self.started.lock() {
            started.push(name);
        }
        let now = self.counters.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.peak.fetch_max(now, Ordering::SeqCst);

        let stdout = feed(behaviour.stdout.into_bytes());
        let stderr = feed(behaviour.stderr.into_bytes());

        Ok(Box::new(FakeSession {
            stdout: Some(stdout),
            stderr: Some(stderr),
            exit_code: behaviour.exit_code,
            delay: behaviour.delay,
            wait_fails: behaviour.wait_fails,
            counters: self.counters.clone(),
        }))
    }
}

fn feed(data: Vec<u8>) -> Box<dyn AsyncRead + Unpin + Send> {
    let (mut wr, rd) = tokio::io::duplex(64 * 1024);
    tokio::spawn(async move {
        let _ = wr.write_all(&data).await;
    });
    Box::new(rd)
}

struct FakeSession {
    stdout: Option<Box<dyn AsyncRead + Unpin + Send>>,
    stderr: Option<Box<dyn AsyncRead + Unpin + Send>>,
    exit_code: Option<i32>,
    delay: Duration,
    wait_fails: bool,
    counters: Arc<Counters>,
}

#[async_trait]
impl RunnerSession for FakeSession {
    fn stdout(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.stdout.take()
    }

    fn stderr(&mut self) -> Option<Box<dyn AsyncRead + Unpin + Send>> {
        self.stderr.take()
    }

    async fn signal(&mut self, _signal: Signal) -> io::Result<()> {
        Ok(())
    }

    async fn wait(&mut self) -> io::Result<ExitInfo> {
        tokio::time::sleep(self.delay).await;
        if self.wait_fails {
            return Err(io::Error::new(io::ErrorKind::Other, "child vanished"));
        }
        Ok(ExitInfo {
            code: self.exit_code,
        })
    }
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.counters.running.fetch_sub(1, Ordering::SeqCst);
    }
}
