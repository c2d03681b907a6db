//! Shared integration-test helpers for driving the `seqrec` binary and
//! building recorders with observable callbacks.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::sync::{Arc, Mutex};

use seqrec::callback::LifecycleCallback;

/// Path to the `seqrec` binary under test.
pub const BIN: &str = env!("CARGO_BIN_EXE_seqrec");

/// Runs `seqrec` with `args` and an empty stdin, returning its output.
#[allow(clippy::missing_panics_doc)]
pub fn run_command(args: &[&str]) -> Output {
    Command::new(BIN)
        .args(args)
        .stdin(Stdio::null())
        .env_remove("SEQREC_LOG_LEVEL")
        .env_remove("SEQREC_CONFIG")
        .output()
        .expect("failed to run seqrec")
}

/// Runs `seqrec` with `args`, piping `input` to its stdin.
#[allow(clippy::missing_panics_doc)]
pub fn run_with_stdin(args: &[&str], input: &str) -> Output {
    let mut child = Command::new(BIN)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .env_remove("SEQREC_LOG_LEVEL")
        .env_remove("SEQREC_CONFIG")
        .spawn()
        .expect("failed to spawn seqrec");
    child
        .stdin
        .take()
        .expect("stdin not captured")
        .write_all(input.as_bytes())
        .expect("failed to write stdin");
    child.wait_with_output().expect("failed to wait for seqrec")
}

/// Path of a file under `tests/fixtures`.
#[must_use]
pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Writes `content` to a fresh temporary file.
#[allow(clippy::missing_panics_doc)]
pub fn temp_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("failed to write temp file");
    file
}

/// One lifecycle call observed by a [`Recording`] callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Begin(u64),
    Update(u64),
    End(u64),
}

/// Shared log of calls made to a [`Recording`] callback.
pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// Callback that logs every call with the tick number it was given.
pub struct Recording {
    name: String,
    log: CallLog,
}

impl Recording {
    #[must_use]
    pub fn new(name: &str) -> (Self, CallLog) {
        let log = CallLog::default();
        (
            Self {
                name: name.to_string(),
                log: Arc::clone(&log),
            },
            log,
        )
    }
}

impl LifecycleCallback<u64> for Recording {
    fn name(&self) -> &str {
        &self.name
    }

    fn begin(&mut self, ctx: &u64) {
        self.log.lock().unwrap().push(Call::Begin(*ctx));
    }

    fn update(&mut self, ctx: &u64) {
        self.log.lock().unwrap().push(Call::Update(*ctx));
    }

    fn end(&mut self, ctx: &u64) {
        self.log.lock().unwrap().push(Call::End(*ctx));
    }
}

/// Drains and returns the calls logged so far.
#[allow(clippy::missing_panics_doc)]
#[must_use]
pub fn take(log: &CallLog) -> Vec<Call> {
    std::mem::take(&mut *log.lock().unwrap())
}
