use std::{
    future::Future,
    io,
    pin::Pin,
    process::ExitStatus,
    sync::Arc,
    task::{ready, Context, Poll},
    time::Duration,
};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use parking_lot::Mutex;
use tokio::{
    process::{Child, ChildStderr, ChildStdout},
    sync::oneshot,
    task::JoinHandle,
    time::Sleep,
};
use tokio_util::{
    codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead},
    io::ReaderStream,
};
use tracing::{debug, info, trace, warn, Instrument, Span};

use super::{Invocation, ToolError};

const STDOUT_CHUNK_SIZE: usize = 64 * 1024;
const STDERR_TAIL_LIMIT: usize = 64 * 1024;
/// Longer stderr lines are dropped up to their next line break.
const STDERR_LINE_LIMIT: usize = 8 * 1024;
/// How long to wait for buffered stderr after the process exits.
const STDERR_DRAIN_GRACE: Duration = Duration::from_secs(1);

/// The last [`STDERR_TAIL_LIMIT`] bytes a process wrote to stderr.
#[derive(Debug, Clone, Default)]
pub struct StderrTail(Arc<Mutex<String>>);
impl StderrTail {
    fn push_line(&self, line: &str) {
        let mut buf = self.0.lock();
        buf.push_str(line);
        buf.push('\n');

        if buf.len() > STDERR_TAIL_LIMIT {
            let mut cut = buf.len() - STDERR_TAIL_LIMIT;
            while !buf.is_char_boundary(cut) {
                cut += 1;
            }
            buf.drain(..cut);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> String {
        self.0.lock().trim().to_string()
    }
}

#[derive(Debug, Clone, Copy)]
enum KillReason {
    Deadline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Reading,
    Exiting,
    Done,
}

/// Stdout of a running process, committed after its first chunk.
///
/// Chunks are only read from the pipe when the consumer polls, so a slow
/// client slows the process down instead of piling data up in memory.
/// Dropping the stream kills the process.
pub struct ProcessStream {
    pid: Option<u32>,
    stdout: ReaderStream<ChildStdout>,
    pending: Option<Bytes>,
    exit: oneshot::Receiver<io::Result<ExitStatus>>,
    kill: Option<oneshot::Sender<KillReason>>,
    deadline: Pin<Box<Sleep>>,
    timeout: Duration,
    stderr: StderrTail,
    state: State,
}
impl ProcessStream {
    #[must_use]
    pub const fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn kill(&mut self, reason: KillReason) {
        if let Some(tx) = self.kill.take() {
            let _ = tx.send(reason);
        }
    }

    fn finish_with(
        &self,
        status: Result<io::Result<ExitStatus>, oneshot::error::RecvError>,
    ) -> Option<Result<Bytes, ToolError>> {
        match status {
            Ok(Ok(status)) if status.success() => None,
            Ok(Ok(status)) => Some(Err(ToolError::Failed {
                code: status.code(),
                stderr: self.stderr.snapshot(),
            })),
            Ok(Err(e)) => Some(Err(e.into())),
            Err(_) => Some(Err(ToolError::Io(io::Error::other(
                "process supervisor stopped before reporting an exit status",
            )))),
        }
    }
}

impl Stream for ProcessStream {
    type Item = Result<Bytes, ToolError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        if let Some(chunk) = this.pending.take() {
            return Poll::Ready(Some(Ok(chunk)));
        }

        if this.state == State::Done {
            return Poll::Ready(None);
        }

        if this.deadline.as_mut().poll(cx).is_ready() {
            this.state = State::Done;
            this.kill(KillReason::Deadline);
            return Poll::Ready(Some(Err(ToolError::Timeout(this.timeout))));
        }

        if this.state == State::Reading {
            match ready!(this.stdout.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => return Poll::Ready(Some(Ok(chunk))),
                Some(Err(e)) => {
                    this.state = State::Done;
                    return Poll::Ready(Some(Err(e.into())));
                }
                None => {
                    this.state = State::Exiting;
                }
            }
        }

        let status = ready!(Pin::new(&mut this.exit).poll(cx));
        this.state = State::Done;

        Poll::Ready(this.finish_with(status))
    }
}

impl std::fmt::Debug for ProcessStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessStream")
            .field("pid", &self.pid)
            .field("state", &self.state)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Spawn the invocation and wait until it writes its first stdout chunk.
///
/// A process that exits before writing anything fails here, with its
/// exit code and stderr, so the caller can still try something else.
#[tracing::instrument(skip_all, fields(program = %invocation.program().display()))]
pub async fn spawn_stream(
    invocation: &Invocation,
    timeout: Duration,
) -> Result<ProcessStream, ToolError> {
    trace!(?invocation, "Spawning streaming process");

    let mut child = invocation
        .command()
        .spawn()
        .map_err(|e| ToolError::spawn(invocation.program_name(), e))?;

    let pid = child.id();
    debug!(?pid, "Process spawned");

    let stdout = child.stdout.take().ok_or(ToolError::MissingPipe("stdout"))?;
    let stderr = child.stderr.take().ok_or(ToolError::MissingPipe("stderr"))?;

    let tail = StderrTail::default();
    let stderr_task = tokio::spawn(drain_stderr(stderr, tail.clone()).instrument(Span::current()));

    let (kill_tx, kill_rx) = oneshot::channel();
    let (exit_tx, exit_rx) = oneshot::channel();
    tokio::spawn(supervise(child, stderr_task, kill_rx, exit_tx).instrument(Span::current()));

    let mut stream = ProcessStream {
        pid,
        stdout: ReaderStream::with_capacity(stdout, STDOUT_CHUNK_SIZE),
        pending: None,
        exit: exit_rx,
        kill: Some(kill_tx),
        deadline: Box::pin(tokio::time::sleep(timeout)),
        timeout,
        stderr: tail,
        state: State::Reading,
    };

    match stream.next().await {
        Some(Ok(chunk)) => {
            debug!(?pid, bytes = chunk.len(), "Got first chunk, stream committed");
            stream.pending = Some(chunk);
            Ok(stream)
        }
        Some(Err(e)) => Err(e),
        None => Err(ToolError::NoOutput {
            stderr: stream.stderr.snapshot(),
        }),
    }
}

/// Progress output is `\r` separated, so both `\r` and `\n` end a line.
fn stderr_lines(stderr: ChildStderr) -> FramedRead<ChildStderr, AnyDelimiterCodec> {
    FramedRead::new(
        stderr,
        AnyDelimiterCodec::new_with_max_length(b"\r\n".to_vec(), vec![], STDERR_LINE_LIMIT),
    )
}

async fn drain_stderr(stderr: ChildStderr, tail: StderrTail) {
    let mut lines = stderr_lines(stderr);
    // The framed reader ends once after a decode error, then resumes.
    let mut resume = false;

    loop {
        match lines.next().await {
            Some(Ok(line)) => {
                resume = false;
                let line = String::from_utf8_lossy(&line);
                let line = line.trim_end();
                if line.is_empty() {
                    continue;
                }
                debug!(target: "app_relay::tool::stderr", "{line}");
                tail.push_line(line);
            }
            Some(Err(AnyDelimiterCodecError::MaxChunkLengthExceeded)) => {
                trace!(limit = STDERR_LINE_LIMIT, "Dropping overlong stderr line");
                resume = true;
            }
            Some(Err(AnyDelimiterCodecError::Io(e))) => {
                debug!(err = ?e, "Failed reading stderr");
                break;
            }
            None if resume => resume = false,
            None => break,
        }
    }
}

async fn supervise(
    mut child: Child,
    stderr_task: JoinHandle<()>,
    mut kill_rx: oneshot::Receiver<KillReason>,
    exit_tx: oneshot::Sender<io::Result<ExitStatus>>,
) {
    let pid = child.id();

    tokio::select! {
        biased;

        status = child.wait() => {
            debug!(?pid, ?status, "Process exited");

            if tokio::time::timeout(STDERR_DRAIN_GRACE, stderr_task).await.is_err() {
                debug!(?pid, "Stderr still open after exit, not waiting for it");
            }

            let _ = exit_tx.send(status);
        }

        reason = &mut kill_rx => {
            match reason {
                Ok(KillReason::Deadline) => warn!(?pid, "Deadline passed, killing process"),
                Err(_) => info!(?pid, "Consumer went away, killing process"),
            }

            if let Err(e) = child.kill().await {
                warn!(?pid, err = ?e, "Failed to kill process");
            }
            stderr_task.abort();
        }
    }
}
