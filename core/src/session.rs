//! Pseudo-terminal session.

use std::{
    io::{self, Read, Write},
    process::Command,
    thread,
    time::{Duration, Instant},
};

use crate::{
    error::Error,
    log::{LogWriter, NoopLogWriter},
    pattern::{MatchResult, Pattern, PatternSpan},
    process::{PtyStream, UnixProcess},
};

/// Bytes of unconsumed output carried by wait failures.
const ERROR_TAIL_BYTES: usize = 256;

/// Pause between polls of the output stream.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Expect timeout used when none is given.
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Session without a transcript observer.
pub type DefaultSession = Session<NoopLogWriter>;

/// Spawn a session with logger and timeout options.
pub fn spawn_with_options<O: LogWriter>(
    command: Command,
    logger: Option<O>,
    timeout: Option<Duration>,
) -> Result<Session<O>, Error> {
    Session::spawn(command, logger, timeout)
}

/// Session represents a spawned process and its streams.
///
/// Communication happens in waits and sends: a wait scans the output
/// stream for one of a set of candidate patterns, a send writes a
/// line of input. Waits are bounded by the session's expect timeout.
#[derive(Debug)]
pub struct Session<O: LogWriter = NoopLogWriter> {
    proc: UnixProcess,
    stream: TryStream<O>,
    expect_timeout: Duration,
}

impl<O: LogWriter> Session<O> {
    /// Spawn a command on a fresh pseudo-terminal.
    pub fn spawn(
        command: Command,
        logger: Option<O>,
        timeout: Option<Duration>,
    ) -> Result<Self, Error> {
        let mut proc = UnixProcess::spawn(command)?;
        let stream = proc.open_stream()?;
        Ok(Self {
            proc,
            stream: TryStream::new(stream, logger),
            expect_timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }

    /// Set the session's expect timeout.
    pub fn set_expect_timeout(&mut self, timeout: Duration) {
        self.expect_timeout = timeout;
    }

    /// Verify whether the child is still alive.
    pub fn is_alive(&mut self) -> Result<bool, Error> {
        self.proc.is_alive()
    }

    /// Wait until the output matches a pattern.
    ///
    /// The match and everything before it are consumed from the
    /// stream; the preceding output is available through
    /// [`MatchResult::before`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use predefine::{spawn, Pattern};
    /// use std::process::Command;
    ///
    /// # fn main() -> Result<(), predefine::Error> {
    /// let mut p = spawn(Command::new("cat"))?;
    /// p.send_line("ready set go")?;
    /// let m = p.expect(&Pattern::new(r"ready (\w+)")?)?;
    /// assert_eq!(m.group(1), Some("set"));
    /// # Ok(()) }
    /// ```
    pub fn expect(&mut self, pattern: &Pattern) -> Result<MatchResult, Error> {
        self.expect_any(&[pattern])
    }

    /// Wait until the output matches one of the candidate patterns.
    ///
    /// On every poll the candidates are scanned in the order given
    /// over all unconsumed output; the first satisfied candidate wins
    /// even when a later candidate also has a match in the buffer.
    /// [`MatchResult::index`] identifies the winner.
    ///
    /// Reaching the timeout or the end of the output stream before
    /// any candidate is satisfied is an error which carries the
    /// candidate list and the tail of the unconsumed output.
    pub fn expect_any(
        &mut self,
        candidates: &[&Pattern],
    ) -> Result<MatchResult, Error> {
        let start = Instant::now();
        loop {
            let eof = self.stream.read_available()?;

            let mut found: Option<(usize, PatternSpan, String)> = None;
            let data = self.stream.get_available();
            for (index, pattern) in candidates.iter().enumerate() {
                if let Some(span) = pattern.find(data) {
                    let before =
                        String::from_utf8_lossy(&data[..span.start])
                            .into_owned();
                    found = Some((index, span, before));
                    break;
                }
            }

            if let Some((index, span, before)) = found {
                let PatternSpan { end, groups, .. } = span;
                self.stream.consume_available(end);
                return Ok(MatchResult::new(index, groups, before));
            }

            if eof {
                return Err(Error::Eof {
                    patterns: sources(candidates),
                    tail: self.stream.tail(ERROR_TAIL_BYTES),
                });
            }

            if start.elapsed() > self.expect_timeout {
                return Err(Error::ExpectTimeout {
                    timeout: self.expect_timeout,
                    patterns: sources(candidates),
                    tail: self.stream.tail(ERROR_TAIL_BYTES),
                });
            }

            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Send text to the child's input.
    ///
    /// Does not wait for a response; a later wait observes whatever
    /// the child produces.
    pub fn send(&mut self, text: impl AsRef<[u8]>) -> Result<(), Error> {
        self.write_guarded(text.as_ref())
    }

    /// Send a line to the child's input.
    ///
    /// Appends the line terminator to the text. An empty string sends
    /// a bare return.
    pub fn send_line(&mut self, text: &str) -> Result<(), Error> {
        const LINE_ENDING: &[u8] = b"\n";

        let mut buf = Vec::with_capacity(text.len() + LINE_ENDING.len());
        buf.extend_from_slice(text.as_bytes());
        buf.extend_from_slice(LINE_ENDING);
        self.write_guarded(&buf)
    }

    fn write_guarded(&mut self, buf: &[u8]) -> Result<(), Error> {
        if !self.proc.is_alive()? {
            return Err(Error::BrokenSession);
        }
        self.stream.write_all_logged(buf).map_err(|err| {
            if is_disconnect(&err) {
                Error::BrokenSession
            } else {
                Error::Io(err)
            }
        })
    }

    /// Let the child finish on its own and reap it.
    ///
    /// Drains the output stream until the child closes it, bounded by
    /// the expect timeout. The transcript observer is flushed in every
    /// case; a child that will not exit is terminated forcibly and
    /// reported as a timeout.
    pub fn close(mut self) -> Result<(), Error> {
        let deadline = Instant::now() + self.expect_timeout;
        loop {
            match self.stream.read_available() {
                Ok(true) => break,
                Ok(false) if Instant::now() > deadline => {
                    return Err(Error::ExpectTimeout {
                        timeout: self.expect_timeout,
                        patterns: vec!["<end of output>".to_string()],
                        tail: self.stream.tail(ERROR_TAIL_BYTES),
                    });
                }
                Ok(false) => thread::sleep(POLL_INTERVAL),
                Err(_) => break,
            }
        }
        // reaps the child when it already exited
        let _ = self.proc.is_alive();
        Ok(())
    }
}

impl<O: LogWriter> Drop for Session<O> {
    fn drop(&mut self) {
        if let Ok(true) = self.proc.is_alive() {
            let _ = self.proc.exit(true);
        }
        self.stream.flush_logger();
    }
}

fn sources(candidates: &[&Pattern]) -> Vec<String> {
    candidates.iter().map(|p| p.as_str().to_string()).collect()
}

/// A closed terminal reports EIO on Linux and EPIPE elsewhere.
fn is_disconnect(err: &io::Error) -> bool {
    use nix::errno::Errno;
    matches!(
        err.raw_os_error(),
        Some(code) if code == Errno::EIO as i32 || code == Errno::EPIPE as i32
    )
}

#[derive(Debug)]
struct TryStream<O: LogWriter> {
    stream: PtyStream,
    buffer: Vec<u8>,
    logger: Option<O>,
}

impl<O: LogWriter> TryStream<O> {
    fn new(stream: PtyStream, logger: Option<O>) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            logger,
        }
    }

    /// Pull everything currently readable into the buffer.
    ///
    /// Returns `true` once the stream reached its end.
    fn read_available(&mut self) -> io::Result<bool> {
        self.stream.set_non_blocking()?;

        let mut buf = [0; 512];
        let result = loop {
            match self.stream.read(&mut buf) {
                Ok(0) => break Ok(true),
                Ok(n) => {
                    if let Some(logger) = self.logger.as_mut() {
                        logger.log_read(&buf[..n]);
                    }
                    self.buffer.extend(&buf[..n]);
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    break Ok(false)
                }
                Err(err) if is_disconnect(&err) => break Ok(true),
                Err(err) => break Err(err),
            }
        };

        // The descriptor is shared, so undo the flag before others
        // block on it.
        self.stream.set_blocking()?;
        result
    }

    fn get_available(&self) -> &[u8] {
        &self.buffer
    }

    fn consume_available(&mut self, n: usize) {
        let _ = self.buffer.drain(..n);
    }

    /// Last `n` bytes of unconsumed output.
    fn tail(&self, n: usize) -> String {
        let start = self.buffer.len().saturating_sub(n);
        String::from_utf8_lossy(&self.buffer[start..]).into_owned()
    }

    fn write_all_logged(&mut self, buf: &[u8]) -> io::Result<()> {
        self.stream.write_all(buf)?;
        self.stream.flush()?;
        if let Some(logger) = self.logger.as_mut() {
            logger.log_write(buf);
        }
        Ok(())
    }

    fn flush_logger(&mut self) {
        if let Some(logger) = self.logger.as_mut() {
            logger.flush();
        }
    }
}
