//! Types for observing the raw session transcript.
use std::io::Write;

/// Trait for types that log reads and writes to a child program.
///
/// A writer is handed every chunk read from and written to the child
/// program, in arrival order. It observes the transcript only and has
/// no effect on the session's control flow.
pub trait LogWriter {
    /// Log a chunk read from the child program.
    fn log_read(&mut self, data: &[u8]);
    /// Log a chunk written to the child program.
    fn log_write(&mut self, data: &[u8]);
    /// Flush buffered transcript output.
    fn flush(&mut self) {}
}

/// Noop log writer does not log anything.
#[derive(Debug, Default)]
pub struct NoopLogWriter;

impl LogWriter for NoopLogWriter {
    fn log_read(&mut self, _data: &[u8]) {}
    fn log_write(&mut self, _data: &[u8]) {}
}

/// Prefix log writer prefixes reads and writes.
///
/// If the data can be converted to UTF-8 it is printed
/// as a string otherwise a debug representation of the
/// bytes are printed.
///
/// Be aware that if you are writing data that would be masked,
/// for example, entering a password at an interactive prompt
/// the plain text value will be logged.
#[derive(Debug)]
pub struct PrefixLogWriter<W: Write> {
    out: W,
}

impl<W: Write> PrefixLogWriter<W> {
    /// Create a prefix log writer over an output sink.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn log(&mut self, target: &str, data: &[u8]) {
        let _ = match std::str::from_utf8(data) {
            Ok(data) => writeln!(self.out, "{}: {:?}", target, data),
            Err(..) => writeln!(self.out, "{}:(bytes): {:?}", target, data),
        };
    }
}

impl<W: Write> LogWriter for PrefixLogWriter<W> {
    fn log_read(&mut self, data: &[u8]) {
        self.log("read", data);
    }

    fn log_write(&mut self, data: &[u8]) {
        self.log("write", data);
    }

    fn flush(&mut self) {
        let _ = self.out.flush();
    }
}

/// Standard log writer does not format read and write logs.
///
/// Be aware that if you are writing data that would be masked,
/// for example, entering a password at an interactive prompt
/// the plain text value will be logged.
#[derive(Debug)]
pub struct StandardLogWriter<W: Write> {
    out: W,
}

impl<W: Write> StandardLogWriter<W> {
    /// Create a standard log writer over an output sink.
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> LogWriter for StandardLogWriter<W> {
    fn log_read(&mut self, data: &[u8]) {
        let _ = self.out.write_all(data);
    }

    fn log_write(&mut self, data: &[u8]) {
        let _ = self.out.write_all(data);
    }

    fn flush(&mut self) {
        let _ = self.out.flush();
    }
}
