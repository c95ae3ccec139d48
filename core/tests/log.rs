use std::{
    io::{self, prelude::*, Cursor},
    process::Command,
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

use predefine::{
    log::{PrefixLogWriter, StandardLogWriter},
    session::spawn_with_options,
    Pattern,
};

#[test]
fn log() {
    let writer = StubWriter::default();

    let mut session = spawn_with_options(
        Command::new("cat"),
        Some(PrefixLogWriter::new(writer.clone())),
        None,
    )
    .unwrap();

    session.send_line("Hello World").unwrap();

    // give some time to cat
    // since sometimes we doesn't keep up to read whole string
    thread::sleep(Duration::from_millis(300));

    session.expect(&Pattern::new("Hello").unwrap()).unwrap();

    let bytes = writer.inner.lock().unwrap();
    let text = String::from_utf8_lossy(bytes.get_ref());
    assert!(
        text.contains("read") && text.contains("write"),
        "unexpected output {text:?}"
    );
}

#[test]
fn log_prefix_format() {
    let writer = StubWriter::default();

    let mut session = spawn_with_options(
        Command::new("cat"),
        Some(PrefixLogWriter::new(writer.clone())),
        None,
    )
    .unwrap();

    session.send_line("Hello World").unwrap();

    thread::sleep(Duration::from_millis(300));

    session.expect(&Pattern::new("World").unwrap()).unwrap();

    let bytes = writer.inner.lock().unwrap();
    let text = String::from_utf8_lossy(bytes.get_ref());
    assert!(
        text.starts_with("write: \"Hello World\\n\""),
        "unexpected output {text:?}"
    );
    assert!(text.contains("read: \"Hello World"), "unexpected output {text:?}");
}

#[test]
fn log_transcript_passthrough() {
    let writer = StubWriter::default();

    let mut command = Command::new("echo");
    command.arg("Hello World");
    let mut session = spawn_with_options(
        command,
        Some(StandardLogWriter::new(writer.clone())),
        None,
    )
    .unwrap();

    session.expect(&Pattern::new("Hello World").unwrap()).unwrap();
    session.close().unwrap();

    let bytes = writer.inner.lock().unwrap();
    let text = String::from_utf8_lossy(bytes.get_ref());
    assert!(text.contains("Hello World"), "unexpected output {text:?}");
}

#[test]
fn log_flushed_when_session_drops() {
    let writer = StubWriter::default();

    {
        let mut session = spawn_with_options(
            Command::new("cat"),
            Some(PrefixLogWriter::new(writer.clone())),
            None,
        )
        .unwrap();
        session.send_line("left behind").unwrap();
    }

    let bytes = writer.inner.lock().unwrap();
    let text = String::from_utf8_lossy(bytes.get_ref());
    assert!(text.contains("left behind"), "unexpected output {text:?}");
}

#[derive(Debug, Clone, Default)]
struct StubWriter {
    inner: Arc<Mutex<Cursor<Vec<u8>>>>,
}

impl Write for StubWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.lock().unwrap().flush()
    }
}
