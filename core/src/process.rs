//! Unix process running on a pseudo-terminal.

use crate::error::Error;
use ptyprocess::{stream::Stream, PtyProcess};
use std::{
    io::{self, Read, Write},
    os::unix::prelude::{AsRawFd, RawFd},
    process::Command,
};

/// A child program attached to the slave end of a pseudo-terminal.
#[derive(Debug)]
pub struct UnixProcess {
    proc: PtyProcess,
}

impl UnixProcess {
    /// Spawn a command on a fresh pseudo-terminal.
    pub(crate) fn spawn(command: Command) -> Result<Self, Error> {
        let program = command.get_program().to_string_lossy().into_owned();
        let proc = PtyProcess::spawn(command).map_err(|err| Error::Spawn {
            program,
            source: to_io_error(err),
        })?;
        Ok(Self { proc })
    }

    /// Open an IO stream over the master end of the terminal.
    pub(crate) fn open_stream(&mut self) -> Result<PtyStream, Error> {
        let stream = self.proc.get_pty_stream().map_err(to_error)?;
        Ok(PtyStream::new(stream))
    }

    /// Verify whether the child is still alive.
    pub(crate) fn is_alive(&mut self) -> Result<bool, Error> {
        self.proc.is_alive().map_err(to_error)
    }

    /// Terminate the child, forcibly when asked to.
    pub(crate) fn exit(&mut self, force: bool) -> Result<bool, Error> {
        self.proc.exit(force).map_err(to_error)
    }
}

fn to_io_error(err: impl std::error::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

fn to_error(err: impl std::error::Error) -> Error {
    Error::Io(to_io_error(err))
}

/// IO stream over the master end of a pseudo-terminal.
#[derive(Debug)]
pub struct PtyStream {
    handle: Stream,
}

impl PtyStream {
    fn new(stream: Stream) -> Self {
        Self { handle: stream }
    }

    pub(crate) fn set_non_blocking(&mut self) -> io::Result<()> {
        make_non_blocking(self.handle.as_raw_fd(), true)
    }

    pub(crate) fn set_blocking(&mut self) -> io::Result<()> {
        make_non_blocking(self.handle.as_raw_fd(), false)
    }
}

impl Write for PtyStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.handle.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.handle.flush()
    }
}

impl Read for PtyStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.handle.read(buf)
    }
}

impl AsRawFd for PtyStream {
    fn as_raw_fd(&self) -> RawFd {
        self.handle.as_raw_fd()
    }
}

fn make_non_blocking(fd: RawFd, on: bool) -> io::Result<()> {
    use nix::fcntl::{fcntl, FcntlArg, OFlag};

    let opt = fcntl(fd, FcntlArg::F_GETFL).map_err(to_io_error)?;
    let mut opt = OFlag::from_bits_truncate(opt);
    opt.set(OFlag::O_NONBLOCK, on);
    fcntl(fd, FcntlArg::F_SETFL(opt)).map_err(to_io_error)?;
    Ok(())
}
