#![warn(missing_docs)]
#![allow(clippy::uninlined_format_args)]

//! Control a pseudo-terminal similar to `expect(1)`.
//!
//! Spawn an interactive program on a pseudo-terminal, wait for
//! patterns in its output and answer them with scripted input.
//!
//! Waits accept several candidate patterns at once and report which
//! one was satisfied, together with its capture groups. A wait that
//! sees neither a match nor end of output within the timeout fails
//! with the unmatched candidates and the tail of the pending output.
//!
//! ## Examples
//!
//! ```no_run
//! use predefine::{spawn, Pattern};
//! use std::process::Command;
//!
//! # fn main() -> Result<(), predefine::Error> {
//! let mut p = spawn(Command::new("ftp"))?;
//! p.expect(&Pattern::new(r"Name \(.*\):")?)?;
//! p.send_line("anonymous")?;
//! p.expect(&Pattern::new("Password")?)?;
//! p.send_line("test")?;
//! p.expect(&Pattern::new("ftp>")?)?;
//! p.send_line("exit")?;
//! p.close()?;
//! # Ok(()) }
//! ```
//!
//! ### Observing the transcript
//!
//! ```no_run
//! use predefine::{log::StandardLogWriter, session::spawn_with_options};
//! use std::{io::stdout, process::Command};
//!
//! # fn main() -> Result<(), predefine::Error> {
//! let logger = StandardLogWriter::new(stdout());
//! let mut p = spawn_with_options(Command::new("sh"), Some(logger), None)?;
//! p.send_line("echo Hello World")?;
//! # Ok(()) }
//! ```

mod error;
mod pattern;
mod process;

pub mod log;
pub mod session;

pub use error::Error;
pub use pattern::{MatchResult, Pattern};
pub use session::{spawn_with_options, DefaultSession, Session};

use std::process::Command;

/// Spawn a session without a transcript observer.
///
/// Uses the default expect timeout. For logging or a custom timeout
/// use [`spawn_with_options`].
pub fn spawn(command: Command) -> Result<DefaultSession, Error> {
    Session::spawn(command, None, None)
}
