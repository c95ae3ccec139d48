//! Control-file import and title questions.

use crate::{params::Params, prompts::Prompts, Result};
use predefine::{log::LogWriter, Session};

/// Decline the control-file import and answer the title prompt.
pub(crate) fn run<O: LogWriter>(
    session: &mut Session<O>,
    prompts: &Prompts,
    params: &Params<'_>,
) -> Result<()> {
    session.expect(&prompts.setup.import)?;
    session.send_line("")?;

    session.expect(&prompts.setup.title)?;
    session.send_line(params.str_or("title", ""))?;
    Ok(())
}
