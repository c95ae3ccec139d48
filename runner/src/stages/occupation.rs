//! Occupation number and molecular orbital menu.

use crate::{params::Params, prompts::Prompts, Result};
use predefine::{log::LogWriter, Session};

/// Questions the guess loop can run into, in candidate order.
#[derive(Debug, Clone, Copy)]
enum Question {
    Defaults,
    Charge,
    Accept,
    NaturalOrbitals,
    NextMenu,
}

impl Question {
    fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Defaults,
            1 => Self::Charge,
            2 => Self::Accept,
            3 => Self::NaturalOrbitals,
            _ => Self::NextMenu,
        }
    }
}

/// Request an extended Hückel guess and answer its question loop.
///
/// The questions come in no fixed order and may repeat, so the loop
/// keeps answering until the general menu's headline shows up. In
/// particular the natural orbital question does not end the loop; the
/// guess may still ask about occupations afterwards.
pub(crate) fn run<O: LogWriter>(
    session: &mut Session<O>,
    prompts: &Prompts,
    params: &Params<'_>,
) -> Result<()> {
    let menu = &prompts.occupation;

    session.expect(&menu.headline)?;
    session.expect(&menu.help)?;
    session.send_line("eht")?;

    loop {
        let outcome = session.expect_any(&[
            &menu.defaults,
            &menu.charge,
            &menu.accept,
            &menu.natural_orbitals,
            &prompts.general.headline,
        ])?;
        match Question::from_index(outcome.index()) {
            Question::Defaults | Question::Accept => session.send_line("y")?,
            Question::Charge => {
                let charge = params.int_or("charge", 0);
                tracing::debug!(charge = charge, "molecular charge");
                session.send_line(&charge.to_string())?;
            }
            Question::NaturalOrbitals => {
                let write = params.bool_or("write_natural_orbitals", false);
                session.send_line(if write { "y" } else { "n" })?;
            }
            Question::NextMenu => break,
        }
    }

    // redraw so the next stage sees the general menu in full
    session.send_line("")?;
    Ok(())
}
