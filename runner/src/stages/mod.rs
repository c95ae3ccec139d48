//! One handler per menu of the define session.
//!
//! A handler takes over at the entry prompt of its menu and must leave
//! the child at the entry prompt of the next one before returning.
//! There is no resynchronization once a handler bails out mid-menu;
//! the driver tears the session down on the first error.

pub(crate) mod basis;
pub(crate) mod calc;
pub(crate) mod geometry;
pub(crate) mod occupation;
pub(crate) mod setup;

use crate::{Error, Result};
use predefine::MatchResult;

/// Numeric capture from a menu headline.
///
/// The patterns only capture digit runs where this is used, so a
/// failure means the menu output changed shape underneath us.
pub(crate) fn numeric_capture(
    result: &MatchResult,
    group: usize,
) -> Result<usize> {
    match result.group(group) {
        Some(text) => text.parse().map_err(|_| {
            Error::UnexpectedOutput(format!(
                "capture group {} is not a count: {:?}",
                group, text
            ))
        }),
        None => Err(Error::UnexpectedOutput(format!(
            "capture group {} is missing from the menu headline",
            group
        ))),
    }
}

/// Text capture that the pattern guarantees to participate.
pub(crate) fn text_capture(result: &MatchResult, group: usize) -> Result<&str> {
    result.group(group).ok_or_else(|| {
        Error::UnexpectedOutput(format!(
            "capture group {} is missing from the menu output",
            group
        ))
    })
}
