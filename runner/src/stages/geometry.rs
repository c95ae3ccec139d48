//! Molecular geometry menu.

use super::{numeric_capture, text_capture};
use crate::{params::Params, prompts::Prompts, Error, Result};
use predefine::{log::LogWriter, Session};

/// What the geometry menu reported back.
#[derive(Debug, Default)]
pub(crate) struct GeometryReport {
    /// Atoms in the loaded geometry.
    pub(crate) atoms: usize,
    /// Point group found by symmetry detection, when requested.
    pub(crate) symmetry: Option<String>,
}

/// Load the geometry file and configure coordinates and symmetry.
///
/// `geometry` is the resolved path, relative to the child's working
/// directory.
pub(crate) fn run<O: LogWriter>(
    session: &mut Session<O>,
    prompts: &Prompts,
    params: &Params<'_>,
    geometry: &str,
) -> Result<GeometryReport> {
    let menu = &prompts.geometry;

    session.expect(&menu.headline)?;
    session.expect(&menu.command)?;
    session.send_line(&format!("a {}", geometry))?;

    let headline = session.expect(&menu.headline)?;
    let atoms = numeric_capture(&headline, 1)?;
    if atoms == 0 {
        return Err(Error::NoAtoms(geometry.to_string()));
    }
    session.expect(&menu.command)?;

    let mut report = GeometryReport {
        atoms,
        symmetry: None,
    };

    let internal_coords = params.bool_or("use_internal_coords", true);
    if internal_coords {
        session.send_line("ired")?;
        session.expect(&menu.command)?;
    }

    if params.bool_or("detect_symmetry", true) {
        session.send_line("desy")?;
        let headline = session.expect(&menu.headline)?;
        let symmetry = text_capture(&headline, 2)?.to_string();
        tracing::info!(symmetry = %symmetry, "detected symmetry");
        report.symmetry = Some(symmetry);
        session.expect(&menu.command)?;
    }

    session.send_line("*")?;

    if !internal_coords {
        // leaving without internal coordinates is double-checked
        session.expect(&menu.internal_coords)?;
        session.send_line("no")?;
    }

    Ok(report)
}
