//! General menu and its calculation parameter sub-menus.

use super::text_capture;
use crate::{
    params::{value_kind, Params},
    prompts::Prompts,
    Error, Result,
};
use predefine::{log::LogWriter, Session};
use serde_json::Value;

/// Canonical resolution-of-identity modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RiMode {
    /// Approximate the Coulomb part only.
    Coulomb,
    /// Approximate the Coulomb and exchange parts.
    CoulombExchange,
}

impl RiMode {
    /// Command that opens the matching sub-menu.
    fn command(&self) -> &'static str {
        match self {
            Self::Coulomb => "ri",
            Self::CoulombExchange => "rijk",
        }
    }
}

/// Apply the `calculation` options from the general menu.
///
/// Options run in a fixed order, the generic escape hatch last, and
/// every sub-menu excursion ends back at the general menu before the
/// next option starts.
pub(crate) fn run<O: LogWriter>(
    session: &mut Session<O>,
    prompts: &Prompts,
    params: &Params<'_>,
) -> Result<()> {
    expect_menu(session, prompts)?;

    let Some(requested) = params.get("calculation") else {
        tracing::info!("using default calculation parameters");
        session.send_line("*")?;
        return Ok(());
    };
    let calc = requested
        .as_object()
        .ok_or_else(|| mismatch("calculation", "a mapping", requested))?;
    if calc.is_empty() {
        return Err(Error::EmptyGroup("calculation".to_string()));
    }

    if let Some(value) = calc.get("dft") {
        configure_dft(session, prompts, value)?;
    }
    if let Some(value) = calc.get("ri") {
        configure_ri(session, prompts, value)?;
    }
    if let Some(value) = calc.get("dispersion_correction") {
        let token = match value {
            Value::Bool(flag) => render_bool(*flag).to_string(),
            Value::String(name) => name.clone(),
            other => {
                return Err(mismatch(
                    "calculation.dispersion_correction",
                    "a string or a boolean",
                    other,
                ))
            }
        };
        run_path(session, prompts, &["dsp", &token])?;
    }
    if let Some(value) = calc.get("max_scf_iterations") {
        let limit = value.as_i64().ok_or_else(|| {
            mismatch("calculation.max_scf_iterations", "an integer", value)
        })?;
        run_path(session, prompts, &["scf", "iter", &limit.to_string()])?;
    }
    if let Some(value) = calc.get("x2c") {
        let flag = value
            .as_bool()
            .ok_or_else(|| mismatch("calculation.x2c", "a boolean", value))?;
        run_path(session, prompts, &["x2c", render_bool(flag)])?;
    }
    if let Some(value) = calc.get("generic") {
        run_generic(session, prompts, value)?;
    }

    session.send_line("*")?;
    Ok(())
}

/// Enter the dft sub-menu, switch it on and pin functional and grid.
fn configure_dft<O: LogWriter>(
    session: &mut Session<O>,
    prompts: &Prompts,
    value: &Value,
) -> Result<()> {
    let (functional, grid) = match value {
        Value::String(name) => (Some(name.as_str()), None),
        Value::Object(settings) => (
            settings.get("functional").and_then(Value::as_str),
            settings.get("grid").and_then(Value::as_str),
        ),
        other => {
            return Err(mismatch("calculation.dft", "a string or a mapping", other))
        }
    };

    session.send_line("dft")?;
    session.expect(&prompts.dft.status)?;
    session.send_line("on")?;
    let status = session.expect(&prompts.dft.status)?;
    if status.group(1).is_some() {
        return Err(Error::DftActivation);
    }

    if let Some(functional) = functional {
        session.send_line(&format!("func {functional}"))?;
        let outcome = session.expect_any(&[
            &prompts.dft.unsupported_functional,
            &prompts.dft.status,
        ])?;
        if outcome.index() == 0 {
            return Err(Error::UnsupportedFunctional(functional.to_string()));
        }
        let reported = text_capture(&outcome, 2)?;
        // the program silently falls back when it dislikes a functional
        if !reported.eq_ignore_ascii_case(functional) {
            return Err(Error::FunctionalMismatch {
                requested: functional.to_string(),
                reported: reported.to_string(),
            });
        }
        tracing::debug!(functional = reported, "functional accepted");
    }

    if let Some(grid) = grid {
        session.send_line(&format!("grid {grid}"))?;
        let outcome = session
            .expect_any(&[&prompts.dft.unsupported_grid, &prompts.dft.status])?;
        if outcome.index() == 0 {
            return Err(Error::UnsupportedGrid(grid.to_string()));
        }
        let reported = text_capture(&outcome, 3)?;
        if !reported.eq_ignore_ascii_case(grid) {
            return Err(Error::GridMismatch {
                requested: grid.to_string(),
                reported: reported.to_string(),
            });
        }
        tracing::debug!(grid = reported, "grid accepted");
    }

    session.send_line("")?;
    expect_menu(session, prompts)
}

/// Switch on the requested RI approximation.
fn configure_ri<O: LogWriter>(
    session: &mut Session<O>,
    prompts: &Prompts,
    value: &Value,
) -> Result<()> {
    let Some((mode, marij)) = ri_request(value)? else {
        return Ok(());
    };

    session.send_line(mode.command())?;
    session.expect(&prompts.ri.status)?;
    session.send_line("on")?;
    let status = session.expect(&prompts.ri.status)?;
    if status.group(1).is_some() {
        return Err(Error::RiActivation);
    }
    session.send_line("")?;
    expect_menu(session, prompts)?;

    if marij {
        session.send_line("marij")?;
        session.expect(&prompts.ri.marij)?;
        // accept the multipole defaults
        session.send_line("")?;
        expect_menu(session, prompts)?;
    }
    Ok(())
}

/// Parse the `ri` value into a mode and the multipole flag.
///
/// `false` means leave the approximation off, which is the program's
/// default anyway, so no menu interaction happens at all.
fn ri_request(value: &Value) -> Result<Option<(RiMode, bool)>> {
    match value {
        Value::Bool(false) => Ok(None),
        Value::Bool(true) => Ok(Some((RiMode::Coulomb, false))),
        Value::String(name) => Ok(Some((normalize_ri_type(name)?, false))),
        Value::Object(settings) => {
            let mode = match settings.get("type") {
                Some(Value::String(name)) => normalize_ri_type(name)?,
                Some(other) => {
                    return Err(mismatch("calculation.ri.type", "a string", other))
                }
                None => RiMode::Coulomb,
            };
            let marij = settings
                .get("multipole_acceleration")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            Ok(Some((mode, marij)))
        }
        other => Err(mismatch(
            "calculation.ri",
            "a string, a boolean or a mapping",
            other,
        )),
    }
}

/// Canonical mode for an `ri` type keyword, case-insensitive.
fn normalize_ri_type(name: &str) -> Result<RiMode> {
    match name.to_ascii_lowercase().as_str() {
        "ri" | "rij" | "j" | "coulomb" => Ok(RiMode::Coulomb),
        "rijk" | "jk" | "coulomb+exchange" => Ok(RiMode::CoulombExchange),
        _ => Err(Error::UnknownRiType(name.to_string())),
    }
}

/// Walk each instruction of the generic escape hatch.
fn run_generic<O: LogWriter>(
    session: &mut Session<O>,
    prompts: &Prompts,
    value: &Value,
) -> Result<()> {
    let instructions = value
        .as_array()
        .ok_or_else(|| mismatch("calculation.generic", "a list of strings", value))?;
    for instruction in instructions {
        let instruction = instruction.as_str().ok_or_else(|| {
            mismatch("calculation.generic", "a list of strings", instruction)
        })?;
        let segments: Vec<&str> = instruction.split('>').map(str::trim).collect();
        run_path(session, prompts, &segments)?;
    }
    Ok(())
}

/// Send a path of sub-menu commands and climb back to the general menu.
fn run_path<O: LogWriter>(
    session: &mut Session<O>,
    prompts: &Prompts,
    segments: &[&str],
) -> Result<()> {
    for segment in segments {
        session.send_line(segment)?;
    }
    // one empty line per sub-menu level entered
    for _ in 1..segments.len() {
        session.send_line("")?;
    }
    expect_menu(session, prompts)
}

/// Wait for the general menu to render in full.
fn expect_menu<O: LogWriter>(
    session: &mut Session<O>,
    prompts: &Prompts,
) -> Result<()> {
    session.expect(&prompts.general.headline)?;
    session.expect(&prompts.general.footer)?;
    Ok(())
}

fn render_bool(flag: bool) -> &'static str {
    if flag {
        "y"
    } else {
        "n"
    }
}

fn mismatch(path: &str, expected: &str, value: &Value) -> Error {
    Error::Schema {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: value_kind(value).to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn ri_type_synonyms() {
        for name in ["ri", "rij", "j", "coulomb", "RI", "Coulomb"] {
            assert_eq!(normalize_ri_type(name).unwrap(), RiMode::Coulomb);
        }
        for name in ["rijk", "jk", "coulomb+exchange", "RIJK", "JK"] {
            assert_eq!(
                normalize_ri_type(name).unwrap(),
                RiMode::CoulombExchange
            );
        }
    }

    #[test]
    fn unknown_ri_type_is_rejected() {
        match normalize_ri_type("resolution") {
            Err(Error::UnknownRiType(name)) => assert_eq!(name, "resolution"),
            r => panic!("should reject the keyword {r:?}"),
        }
    }

    #[test]
    fn ri_requests() {
        assert_eq!(ri_request(&json!(false)).unwrap(), None);
        assert_eq!(
            ri_request(&json!(true)).unwrap(),
            Some((RiMode::Coulomb, false))
        );
        assert_eq!(
            ri_request(&json!("jk")).unwrap(),
            Some((RiMode::CoulombExchange, false))
        );
        assert_eq!(
            ri_request(&json!({ "multipole_acceleration": true })).unwrap(),
            Some((RiMode::Coulomb, true))
        );
        assert_eq!(
            ri_request(&json!({ "type": "rijk" })).unwrap(),
            Some((RiMode::CoulombExchange, false))
        );
    }

    #[test]
    fn booleans_become_answer_tokens() {
        assert_eq!(render_bool(true), "y");
        assert_eq!(render_bool(false), "n");
    }
}
