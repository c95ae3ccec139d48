//! The staged walk through a whole define session.

use crate::{
    convert::resolve_geometry,
    params::Params,
    prompts::Prompts,
    schema::{parameter_schema, validate},
    stages, Error, Result,
};
use predefine::log::{LogWriter, NoopLogWriter, StandardLogWriter};
use predefine::Session;
use serde_json::Value;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tracing::{span, Level};

/// Stages of a define session, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Control-file import and title questions.
    Setup,
    /// Molecular geometry menu.
    Geometry,
    /// Atomic attribute menu.
    BasisSet,
    /// Occupation number and molecular orbital menu.
    Occupation,
    /// General menu.
    CalculationParameters,
    /// The session terminated cleanly.
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Setup => "setup",
            Self::Geometry => "geometry",
            Self::BasisSet => "basis-set",
            Self::Occupation => "occupation",
            Self::CalculationParameters => "calculation-parameters",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Options governing a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Command line of the program to drive.
    pub program: String,
    /// Command line of the geometry converter.
    pub converter: String,
    /// Timeout applied to each individual wait.
    pub timeout: Duration,
    /// Working directory for the child and the converter.
    pub dir: PathBuf,
    /// Mirror the session transcript to standard output.
    pub echo: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            program: "define".to_string(),
            converter: "x2t".to_string(),
            timeout: Duration::from_secs(10),
            dir: PathBuf::from("."),
            echo: false,
        }
    }
}

/// What a completed run reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Atoms in the loaded geometry.
    pub atoms: usize,
    /// Point group found by symmetry detection, when requested.
    pub detected_symmetry: Option<String>,
}

/// Drives one child process through every stage in protocol order.
///
/// A driver owns the terminal session exclusively. Dropping it mid-run
/// tears the child down; only [`Driver::close`] ends the session
/// gracefully, after the termination command was sent.
#[derive(Debug)]
pub struct Driver<O: LogWriter = NoopLogWriter> {
    session: Session<O>,
    prompts: Prompts,
    stage: Stage,
}

impl<O: LogWriter> Driver<O> {
    /// Spawn the program and compile the prompt library.
    pub fn open(options: &RunOptions, logger: Option<O>) -> Result<Self> {
        let words = comma::parse_command(&options.program)
            .ok_or_else(|| Error::BadArguments(options.program.clone()))?;
        let (program, arguments) = words
            .split_first()
            .ok_or_else(|| Error::BadArguments(options.program.clone()))?;
        let mut command = Command::new(program);
        command.args(arguments).current_dir(&options.dir);
        let session = Session::spawn(command, logger, Some(options.timeout))?;
        Ok(Self {
            session,
            prompts: Prompts::new()?,
            stage: Stage::Setup,
        })
    }

    /// The stage the driver is currently in.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Walk every stage with the given parameters.
    ///
    /// `geometry` is the resolved coordinate file path, relative to the
    /// child's working directory. On error the session is left wherever
    /// the failing stage stopped; there is no resynchronization, so the
    /// driver should be dropped. [`Driver::stage`] names the stage that
    /// was active when the error surfaced.
    pub fn drive(
        &mut self,
        params: &Params<'_>,
        geometry: &str,
    ) -> Result<RunSummary> {
        self.enter(Stage::Setup).in_scope(|| {
            stages::setup::run(&mut self.session, &self.prompts, params)
        })?;

        let report = self.enter(Stage::Geometry).in_scope(|| {
            stages::geometry::run(
                &mut self.session,
                &self.prompts,
                params,
                geometry,
            )
        })?;

        self.enter(Stage::BasisSet).in_scope(|| {
            stages::basis::run(&mut self.session, &self.prompts, params)
        })?;

        self.enter(Stage::Occupation).in_scope(|| {
            stages::occupation::run(&mut self.session, &self.prompts, params)
        })?;

        self.enter(Stage::CalculationParameters).in_scope(|| {
            stages::calc::run(&mut self.session, &self.prompts, params)
        })?;

        self.stage = Stage::Done;
        Ok(RunSummary {
            atoms: report.atoms,
            detected_symmetry: report.symmetry,
        })
    }

    /// Wait for the program to exit after the termination command.
    pub fn close(self) -> Result<()> {
        self.session.close()?;
        Ok(())
    }

    /// Record the stage and open a span for it, so events logged by the
    /// stage handler carry the stage name.
    fn enter(&mut self, stage: Stage) -> tracing::Span {
        self.stage = stage;
        let span = span!(Level::DEBUG, "stage", name = %stage);
        span.in_scope(|| tracing::debug!("enter"));
        span
    }
}

/// Validate a parameter tree and run a full session with it.
///
/// Geometry conversion happens before the child is spawned, so a
/// failing converter never leaves a stray process behind.
pub fn run(tree: &Value, options: &RunOptions) -> Result<RunSummary> {
    validate(tree, &parameter_schema())?;
    let params = Params::new(tree)?;
    let geometry = params.geometry()?;
    let geometry = resolve_geometry(geometry, &options.dir, &options.converter)?;

    if options.echo {
        let logger = StandardLogWriter::new(io::stdout());
        drive_session(options, Some(logger), &params, &geometry)
    } else {
        drive_session(options, None::<NoopLogWriter>, &params, &geometry)
    }
}

fn drive_session<O: LogWriter>(
    options: &RunOptions,
    logger: Option<O>,
    params: &Params<'_>,
    geometry: &str,
) -> Result<RunSummary> {
    let mut driver = Driver::open(options, logger)?;
    let summary = driver.drive(params, geometry).map_err(|e| {
        tracing::error!(stage = %driver.stage(), "session failed");
        e
    })?;
    driver.close()?;
    tracing::info!(atoms = summary.atoms, "session complete");
    Ok(summary)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn stage_names() {
        assert_eq!(Stage::Setup.to_string(), "setup");
        assert_eq!(Stage::BasisSet.to_string(), "basis-set");
        assert_eq!(
            Stage::CalculationParameters.to_string(),
            "calculation-parameters"
        );
    }

    #[test]
    fn default_options() {
        let options = RunOptions::default();
        assert_eq!(options.program, "define");
        assert_eq!(options.converter, "x2t");
        assert_eq!(options.timeout, Duration::from_secs(10));
        assert!(!options.echo);
    }

    #[test]
    fn open_rejects_an_empty_command_line() {
        let options = RunOptions {
            program: String::new(),
            ..RunOptions::default()
        };
        match Driver::<NoopLogWriter>::open(&options, None) {
            Err(Error::BadArguments(line)) => assert_eq!(line, ""),
            r => panic!("should reject the command line {r:?}"),
        }
    }
}
