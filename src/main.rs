use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use predefine_runner::{parameter_schema, run, validate, Params, RunOptions};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_NAME: &str = "predefine.log";

fn main() -> Result<()> {
    if let Err(e) = start() {
        tracing::error!(error = ?e);
        std::process::exit(1);
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Predefine {
    /// Path to the parameter file.
    #[clap(short, long, default_value = "calculation_parameter.json")]
    parameter: PathBuf,

    /// Command line that starts the define program.
    #[clap(long, default_value = "define")]
    program: String,

    /// Command line of the xyz-to-coord geometry converter.
    #[clap(long, default_value = "x2t")]
    converter: String,

    /// Maximum seconds to wait for any single prompt.
    #[clap(short, long, default_value = "10")]
    timeout: u64,

    /// Working directory for the session; defaults to the directory
    /// containing the parameter file.
    #[clap(short = 'C', long)]
    chdir: Option<PathBuf>,

    /// Make the session directory the process's own working directory.
    #[clap(long)]
    enter: bool,

    /// Mirror the whole terminal transcript to standard output.
    #[clap(short, long)]
    debug: bool,

    /// Check the parameter file and exit without running anything.
    #[clap(long)]
    dry_run: bool,

    /// Directory to write logs.
    #[clap(short, long)]
    logs: Option<PathBuf>,
}

fn start() -> Result<()> {
    let args = Predefine::parse();
    init_subscriber(args.logs.clone(), None)?;

    let tree = load_parameters(&args.parameter)?;
    if args.dry_run {
        validate(&tree, &parameter_schema())?;
        Params::new(&tree)?.geometry()?;
        println!("{} {}", "valid".green().bold(), args.parameter.display());
        return Ok(());
    }

    let mut options = run_options(&args);
    if args.enter {
        std::env::set_current_dir(&options.dir).with_context(|| {
            format!("cannot enter {}", options.dir.display())
        })?;
        options.dir = PathBuf::from(".");
    }
    let summary = run(&tree, &options)?;

    let symmetry = summary
        .detected_symmetry
        .unwrap_or_else(|| "unchanged".to_string());
    println!(
        "{} {} atoms, symmetry {}",
        "prepared".green().bold(),
        summary.atoms,
        symmetry,
    );
    Ok(())
}

/// Map the command line onto run options.
///
/// The session runs where the parameter file lives unless `--chdir`
/// points somewhere else.
fn run_options(args: &Predefine) -> RunOptions {
    let dir = args
        .chdir
        .clone()
        .unwrap_or_else(|| parameter_dir(&args.parameter));
    RunOptions {
        program: args.program.clone(),
        converter: args.converter.clone(),
        timeout: Duration::from_secs(args.timeout),
        dir,
        echo: args.debug,
    }
}

fn parameter_dir(parameter: &Path) -> PathBuf {
    match parameter.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn load_parameters(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| {
        format!("cannot read parameter file {}", path.display())
    })?;
    let tree = serde_json::from_str(&text).with_context(|| {
        format!("parameter file {} is not valid JSON", path.display())
    })?;
    Ok(tree)
}

pub fn init_subscriber(
    logs_dir: Option<PathBuf>,
    default_log_level: Option<String>,
) -> Result<()> {
    let default_log_level = default_log_level
        .unwrap_or_else(|| "predefine=info,predefine_runner=info".to_owned());
    let env_layer = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or(default_log_level),
    );
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .with_writer(std::io::stderr);
    let registry =
        tracing_subscriber::registry().with(env_layer).with(fmt_layer);

    if let Some(logs_dir) = logs_dir {
        let logfile =
            RollingFileAppender::new(Rotation::DAILY, logs_dir, LOG_FILE_NAME);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_ansi(false)
            .json()
            .with_writer(logfile);
        registry.with(file_layer).try_init()?;
    } else {
        registry.try_init()?;
    }

    Ok(())
}
