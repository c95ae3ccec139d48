//! Drive the interactive `define` input generator of the TurboMole
//! suite from a declarative parameter file.
//!
//! The runner validates a parameter tree, converts a foreign geometry
//! file when needed, then walks define's menus stage by stage over a
//! pseudo-terminal, verifying every prompt before answering it. A
//! mismatch between what the program prints and what the parameters
//! request is an error, never a silent fallback.
#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod convert;
mod driver;
mod error;
mod params;
mod prompts;
mod schema;
mod stages;

pub use convert::{resolve_geometry, NATIVE_GEOMETRY};
pub use driver::{run, Driver, RunOptions, RunSummary, Stage};
pub use error::Error;
pub use params::Params;
pub use prompts::Prompts;
pub use schema::{parameter_schema, validate, MapSchema, Schema};

/// Result type for the runner.
pub type Result<T> = std::result::Result<T, Error>;
