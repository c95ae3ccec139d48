//! Geometry resolution ahead of a session.
//!
//! The define program only reads its native coordinate format, so a
//! foreign geometry file is converted up front by an external tool
//! whose standard output becomes the native file. Resolution must
//! succeed before any child process is spawned.

use crate::{Error, Result};
use std::fs;
use std::path::Path;
use std::process::Command;

/// File name of the program's native coordinate format.
pub const NATIVE_GEOMETRY: &str = "coord";

/// Extension of the foreign format the converter understands.
const FOREIGN_EXTENSION: &str = "xyz";

/// Resolve a configured geometry path into one define can read.
///
/// Native paths pass through unchanged; `.xyz` files are converted by
/// running `converter` inside `dir` and capturing its standard output
/// into [`NATIVE_GEOMETRY`]. Any other extension is rejected.
pub fn resolve_geometry(
    geometry: &str,
    dir: &Path,
    converter: &str,
) -> Result<String> {
    let extension = Path::new(geometry)
        .extension()
        .and_then(|extension| extension.to_str());
    match extension {
        None => Ok(geometry.to_string()),
        Some(ext) if ext.eq_ignore_ascii_case(NATIVE_GEOMETRY) => {
            Ok(geometry.to_string())
        }
        Some(ext) if ext.eq_ignore_ascii_case(FOREIGN_EXTENSION) => {
            convert(geometry, dir, converter)
        }
        Some(_) => Err(Error::UnsupportedGeometry(geometry.to_string())),
    }
}

fn convert(geometry: &str, dir: &Path, converter: &str) -> Result<String> {
    tracing::info!(from = %geometry, converter = %converter, "convert geometry");

    let mut parts = comma::parse_command(converter)
        .ok_or_else(|| Error::BadArguments(converter.to_string()))?;
    if parts.is_empty() {
        return Err(Error::BadArguments(converter.to_string()));
    }
    let mut command = Command::new(parts.remove(0));
    command.args(parts).arg(geometry).current_dir(dir);

    let output = command.output().map_err(|err| Error::GeometryConversion {
        path: geometry.to_string(),
        detail: format!("failed to run '{}': {}", converter, err),
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(Error::GeometryConversion {
            path: geometry.to_string(),
            detail: format!(
                "'{}' exited with {}: {}",
                converter,
                output.status,
                stderr.trim()
            ),
        });
    }

    fs::write(dir.join(NATIVE_GEOMETRY), &output.stdout)?;
    Ok(NATIVE_GEOMETRY.to_string())
}

#[cfg(test)]
mod test {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn temp_dir(tag: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("predefine-convert-{}-{}", tag, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_script(dir: &Path, name: &str, body: &str) -> String {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[test]
    fn native_paths_pass_through() {
        let dir = temp_dir("native");
        let resolved =
            resolve_geometry("water.coord", &dir, "/nonexistent").unwrap();
        assert_eq!(resolved, "water.coord");
        let resolved = resolve_geometry("coord", &dir, "/nonexistent").unwrap();
        assert_eq!(resolved, "coord");
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let dir = temp_dir("unknown");
        match resolve_geometry("mol.pdb", &dir, "/nonexistent") {
            Err(Error::UnsupportedGeometry(path)) => {
                assert_eq!(path, "mol.pdb");
            }
            r => panic!("should reject the extension {r:?}"),
        }
    }

    #[test]
    fn foreign_files_are_converted() {
        let dir = temp_dir("foreign");
        fs::write(dir.join("mol.xyz"), "1\n\nH 0.0 0.0 0.0\n").unwrap();
        let converter = write_script(
            &dir,
            "x2t",
            "#!/bin/sh\nprintf '$coord\\n$end\\n'\n",
        );

        let resolved = resolve_geometry("mol.xyz", &dir, &converter).unwrap();
        assert_eq!(resolved, NATIVE_GEOMETRY);
        let coord = fs::read_to_string(dir.join(NATIVE_GEOMETRY)).unwrap();
        assert_eq!(coord, "$coord\n$end\n");
    }

    #[test]
    fn converter_failure_is_reported() {
        let dir = temp_dir("failure");
        fs::write(dir.join("mol.xyz"), "garbage").unwrap();
        let converter = write_script(
            &dir,
            "x2t",
            "#!/bin/sh\necho 'not a geometry' >&2\nexit 2\n",
        );

        match resolve_geometry("mol.xyz", &dir, &converter) {
            Err(Error::GeometryConversion { path, detail }) => {
                assert_eq!(path, "mol.xyz");
                assert!(detail.contains("not a geometry"), "detail: {detail}");
            }
            r => panic!("should report the converter failure {r:?}"),
        }
    }

    #[test]
    fn missing_converter_is_reported() {
        let dir = temp_dir("missing");
        fs::write(dir.join("mol.xyz"), "1\n").unwrap();
        match resolve_geometry("mol.xyz", &dir, "/nonexistent/x2t") {
            Err(Error::GeometryConversion { .. }) => {}
            r => panic!("should report the missing converter {r:?}"),
        }
    }
}
