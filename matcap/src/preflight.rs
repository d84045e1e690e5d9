//! Pre-flight checks for matcap
//!
//! Validates inputs and output locations before any buffers are touched.
//! Provides clear, actionable error messages when requirements aren't met.

use anyhow::{bail, Context, Result};
use matcap_common::ELEMENT_SIZE;
use std::io::ErrorKind;
use std::path::Path;

/// Run all pre-flight checks for `matcap simulate`
///
/// # Errors
/// Returns the first failed check
pub fn run_simulate_checks(
    config: Option<&Path>,
    output_dir: &Path,
    chunk: usize,
    core: Option<i64>,
) -> Result<()> {
    if let Some(config) = config {
        check_input_file(config)?;
    }
    if let Some(core) = core {
        check_core_selector(core)?;
    }
    check_output_dir(output_dir)?;
    check_chunk_size(chunk)?;
    Ok(())
}

/// Check that a single-core request does not name core 0 or a negative core
///
/// `buffers` reads a leading `0` as "free everything", so core 0 can only be
/// configured together with every other core.
///
/// # Errors
/// Returns an invalid-argument error for `core < 1`
pub fn check_core_selector(core: i64) -> Result<()> {
    if core < 1 {
        bail!(
            "Invalid argument: --core must be at least 1, got {core}\n\n\
             Core 0 cannot be configured alone. Omit --core to allocate every core."
        );
    }
    Ok(())
}

/// Check that an input file exists and is a regular file
///
/// # Errors
/// Returns an error describing what is wrong with `path`
pub fn check_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!(
            "File not found: {}\n\n\
             Make sure the path is correct and the file exists.",
            path.display()
        );
    }
    if !path.is_file() {
        bail!(
            "Not a file: {}\n\n\
             Expected a regular file, not a directory.",
            path.display()
        );
    }
    std::fs::File::open(path).map_err(|e| {
        let message = open_failure_message(path, e.kind());
        anyhow::Error::new(e).context(message)
    })?;
    Ok(())
}

/// Context for a failed open; only a permission failure gets the
/// permission hint, which `main` maps to its own exit code
fn open_failure_message(path: &Path, kind: ErrorKind) -> String {
    if kind == ErrorKind::PermissionDenied {
        format!(
            "Permission denied: cannot open {}\n\n\
             Check the file mode with: ls -l {}",
            path.display(),
            path.display()
        )
    } else {
        format!("Cannot open {}", path.display())
    }
}

/// Check that `path` is a directory (or can be created as one)
///
/// # Errors
/// Returns an error if `path` is a file or cannot be created
pub fn check_output_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        bail!(
            "Output path is not a directory: {}\n\n\
             Choose another --output-dir or remove the file.",
            path.display()
        );
    }
    std::fs::create_dir_all(path)
        .with_context(|| format!("Failed to create output directory: {}", path.display()))?;
    Ok(())
}

/// Reads must move at least one whole sample per call
fn check_chunk_size(chunk: usize) -> Result<()> {
    if (chunk as u64) < ELEMENT_SIZE {
        bail!("--chunk must be at least {ELEMENT_SIZE} bytes, got {chunk}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_not_found() {
        let result = check_input_file(Path::new("/nonexistent/path/to/dump.bin"));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("File not found"));
    }

    #[test]
    fn test_input_is_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_input_file(dir.path()).unwrap_err().to_string();
        assert!(err.contains("Not a file"));
    }

    #[test]
    fn test_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/out");
        check_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_output_dir_rejects_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = check_output_dir(file.path()).unwrap_err().to_string();
        assert!(err.contains("not a directory"));
    }

    #[test]
    fn test_permission_hint_only_for_permission_errors() {
        let path = Path::new("/tmp/dump.bin");
        let denied = open_failure_message(path, ErrorKind::PermissionDenied);
        assert!(denied.starts_with("Permission denied"));
        for kind in [ErrorKind::NotFound, ErrorKind::Interrupted, ErrorKind::Other] {
            let msg = open_failure_message(path, kind);
            assert!(!msg.to_lowercase().contains("permission"), "{kind:?}: {msg}");
        }
    }

    #[test]
    fn test_core_selector() {
        let err = check_core_selector(0).unwrap_err().to_string();
        assert!(err.starts_with("Invalid argument"));
        assert!(check_core_selector(-1).is_err());
        assert!(check_core_selector(1).is_ok());
    }

    #[test]
    fn test_chunk_size() {
        assert!(check_chunk_size(4).is_err());
        assert!(check_chunk_size(8).is_ok());
    }
}
