//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use cpybind_meta::{Package, load};

use crate::backend::{BindErrors, BindingGenerator, Generation};
use crate::config::GenConfig;

use super::{CliError, CliResult, ExitCode};

/// Default output directory of `gen`.
pub const DEFAULT_OUTPUT_DIR: &str = "cpybind_output";

/// Maximum metadata file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// while loading.
const MAX_METADATA_SIZE: u64 = 100 * 1024 * 1024;

/// Validate the output directory to prevent path traversal attacks.
///
/// Paths with `..` components are rejected; absolute paths are allowed with a warning.
pub fn validate_output_dir(out_dir: &Path) -> CliResult<()> {
    if out_dir.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(CliError::failure(format!(
            "Output directory '{}' contains path traversal (..)",
            out_dir.display()
        )));
    }

    if out_dir.is_absolute() {
        tracing::warn!(
            "Using absolute output path: {}. Consider using a relative path.",
            out_dir.display()
        );
    }

    Ok(())
}

/// Read and load a metadata file.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_METADATA_SIZE` (100 MB)
/// - The contents are not valid package metadata
pub fn read_metadata(path: &Path) -> CliResult<Vec<Package>> {
    let metadata = fs::metadata(path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", path.display(), e)))?;

    if metadata.len() > MAX_METADATA_SIZE {
        return Err(CliError::failure(format!(
            "Metadata file '{}' is too large ({} bytes, max {} bytes)",
            path.display(),
            metadata.len(),
            MAX_METADATA_SIZE
        )));
    }

    load::from_path(path).map_err(|e| CliError::failure(format!("{:?}", miette::Report::new(e))))
}

/// Render every diagnostic of one package through miette.
pub fn render_diagnostics(package: &str, errors: &BindErrors) -> String {
    let mut out = format!("{} diagnostic(s) in package '{}':\n", errors.len(), package);
    for err in errors.iter() {
        out.push_str(&format!("{:?}\n", miette::Report::new(err.clone())));
    }
    out
}

/// Generate every package of `metadata` with the same configuration.
fn generate_all(metadata: &Path, config: &GenConfig) -> CliResult<Vec<Generation>> {
    let packages = read_metadata(metadata)?;
    let generator = BindingGenerator::with_config(config.clone());
    Ok(packages.iter().map(|pkg| generator.generate(pkg)).collect())
}

/// Print diagnostics of every generation to stderr; returns the exit code they imply.
fn report(generations: &[Generation]) -> ExitCode {
    let mut code = ExitCode::SUCCESS;
    for generation in generations {
        if !generation.is_ok() {
            eprint!("{}", render_diagnostics(&generation.output.package, &generation.errors));
            code = ExitCode::FAILURE;
        }
    }
    code
}

/// `gen`: write `<output_dir>/<pkg>.c` for every package.
///
/// Units are written even when diagnostics were recorded (best effort); the exit code is then 1.
pub fn generate_files(metadata: &Path, output_dir: Option<&Path>, config: &GenConfig) -> CliResult<ExitCode> {
    let out_dir = output_dir.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    validate_output_dir(&out_dir)?;

    let generations = generate_all(metadata, config)?;

    fs::create_dir_all(&out_dir).map_err(|e| {
        CliError::failure(format!("Error creating output directory '{}': {}", out_dir.display(), e))
    })?;

    for generation in &generations {
        let path = out_dir.join(generation.output.file_name());
        fs::write(&path, generation.output.render())
            .map_err(|e| CliError::failure(format!("Error writing '{}': {}", path.display(), e)))?;
        println!("Generated {}", path.display());
    }

    Ok(report(&generations))
}

/// `check`: generate in memory and report diagnostics only.
pub fn check_metadata(metadata: &Path, config: &GenConfig) -> CliResult<ExitCode> {
    let generations = generate_all(metadata, config)?;
    let code = report(&generations);
    if code == ExitCode::SUCCESS {
        println!("✓ {} package(s) bind cleanly", generations.len());
    }
    Ok(code)
}

/// `--emit`: print every generated unit to stdout.
pub fn emit_c(metadata: &Path, config: &GenConfig) -> CliResult<ExitCode> {
    let generations = generate_all(metadata, config)?;
    for generation in &generations {
        print!("{}", generation.output.render());
    }
    Ok(report(&generations))
}
