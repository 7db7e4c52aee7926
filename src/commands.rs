//! The two driver commands: `cc`, which hands everything to the external C
//! compiler, and `run`, which resolves a file to a namespace, loads it
//! through the source manager and prints the expanded tree.

use std::path::{Path, PathBuf};

use miette::{miette, IntoDiagnostic};

use crate::ast::dump;
use crate::jit::Jit;
use crate::location::LocationRange;
use crate::options::{CompilationPhase, Options};
use crate::source::SourceManager;

/// Delegate to the external C compiler front-end and return its exit code.
pub fn cc(args: &[String]) -> miette::Result<i32> {
    let status = std::process::Command::new("cc")
        .args(args)
        .status()
        .into_diagnostic()?;

    Ok(status.code().unwrap_or(1))
}

/// Compile and run `file`. The file's parent directory becomes the first
/// load path entry, followed by any `include` directories.
pub fn run(
    file: &Path,
    include: Vec<PathBuf>,
    phase: CompilationPhase,
    verbose: bool,
) -> miette::Result<()> {
    let ns_name = file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| miette!("'{}' is not a loadable file name", file.display()))?
        .to_string();

    let mut load_paths = vec![file.parent().unwrap_or(Path::new(".")).to_path_buf()];
    load_paths.extend(include);

    let options = Options {
        verbose,
        compilation_phase: phase,
        ..Options::default()
    };

    let engine = Jit::new(options);
    let mut sources = SourceManager::new();
    sources.set_load_paths(load_paths);

    let ns = sources
        .read_namespace(&engine, &ns_name, LocationRange::unknown(&ns_name))
        .into_diagnostic()?;

    // Execution belongs to the engine; until lowering lands, the observable
    // result of `run` is the expanded tree.
    dump(ns.tree());

    Ok(())
}
