//! Batch driver: render every `.mmd` file of a directory

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Error, Result};
use crate::fetch::Render;
use crate::types::OutputFormat;

/// Extension of diagram source files, without the dot
pub const SOURCE_EXTENSION: &str = "mmd";

/// List the diagram sources directly inside `dir`, sorted by file name.
///
/// Fails with [`Error::NotADirectory`] if `dir` is missing or not a directory
/// and with [`Error::NoInput`] if it holds no source files.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }

    let read_err = |source| Error::Read {
        path: dir.to_path_buf(),
        source,
    };

    let suffix = format!(".{}", SOURCE_EXTENSION);
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if path.is_file() && entry.file_name().to_string_lossy().ends_with(&suffix) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(Error::NoInput(dir.to_path_buf()));
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Sibling path of `source` carrying the image extension
pub fn output_path(source: &Path, format: OutputFormat) -> PathBuf {
    source.with_extension(format.extension())
}

/// Render every source file in `dir` and write each image beside it.
///
/// Files are processed one at a time in name order. The first failure stops
/// the batch; images already written stay on disk. Returns the written paths.
pub fn run<R: Render>(dir: &Path, renderer: &R) -> Result<Vec<PathBuf>> {
    // Resolve so reported paths are absolute
    let dir = fs::canonicalize(dir).map_err(|_| Error::NotADirectory(dir.to_path_buf()))?;
    let sources = discover(&dir)?;
    info!("Rendering {} file(s) from {}", sources.len(), dir.display());

    let mut written = Vec::with_capacity(sources.len());
    for source in sources {
        let out = render_file(&source, renderer)?;
        println!("Wrote {}", out.display());
        written.push(out);
    }
    Ok(written)
}

/// Render one source file, overwriting any previous output
pub fn render_file<R: Render>(source: &Path, renderer: &R) -> Result<PathBuf> {
    let code = fs::read_to_string(source).map_err(|e| Error::Read {
        path: source.to_path_buf(),
        source: e,
    })?;

    info!("Rendering {}", source.display());
    let image = renderer.render(&code)?;

    let out = output_path(source, renderer.format());
    fs::write(&out, &image).map_err(|e| Error::Write {
        path: out.clone(),
        source: e,
    })?;
    Ok(out)
}
