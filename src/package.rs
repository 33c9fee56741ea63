//! Zip archive of a built presentation

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::utils::slash_path;

/// Location of the archive for a presentation id.
pub fn archive_path(src_dir: &Path, id: &str) -> PathBuf {
    src_dir.join(format!("{id}.zip"))
}

/// Write every file under `dest_dir` into the zip at `archive`.
///
/// Entry names are relative to `dest_dir` and always use `/`. Returns the number of
/// files written.
pub fn package(dest_dir: &Path, archive: &Path) -> Result<usize> {
    if !dest_dir.is_dir() {
        anyhow::bail!("Nothing to package: {} does not exist", dest_dir.display());
    }

    let file = File::create(archive)
        .with_context(|| format!("Failed creating archive {}", archive.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut written = 0;
    for entry in WalkDir::new(dest_dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed walking {}", dest_dir.display()))?;
        let Ok(rel) = entry.path().strip_prefix(dest_dir) else {
            continue;
        };
        let name = slash_path(rel);
        if name.is_empty() {
            continue;
        }

        if entry.file_type().is_dir() {
            zip.add_directory(name, options)?;
        } else {
            zip.start_file(name.as_str(), options)?;
            let mut source = File::open(entry.path())
                .with_context(|| format!("Failed reading {}", entry.path().display()))?;
            io::copy(&mut source, &mut zip)
                .with_context(|| format!("Failed compressing {name}"))?;
            written += 1;
        }
    }

    zip.finish()?.flush()?;
    tracing::debug!("packaged {} files into {}", written, archive.display());
    Ok(written)
}

/// Size of the finished archive, for reporting.
pub fn archive_size(archive: &Path) -> u64 {
    fs::metadata(archive).map(|meta| meta.len()).unwrap_or(0)
}
