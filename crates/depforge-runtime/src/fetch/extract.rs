//! Archive extraction.
//!
//! `.zip` and `.tar.gz` are unpacked in-process. `.tar.xz` and `.7z` are
//! handed to the native `tar` and `7z` tools through the runner.

use std::fs::{self, File};
use std::path::Path;

use depforge_core::command::quote;
use depforge_core::{
    ArchiveFormat, ArchiveSpec, CommandInvocation, CommandRunner, PipelineError, PipelineResult,
    ensure_dir,
};
use flate2::read::GzDecoder;
use tracing::info;

fn extraction_error(archive: &Path, reason: impl ToString) -> PipelineError {
    PipelineError::Extraction {
        archive: archive.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn extract_zip(archive: &Path, dest: &Path) -> PipelineResult<()> {
    let file = File::open(archive)
        .map_err(|e| PipelineError::io(format!("Failed to open {}", archive.display()), e))?;
    let mut zip = zip::ZipArchive::new(file).map_err(|e| extraction_error(archive, e))?;
    zip.extract(dest).map_err(|e| extraction_error(archive, e))
}

fn extract_tar_gz(archive: &Path, dest: &Path) -> PipelineResult<()> {
    let file = File::open(archive)
        .map_err(|e| PipelineError::io(format!("Failed to open {}", archive.display()), e))?;
    let mut tar = tar::Archive::new(GzDecoder::new(file));
    tar.unpack(dest).map_err(|e| extraction_error(archive, e))
}

/// Native extraction command for formats not handled in-process.
pub fn native_command(format: ArchiveFormat, archive: &Path, dest: &Path) -> Option<String> {
    match format {
        ArchiveFormat::TarXz => Some(format!("tar -xJf {} -C {}", quote(archive), quote(dest))),
        ArchiveFormat::SevenZip => Some(format!("7z x -y -o{} {}", quote(dest), quote(archive))),
        ArchiveFormat::Zip | ArchiveFormat::TarGz => None,
    }
}

/// Unpack `archive` according to `spec`, then move its top-level directory
/// into place when the spec asks for a rename.
pub fn extract(
    runner: &dyn CommandRunner,
    spec: &ArchiveSpec,
    archive: &Path,
) -> PipelineResult<()> {
    let format = spec
        .format()
        .ok_or_else(|| extraction_error(archive, "unrecognized archive format"))?;

    ensure_dir(&spec.extract_to)?;
    println!("Extracting {}...", spec.file_name);

    match format {
        ArchiveFormat::Zip => extract_zip(archive, &spec.extract_to)?,
        ArchiveFormat::TarGz => extract_tar_gz(archive, &spec.extract_to)?,
        ArchiveFormat::TarXz | ArchiveFormat::SevenZip => {
            if let Some(line) = native_command(format, archive, &spec.extract_to) {
                runner.execute(&CommandInvocation::new(line))?;
            }
        }
    }

    if let Some(target) = &spec.rename_to {
        let extracted = spec.extract_to.join(&spec.top_dir);
        if let Some(parent) = target.parent() {
            ensure_dir(parent)?;
        }
        fs::rename(&extracted, target).map_err(|e| {
            PipelineError::io(
                format!(
                    "Failed to move {} to {}",
                    extracted.display(),
                    target.display()
                ),
                e,
            )
        })?;
    }

    info!(archive = %spec.file_name, path = %spec.installed_path().display(), "Extracted");
    Ok(())
}
