//! Extraction of an approved archive into a scratch directory.

use std::fs;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use crate::PackError;
use crate::PackId;
use crate::Result;
use crate::extraction::scratch::ScratchDir;
use crate::extraction::stream::CopyBuffer;
use crate::extraction::stream::copy_capped;
use crate::formats::ArchiveInput;
use crate::formats::EntryVisitor;
use crate::formats::walk_archive;
use crate::inspection::ArchiveEntry;
use crate::inspection::EntryKind;
use crate::inspection::audit::is_rooted;
use crate::inspection::audit::split_segments;
use crate::policy::MAX_FILE_SIZE;

/// Counts from one extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Regular files written.
    pub files_written: usize,
    /// Directories created.
    pub directories_created: usize,
    /// Link entries skipped.
    pub links_skipped: usize,
}

/// Extracts an archive into `scratch`.
///
/// Must only run after the listing passed the structural audit. Even so, each
/// path is re-checked while it is joined onto the scratch directory, links
/// are never materialized, and nothing is written through an existing
/// symlink. File contents are capped at `MAX_FILE_SIZE + 1` bytes so an
/// oversized payload is truncated here and removed by the sanitizer.
///
/// # Errors
///
/// Returns `PackError::ExtractionFailed` on any failure. The caller discards
/// the scratch directory.
pub fn extract_into(
    input: ArchiveInput<'_>,
    scratch: &ScratchDir,
    pack_id: &PackId,
) -> Result<ExtractSummary> {
    let mut extractor = Extractor {
        base: scratch.path(),
        pack_id,
        buffer: CopyBuffer::new(),
        summary: ExtractSummary::default(),
    };

    walk_archive(input, &mut extractor).map_err(into_extraction_failed)?;
    fs::create_dir_all(scratch.pack_root()).map_err(|e| failed(scratch.pack_root(), &e))?;

    Ok(extractor.summary)
}

struct Extractor<'a> {
    base: &'a Path,
    pack_id: &'a PackId,
    buffer: CopyBuffer,
    summary: ExtractSummary,
}

impl EntryVisitor for Extractor<'_> {
    fn visit(&mut self, entry: &ArchiveEntry, data: &mut dyn Read) -> Result<()> {
        if entry.kind == EntryKind::Symlink {
            tracing::debug!(path = %entry.path, "skipping link entry");
            self.summary.links_skipped += 1;
            return Ok(());
        }

        let relative = safe_relative_path(&entry.path, self.pack_id)?;

        match entry.kind {
            EntryKind::Directory => {
                self.summary.directories_created += ensure_dir(self.base, &relative)?;
            }
            EntryKind::File => {
                if let Some(parent) = relative.parent() {
                    self.summary.directories_created += ensure_dir(self.base, parent)?;
                }
                write_file(&self.base.join(&relative), data, &mut self.buffer)?;
                self.summary.files_written += 1;
            }
            EntryKind::Symlink => {}
        }
        Ok(())
    }
}

/// Rebuilds an entry path from its segments, refusing anything that is not a
/// plain relative path under the pack root.
fn safe_relative_path(raw: &str, pack_id: &PackId) -> Result<PathBuf> {
    let unsafe_path = || PackError::ExtractionFailed {
        reason: format!("unsafe entry path: {raw}"),
    };

    if is_rooted(raw) {
        return Err(unsafe_path());
    }
    let segments = split_segments(raw);
    if segments.first() != Some(&pack_id.as_str()) {
        return Err(unsafe_path());
    }

    let relative: PathBuf = segments.iter().collect();
    let plain = relative.components().count() == segments.len()
        && relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if !plain {
        return Err(unsafe_path());
    }
    Ok(relative)
}

/// Creates every missing directory of `relative` under `base`, refusing to
/// traverse a symlink or a non-directory. Returns how many were created.
fn ensure_dir(base: &Path, relative: &Path) -> Result<usize> {
    let mut current = base.to_path_buf();
    let mut created = 0;

    for component in relative.components() {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_dir() => {}
            Ok(_) => {
                return Err(PackError::ExtractionFailed {
                    reason: format!("refusing to traverse non-directory: {}", current.display()),
                });
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::create_dir(&current).map_err(|e| failed(&current, &e))?;
                created += 1;
            }
            Err(e) => return Err(failed(&current, &e)),
        }
    }
    Ok(created)
}

fn write_file(target: &Path, data: &mut dyn Read, buffer: &mut CopyBuffer) -> Result<()> {
    match fs::symlink_metadata(target) {
        Ok(meta) if meta.file_type().is_file() => {
            fs::remove_file(target).map_err(|e| failed(target, &e))?;
        }
        Ok(_) => {
            return Err(PackError::ExtractionFailed {
                reason: format!("refusing to overwrite non-file: {}", target.display()),
            });
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(failed(target, &e)),
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .map_err(|e| failed(target, &e))?;
    copy_capped(data, &mut file, MAX_FILE_SIZE + 1, buffer).map_err(|e| failed(target, &e))?;
    Ok(())
}

fn failed(path: &Path, err: &io::Error) -> PackError {
    PackError::ExtractionFailed {
        reason: format!("{}: {err}", path.display()),
    }
}

fn into_extraction_failed(err: PackError) -> PackError {
    match err {
        PackError::ExtractionFailed { .. } => err,
        other => PackError::ExtractionFailed {
            reason: other.to_string(),
        },
    }
}
