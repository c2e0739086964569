//! Single-file admission checks.
//!
//! The leaf rules (extension, size, magic bytes) are shared by the in-place
//! sanitizer, the in-memory archive verifier and manual `add_sound`.

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Read;
use std::path::Path;

use crate::AudioFormat;
use crate::PackError;
use crate::error::RejectReason;
use crate::policy::MAX_FILE_SIZE;
use crate::policy::SIGNATURE_PREFIX_LEN;
use crate::security::signature::AudioSignature;

/// A file that passed every leaf check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmittedFile {
    /// Format implied by the extension.
    pub format: AudioFormat,
    /// Signature found in the leading bytes.
    pub signature: AudioSignature,
    /// File size in bytes.
    pub size: u64,
}

/// Applies the leaf rules to a file name, its size and its leading bytes.
///
/// `header` only needs the first [`SIGNATURE_PREFIX_LEN`] bytes. The header
/// may match any recognized signature, not necessarily the one implied by the
/// extension.
///
/// # Errors
///
/// Returns the first rule the file breaks, checked in the order: extension,
/// size, signature.
///
/// # Examples
///
/// ```
/// use cuepack_core::RejectReason;
/// use cuepack_core::security::check_leaf;
/// use std::path::Path;
///
/// let ok = check_leaf(Path::new("a.wav"), 1024, b"RIFF\0\0\0\0WAVE");
/// assert!(ok.is_ok());
///
/// let err = check_leaf(Path::new("a.mp3"), 12, b"hello world!");
/// assert_eq!(err, Err(RejectReason::UnrecognizedSignature));
/// ```
pub fn check_leaf(
    name: &Path,
    size: u64,
    header: &[u8],
) -> std::result::Result<AdmittedFile, RejectReason> {
    let format = AudioFormat::from_file_name(name).ok_or(RejectReason::DisallowedExtension)?;
    if size > MAX_FILE_SIZE {
        return Err(RejectReason::TooLarge { size });
    }
    let signature = AudioSignature::sniff(header).ok_or(RejectReason::UnrecognizedSignature)?;
    Ok(AdmittedFile {
        format,
        signature,
        size,
    })
}

/// Applies the leaf rules to a file on disk.
///
/// The path is never followed: a symlink is rejected from its own metadata,
/// and the leading bytes are read through a handle opened with `O_NOFOLLOW`
/// whose metadata must describe a regular file.
///
/// # Errors
///
/// Returns the reason the file must not be admitted.
pub fn check_file(path: &Path) -> std::result::Result<AdmittedFile, RejectReason> {
    let metadata = std::fs::symlink_metadata(path).map_err(|_| RejectReason::Unreadable)?;
    if metadata.file_type().is_symlink() {
        return Err(RejectReason::Symlink);
    }
    if !metadata.is_file() {
        return Err(RejectReason::NotRegularFile);
    }

    let name = path.file_name().map(Path::new).unwrap_or(path);
    if AudioFormat::from_file_name(name).is_none() {
        return Err(RejectReason::DisallowedExtension);
    }
    if metadata.len() > MAX_FILE_SIZE {
        return Err(RejectReason::TooLarge {
            size: metadata.len(),
        });
    }

    let mut file = open_no_follow(path).map_err(|e| {
        if is_symlink_loop(&e) {
            RejectReason::Symlink
        } else {
            RejectReason::Unreadable
        }
    })?;
    let opened = file.metadata().map_err(|_| RejectReason::Unreadable)?;
    if !opened.is_file() {
        return Err(RejectReason::NotRegularFile);
    }

    let header = read_header(&mut file).map_err(|_| RejectReason::Unreadable)?;
    check_leaf(name, opened.len(), &header)
}

/// Like [`check_file`], but reports a rejection as a `PackError`.
///
/// # Errors
///
/// Returns `PackError::ContentRejected` carrying the path and reason.
pub fn admit_file(path: &Path) -> crate::Result<AdmittedFile> {
    check_file(path).map_err(|reason| PackError::ContentRejected {
        path: path.to_path_buf(),
        reason,
    })
}

/// Reads up to [`SIGNATURE_PREFIX_LEN`] leading bytes.
pub(crate) fn read_header<R: Read + ?Sized>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut header = Vec::with_capacity(SIGNATURE_PREFIX_LEN);
    reader
        .take(SIGNATURE_PREFIX_LEN as u64)
        .read_to_end(&mut header)?;
    Ok(header)
}

#[cfg(unix)]
fn open_no_follow(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    // O_NONBLOCK keeps a FIFO swapped in after the lstat from blocking the open.
    OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NOFOLLOW | libc::O_NONBLOCK)
        .open(path)
}

#[cfg(not(unix))]
fn open_no_follow(path: &Path) -> io::Result<File> {
    OpenOptions::new().read(true).open(path)
}

#[cfg(unix)]
fn is_symlink_loop(err: &io::Error) -> bool {
    err.raw_os_error() == Some(libc::ELOOP)
}

#[cfg(not(unix))]
fn is_symlink_loop(_err: &io::Error) -> bool {
    false
}
