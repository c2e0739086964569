//! Helpers for building test archives and audio payloads in memory.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;

use flate2::Compression;
use flate2::write::GzEncoder;
use zip::write::SimpleFileOptions;

/// Leading bytes of a canonical PCM WAV file.
pub const WAV_HEADER: &[u8] = b"RIFF\x24\x08\x00\x00WAVEfmt \x10\x00\x00\x00";

/// Leading bytes of an MP3 file with an ID3v2.4 tag.
pub const MP3_ID3_HEADER: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x21";

/// Leading bytes of an Ogg page.
pub const OGG_HEADER: &[u8] = b"OggS\x00\x02\x00\x00\x00\x00\x00\x00";

/// Leading bytes of an M4A file.
pub const M4A_HEADER: &[u8] = b"\x00\x00\x00\x20ftypM4A \x00\x00\x00\x00";

/// `header` followed by zero padding, `size` bytes in total.
///
/// A `size` shorter than the header truncates it.
#[must_use]
pub fn audio_bytes(header: &[u8], size: usize) -> Vec<u8> {
    let mut data = header.to_vec();
    data.resize(size, 0);
    data
}

/// A WAV payload of `size` bytes.
#[must_use]
pub fn wav_bytes(size: usize) -> Vec<u8> {
    audio_bytes(WAV_HEADER, size)
}

/// An MP3 payload of `size` bytes.
#[must_use]
pub fn mp3_bytes(size: usize) -> Vec<u8> {
    audio_bytes(MP3_ID3_HEADER, size)
}

/// Gzip-compresses `data`.
#[must_use]
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// Zstd-compresses `data`.
#[must_use]
pub fn zstd_compress(data: &[u8]) -> Vec<u8> {
    zstd::encode_all(data, 0).unwrap()
}

/// Builder for TAR test archives.
///
/// Besides regular entries it can write paths the `tar` crate refuses to
/// encode (`..` segments, absolute paths) and special files.
///
/// # Examples
///
/// ```
/// use cuepack_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_directory("beeps/stop/")
///     .add_file("beeps/stop/a.wav", b"RIFF")
///     .add_raw_file("beeps/../../evil.wav", b"RIFF")
///     .build();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new TAR test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a regular file whose name is written verbatim into the header.
    ///
    /// `path` must fit the 100-byte name field.
    #[must_use]
    pub fn add_raw_file(mut self, path: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        let name = path.as_bytes();
        header.as_old_mut().name[..name.len()].copy_from_slice(name);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        self.append_empty(path, tar::EntryType::Directory, 0o755, None);
        self
    }

    /// Adds a symlink.
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        self.append_empty(path, tar::EntryType::Symlink, 0o777, Some(target));
        self
    }

    /// Adds a hardlink.
    #[must_use]
    pub fn add_hardlink(mut self, path: &str, target: &str) -> Self {
        self.append_empty(path, tar::EntryType::Link, 0o644, Some(target));
        self
    }

    /// Adds a FIFO.
    #[must_use]
    pub fn add_fifo(mut self, path: &str) -> Self {
        self.append_empty(path, tar::EntryType::Fifo, 0o644, None);
        self
    }

    /// Builds and returns the TAR archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    fn append_empty(&mut self, path: &str, kind: tar::EntryType, mode: u32, link: Option<&str>) {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(mode);
        header.set_entry_type(kind);
        if let Some(target) = link {
            header.set_link_name(target).unwrap();
        }
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for ZIP test archives.
///
/// # Examples
///
/// ```
/// use cuepack_core::test_utils::ZipTestBuilder;
///
/// let zip_data = ZipTestBuilder::new()
///     .add_directory("beeps/stop/")
///     .add_file("beeps/stop/a.wav", b"RIFF")
///     .build();
/// ```
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a stored regular file.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a deflated regular file.
    #[must_use]
    pub fn add_deflated_file(mut self, path: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o644);

        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Adds a symlink entry (Unix mode `0o120777`).
    #[must_use]
    pub fn add_symlink(mut self, path: &str, target: &str) -> Self {
        self.zip
            .add_symlink(path, target, SimpleFileOptions::default())
            .unwrap();
        self
    }

    /// Builds and returns the ZIP archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
