//! Audio magic-byte signatures.

use std::fmt;

/// A recognized audio signature.
///
/// Matching is a closed match with one rule per variant; anything that
/// matches no variant is not audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioSignature {
    /// `RIFF` .... `WAVE`
    Wav,
    /// `FORM` .... `AIFF`
    Aiff,
    /// `OggS`
    Ogg,
    /// `ID3` tag in front of an MP3 stream.
    Mp3Id3,
    /// Bare MPEG audio frame sync (`FF FB`, `FF F3`, `FF F2`).
    Mp3FrameSync,
    /// AAC ADTS header (`FF F1`, `FF F9`).
    AacAdts,
    /// ISO base media file (`ftyp` box at offset 4), as used by M4A.
    Mp4,
}

impl AudioSignature {
    /// Every signature, in match order.
    pub const ALL: [Self; 7] = [
        Self::Wav,
        Self::Aiff,
        Self::Ogg,
        Self::Mp3Id3,
        Self::Mp3FrameSync,
        Self::AacAdts,
        Self::Mp4,
    ];

    /// Returns `true` if `header` (the file's leading bytes) matches this
    /// signature.
    #[must_use]
    pub fn matches(self, header: &[u8]) -> bool {
        match self {
            Self::Wav => header.starts_with(b"RIFF") && header.get(8..12) == Some(&b"WAVE"[..]),
            Self::Aiff => header.starts_with(b"FORM") && header.get(8..12) == Some(&b"AIFF"[..]),
            Self::Ogg => header.starts_with(b"OggS"),
            Self::Mp3Id3 => header.starts_with(&[0x49, 0x44, 0x33]),
            Self::Mp3FrameSync => matches!(header, [0xFF, 0xFB | 0xF3 | 0xF2, ..]),
            Self::AacAdts => matches!(header, [0xFF, 0xF1 | 0xF9, ..]),
            Self::Mp4 => header.get(4..8) == Some(&b"ftyp"[..]),
        }
    }

    /// Returns the first signature `header` matches, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuepack_core::security::AudioSignature;
    ///
    /// assert_eq!(
    ///     AudioSignature::sniff(b"RIFF\x24\x08\x00\x00WAVEfmt "),
    ///     Some(AudioSignature::Wav)
    /// );
    /// assert_eq!(AudioSignature::sniff(b"#!/bin/sh\n"), None);
    /// ```
    #[must_use]
    pub fn sniff(header: &[u8]) -> Option<Self> {
        Self::ALL.into_iter().find(|signature| signature.matches(header))
    }

    /// Returns a short display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wav => "WAV",
            Self::Aiff => "AIFF",
            Self::Ogg => "OGG",
            Self::Mp3Id3 => "MP3 (ID3)",
            Self::Mp3FrameSync => "MP3",
            Self::AacAdts => "AAC",
            Self::Mp4 => "MP4",
        }
    }
}

impl fmt::Display for AudioSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
