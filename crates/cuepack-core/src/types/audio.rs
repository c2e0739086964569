//! Allow-listed audio file formats.

use std::fmt;
use std::path::Path;

/// Audio container recognized by its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    /// `.wav`
    Wav,
    /// `.mp3`
    Mp3,
    /// `.aiff`
    Aiff,
    /// `.m4a`
    M4a,
    /// `.ogg`
    Ogg,
    /// `.aac`
    Aac,
}

impl AudioFormat {
    /// Every allow-listed format.
    pub const ALL: [Self; 6] = [
        Self::Wav,
        Self::Mp3,
        Self::Aiff,
        Self::M4a,
        Self::Ogg,
        Self::Aac,
    ];

    /// Returns the canonical lowercase extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::Aiff => "aiff",
            Self::M4a => "m4a",
            Self::Ogg => "ogg",
            Self::Aac => "aac",
        }
    }

    /// Matches an extension case-insensitively.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.extension().eq_ignore_ascii_case(extension))
    }

    /// Matches the extension of a file name or path.
    ///
    /// Uses [`Path::extension`] semantics, so `.wav` (a hidden file with no
    /// extension) and `wav` are not audio files.
    ///
    /// # Examples
    ///
    /// ```
    /// use cuepack_core::AudioFormat;
    ///
    /// assert_eq!(AudioFormat::from_file_name("ding.WAV"), Some(AudioFormat::Wav));
    /// assert_eq!(AudioFormat::from_file_name("ding.wav.exe"), None);
    /// assert_eq!(AudioFormat::from_file_name(".wav"), None);
    /// ```
    #[must_use]
    pub fn from_file_name<P: AsRef<Path>>(name: P) -> Option<Self> {
        name.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
