//! Validated pack identifier.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::PackError;
use crate::Result;

/// Identifier of a sound pack, safe to use as a single path component.
///
/// A `PackId` matches `[a-z0-9-]+`. Because the id is joined onto the packs
/// directory, it is validated before any path is built from it: an id such as
/// `../evil` or `a/b` never becomes a `PackId`.
///
/// # Security Properties
///
/// - Can ONLY be constructed through [`PackId::parse`] (or `FromStr`)
/// - NO `From<String>` implementation
/// - Never contains a separator, `.` or `..`
///
/// # Examples
///
/// ```
/// use cuepack_core::PackId;
///
/// let id = PackId::parse("retro-beeps-2")?;
/// assert_eq!(id.as_str(), "retro-beeps-2");
///
/// assert!(PackId::parse("../etc").is_err());
/// assert!(PackId::parse("Retro").is_err());
/// assert!(PackId::parse("").is_err());
/// # Ok::<(), cuepack_core::PackError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackId(String);

impl PackId {
    /// Validates and constructs a `PackId`.
    ///
    /// # Errors
    ///
    /// Returns `PackError::InvalidPackId` if `id` is empty or contains any
    /// character outside `[a-z0-9-]`.
    pub fn parse(id: &str) -> Result<Self> {
        if is_valid_pack_id(id) {
            Ok(Self(id.to_owned()))
        } else {
            Err(PackError::InvalidPackId { id: id.to_owned() })
        }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns `true` if `id` matches `[a-z0-9-]+`.
#[must_use]
pub fn is_valid_pack_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

impl FromStr for PackId {
    type Err = PackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<Path> for PackId {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}
