//! Entry visitor used by the format walkers.

use std::io::Read;

use crate::Result;
use crate::inspection::ArchiveEntry;

/// Receives each archive entry in order, together with its data stream.
///
/// The stream yields the entry's uncompressed bytes. For directory and
/// symlink entries it should not be read. Returning an error aborts the walk.
pub trait EntryVisitor {
    /// Called once per entry.
    ///
    /// # Errors
    ///
    /// Any error stops the walk and is returned from
    /// [`walk_archive`](super::walk_archive).
    fn visit(&mut self, entry: &ArchiveEntry, data: &mut dyn Read) -> Result<()>;
}

impl<F> EntryVisitor for F
where
    F: FnMut(&ArchiveEntry, &mut dyn Read) -> Result<()>,
{
    fn visit(&mut self, entry: &ArchiveEntry, data: &mut dyn Read) -> Result<()> {
        self(entry, data)
    }
}
