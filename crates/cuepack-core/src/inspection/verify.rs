//! Archive verification without extraction.

use std::io::Read;
use std::path::Path;

use crate::EventName;
use crate::PackId;
use crate::Result;
use crate::error::RejectReason;
use crate::formats::ArchiveInput;
use crate::formats::EntryVisitor;
use crate::formats::walk_archive;
use crate::inspection::audit::audit_entry;
use crate::inspection::audit::split_segments;
use crate::inspection::manifest::ArchiveEntry;
use crate::inspection::manifest::EntryKind;
use crate::inspection::report::ContentFinding;
use crate::inspection::report::ValidationReport;
use crate::inspection::report::VerificationReport;
use crate::security::admission::check_leaf;
use crate::security::admission::read_header;

/// Runs both audit phases against an archive without writing to disk.
///
/// The structural audit covers every entry. Entries that pass it are then
/// checked against the content rules using their in-archive data: location,
/// event directory, extension, declared size and leading bytes. The report
/// lists everything the installer would reject or remove.
///
/// # Errors
///
/// Returns an error only if the archive cannot be read (or exceeds the
/// listing quotas). Violations are reported in the returned report.
///
/// # Examples
///
/// ```no_run
/// use cuepack_core::PackId;
/// use cuepack_core::verify_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let id = PackId::parse("retro-beeps")?;
/// let report = verify_archive("retro-beeps.zip", &id)?;
///
/// if !report.passes() {
///     for message in report.messages() {
///         eprintln!("{message}");
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub fn verify_archive<P: AsRef<Path>>(
    archive_path: P,
    pack_id: &PackId,
) -> Result<VerificationReport> {
    verify_input(ArchiveInput::Path(archive_path.as_ref()), pack_id)
}

/// Verifies an in-memory archive.
///
/// # Errors
///
/// Same as [`verify_archive`].
pub fn verify_bytes(bytes: &[u8], pack_id: &PackId) -> Result<VerificationReport> {
    verify_input(ArchiveInput::Bytes(bytes), pack_id)
}

/// Verifies an archive from any input.
///
/// # Errors
///
/// Same as [`verify_archive`].
pub fn verify_input(input: ArchiveInput<'_>, pack_id: &PackId) -> Result<VerificationReport> {
    let mut verifier = Verifier {
        pack_id,
        total_entries: 0,
        structural: ValidationReport::new(),
        content: Vec::new(),
    };
    let format = walk_archive(input, &mut verifier)?;

    Ok(VerificationReport {
        format,
        total_entries: verifier.total_entries,
        structural: verifier.structural,
        content: verifier.content,
    })
}

struct Verifier<'a> {
    pack_id: &'a PackId,
    total_entries: usize,
    structural: ValidationReport,
    content: Vec<ContentFinding>,
}

impl EntryVisitor for Verifier<'_> {
    fn visit(&mut self, entry: &ArchiveEntry, data: &mut dyn Read) -> Result<()> {
        self.total_entries += 1;

        let before = self.structural.len();
        audit_entry(entry, self.pack_id, &mut self.structural);
        if self.structural.len() > before {
            return Ok(());
        }

        if let Some(reason) = content_verdict(entry, data)? {
            self.content.push(ContentFinding {
                path: entry.path.clone(),
                reason,
            });
        }
        Ok(())
    }
}

/// Content rules for an entry that already passed the structural audit.
fn content_verdict(entry: &ArchiveEntry, data: &mut dyn Read) -> Result<Option<RejectReason>> {
    let segments = split_segments(&entry.path);
    let inside_pack = segments.get(1..).unwrap_or_default();

    let verdict = match (entry.kind, inside_pack) {
        (EntryKind::Symlink, _) => Some(RejectReason::Symlink),
        (EntryKind::Directory, [] | [_]) => inside_pack
            .first()
            .filter(|event| EventName::from_name(event).is_none())
            .map(|_| RejectReason::UnknownEvent),
        (EntryKind::Directory, _) => Some(RejectReason::UnexpectedLocation),
        (EntryKind::File, [event, name]) => {
            if EventName::from_name(event).is_none() {
                Some(RejectReason::UnknownEvent)
            } else {
                let header = read_header(data)?;
                check_leaf(Path::new(name), entry.size, &header).err()
            }
        }
        (EntryKind::File, _) => Some(RejectReason::UnexpectedLocation),
    };
    Ok(verdict)
}
