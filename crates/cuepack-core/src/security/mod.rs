//! Content security: audio signatures, single-file admission and the
//! post-extraction sanitizer.

pub mod admission;
pub mod content;
pub mod signature;

pub use admission::AdmittedFile;
pub use admission::admit_file;
pub use admission::check_file;
pub use admission::check_leaf;
pub use content::Removal;
pub use content::SanitizeReport;
pub use content::sanitize_pack_dir;
pub use signature::AudioSignature;
