//! Extraction into scratch space and atomic publish.

pub mod atomic;
pub mod extract;
pub mod scratch;
pub mod stream;

pub use atomic::publish;
pub use atomic::retire;
pub use extract::ExtractSummary;
pub use extract::extract_into;
pub use scratch::ScratchDir;
