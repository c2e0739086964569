//! Validated domain types.
//!
//! Identifiers that end up in filesystem paths are newtypes that can only be
//! built through validation, and the recognized events and audio formats are
//! closed enums.

pub mod audio;
pub mod event;
pub mod pack_id;

pub use audio::AudioFormat;
pub use event::EventName;
pub use pack_id::PackId;
