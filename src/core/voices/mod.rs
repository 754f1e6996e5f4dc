//! Voice profile management

mod presets;
mod profile;
mod store;

pub use presets::{BUILTIN_PRESETS, is_builtin_preset};
pub use profile::{PROFILE_EXTENSION, VoiceProfile, sanitize_name};
pub use store::VoiceStore;
