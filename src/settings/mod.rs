//! Export settings: persistence, first-run prompts and playlist selection

pub mod prompt;
pub mod selection;
pub mod store;

pub use selection::{included, reconcile, PlaylistSelection};
pub use store::Settings;
