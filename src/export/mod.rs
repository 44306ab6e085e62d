//! Playlist export: path translation, media copying and WPL generation

pub mod copier;
pub mod engine;
pub mod path;
pub mod wpl;

pub use engine::Exporter;
pub use path::RootOffset;
