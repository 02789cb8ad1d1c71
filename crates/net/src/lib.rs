/// Download utilities
pub mod download;
/// Interacting with the mod listing API
pub mod mods;
