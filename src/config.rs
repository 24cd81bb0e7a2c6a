//! Configuration loader and schema types.
//!
//! This module exposes the settings schema that drives the binary (player
//! options, preference storage, library scanning and inline playlists) and
//! helpers to load it from disk and the environment.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
