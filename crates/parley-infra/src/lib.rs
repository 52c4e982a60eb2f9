//! Infrastructure layer for Parley.
//!
//! Everything that touches the outside world lives here: resolving the data
//! directory and reading `config.toml` from it.

pub mod config;
pub mod filesystem;
