//! Storage infrastructure: the optional configuration file.
//!
//! The `config` sub-module reads `config.toml` from the XDG config directory
//! and falls back to defaults when the file does not exist.  Nothing is ever
//! written back; the daemon's settings are edited by hand.

pub mod config;
