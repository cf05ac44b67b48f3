//! # nestcfg-cli
//!
//! Library half of the `nestcfg` command-line tool.  The binary in `main.rs`
//! only parses arguments and sets up logging; the work happens here so it can
//! be unit-tested against in-memory storage.
//!
//! - [`commands`] – `get`, `set`, `create-header`, `fmt` and `tree`.
//! - [`settings`] – TOML settings file (default indent, log level).

pub mod commands;
pub mod settings;
