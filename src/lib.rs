//! goup library
//!
//! Fetches the Go download-listing page, finds the archive for this platform,
//! downloads it and replaces the toolchain under the install root.

pub mod commands;
pub mod core;
pub mod error;
pub mod utils;
