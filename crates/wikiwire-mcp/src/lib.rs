//! `wikiwire` crate (library surface).
//!
//! The primary entrypoint is the `wikiwire` binary (CLI + MCP stdio server). The
//! library exposes the MCP handler so it can be embedded or driven in-process.

pub use wikiwire_core as core;
pub use wikiwire_http as http;

#[cfg(feature = "stdio")]
pub mod mcp;
