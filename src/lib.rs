//! Release-train version alignment
//!
//! Resolves the versions a release-train BOM pins, rewrites them into every
//! project's build descriptors and refuses to leave a release tree with
//! versions its maturity forbids.

pub mod bom;
pub mod config;
pub mod git;
pub mod host;
pub mod parser;
pub mod process;
pub mod release;
pub mod rewrite;
pub mod version;
