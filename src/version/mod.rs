//! Version algebra for release trains
//!
//! Parses version strings in both the named-train (`Hoxton.SR1`) and the
//! semantic (`1.0.0.RELEASE`, `2020.0.0-M1`) shape, classifies their
//! maturity, orders them and derives follow-up versions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │    parse    │────▶│ release_type │────▶│   compare   │
//! │  (split)    │     │  (maturity)  │     │ (ordering)  │
//! └─────────────┘     └──────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   derive    │
//! │(bump, tags) │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`parse`]: [`Version`] and its [`SplitVersion`] decomposition
//! - [`release_type`]: [`ReleaseType`] classification
//! - [`compare`]: maturity and train identity ordering
//! - [`derive`]: bumped, snapshot and previous-tag versions
//! - [`error`]: [`VersionError`]

pub mod compare;
pub mod derive;
pub mod error;
pub mod parse;
pub mod release_type;

pub use error::VersionError;
pub use parse::{Delimiter, SplitVersion, Version};
pub use release_type::ReleaseType;
