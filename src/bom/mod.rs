//! BOM resolution
//!
//! Turns a checked-out release-train BOM into a [`ResolvedVersionSet`]: the
//! project-name to version mapping every project in the train is aligned to.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌───────────────────┐
//! │  BomSources  │────▶│ MavenBomSource   │────▶│ ResolvedVersionSet│
//! │ (first match)│     │ GradleBomSource  │     │ (train + hooks)   │
//! └──────────────┘     └──────────────────┘     └───────────────────┘
//!        │                                                ▲
//!        ▼                                                │
//! ┌──────────────────────┐                                │
//! │ CustomContribution   │────────── merge ───────────────┘
//! └──────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`train`]: [`TrainIdentity`], the canonical train name and its aliases
//! - [`set`]: [`ResolvedVersionSet`] lookup and propagation rules
//! - [`hook`]: [`VersionHook`] for linked project versions
//! - [`source`]: [`BomSource`] trait and the [`BomSources`] chain
//! - [`sources`]: Maven and Gradle implementations
//! - [`contribution`]: extra versions merged after source resolution
//! - [`cache`]: [`BomCache`] keyed by train branch

pub mod cache;
pub mod contribution;
pub mod error;
pub mod hook;
pub mod set;
pub mod source;
pub mod sources;
pub mod train;

pub use cache::BomCache;
pub use contribution::CustomContribution;
pub use error::BomError;
pub use hook::VersionHook;
pub use set::ResolvedVersionSet;
pub use source::{BomSource, BomSources};
pub use sources::{GradleBomSource, MavenBomSource, create_default_sources};
pub use train::TrainIdentity;
