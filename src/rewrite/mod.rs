//! Project tree rewriting
//!
//! Walks a project checkout, substitutes resolved versions into every build
//! descriptor and, for non-snapshot releases, verifies no forbidden version
//! marker remains in what was written.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ TreeRewriter │────▶│    Parser    │────▶│   substitution   │
//! │   (walk)     │     │ (per system) │     │ (lookup in set)  │
//! └──────────────┘     └──────────────┘     └──────────────────┘
//!        │                                           │
//!        ▼                                           ▼
//! ┌──────────────┐                         ┌──────────────────┐
//! │ IgnoreRules  │                         │ForbiddenPatternSet│
//! └──────────────┘                         └──────────────────┘
//! ```

pub mod error;
pub mod forbidden;
pub mod rules;
pub mod tree;

pub use error::RewriteError;
pub use forbidden::ForbiddenPatternSet;
pub use rules::IgnoreRules;
pub use tree::{RewriteOptions, RewriteReport, TreeRewriter, Visit};
