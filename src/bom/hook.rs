//! Hooks run when a version is set on a [`ResolvedVersionSet`]
//!
//! [`ResolvedVersionSet`]: crate::bom::set::ResolvedVersionSet

use serde::Deserialize;

/// Project-specific side effect of setting a version
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VersionHook {
    /// No side effect
    #[default]
    NoOp,
    /// Setting `trigger` also sets every `linked` project to the same version
    /// (e.g., `spring-boot` drives `spring-boot-dependencies`)
    #[serde(rename_all = "camelCase")]
    Propagate { trigger: String, linked: Vec<String> },
}

impl VersionHook {
    /// Projects that must additionally receive the version set on `name`
    pub fn linked_names(&self, name: &str) -> &[String] {
        match self {
            VersionHook::Propagate { trigger, linked } if trigger == name => linked,
            _ => &[],
        }
    }
}
