//! Release orchestration
//!
//! Glue between the collaborators and the core: check out the train BOM,
//! resolve it once per branch, then align any number of project trees.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use futures::future::join_all;
use tracing::{info, warn};

use crate::bom::cache::BomCache;
use crate::bom::set::ResolvedVersionSet;
use crate::bom::source::BomSources;
use crate::bom::sources::create_default_sources;
use crate::config::ReleaserConfig;
use crate::git::SourceRepository;
use crate::rewrite::error::RewriteError;
use crate::rewrite::tree::{RewriteReport, TreeRewriter};

/// BOM sources for a configuration: the default Maven/Gradle chain carrying
/// the configured propagations, followed by the configured contributions
pub fn bom_sources(config: &ReleaserConfig) -> BomSources {
    create_default_sources(
        config.train.propagations.clone(),
        config.contributions.clone(),
    )
}

/// Checkout folder of a BOM branch below `clones_dir`
fn checkout_dir(clones_dir: &Path, config: &ReleaserConfig) -> PathBuf {
    let train = if config.train.canonical.is_empty() {
        "bom"
    } else {
        config.train.canonical.as_str()
    };
    clones_dir
        .join(train)
        .join(config.train.bom_branch.replace('/', "_"))
}

/// Resolve the train version set for the configured BOM branch.
///
/// The BOM is cloned (once) and checked out through `repository`, resolved
/// by `sources` and finished with the fixed-version overrides. The result
/// is memoised in `cache` under the branch name.
pub async fn resolve_train(
    repository: &dyn SourceRepository,
    sources: &BomSources,
    cache: &BomCache,
    config: &ReleaserConfig,
    clones_dir: &Path,
) -> anyhow::Result<Arc<ResolvedVersionSet>> {
    let url = config
        .train
        .bom_url
        .as_deref()
        .context("train.bomUrl is not configured")?;

    cache
        .get_or_try_resolve(&config.train.bom_branch, || {
            checkout_and_resolve(repository, sources, config, url, clones_dir)
        })
        .await
}

async fn checkout_and_resolve(
    repository: &dyn SourceRepository,
    sources: &BomSources,
    config: &ReleaserConfig,
    url: &str,
    clones_dir: &Path,
) -> anyhow::Result<ResolvedVersionSet> {
    let branch = config.train.bom_branch.as_str();
    let checkout = checkout_dir(clones_dir, config);
    if !checkout.join(".git").exists() {
        repository
            .clone_repository(url, &checkout)
            .await
            .with_context(|| format!("Failed to clone {}", url))?;
    }
    if !repository.has_branch(&checkout, branch).await? {
        bail!("BOM repository {} has no branch {}", url, branch);
    }
    repository.checkout(&checkout, branch).await?;

    let train = config.train_identity();
    let resolver = sources.clone();
    let bom_root = checkout.clone();
    let mut set = tokio::task::spawn_blocking(move || resolver.resolve(&bom_root, &train))
        .await
        .context("BOM resolution task failed")?
        .with_context(|| format!("Failed to resolve BOM at {}", checkout.display()))?;

    set.apply_overrides(&config.fixed_versions);
    info!(
        "Resolved {} versions for {} ({})",
        set.len(),
        branch,
        set.train_version()
            .map(|version| version.as_str())
            .unwrap_or("no train version")
    );
    Ok(set)
}

/// Rewrite outcome of one project root
#[derive(Debug)]
pub struct ProjectOutcome {
    pub root: PathBuf,
    pub result: Result<RewriteReport, RewriteError>,
}

/// Rewrite every root concurrently. Each root is walked sequentially; a
/// failing root does not stop the others.
pub async fn update_projects(
    rewriter: &TreeRewriter,
    roots: Vec<PathBuf>,
) -> anyhow::Result<Vec<ProjectOutcome>> {
    let tasks = roots.into_iter().map(|root| {
        let rewriter = rewriter.clone();
        tokio::task::spawn_blocking(move || {
            let result = rewriter.rewrite_tree(&root);
            if let Err(e) = &result {
                warn!("Failed to update {}: {}", root.display(), e);
            }
            ProjectOutcome { root, result }
        })
    });

    join_all(tasks)
        .await
        .into_iter()
        .map(|outcome| outcome.context("Project update task failed"))
        .collect()
}
