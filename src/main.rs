use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use release_train::bom::BomCache;
use release_train::config::{self, ReleaserConfig};
use release_train::git::SystemGit;
use release_train::host::{CodeHostClient, GitHubClient};
use release_train::process::TokioProcessRunner;
use release_train::release::{bom_sources, resolve_train, update_projects};
use release_train::rewrite::{RewriteOptions, TreeRewriter};
use release_train::version::Version;

#[derive(Parser)]
#[command(name = "release-train")]
#[command(version, about = "Align project versions with a release train BOM")]
struct Cli {
    /// Write log lines as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the resolved train versions as JSON
    Resolve {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Rewrite project trees to the resolved train versions
    Rewrite {
        #[arg(short, long)]
        config: PathBuf,
        /// Version being released; defaults to the train version
        #[arg(long)]
        release: Option<Version>,
        /// Fail when a rewritten descriptor keeps a version the release forbids
        #[arg(long)]
        assert: bool,
        #[arg(required = true)]
        roots: Vec<PathBuf>,
    },
    /// Order two versions
    Compare {
        left: Version,
        right: Version,
        /// Compare as release train versions instead of by maturity
        #[arg(long)]
        train: bool,
    },
    /// Print the versions derived from a version
    Next {
        version: Version,
        /// Tag prefix
        #[arg(long, default_value = "v")]
        prefix: String,
    },
    /// Close a release milestone on the code host
    CloseMilestone {
        #[arg(short, long)]
        config: PathBuf,
        repo: String,
        title: String,
    },
}

fn init_logging(json: bool) -> anyhow::Result<WorkerGuard> {
    let log_path = config::log_path();
    let log_dir = log_path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;

    let file_name = log_path
        .file_name()
        .context("log path has no file name")?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, file_name));
    let filter =
        EnvFilter::try_from_env("RELEASE_TRAIN_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(guard)
}

fn symbol(ordering: Ordering) -> &'static str {
    match ordering {
        Ordering::Less => "<",
        Ordering::Equal => "=",
        Ordering::Greater => ">",
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Resolve { config } => {
            let config = ReleaserConfig::load(&config)?;
            let git = SystemGit::new(Arc::new(TokioProcessRunner), config.process_timeout());
            let cache = BomCache::new();
            let set = resolve_train(
                &git,
                &bom_sources(&config),
                &cache,
                &config,
                &config::clones_dir(),
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(set.versions())?);
            cache.clear();
        }
        Command::Rewrite {
            config,
            release,
            assert,
            roots,
        } => {
            let config = ReleaserConfig::load(&config)?;
            let rules = config.ignore_rules()?;
            let git = SystemGit::new(Arc::new(TokioProcessRunner), config.process_timeout());
            let cache = BomCache::new();
            let set = resolve_train(
                &git,
                &bom_sources(&config),
                &cache,
                &config,
                &config::clones_dir(),
            )
            .await?;

            let release_version = match release {
                Some(version) => version,
                None => set
                    .train_version()
                    .cloned()
                    .context("BOM does not declare a train version; pass --release")?,
            };
            info!("Rewriting {} roots for {}", roots.len(), release_version);

            let rewriter = TreeRewriter::new(
                set,
                RewriteOptions {
                    release_version,
                    assert_versions: assert,
                },
            )
            .with_rules(rules);
            let outcomes = update_projects(&rewriter, roots).await?;
            cache.clear();

            let mut failures = 0;
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(report) => println!(
                        "{}: {} rewritten, {} unchanged, {} ignored",
                        outcome.root.display(),
                        report.rewritten(),
                        report.skipped(),
                        report.ignored()
                    ),
                    Err(e) => {
                        failures += 1;
                        eprintln!("{}: {}", outcome.root.display(), e);
                    }
                }
            }
            if failures > 0 {
                bail!("{} of {} projects failed", failures, outcomes.len());
            }
        }
        Command::Compare {
            left,
            right,
            train,
        } => {
            let ordering = if train {
                left.compare_train_identity(&right)
            } else {
                left.compare_maturity(&right)
            };
            println!("{} {} {}", left, symbol(ordering), right);
        }
        Command::Next { version, prefix } => {
            println!("type:              {}", version.release_type());
            println!("bump:              {}", version.bump());
            println!("snapshot:          {}", version.post_release_snapshot());
            let none = || "-".to_string();
            println!(
                "previous patch:    {}",
                version.previous_patch_tag(&prefix, None).unwrap_or_else(none)
            );
            println!(
                "previous minor:    {}",
                version.previous_minor_tag_pattern(&prefix).unwrap_or_else(none)
            );
            println!(
                "previous major:    {}",
                version.previous_major_tag_pattern(&prefix).unwrap_or_else(none)
            );
        }
        Command::CloseMilestone {
            config,
            repo,
            title,
        } => {
            let config = ReleaserConfig::load(&config)?;
            let client = GitHubClient::new(
                &config.host.base_url,
                &config.host.organization,
                config.host.token.clone(),
            );
            client.close_milestone(&repo, &title).await?;
            println!("Closed milestone {} of {}", title, repo);
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.json)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli.command))
}
