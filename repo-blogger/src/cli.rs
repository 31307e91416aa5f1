//! # repo-blogger CLI Interface
//!
//! Command parsing and orchestration glue for the `repo-blogger` binary. All
//! pipeline logic lives in `repo-blogger-core`; this module wires the concrete
//! collector, store and publishers into it and prints a short summary.
//!
//! ## Subcommands
//! - `run --url <URL> [--config <yaml>] [--publish]`: generate an article for one repository.
//! - `index [--config <yaml>]`: regenerate `index.html` over the rendered articles.
//! - `queue [--config <yaml>]`: list image prompts still waiting for a worker.
//!
//! For programmatic and integration use, call [`run`] with a constructed [`Cli`].
use crate::load_config::load_config;
use crate::publish::publishers_from_config;
use crate::store::SupabaseStore;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use repo_blogger_core::collect::GitCollector;
use repo_blogger_core::contract::Store;
use repo_blogger_core::pipeline::Pipeline;
use repo_blogger_core::render::write_index;
use std::path::PathBuf;

/// CLI for repo-blogger: turn a git repository into an introduction article.
#[derive(Parser)]
#[clap(
    name = "repo-blogger",
    version,
    about = "Generate long-form introduction articles and image prompts from git repositories"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect, analyze and write an article for one repository
    Run {
        /// Repository URL to clone
        #[clap(long)]
        url: String,
        /// Optional YAML file overriding directories and timeouts
        #[clap(long)]
        config: Option<PathBuf>,
        /// Also push the article to every configured blog platform
        #[clap(long)]
        publish: bool,
    },
    /// Regenerate index.html over every rendered article
    Index {
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// List image prompts waiting in the store
    Queue {
        #[clap(long)]
        config: Option<PathBuf>,
    },
}

/// Async CLI entrypoint shared by `main()` and the integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Run {
            url,
            config,
            publish,
        } => {
            let config = load_config(config.as_deref())?;
            tracing::info!(command = "run", repo_url = %url, publish, "Starting pipeline");

            let collector = GitCollector::new(&config);
            let store = SupabaseStore::new(&config);
            let mut pipeline = Pipeline::new(&config, collector, store);
            if publish {
                pipeline = pipeline.with_publishers(publishers_from_config(&config));
            }

            let report = pipeline.run(&url).await;
            tracing::info!(
                command = "run",
                run_id = %report.run_id,
                draft_status = report.draft_status.tag(),
                "Pipeline complete"
            );

            println!("Draft title: {}", report.draft.title);
            println!("Prompts queued: {}", report.prompts.len());
            if let Some(outputs) = &report.outputs {
                println!("Markdown: {}", outputs.markdown.display());
                println!("HTML: {}", outputs.html.display());
            }
            if let Some(link) = &report.published_link {
                println!("Published: {link}");
            }
            Ok(())
        }
        Commands::Index { config } => {
            let config = load_config(config.as_deref())?;
            let (path, count) = write_index(&config.output_dir, Utc::now()).with_context(|| {
                format!("Failed to write index in {}", config.output_dir.display())
            })?;
            tracing::info!(command = "index", path = %path.display(), count, "Index written");
            println!("Index written: {} ({count} posts)", path.display());
            Ok(())
        }
        Commands::Queue { config } => {
            let config = load_config(config.as_deref())?;
            let store = SupabaseStore::new(&config);
            if !store.is_configured() {
                tracing::info!(command = "queue", "Supabase not configured");
            }
            let prompts = store
                .fetch_waiting_prompts()
                .await
                .map_err(|e| anyhow::Error::msg(format!("Fetching waiting prompts failed: {e}")))?;
            for prompt in &prompts {
                println!("[{}] {}", prompt.section, prompt.prompt);
            }
            println!("Waiting prompts: {}", prompts.len());
            Ok(())
        }
    }
}
