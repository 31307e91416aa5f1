//! High-level pipeline: collect → analyze → compose → prompts, then persist,
//! render and optionally publish.
//!
//! Each stage consumes only the previous stage's record. Nothing after the
//! collector can fail, and the side effects (snapshot file, store rows, local
//! files, publishing) only log and record their outcome in the
//! [`PipelineReport`]. A run therefore always yields a draft with a title and
//! at least one prompt, whatever happened to the repository or the backends.
//!
//! # Navigation
//! - Main entrypoint: [`Pipeline::run`]
//! - Publishing helper: [`publish_all`]

use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analyze::analyze;
use crate::collect::save_snapshot;
use crate::compose::DraftComposer;
use crate::config::BloggerConfig;
use crate::contract::{Collector, PublishOutcome, Publisher, Store, StoreStatus};
use crate::model::{Analysis, Draft, Prompt, Snapshot};
use crate::prompts::generate_prompts;
use crate::render::{markdown_to_html, write_local_outputs, LocalOutputs};

pub const DRAFTS_TABLE: &str = "blog_drafts";
pub const PROMPTS_TABLE: &str = "image_prompts";
pub const WAITING_STATUS: &str = "waiting";
pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// Everything a run produced.
#[derive(Debug)]
pub struct PipelineReport {
    pub run_id: Uuid,
    pub snapshot: Snapshot,
    pub analysis: Analysis,
    pub draft: Draft,
    pub prompts: Vec<Prompt>,
    pub draft_status: StoreStatus,
    pub prompt_statuses: Vec<StoreStatus>,
    /// `None` when the local files could not be written.
    pub outputs: Option<LocalOutputs>,
    /// First canonical link returned by a publisher, if any.
    pub published_link: Option<String>,
}

pub struct Pipeline<C, S> {
    collector: C,
    store: S,
    composer: DraftComposer,
    workdir: PathBuf,
    output_dir: PathBuf,
    publishers: Vec<Box<dyn Publisher>>,
}

impl<C, S> Pipeline<C, S>
where
    C: Collector,
    S: Store,
{
    /// Pipeline using the config's directories and writing guide.
    pub fn new(config: &BloggerConfig, collector: C, store: S) -> Self {
        Self {
            collector,
            store,
            composer: DraftComposer::from_template_file(&config.template_path),
            workdir: config.workdir.clone(),
            output_dir: config.output_dir.clone(),
            publishers: Vec::new(),
        }
    }

    /// Publish the rendered article to these targets at the end of each run.
    pub fn with_publishers(mut self, publishers: Vec<Box<dyn Publisher>>) -> Self {
        self.publishers = publishers;
        self
    }

    pub async fn run(&self, repo_url: &str) -> PipelineReport {
        let run_id = Uuid::new_v4();
        let span = info_span!("pipeline", %run_id, repo_url);
        self.run_stages(run_id, repo_url).instrument(span).await
    }

    async fn run_stages(&self, run_id: Uuid, repo_url: &str) -> PipelineReport {
        info!("[PIPELINE] Starting run");

        let snapshot = self.collector.collect(repo_url).await;
        let snapshot_path = self.workdir.join(SNAPSHOT_FILE);
        match save_snapshot(&snapshot, &snapshot_path) {
            Ok(()) => info!(path = %snapshot_path.display(), "[PIPELINE] Saved snapshot"),
            Err(e) => warn!(error = %e, path = %snapshot_path.display(), "[PIPELINE] Failed to save snapshot"),
        }

        let analysis = analyze(&snapshot);
        let draft = self.composer.compose(&analysis);
        let prompts = generate_prompts(&draft);
        info!(
            title = %draft.title,
            prompts = prompts.len(),
            "[PIPELINE] Draft and prompts generated"
        );

        let (draft_status, prompt_statuses) = self.persist(run_id, &draft, &prompts).await;

        let outputs = match write_local_outputs(&self.output_dir, &draft) {
            Ok(outputs) => Some(outputs),
            Err(e) => {
                error!(error = %e, output_dir = %self.output_dir.display(), "[PIPELINE][ERROR] Failed to write local outputs");
                None
            }
        };

        let published_link = if self.publishers.is_empty() {
            None
        } else {
            publish_all(&self.publishers, &draft.title, &markdown_to_html(&draft.body_md)).await
        };

        info!(
            draft_status = draft_status.tag(),
            outputs_written = outputs.is_some(),
            published = published_link.is_some(),
            "[PIPELINE] Run complete"
        );

        PipelineReport {
            run_id,
            snapshot,
            analysis,
            draft,
            prompts,
            draft_status,
            prompt_statuses,
            outputs,
            published_link,
        }
    }

    async fn persist(
        &self,
        run_id: Uuid,
        draft: &Draft,
        prompts: &[Prompt],
    ) -> (StoreStatus, Vec<StoreStatus>) {
        let draft_status = match draft_record(run_id, draft) {
            Some(record) => self.store.insert(DRAFTS_TABLE, record).await,
            None => StoreStatus::Error("draft could not be serialized".to_string()),
        };
        log_status(DRAFTS_TABLE, &draft_status);

        let mut prompt_statuses = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            let status = match prompt_record(run_id, prompt) {
                Some(record) => self.store.insert(PROMPTS_TABLE, record).await,
                None => StoreStatus::Error("prompt could not be serialized".to_string()),
            };
            log_status(PROMPTS_TABLE, &status);
            prompt_statuses.push(status);
        }
        (draft_status, prompt_statuses)
    }
}

fn log_status(table: &str, status: &StoreStatus) {
    match status {
        StoreStatus::Ok(_) => info!(table, status = status.tag(), "[PIPELINE][STORE] Insert accepted"),
        StoreStatus::NotConfigured => info!(table, status = status.tag(), "[PIPELINE][STORE] No store configured, skipped"),
        StoreStatus::Error(e) => warn!(table, status = status.tag(), error = %e, "[PIPELINE][STORE] Insert failed, continuing"),
    }
}

/// Row for the drafts table: the draft plus run id and a SHA-256 of the body.
pub fn draft_record(run_id: Uuid, draft: &Draft) -> Option<Value> {
    let mut record = match serde_json::to_value(draft) {
        Ok(value) => value,
        Err(e) => {
            error!(error = ?e, "[PIPELINE][STORE] Failed to serialize draft");
            return None;
        }
    };
    if let Some(fields) = record.as_object_mut() {
        fields.insert("run_id".to_string(), json!(run_id));
        fields.insert("content_hash".to_string(), json!(content_hash(&draft.body_md)));
    }
    Some(record)
}

/// Row for the prompts table, queued for the image worker.
pub fn prompt_record(run_id: Uuid, prompt: &Prompt) -> Option<Value> {
    let mut record = match serde_json::to_value(prompt) {
        Ok(value) => value,
        Err(e) => {
            error!(error = ?e, "[PIPELINE][STORE] Failed to serialize prompt");
            return None;
        }
    };
    if let Some(fields) = record.as_object_mut() {
        fields.insert("run_id".to_string(), json!(run_id));
        fields.insert("status".to_string(), json!(WAITING_STATUS));
    }
    Some(record)
}

fn content_hash(body: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Push the article to every publisher in order; returns the first link any
/// of them reported. Failures and unconfigured targets are logged only.
pub async fn publish_all(
    publishers: &[Box<dyn Publisher>],
    title: &str,
    html: &str,
) -> Option<String> {
    let mut first_link = None;
    for publisher in publishers {
        let outcome = publisher.publish(title, html).await;
        match &outcome {
            PublishOutcome::Published(link) => {
                info!(target_name = publisher.name(), link = ?link, "[PIPELINE][PUBLISH] Published")
            }
            PublishOutcome::NotConfigured => {
                info!(target_name = publisher.name(), "[PIPELINE][PUBLISH] Not configured, skipped")
            }
            PublishOutcome::Failed(e) => {
                warn!(target_name = publisher.name(), error = %e, "[PIPELINE][PUBLISH] Publish failed, continuing")
            }
        }
        if first_link.is_none() {
            first_link = outcome.link().map(str::to_string);
        }
    }
    first_link
}
