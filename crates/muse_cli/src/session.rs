//! One interactive session: owns the idea store and runs generation cycles.

use crate::output;
use anyhow::{Context, Result};
use chrono::Local;
use muse_core::Record;
use muse_memory::IdeaStore;
use muse_reasoning::{blend, Contribution, Studio};
use muse_voice::Narrator;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct CycleOutcome {
    pub record: Record,
    pub output_path: PathBuf,
    pub contributions: Vec<Contribution>,
    /// Detached narration task, if speech is on. Dropping it does not cancel it.
    pub narration: Option<JoinHandle<()>>,
}

pub struct Session {
    store: IdeaStore,
    studio: Studio,
    narrator: Option<Arc<Narrator>>,
    output_dir: PathBuf,
    recall_top_k: usize,
}

impl Session {
    pub fn new(
        store: IdeaStore,
        studio: Studio,
        narrator: Option<Arc<Narrator>>,
        output_dir: PathBuf,
        recall_top_k: usize,
    ) -> Self {
        Self {
            store,
            studio,
            narrator,
            output_dir,
            recall_top_k,
        }
    }

    pub fn store(&self) -> &IdeaStore {
        &self.store
    }

    /// Recall, brainstorm, blend, write the output file, remember, then speak.
    pub async fn run_cycle(&mut self, prompt: &str) -> Result<CycleOutcome> {
        let related = self.store.search(prompt, self.recall_top_k);
        debug!(related = related.len(), "recalled related ideas");

        let contributions = self.studio.brainstorm(prompt, &related).await;
        let fallbacks = contributions.iter().filter(|c| c.fallback).count();
        let blended = blend(prompt, &contributions);

        let now = Local::now();
        let output_path = output::write_idea(&self.output_dir, &blended, now)?;

        let record = Record::at(prompt, blended.clone(), now);
        if let Err(e) = self.store.append(record.clone()) {
            if let Err(rm) = std::fs::remove_file(&output_path) {
                debug!(path = %output_path.display(), "Failed to remove unsaved idea file: {}", rm);
            }
            return Err(e).context("Failed to save idea to memory");
        }
        info!(
            output = %output_path.display(),
            records = self.store.len(),
            fallbacks,
            "idea cycle complete"
        );

        let narration = self
            .narrator
            .as_ref()
            .map(|n| n.narrate_detached(blended, output_path.with_extension("")));

        Ok(CycleOutcome {
            record,
            output_path,
            contributions,
            narration,
        })
    }
}
