//! Builds the tracker session and save repository used by front-ends.
use std::sync::Arc;

use anyhow::{Context, Result};
use runtime::{FileSaveRepository, SaveRepository, SessionOptions, TrackerSession};

use crate::config::TrackerConfig;

/// Builder that assembles the session, its storage, and configuration.
pub struct SessionBuilder {
    config: TrackerConfig,
    repository: Option<Arc<dyn SaveRepository>>,
    dice_seed: Option<u64>,
    resume: bool,
}

impl SessionBuilder {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            repository: None,
            dice_seed: None,
            resume: true,
        }
    }

    /// Provide a custom repository (e.g. in-memory for tests).
    pub fn repository(mut self, repository: Arc<dyn SaveRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Seed join battle dice for reproducible sessions.
    pub fn dice_seed(mut self, seed: u64) -> Self {
        self.dice_seed = Some(seed);
        self
    }

    /// Whether to load the configured session slot if it exists (default: true).
    pub fn resume(mut self, resume: bool) -> Self {
        self.resume = resume;
        self
    }

    pub fn build(self) -> Result<SessionSetup> {
        let repository: Arc<dyn SaveRepository> = match self.repository {
            Some(repository) => repository,
            None => Arc::new(
                FileSaveRepository::new(&self.config.save_dir).with_context(|| {
                    format!(
                        "failed to open save directory {}",
                        self.config.save_dir.display()
                    )
                })?,
            ),
        };

        let mut session = TrackerSession::new(SessionOptions {
            rules: self.config.rules,
            undo_limit: self.config.undo_limit,
            dice_seed: self.dice_seed,
            ..SessionOptions::default()
        });

        let mut resumed = false;
        if self.resume {
            let slot = self.config.session_slot.as_str();
            match repository.load(slot) {
                Ok(Some(save)) => match session.load(save, slot) {
                    Ok(_) => resumed = true,
                    Err(e) => tracing::warn!("could not restore slot '{}': {}", slot, e),
                },
                Ok(None) => tracing::debug!("no save in slot '{}', starting fresh", slot),
                Err(e) => tracing::warn!("could not read slot '{}': {}", slot, e),
            }
        }

        tracing::info!(
            "session ready: {} entities, resumed={}",
            session.state().population.len(),
            resumed
        );

        Ok(SessionSetup {
            config: self.config,
            repository,
            session,
            resumed,
        })
    }
}

pub struct SessionSetup {
    pub config: TrackerConfig,
    pub repository: Arc<dyn SaveRepository>,
    pub session: TrackerSession,
    /// True when the session slot was loaded.
    pub resumed: bool,
}
