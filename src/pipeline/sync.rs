//! Poll / diff engine.
//!
//! One `synchronize` call fetches the full correct-submission list from
//! the scoreboard, diffs it against the durable seen-log (the log is
//! always a prefix of the remote list), classifies each new entry in
//! arrival order, fans announcements out to every configured channel, and
//! extends the log in one durable write only after the whole batch
//! classified successfully. A classification failure leaves the log
//! untouched so the entire cycle is retried on the next invocation.

use std::collections::HashSet;

use crate::config::Config;
use crate::error::Result;
use crate::pipeline::SolveClassifier;
use crate::services::{Notifier, Scoreboard};
use crate::storage::SolveStore;

/// Outcome of one synchronize cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncResult {
    /// New submissions classified and logged this cycle
    pub processed: usize,

    /// Submissions that produced an announcement
    pub posted: usize,
}

/// Drives one poll cycle over the scoreboard, store and notifier.
pub struct SyncEngine<'a> {
    config: &'a Config,
    scoreboard: &'a dyn Scoreboard,
    store: &'a dyn SolveStore,
    notifier: &'a dyn Notifier,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        config: &'a Config,
        scoreboard: &'a dyn Scoreboard,
        store: &'a dyn SolveStore,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            config,
            scoreboard,
            store,
            notifier,
        }
    }

    /// Run one poll cycle.
    pub async fn synchronize(&self) -> Result<SyncResult> {
        let remote = self.scoreboard.correct_submissions().await?;
        let seen = self.store.load_solves().await?;

        if remote.len() < seen.len() {
            // The remote list is assumed append-only; a shrink is anomalous.
            log::warn!(
                "Remote submission list shrank from {} to {} entries, skipping cycle",
                seen.len(),
                remote.len()
            );
            return Ok(SyncResult::default());
        }

        let new_count = remote.len() - seen.len();
        if new_count == 0 {
            log::debug!("No new solves ({} seen)", seen.len());
            return Ok(SyncResult::default());
        }
        log::info!("Got {} new solves", new_count);

        let classifier = SolveClassifier::new(
            &self.config.announce,
            &self.config.ctfd.site_url,
            self.scoreboard,
            self.store,
        );

        // Challenge ids already seen, extended as the batch progresses so
        // first blood fires at most once per challenge within a cycle.
        let mut seen_challenges: HashSet<u64> =
            seen.iter().map(|s| s.challenge_id).collect();

        let batch = &remote[seen.len()..];
        let mut posted = 0;

        for submission in batch {
            let classification = classifier.classify(submission, &seen_challenges).await?;

            if classification.announce {
                if let Some(message) = classification.message {
                    let blocks = message.to_blocks();
                    // Best-effort fan-out: one failing channel must not
                    // stop delivery to the others.
                    for channel in &self.config.slack.channels {
                        if let Err(e) = self.notifier.post_blocks(channel, &blocks).await {
                            log::error!(
                                "Failed to announce solve {} to {}: {}",
                                submission.id,
                                channel,
                                e
                            );
                        }
                    }
                    posted += 1;
                }
            }

            seen_challenges.insert(submission.challenge_id);
        }

        // Everything classified; extend the log in one durable write.
        self.store.append_solves(batch).await?;

        Ok(SyncResult {
            processed: batch.len(),
            posted,
        })
    }
}
