// src/handler.rs

//! Entry points for external triggers.
//!
//! The webhook HTTP server and Slack signature verification live outside
//! this crate; whatever hosts the bot (scheduler, HTTP shim, CLI) calls
//! these functions and serializes the returned status objects.

use serde::Serialize;

use crate::error::Result;
use crate::pipeline::{MessageEvent, Moderator, SyncEngine};

/// Status of one cron invocation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CronStatus {
    /// New submissions were processed
    Ok,
    /// Nothing new since the last cycle
    Noop,
}

/// Response object for the cron trigger, serialized as
/// `{"status":"ok"}` or `{"status":"noop"}`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CronResponse {
    pub status: CronStatus,
}

/// Run one synchronize cycle.
pub async fn cron(engine: &SyncEngine<'_>) -> Result<CronResponse> {
    let result = engine.synchronize().await?;
    let status = if result.processed == 0 {
        CronStatus::Noop
    } else {
        CronStatus::Ok
    };
    log::info!(
        "Cron cycle: processed {} solves, announced {}",
        result.processed,
        result.posted
    );
    Ok(CronResponse { status })
}

/// Handle one inbound message event.
///
/// Only events carrying non-empty text are checked. Failures are logged
/// and the event dropped; the next message gets a fresh check.
pub async fn message_event(moderator: &Moderator<'_>, event: &MessageEvent) {
    if event.text.is_empty() {
        return;
    }

    match moderator.handle(event).await {
        Ok(outcome) => log::debug!("Moderated message {}: {:?}", event.ts, outcome),
        Err(e) => log::error!("Moderation failed for message {}: {}", event.ts, e),
    }
}
