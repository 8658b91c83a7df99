// Tap-bot (auto-tapper) lifecycle: start when idle, claim when finished.

use chrono::{DateTime, Utc};

use crate::error::BotError;

use super::client::MemefiApi;

/// What the lifecycle step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapBotAction {
    /// No session and no attempts left.
    Exhausted,
    Started,
    Claimed,
    /// A session is still running.
    Waiting,
}

/// Advance the tap-bot lifecycle by one step.
pub async fn run_tap_bot<A: MemefiApi>(api: &A, now: DateTime<Utc>) -> Result<TapBotAction, BotError> {
    let config = api.tap_bot_config().await?.into_result()?;

    if config.is_idle() {
        if config.attempts_exhausted() {
            tracing::info!("All tap bot attempts used");
            return Ok(TapBotAction::Exhausted);
        }
        tracing::info!(
            "Starting tap bot ({}/{} attempts used)",
            config.used_attempts,
            config.total_attempts
        );
        api.start_tap_bot().await?.into_result()?;
        return Ok(TapBotAction::Started);
    }

    match config.ends_at {
        Some(ends_at) if now >= ends_at => {
            tracing::info!("Tap bot session ended, claiming coins");
            api.claim_tap_bot().await?.into_result()?;
            Ok(TapBotAction::Claimed)
        }
        _ => {
            tracing::info!("Tap bot session not ended, waiting");
            Ok(TapBotAction::Waiting)
        }
    }
}
