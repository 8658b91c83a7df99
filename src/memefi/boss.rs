// Boss-defeat detection and advancement to the next boss.

use crate::error::BotError;

use super::client::MemefiApi;
use super::model::{Boss, GameConfig};

/// Highest boss level; defeating it ends the run.
pub const MAX_BOSS_LEVEL: u32 = 15;

/// What happened after inspecting the latest boss snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum BossTransition {
    /// Boss still has health left.
    NotDefeated,
    /// Boss died and the next one was summoned.
    Advanced(GameConfig),
    /// The final boss is dead. Terminal.
    Completed,
}

impl BossTransition {
    pub fn is_completed(&self) -> bool {
        matches!(self, BossTransition::Completed)
    }
}

/// Advance past a defeated boss, or report completion at the last level.
///
/// Never calls `advance_boss` for a living boss or for the final boss.
pub async fn handle_boss_defeated<A: MemefiApi>(
    api: &A,
    boss: &Boss,
) -> Result<BossTransition, BotError> {
    if boss.current_health != 0 {
        return Ok(BossTransition::NotDefeated);
    }

    if boss.level == MAX_BOSS_LEVEL {
        tracing::info!("Final boss defeated, ending game");
        return Ok(BossTransition::Completed);
    }

    tracing::info!(
        "Boss defeated, setting next boss (LVL{} => LVL{})",
        boss.level,
        boss.level + 1
    );
    let config = api.advance_boss().await?.into_result()?;
    Ok(BossTransition::Advanced(config))
}
