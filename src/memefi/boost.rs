// Turbo boost controller.
//
// Idle -> BoostActive when the turbo budget allows it, spam full tap batches
// until the boost window closes, then Cooldown -> Idle until the budget is
// spent. Taps cost no energy while turbo is active.

use chrono::Utc;
use tokio::time::{sleep, Duration, Instant};

use crate::config::{BoostTuning, Pacing};
use crate::error::BotError;

use super::boss::{handle_boss_defeated, BossTransition};
use super::client::MemefiApi;
use super::model::{BoostKind, GameConfig, Nonce, TapRequest};
use super::tap::max_taps;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoostPhase {
    Idle,
    BoostActive,
    Cooldown,
}

/// Result of one pass through the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum BoostOutcome {
    /// The final boss fell while boosting. The run is over.
    Finished,
    /// Carry on with the latest known snapshot.
    Continue(GameConfig),
}

pub struct BoostController {
    remaining: u32,
    tuning: BoostTuning,
    spam_interval: Duration,
    cooldown: Duration,
    phase: BoostPhase,
}

impl BoostController {
    pub fn new(budget: u32, tuning: BoostTuning, pacing: &Pacing) -> Self {
        Self {
            remaining: budget,
            tuning,
            spam_interval: pacing.boost_spam_interval,
            cooldown: pacing.boost_cooldown,
            phase: BoostPhase::Idle,
        }
    }

    /// Turbo boosts this run may still spend.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn phase(&self) -> BoostPhase {
        self.phase
    }

    /// Budget left and the account holds at least that many turbo charges.
    fn budget_allows(&self, config: &GameConfig) -> bool {
        self.remaining > 0 && config.free_boosts.current_turbo_amount >= self.remaining
    }

    /// Damage a full boost window would deal with the current tap budget.
    pub fn estimated_damage(&self, config: &GameConfig) -> u64 {
        let dph = config.damage_per_hit();
        self.tuning.damage_multiplier * max_taps(config.current_energy, dph) * dph
    }

    /// Spend turbo boosts while the budget allows.
    ///
    /// Returns the snapshot unchanged when no boost is activated.
    pub async fn run<A: MemefiApi>(
        &mut self,
        api: &A,
        nonce: &mut Nonce,
        config: GameConfig,
    ) -> Result<BoostOutcome, BotError> {
        if !self.budget_allows(&config) {
            return Ok(BoostOutcome::Continue(config));
        }

        let mut config = config;
        while self.remaining > 0 {
            tracing::info!("Allowed turbo boosts left: {}", self.remaining);
            tracing::info!("Estimated boost damage: {}", self.estimated_damage(&config));

            if config.current_energy < config.damage_per_hit() {
                tracing::info!("Not enough energy for a single tap, skipping boost");
                break;
            }

            let activated = api.activate_boost(BoostKind::Turbo).await?.into_result()?;
            self.remaining -= 1;
            self.phase = BoostPhase::BoostActive;
            let deadline = self.window_deadline(&activated);
            config = activated;
            tracing::info!("Turbo boost activated");

            while Instant::now() < deadline {
                let taps = max_taps(config.current_energy, config.damage_per_hit());
                let request = TapRequest::random(nonce, taps);
                config = api.submit_taps(&request).await?.into_result()?;
                nonce.advance(&config);
                tracing::info!("Current boss health: {}", config.current_boss.current_health);

                match handle_boss_defeated(api, &config.current_boss).await? {
                    BossTransition::Completed => {
                        self.phase = BoostPhase::Idle;
                        return Ok(BoostOutcome::Finished);
                    }
                    BossTransition::Advanced(next) => config = next,
                    BossTransition::NotDefeated => {}
                }

                if config.current_energy < config.damage_per_hit()
                    && config.free_boosts.current_turbo_amount == 0
                {
                    tracing::info!("Out of energy with no boosts left, ending boost early");
                    break;
                }

                sleep(self.spam_interval).await;
            }

            tracing::info!("Boost has ended");
            self.phase = BoostPhase::Cooldown;
            sleep(self.cooldown).await;
            self.phase = BoostPhase::Idle;
        }

        Ok(BoostOutcome::Continue(config))
    }

    /// Monotonic deadline for the window `turboLastActivatedAt + duration`.
    fn window_deadline(&self, activated: &GameConfig) -> Instant {
        let now = Instant::now();
        let Some(started) = activated.free_boosts.turbo_last_activated_at else {
            return now + self.tuning.duration;
        };
        let length = chrono::Duration::from_std(self.tuning.duration)
            .unwrap_or_else(|_| chrono::Duration::zero());
        match (started + length - Utc::now()).to_std() {
            Ok(remaining) => now + remaining,
            Err(_) => now,
        }
    }
}
