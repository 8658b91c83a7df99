// Memefi play loop: daily combo, slot spins, then boss fight until the last boss falls.

use chrono::Utc;
use tokio::time::sleep;

use crate::config::{ComboMode, MemefiSettings};
use crate::error::BotError;

use super::boost::{BoostController, BoostOutcome};
use super::boss::handle_boss_defeated;
use super::client::MemefiApi;
use super::combo::{candidates, search_combo, ComboResult};
use super::model::{BoostKind, Nonce, TapRequest};
use super::tap::{max_taps, recharge_wait};
use super::tap_bot::run_tap_bot;

/// One Memefi account driven by one sequential loop.
pub struct MemefiBot<A: MemefiApi> {
    api: A,
    settings: MemefiSettings,
}

impl<A: MemefiApi> MemefiBot<A> {
    pub fn new(api: A, settings: MemefiSettings) -> Self {
        Self { api, settings }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Nonce for the first tap batch of the run.
    pub fn initial_nonce(&self) -> Nonce {
        match &self.settings.initial_nonce {
            Some(n) => Nonce::new(n.clone()),
            None => Nonce::random(),
        }
    }

    /// Full run: combo (if configured), spins (if enabled), then the boss fight.
    pub async fn run(&self) -> Result<(), BotError> {
        let mut nonce = self.initial_nonce();

        if self.settings.combo != ComboMode::Skip {
            self.daily_combo(&mut nonce).await?;
        }

        if self.settings.allow_spin {
            let spins = self.spin_all().await?;
            tracing::info!("Slot machine done after {spins} spin calls");
        }

        self.play(&mut nonce).await
    }

    pub async fn daily_combo(&self, nonce: &mut Nonce) -> Result<ComboResult, BotError> {
        let candidates = candidates(&self.settings.combo);
        let result = search_combo(
            &self.api,
            nonce,
            &candidates,
            self.settings.pacing.combo_interval,
        )
        .await?;
        if let ComboResult::Exhausted { attempts } = &result {
            tracing::info!("No combo reward after {attempts} attempts");
        }
        Ok(result)
    }

    /// Spin while there is spin energy for a full call. Returns the number of spin calls.
    pub async fn spin_all(&self) -> Result<u32, BotError> {
        let count = self.settings.spin_count;
        let mut config = self.api.fetch_config().await?.into_result()?;
        let mut calls = 0;

        while config.spin_energy_total >= u64::from(count) {
            tracing::info!("Spinning for {count}");
            let result = self.api.spin(count).await?.into_result()?;
            calls += 1;
            for outcome in &result.spin_results {
                tracing::info!(
                    "Spin {:?}: {} {}",
                    outcome.combination,
                    outcome.reward_amount,
                    outcome.reward_type
                );
            }
            config = result.game_config;
            sleep(self.settings.pacing.spin_interval).await;
        }

        Ok(calls)
    }

    /// Boss-fight loop. Returns once the final boss is defeated.
    pub async fn play(&self, nonce: &mut Nonce) -> Result<(), BotError> {
        let mut boost = BoostController::new(
            self.settings.turbo_budget,
            self.settings.boost.clone(),
            &self.settings.pacing,
        );
        let mut recharge_budget = self.settings.recharge_budget;

        loop {
            if self.settings.tap_bot {
                run_tap_bot(&self.api, Utc::now()).await?;
            }

            let config = self.api.fetch_config().await?.into_result()?;
            let config = match boost.run(&self.api, nonce, config).await? {
                BoostOutcome::Finished => return Ok(()),
                BoostOutcome::Continue(config) => config,
            };

            let damage_per_hit = config.damage_per_hit();
            let recharge_per_second = config.recharge_per_second();
            let taps = max_taps(config.current_energy, damage_per_hit);

            tracing::info!("Max energy: {}", config.max_energy);
            tracing::info!("Current energy: {}", config.current_energy);
            tracing::info!("Current boss level: {}", config.current_boss.level);
            tracing::info!("Current boss health: {}", config.current_boss.current_health);

            if taps == 0 {
                let wait = recharge_wait(config.max_energy, config.current_energy, recharge_per_second);
                tracing::info!("No taps affordable, recharging for {:.1} seconds", wait.as_secs_f64());
                sleep(wait).await;
                continue;
            }

            let result = self
                .api
                .submit_taps(&TapRequest::random(nonce, taps))
                .await?
                .into_result()?;
            nonce.advance(&result);
            tracing::info!(
                "Taps processed: {taps}, energy {} left, boss health {}",
                result.current_energy,
                result.current_boss.current_health
            );

            if handle_boss_defeated(&self.api, &result.current_boss)
                .await?
                .is_completed()
            {
                return Ok(());
            }

            if recharge_budget > 0 && result.free_boosts.current_refill_energy_amount > 0 {
                tracing::info!("Recharge is ready to be activated");
                self.api
                    .activate_boost(BoostKind::Recharge)
                    .await?
                    .into_result()?;
                recharge_budget -= 1;
                continue;
            }

            let wait = recharge_wait(result.max_energy, result.current_energy, recharge_per_second);
            tracing::info!("Estimated time to next recharge: {:.1} seconds", wait.as_secs_f64());
            sleep(wait).await;
        }
    }
}
