// Daily combo: replay a known code or scan all 256 candidates.

use itertools::Itertools;
use tokio::time::{sleep, Duration};

use crate::config::{ComboMode, COMBO_SEQUENCE_LENGTH};
use crate::error::BotError;

use super::client::MemefiApi;
use super::model::{Nonce, TapRequest};
use super::tap::recharge_wait;

/// Zone codes a combo digit may take.
pub const COMBO_DIGITS: [u8; 4] = [1, 2, 3, 4];

/// How a combo search ended.
#[derive(Debug, Clone, PartialEq)]
pub enum ComboResult {
    /// A candidate paid out.
    Rewarded { code: Vec<u8>, reward: u64 },
    /// Every candidate was tried without a reward.
    Exhausted { attempts: usize },
}

/// Every ordered sequence over `COMBO_DIGITS`, in lexicographic order.
pub fn brute_force_candidates() -> Vec<Vec<u8>> {
    std::iter::repeat(COMBO_DIGITS.into_iter())
        .take(COMBO_SEQUENCE_LENGTH)
        .multi_cartesian_product()
        .collect()
}

/// Candidates to try for the configured mode.
pub fn candidates(mode: &ComboMode) -> Vec<Vec<u8>> {
    match mode {
        ComboMode::Skip => Vec::new(),
        ComboMode::Targeted(code) => vec![code.digits().to_vec()],
        ComboMode::BruteForce => brute_force_candidates(),
    }
}

/// Submit candidates in order until one yields a tap reward.
///
/// When an attempt leaves less energy than the next one needs, waits for
/// recharge before moving on; otherwise waits `interval`.
pub async fn search_combo<A: MemefiApi>(
    api: &A,
    nonce: &mut Nonce,
    candidates: &[Vec<u8>],
    interval: Duration,
) -> Result<ComboResult, BotError> {
    let config = api.fetch_config().await?.into_result()?;
    let damage_per_hit = config.damage_per_hit();
    let recharge_per_second = config.recharge_per_second();
    let required_energy = COMBO_SEQUENCE_LENGTH as u64 * damage_per_hit;

    tracing::info!("Required energy per attempt: {required_energy}");
    tracing::info!("Combo candidates: {}", candidates.len());

    for (index, code) in candidates.iter().enumerate() {
        tracing::info!(
            "Trial {} of {} *** Combo: {:?}",
            index + 1,
            candidates.len(),
            code
        );
        let request = TapRequest::combo(nonce, code);
        let result = api.submit_taps(&request).await?.into_result()?;
        nonce.advance(&result);

        if let Some(reward) = result.reward() {
            tracing::info!("Reward: {reward} *** Combo: {code:?}");
            return Ok(ComboResult::Rewarded {
                code: code.clone(),
                reward,
            });
        }

        if index + 1 == candidates.len() {
            break;
        }

        if required_energy > result.current_energy {
            let wait = recharge_wait(required_energy, result.current_energy, recharge_per_second);
            tracing::info!(
                "Energy is not enough, recharging for {:.1} seconds",
                wait.as_secs_f64()
            );
            sleep(wait).await;
        } else {
            sleep(interval).await;
        }
    }

    Ok(ComboResult::Exhausted {
        attempts: candidates.len(),
    })
}
