// Tap budget arithmetic and tap-batch construction.

use std::time::Duration;

use rand::Rng;

use super::model::{Nonce, TapRequest};

/// Number of taps affordable with `energy` when each tap costs `damage_per_hit`.
///
/// Zero means nothing is affordable and the caller should wait for recharge.
pub fn max_taps(energy: u64, damage_per_hit: u64) -> u64 {
    debug_assert!(damage_per_hit > 0, "damage per hit is weapon level + 1");
    energy / damage_per_hit.max(1)
}

/// Time needed to climb back to `target` energy, padded by the current deficit.
///
/// `(target + (target - energy)) / recharge_per_second` seconds.
pub fn recharge_wait(target: u64, energy: u64, recharge_per_second: u64) -> Duration {
    let deficit = target.saturating_sub(energy);
    let secs = (target + deficit) as f64 / recharge_per_second.max(1) as f64;
    Duration::from_secs_f64(secs)
}

/// Random per-tap zone codes (1-4), comma-joined.
pub fn random_vector<R: Rng + ?Sized>(rng: &mut R, taps: u64) -> String {
    let codes: Vec<String> = (0..taps)
        .map(|_| rng.gen_range(1..=4u8).to_string())
        .collect();
    codes.join(",")
}

/// Comma-join a fixed digit sequence (daily combo).
pub fn combo_vector(digits: &[u8]) -> String {
    let codes: Vec<String> = digits.iter().map(|d| d.to_string()).collect();
    codes.join(",")
}

impl TapRequest {
    /// A batch of `taps` random taps.
    pub fn random(nonce: &Nonce, taps: u64) -> Self {
        let vector = random_vector(&mut rand::thread_rng(), taps);
        Self {
            nonce: nonce.as_str().to_string(),
            taps_count: taps,
            vector,
        }
    }

    /// A batch that replays exactly `digits`.
    pub fn combo(nonce: &Nonce, digits: &[u8]) -> Self {
        Self {
            nonce: nonce.as_str().to_string(),
            taps_count: digits.len() as u64,
            vector: combo_vector(digits),
        }
    }
}
