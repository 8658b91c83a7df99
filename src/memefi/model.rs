// Memefi payload types, mirroring the GraphQL `FragmentBossFightConfig` shape.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Boss-fight state returned by every Memefi query and mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    #[serde(default)]
    pub coins_amount: u64,
    pub current_energy: u64,
    pub max_energy: u64,
    pub weapon_level: u64,
    pub energy_recharge_level: u64,
    #[serde(default)]
    pub taps_reward: Option<u64>,
    pub current_boss: Boss,
    pub free_boosts: FreeBoosts,
    #[serde(default)]
    pub nonce: String,
    #[serde(default)]
    pub spin_energy_total: u64,
}

impl GameConfig {
    /// Damage dealt by a single tap.
    pub fn damage_per_hit(&self) -> u64 {
        self.weapon_level + 1
    }

    /// Energy regained per second.
    pub fn recharge_per_second(&self) -> u64 {
        self.energy_recharge_level + 1
    }

    /// Reward granted by the last tap batch, if any.
    pub fn reward(&self) -> Option<u64> {
        self.taps_reward.filter(|r| *r > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boss {
    #[serde(default)]
    pub level: u32,
    pub current_health: u64,
    pub max_health: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeBoosts {
    pub current_turbo_amount: u32,
    pub max_turbo_amount: u32,
    #[serde(default)]
    pub turbo_last_activated_at: Option<DateTime<Utc>>,
    pub current_refill_energy_amount: u32,
    pub max_refill_energy_amount: u32,
}

/// Tap-bot (auto-tapper) session state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TapBotConfig {
    pub id: String,
    #[serde(default)]
    pub damage_per_sec: u64,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_purchased: bool,
    pub total_attempts: u32,
    pub used_attempts: u32,
}

impl TapBotConfig {
    /// No session is running (never started, or already claimed).
    pub fn is_idle(&self) -> bool {
        self.id == "0" || self.ends_at.is_none()
    }

    pub fn attempts_exhausted(&self) -> bool {
        self.used_attempts >= self.total_attempts
    }
}

/// Response of the slot-machine mutation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    pub game_config: GameConfig,
    #[serde(default)]
    pub spin_results: Vec<SpinOutcome>,
    #[serde(default)]
    pub spins_processed_count: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinOutcome {
    #[serde(default)]
    pub combination: Vec<String>,
    #[serde(default)]
    pub reward_amount: f64,
    #[serde(default)]
    pub reward_type: String,
}

/// The two boosters the account can activate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoostKind {
    Turbo,
    Recharge,
}

impl BoostKind {
    /// Enum value expected by the `BoosterType` GraphQL input.
    pub fn as_graphql(self) -> &'static str {
        match self {
            BoostKind::Turbo => "Turbo",
            BoostKind::Recharge => "Recharge",
        }
    }
}

impl FromStr for BoostKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("turbo") {
            Ok(BoostKind::Turbo)
        } else if s.eq_ignore_ascii_case("recharge") {
            Ok(BoostKind::Recharge)
        } else {
            Err(ConfigError::InvalidBoostKind(s.to_string()))
        }
    }
}

impl fmt::Display for BoostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoostKind::Turbo => write!(f, "turbo"),
            BoostKind::Recharge => write!(f, "recharge"),
        }
    }
}

/// Server-issued ordering token, echoed on every tap batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 32 random bytes, hex-encoded. Used when no nonce is configured.
    pub fn random() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Adopt the nonce carried by a tap response. Empty nonces are ignored.
    pub fn advance(&mut self, config: &GameConfig) {
        if !config.nonce.is_empty() {
            self.0 = config.nonce.clone();
        }
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Payload of `telegramGameProcessTapsBatch`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TapRequest {
    pub nonce: String,
    pub taps_count: u64,
    pub vector: String,
}
