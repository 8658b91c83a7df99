// Bot configuration: command-line surface and the validated settings built from it.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::drop_game::{blum, tomarket};
use crate::error::ConfigError;
use crate::memefi::client::MEMEFI_GRAPHQL_URL;
use crate::memefi::combo::COMBO_DIGITS;

/// Length of the daily combo code.
pub const COMBO_SEQUENCE_LENGTH: usize = 4;
/// Spins requested per slot-machine call unless overridden.
pub const DEFAULT_SPIN_COUNT: u32 = 10;
/// Damage multiplier applied to taps while turbo is active.
pub const TURBO_BOOST_DAMAGE_MULTIPLIER: u64 = 10;
/// How long a turbo boost stays active.
pub const TURBO_BOOST_DURATION: Duration = Duration::from_secs(10);

// ── Command line ─────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(version, about = "Play-loop bots for Memefi, Blum and Tomarket", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub bot: BotCommand,
}

#[derive(Subcommand, Debug)]
pub enum BotCommand {
    /// Memefi boss fight: taps, boosts, spins, tap bot, daily combo.
    Memefi(MemefiArgs),
    /// Blum drop game.
    Blum(DropGameArgs),
    /// Tomarket drop game.
    Tomarket(TomarketArgs),
}

#[derive(Args, Debug, Clone)]
pub struct MemefiArgs {
    /// JWT token (prompted for when absent).
    #[arg(long, env = "MEMEFI_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Initial tap nonce. A random one is generated when omitted.
    #[arg(long)]
    pub nonce: Option<String>,

    /// Maximum number of turbo boosts to spend.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub turbo_boosts: i64,

    /// Maximum number of energy recharge boosts to spend.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub recharge_boosts: i64,

    /// Start and claim the tap bot between rounds.
    #[arg(long)]
    pub tap_bot: bool,

    /// Spend spin energy on the slot machine before tapping.
    #[arg(long)]
    pub spin: bool,

    /// Spins per slot-machine call.
    #[arg(long, default_value_t = DEFAULT_SPIN_COUNT)]
    pub spin_count: u32,

    /// Known daily combo, e.g. `2341` or `2 3 4 1`.
    #[arg(long, conflicts_with = "brute_combo")]
    pub combo: Option<String>,

    /// Try every 4-digit combo until one pays out.
    #[arg(long)]
    pub brute_combo: bool,

    /// GraphQL endpoint.
    #[arg(long, default_value = MEMEFI_GRAPHQL_URL)]
    pub url: String,
}

#[derive(Args, Debug, Clone)]
pub struct DropGameArgs {
    /// Access token (prompted for when absent).
    #[arg(long, env = "BLUM_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Start farming before playing.
    #[arg(long)]
    pub farm: bool,

    #[arg(long, default_value = blum::BLUM_BASE_URL)]
    pub url: String,
}

#[derive(Args, Debug, Clone)]
pub struct TomarketArgs {
    /// Access token (prompted for when absent).
    #[arg(long, env = "TOMARKET_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Start farming before playing.
    #[arg(long)]
    pub farm: bool,

    /// Claim unfinished hidden tasks before playing.
    #[arg(long)]
    pub claim_hidden_tasks: bool,

    #[arg(long, default_value = tomarket::TOMARKET_BASE_URL)]
    pub url: String,
}

// ── Validated settings ───────────────────────────────────────────────

/// Fixed sleeps between calls. No jitter, no backoff.
#[derive(Debug, Clone, PartialEq)]
pub struct Pacing {
    /// Between tap batches while turbo is active.
    pub boost_spam_interval: Duration,
    /// After a turbo window closes.
    pub boost_cooldown: Duration,
    /// Between daily-combo attempts when energy suffices.
    pub combo_interval: Duration,
    /// Between slot-machine spins.
    pub spin_interval: Duration,
    /// Length of a drop-game round before claiming.
    pub round_duration: Duration,
    /// Between drop-game rounds.
    pub round_gap: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            boost_spam_interval: Duration::from_millis(500),
            boost_cooldown: Duration::from_secs(2),
            combo_interval: Duration::from_secs(2),
            spin_interval: Duration::from_secs(2),
            round_duration: Duration::from_secs(30),
            round_gap: Duration::from_secs(10),
        }
    }
}

impl Pacing {
    /// All sleeps zeroed. Recharge waits derived from game state are unaffected.
    pub fn immediate() -> Self {
        Self {
            boost_spam_interval: Duration::ZERO,
            boost_cooldown: Duration::ZERO,
            combo_interval: Duration::ZERO,
            spin_interval: Duration::ZERO,
            round_duration: Duration::ZERO,
            round_gap: Duration::ZERO,
        }
    }
}

/// Turbo boost parameters. Multiplier and duration are independent.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostTuning {
    pub damage_multiplier: u64,
    pub duration: Duration,
}

impl Default for BoostTuning {
    fn default() -> Self {
        Self {
            damage_multiplier: TURBO_BOOST_DAMAGE_MULTIPLIER,
            duration: TURBO_BOOST_DURATION,
        }
    }
}

/// A validated daily combo: exactly four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboCode([u8; COMBO_SEQUENCE_LENGTH]);

impl ComboCode {
    /// Parse `2341`, `2 3 4 1` or `2,3,4,1`. Digits are limited to 1-4.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut digits = Vec::with_capacity(COMBO_SEQUENCE_LENGTH);
        for c in input.chars() {
            if c.is_whitespace() || c == ',' {
                continue;
            }
            let d = c
                .to_digit(10)
                .and_then(|d| u8::try_from(d).ok())
                .filter(|d| COMBO_DIGITS.contains(d))
                .ok_or(ConfigError::ComboDigit(c))?;
            digits.push(d);
        }
        let code: [u8; COMBO_SEQUENCE_LENGTH] = digits
            .as_slice()
            .try_into()
            .map_err(|_| ConfigError::ComboLength(digits.len()))?;
        Ok(Self(code))
    }

    pub fn digits(&self) -> &[u8] {
        &self.0
    }
}

/// How the daily combo should be attempted, if at all.
#[derive(Debug, Clone, PartialEq)]
pub enum ComboMode {
    Skip,
    Targeted(ComboCode),
    BruteForce,
}

/// Everything the Memefi bot needs, validated before any request is sent.
#[derive(Debug, Clone)]
pub struct MemefiSettings {
    pub url: String,
    pub token: String,
    pub initial_nonce: Option<String>,
    pub turbo_budget: u32,
    pub recharge_budget: u32,
    pub tap_bot: bool,
    pub allow_spin: bool,
    pub spin_count: u32,
    pub combo: ComboMode,
    pub boost: BoostTuning,
    pub pacing: Pacing,
}

impl MemefiSettings {
    /// Defaults for everything except the token.
    pub fn new(token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            url: MEMEFI_GRAPHQL_URL.to_string(),
            token: validate_token(token)?,
            initial_nonce: None,
            turbo_budget: 0,
            recharge_budget: 0,
            tap_bot: false,
            allow_spin: false,
            spin_count: DEFAULT_SPIN_COUNT,
            combo: ComboMode::Skip,
            boost: BoostTuning::default(),
            pacing: Pacing::default(),
        })
    }

    /// Build settings from parsed arguments and a resolved token.
    pub fn from_args(args: &MemefiArgs, token: &str) -> Result<Self, ConfigError> {
        if args.spin_count == 0 {
            return Err(ConfigError::ZeroSpinCount);
        }
        let combo = match (&args.combo, args.brute_combo) {
            (Some(code), _) => ComboMode::Targeted(ComboCode::parse(code)?),
            (None, true) => ComboMode::BruteForce,
            (None, false) => ComboMode::Skip,
        };
        Ok(Self {
            url: args.url.clone(),
            initial_nonce: args
                .nonce
                .as_ref()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            turbo_budget: boost_budget("turbo", args.turbo_boosts)?,
            recharge_budget: boost_budget("recharge", args.recharge_boosts)?,
            tap_bot: args.tap_bot,
            allow_spin: args.spin,
            spin_count: args.spin_count,
            combo,
            ..Self::new(token)?
        })
    }
}

/// Settings shared by the Blum and Tomarket drop-game bots.
#[derive(Debug, Clone)]
pub struct DropGameSettings {
    pub url: String,
    pub token: String,
    pub farm: bool,
    pub claim_hidden_tasks: bool,
    pub pacing: Pacing,
}

impl DropGameSettings {
    pub fn new(url: &str, token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            url: url.to_string(),
            token: validate_token(token)?,
            farm: false,
            claim_hidden_tasks: false,
            pacing: Pacing::default(),
        })
    }

    pub fn from_blum_args(args: &DropGameArgs, token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            farm: args.farm,
            ..Self::new(&args.url, token)?
        })
    }

    pub fn from_tomarket_args(args: &TomarketArgs, token: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            farm: args.farm,
            claim_hidden_tasks: args.claim_hidden_tasks,
            ..Self::new(&args.url, token)?
        })
    }
}

fn validate_token(token: &str) -> Result<String, ConfigError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(ConfigError::EmptyToken);
    }
    Ok(token.to_string())
}

fn boost_budget(kind: &'static str, value: i64) -> Result<u32, ConfigError> {
    if value < 0 {
        return Err(ConfigError::NegativeBoostBudget { kind, value });
    }
    Ok(u32::try_from(value).unwrap_or(u32::MAX))
}
