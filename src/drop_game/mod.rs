// Drop-game bots (Blum, Tomarket): spend play passes on fixed-score rounds.

pub mod blum;
pub mod tomarket;

use serde_json::Value;
use tokio::time::sleep;

use crate::config::{DropGameSettings, Pacing};
use crate::error::BotError;

/// Balance and remaining play passes.
#[derive(Debug, Clone, PartialEq)]
pub struct DropBalance {
    /// Opaque amount as reported by the server (string or number).
    pub available_balance: Value,
    pub play_passes: i64,
}

/// Operations a drop-game server offers.
#[allow(async_fn_in_trait)]
pub trait DropGameApi {
    /// Game name for log lines.
    fn name(&self) -> &'static str;

    /// Points claimed at the end of every round.
    fn points(&self) -> u64;

    async fn balance(&self) -> Result<DropBalance, BotError>;

    /// Start a round and return its id.
    async fn start_round(&self) -> Result<String, BotError>;

    async fn claim(&self, round_id: &str, points: u64) -> Result<String, BotError>;

    async fn start_farming(&self) -> Result<Value, BotError>;
}

/// Optional farming, then play rounds until passes run out. Returns rounds played.
pub async fn run<A: DropGameApi>(api: &A, settings: &DropGameSettings) -> Result<u32, BotError> {
    if settings.farm {
        let farming = api.start_farming().await?;
        tracing::info!("{} farming started: {farming}", api.name());
    }
    play_rounds(api, &settings.pacing).await
}

/// Play one round per pass: start, wait out the round, claim, pause.
pub async fn play_rounds<A: DropGameApi>(api: &A, pacing: &Pacing) -> Result<u32, BotError> {
    let mut rounds = 0;

    loop {
        let balance = api.balance().await?;
        if balance.play_passes <= 0 {
            tracing::info!("All game passes used, ending game session");
            break;
        }

        tracing::info!("Current balance: {}", balance.available_balance);
        tracing::info!("Current game passes: {}", balance.play_passes);

        let round_id = api.start_round().await?;
        tracing::info!("{} round started with ID: {round_id}", api.name());

        tracing::info!("Waiting for game session to end...");
        sleep(pacing.round_duration).await;

        let result = api.claim(&round_id, api.points()).await?;
        tracing::info!("Rewards claimed: {result}");
        rounds += 1;

        if balance.play_passes - 1 == 0 {
            tracing::info!("All game passes used, ending game session");
            break;
        }
        tracing::info!(
            "Sleeping for {} seconds before new game...",
            pacing.round_gap.as_secs()
        );
        sleep(pacing.round_gap).await;
    }

    Ok(rounds)
}
