// Memefi GraphQL client and the API seam the play loops are written against.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{BotError, GameReply};
use crate::http::HttpClient;

use super::model::{BoostKind, GameConfig, SpinResult, TapBotConfig, TapRequest};

pub const MEMEFI_GRAPHQL_URL: &str = "https://api-gw-tg.memefi.club/graphql";

/// Operations the Memefi bot needs from the game server.
///
/// Every mutating call returns a fresh snapshot which replaces the caller's
/// previous one. A server-side rejection comes back as `GameReply::GameError`.
#[allow(async_fn_in_trait)]
pub trait MemefiApi {
    async fn fetch_config(&self) -> Result<GameReply<GameConfig>, BotError>;

    /// Submit a tap batch. The returned config carries the nonce for the next batch.
    async fn submit_taps(&self, request: &TapRequest) -> Result<GameReply<GameConfig>, BotError>;

    async fn activate_boost(&self, kind: BoostKind) -> Result<GameReply<GameConfig>, BotError>;

    async fn advance_boss(&self) -> Result<GameReply<GameConfig>, BotError>;

    async fn spin(&self, count: u32) -> Result<GameReply<SpinResult>, BotError>;

    async fn tap_bot_config(&self) -> Result<GameReply<TapBotConfig>, BotError>;

    async fn start_tap_bot(&self) -> Result<GameReply<TapBotConfig>, BotError>;

    async fn claim_tap_bot(&self) -> Result<GameReply<TapBotConfig>, BotError>;
}

// ── Query documents ──────────────────────────────────────────────────

const BOSS_FIGHT_FRAGMENT: &str = "fragment FragmentBossFightConfig on TelegramGameConfigOutput {
  _id
  coinsAmount
  currentEnergy
  maxEnergy
  weaponLevel
  zonesCount
  tapsReward
  energyLimitLevel
  energyRechargeLevel
  tapBotLevel
  currentBoss {
    _id
    level
    currentHealth
    maxHealth
    __typename
  }
  freeBoosts {
    _id
    currentTurboAmount
    maxTurboAmount
    turboLastActivatedAt
    turboAmountLastRechargeDate
    currentRefillEnergyAmount
    maxRefillEnergyAmount
    refillEnergyLastActivatedAt
    refillEnergyAmountLastRechargeDate
    __typename
  }
  bonusLeaderDamageEndAt
  bonusLeaderDamageStartAt
  bonusLeaderDamageMultiplier
  nonce
  spinEnergyNextRechargeAt
  spinEnergyNonRefillable
  spinEnergyRefillable
  spinEnergyTotal
  spinEnergyStaticLimit
  __typename
}";

const TAP_BOT_FRAGMENT: &str = "fragment FragmentTapBotConfig on TelegramGameTapbotOutput {
  damagePerSec
  endsAt
  id
  isPurchased
  startsAt
  totalAttempts
  usedAttempts
  __typename
}";

const QUERY_GAME_CONFIG: &str = "query QUERY_GAME_CONFIG {
  telegramGameGetConfig {
    ...FragmentBossFightConfig
    __typename
  }
}";

const MUTATION_TAPS_BATCH: &str = "mutation MutationGameProcessTapsBatch($payload: TelegramGameTapsBatchInput!) {
  telegramGameProcessTapsBatch(payload: $payload) {
    ...FragmentBossFightConfig
    __typename
  }
}";

const MUTATION_ACTIVATE_BOOSTER: &str = "mutation telegramGameActivateBooster($boosterType: BoosterType!) {
  telegramGameActivateBooster(boosterType: $boosterType) {
    ...FragmentBossFightConfig
    __typename
  }
}";

const MUTATION_SET_NEXT_BOSS: &str = "mutation telegramGameSetNextBoss {
  telegramGameSetNextBoss {
    ...FragmentBossFightConfig
    __typename
  }
}";

const MUTATION_SPIN: &str = "mutation spinSlotMachine($payload: SlotMachineSpinInput!) {
  slotMachineSpinV2(payload: $payload) {
    gameConfig {
      ...FragmentBossFightConfig
    }
    spinResults {
      id
      combination
      rewardAmount
      rewardType
      questItemsFromSpin
    }
    spinsProcessedCount
  }
}";

const QUERY_TAP_BOT_CONFIG: &str = "query TapbotConfig {
  telegramGameTapbotGetConfig {
    ...FragmentTapBotConfig
    __typename
  }
}";

const MUTATION_TAP_BOT_START: &str = "mutation TapbotStart {
  telegramGameTapbotStart {
    ...FragmentTapBotConfig
    __typename
  }
}";

const MUTATION_TAP_BOT_CLAIM: &str = "mutation TapbotClaim {
  telegramGameTapbotClaimCoins {
    ...FragmentTapBotConfig
    __typename
  }
}";

fn document(operation: &str, fragment: &str) -> String {
    format!("{operation}\n\n{fragment}")
}

// ── HTTP implementation ──────────────────────────────────────────────

/// Memefi client speaking batched GraphQL over HTTP.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    http: HttpClient,
}

impl GraphqlClient {
    pub fn new(url: &str, jwt: &str) -> Result<Self, BotError> {
        let http = HttpClient::new(url, &format!("Bearer {jwt}"))?;
        Ok(Self { http })
    }

    /// Post a single-operation batch and extract `data.<field>` from the first result.
    async fn execute<T: DeserializeOwned>(
        &self,
        operation_name: &str,
        field: &str,
        query: String,
        variables: Value,
    ) -> Result<GameReply<T>, BotError> {
        let payload = json!([{
            "operationName": operation_name,
            "variables": variables,
            "query": query,
        }]);
        let batch: Vec<Value> = self.http.json(Method::POST, "", Some(&payload)).await?;
        let first = batch
            .into_iter()
            .next()
            .ok_or_else(|| BotError::Decode(format!("{operation_name}: empty GraphQL batch")))?;

        if let Some(errors) = first.get("errors").and_then(Value::as_array) {
            if let Some(err) = errors.first() {
                let message = err
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown GraphQL error")
                    .to_string();
                tracing::warn!("{operation_name} rejected: {message}");
                return Ok(GameReply::GameError(message));
            }
        }

        let data = first
            .get("data")
            .and_then(|d| d.get(field))
            .cloned()
            .ok_or_else(|| BotError::Decode(format!("{operation_name}: missing data.{field}")))?;
        Ok(GameReply::Ok(serde_json::from_value(data)?))
    }
}

impl MemefiApi for GraphqlClient {
    async fn fetch_config(&self) -> Result<GameReply<GameConfig>, BotError> {
        self.execute(
            "QUERY_GAME_CONFIG",
            "telegramGameGetConfig",
            document(QUERY_GAME_CONFIG, BOSS_FIGHT_FRAGMENT),
            json!({}),
        )
        .await
    }

    async fn submit_taps(&self, request: &TapRequest) -> Result<GameReply<GameConfig>, BotError> {
        self.execute(
            "MutationGameProcessTapsBatch",
            "telegramGameProcessTapsBatch",
            document(MUTATION_TAPS_BATCH, BOSS_FIGHT_FRAGMENT),
            json!({ "payload": request }),
        )
        .await
    }

    async fn activate_boost(&self, kind: BoostKind) -> Result<GameReply<GameConfig>, BotError> {
        self.execute(
            "telegramGameActivateBooster",
            "telegramGameActivateBooster",
            document(MUTATION_ACTIVATE_BOOSTER, BOSS_FIGHT_FRAGMENT),
            json!({ "boosterType": kind.as_graphql() }),
        )
        .await
    }

    async fn advance_boss(&self) -> Result<GameReply<GameConfig>, BotError> {
        self.execute(
            "telegramGameSetNextBoss",
            "telegramGameSetNextBoss",
            document(MUTATION_SET_NEXT_BOSS, BOSS_FIGHT_FRAGMENT),
            json!({}),
        )
        .await
    }

    async fn spin(&self, count: u32) -> Result<GameReply<SpinResult>, BotError> {
        self.execute(
            "spinSlotMachine",
            "slotMachineSpinV2",
            document(MUTATION_SPIN, BOSS_FIGHT_FRAGMENT),
            json!({ "payload": { "spinsCount": count } }),
        )
        .await
    }

    async fn tap_bot_config(&self) -> Result<GameReply<TapBotConfig>, BotError> {
        self.execute(
            "TapbotConfig",
            "telegramGameTapbotGetConfig",
            document(QUERY_TAP_BOT_CONFIG, TAP_BOT_FRAGMENT),
            json!({}),
        )
        .await
    }

    async fn start_tap_bot(&self) -> Result<GameReply<TapBotConfig>, BotError> {
        self.execute(
            "TapbotStart",
            "telegramGameTapbotStart",
            document(MUTATION_TAP_BOT_START, TAP_BOT_FRAGMENT),
            json!({}),
        )
        .await
    }

    async fn claim_tap_bot(&self) -> Result<GameReply<TapBotConfig>, BotError> {
        self.execute(
            "TapbotClaim",
            "telegramGameTapbotClaimCoins",
            document(MUTATION_TAP_BOT_CLAIM, TAP_BOT_FRAGMENT),
            json!({}),
        )
        .await
    }
}
