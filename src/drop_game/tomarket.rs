// Tomarket drop-game client, including hidden daily-code tasks.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{BotError, GameReply};
use crate::http::HttpClient;

use super::{DropBalance, DropGameApi};

pub const TOMARKET_BASE_URL: &str = "https://api-web.tomarket.ai/tomarket-game/v1";
/// Points claimed per round.
pub const TOMARKET_MAX_POINTS: u64 = 600;
/// Id of the drop game; rounds are claimed against it rather than the round id.
pub const DROP_GAME_ID: &str = "59bcd12e-04e2-404c-a172-311a0084587d";

/// `{status, message, data}` wrapper around every Tomarket response.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    status: i64,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

impl<T> Envelope<T> {
    fn into_reply(self) -> Result<GameReply<T>, BotError> {
        if self.status != 0 {
            return Ok(GameReply::GameError(self.message));
        }
        self.data
            .map(GameReply::Ok)
            .ok_or_else(|| BotError::Decode("response without data".into()))
    }
}

impl Envelope<Value> {
    /// Status check only; a missing `data` is accepted as `null`.
    fn into_ack(self) -> GameReply<Value> {
        if self.status != 0 {
            return GameReply::GameError(self.message);
        }
        GameReply::Ok(self.data.unwrap_or(Value::Null))
    }
}

#[derive(Debug, PartialEq, Deserialize)]
struct BalanceDto {
    available_balance: Value,
    play_passes: i64,
}

#[derive(Debug, PartialEq, Deserialize)]
struct RoundDto {
    round_id: String,
}

/// A hidden task; `status == 0` means not yet finished.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenTask {
    pub task_id: i64,
    #[serde(default)]
    pub status: i64,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub name: String,
}

impl HiddenTask {
    pub fn is_unfinished(&self) -> bool {
        self.status == 0
    }
}

#[derive(Debug, Clone)]
pub struct TomarketClient {
    http: HttpClient,
}

impl TomarketClient {
    /// Tomarket expects the raw token as the Authorization header.
    pub fn new(base_url: &str, access_token: &str) -> Result<Self, BotError> {
        let http = HttpClient::new(base_url, access_token)?;
        Ok(Self { http })
    }

    async fn enveloped<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T, BotError> {
        let envelope: Envelope<T> = self.http.json(method, endpoint, body).await?;
        envelope.into_reply()?.into_result()
    }

    /// POST whose reply carries no payload we need beyond its status.
    async fn acknowledged(&self, endpoint: &str, body: &Value) -> Result<Value, BotError> {
        let envelope: Envelope<Value> = self.http.json(Method::POST, endpoint, Some(body)).await?;
        envelope.into_ack().into_result()
    }

    pub async fn hidden_tasks(&self) -> Result<Vec<HiddenTask>, BotError> {
        self.enveloped(Method::GET, "/tasks/hidden", None).await
    }

    pub async fn claim_task(&self, task_id: i64) -> Result<String, BotError> {
        let payload = json!({ "task_id": task_id });
        let data = self.acknowledged("/tasks/claim", &payload).await?;
        Ok(data.to_string())
    }

    /// Claim every unfinished hidden task. Returns how many were claimed.
    pub async fn claim_hidden_tasks(&self) -> Result<usize, BotError> {
        let tasks = self.hidden_tasks().await?;
        let mut claimed = 0;
        for task in tasks.iter().filter(|t| t.is_unfinished()) {
            tracing::info!(
                "Claiming hidden task {} '{}' (code {}, score {})",
                task.task_id,
                task.name,
                task.code,
                task.score
            );
            let result = self.claim_task(task.task_id).await?;
            tracing::info!("Task claimed: {result}");
            claimed += 1;
        }
        Ok(claimed)
    }
}

impl DropGameApi for TomarketClient {
    fn name(&self) -> &'static str {
        "Tomarket"
    }

    fn points(&self) -> u64 {
        TOMARKET_MAX_POINTS
    }

    async fn balance(&self) -> Result<DropBalance, BotError> {
        let dto: BalanceDto = self.enveloped(Method::GET, "/user/balance", None).await?;
        Ok(DropBalance {
            available_balance: dto.available_balance,
            play_passes: dto.play_passes,
        })
    }

    async fn start_round(&self) -> Result<String, BotError> {
        let payload = json!({ "game_id": DROP_GAME_ID });
        let dto: RoundDto = self
            .enveloped(Method::POST, "/game/play", Some(&payload))
            .await?;
        Ok(dto.round_id)
    }

    async fn claim(&self, _round_id: &str, points: u64) -> Result<String, BotError> {
        let payload = json!({ "game_id": DROP_GAME_ID, "points": points });
        let data = self.acknowledged("/game/claim", &payload).await?;
        Ok(data.to_string())
    }

    async fn start_farming(&self) -> Result<Value, BotError> {
        self.http.json(Method::POST, "/farming/start", None).await
    }
}
