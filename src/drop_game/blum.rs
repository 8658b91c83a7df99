// Blum drop-game client.

use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::BotError;
use crate::http::HttpClient;

use super::{DropBalance, DropGameApi};

pub const BLUM_BASE_URL: &str = "https://game-domain.blum.codes/api/v1";
/// Points claimed per round.
pub const BLUM_MAX_POINTS: u64 = 280;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceDto {
    available_balance: Value,
    play_passes: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoundDto {
    game_id: String,
}

#[derive(Debug, Clone)]
pub struct BlumClient {
    http: HttpClient,
}

impl BlumClient {
    pub fn new(base_url: &str, access_token: &str) -> Result<Self, BotError> {
        let http = HttpClient::new(base_url, &format!("Bearer {access_token}"))?;
        Ok(Self { http })
    }
}

impl DropGameApi for BlumClient {
    fn name(&self) -> &'static str {
        "Blum"
    }

    fn points(&self) -> u64 {
        BLUM_MAX_POINTS
    }

    async fn balance(&self) -> Result<DropBalance, BotError> {
        let dto: BalanceDto = self.http.json(Method::GET, "/user/balance", None).await?;
        Ok(DropBalance {
            available_balance: dto.available_balance,
            play_passes: dto.play_passes,
        })
    }

    async fn start_round(&self) -> Result<String, BotError> {
        let dto: RoundDto = self.http.json(Method::POST, "/game/play", None).await?;
        Ok(dto.game_id)
    }

    async fn claim(&self, round_id: &str, points: u64) -> Result<String, BotError> {
        let payload = json!({ "gameId": round_id, "points": points });
        self.http
            .text(Method::POST, "/game/claim", Some(&payload))
            .await
    }

    async fn start_farming(&self) -> Result<Value, BotError> {
        self.http.json(Method::POST, "/farming/start", None).await
    }
}
